//! Configuration module
//!
//! API endpoint and key configuration. The key is held in a reactive
//! [`ApiKeyStore`] rather than process-global state: the HTTP client reads
//! the current value per request, and controllers subscribe to changes so a
//! key swap resets their state instead of requiring a restart.

use std::env;
use std::sync::Arc;

use tokio::sync::watch;

pub const ENV_API_URL: &str = "ASSETBAY_API_URL";
pub const ENV_API_KEY: &str = "ASSETBAY_API_KEY";

const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Connection settings for the Assetbay API.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    /// Absent is a valid state: calls are skipped, not failed loudly.
    pub api_key: Option<String>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Read ASSETBAY_API_URL (default http://localhost:3000) and
    /// ASSETBAY_API_KEY from the environment.
    pub fn from_env() -> Self {
        let base_url = env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_key = env::var(ENV_API_KEY).ok();
        Self::new(base_url, api_key)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Shared, watchable holder for the API key.
#[derive(Clone, Debug)]
pub struct ApiKeyStore {
    tx: Arc<watch::Sender<Option<String>>>,
}

impl ApiKeyStore {
    pub fn new(initial: Option<String>) -> Self {
        let (tx, _rx) = watch::channel(initial.filter(|k| !k.is_empty()));
        Self { tx: Arc::new(tx) }
    }

    /// Current key, if any.
    pub fn current(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    pub fn is_configured(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Replace the key. Empty strings are treated as no key. Subscribers are
    /// only woken when the value actually changes.
    pub fn set(&self, key: Option<String>) {
        let key = key.filter(|k| !k.is_empty());
        self.tx.send_if_modified(|current| {
            if *current == key {
                false
            } else {
                *current = key;
                true
            }
        });
    }

    /// Subscribe to key changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}

impl Default for ApiKeyStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl From<&ApiConfig> for ApiKeyStore {
    fn from(config: &ApiConfig) -> Self {
        Self::new(config.api_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_counts_as_unconfigured() {
        let config = ApiConfig::new("http://localhost:3000", Some(String::new()));
        assert!(!config.is_configured());

        let store = ApiKeyStore::new(Some(String::new()));
        assert!(!store.is_configured());
        assert_eq!(store.current(), None);
    }

    #[test]
    fn set_replaces_and_clears_key() {
        let store = ApiKeyStore::new(None);
        store.set(Some("secret".to_string()));
        assert_eq!(store.current().as_deref(), Some("secret"));
        store.set(None);
        assert_eq!(store.current(), None);
    }

    #[tokio::test]
    async fn subscribers_see_key_changes() {
        let store = ApiKeyStore::new(None);
        let mut rx = store.subscribe();

        store.set(Some("k1".to_string()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_deref(), Some("k1"));
    }

    #[tokio::test]
    async fn setting_same_key_does_not_wake_subscribers() {
        let store = ApiKeyStore::new(Some("k1".to_string()));
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.set(Some("k1".to_string()));
        assert!(!rx.has_changed().unwrap());
    }
}
