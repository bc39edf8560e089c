//! HTTP client for the Assetbay API.
//!
//! Provides a minimal client with X-API-Key auth, generic GET/PUT/DELETE
//! helpers, and domain methods (list, get, upload, delete, download URL).
//! The session and CLI crates use this client directly.
//!
//! The API key comes from a shared [`ApiKeyStore`] and is read per request,
//! so a key change takes effect on the next call without rebuilding the
//! client. When no key is present, calls short-circuit with
//! [`ApiError::NotConfigured`] instead of being sent.

pub mod api;

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use serde::de::DeserializeOwned;

use assetbay_core::models::ErrorResponse;
use assetbay_core::{ApiConfig, ApiError, ApiKeyStore};

/// Path prefix shared by all API routes.
pub const API_PREFIX: &str = "/api";

/// HTTP client for the Assetbay API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    keys: ApiKeyStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, keys: ApiKeyStore) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            keys,
        })
    }

    /// Build a client and key store from an [`ApiConfig`].
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), ApiKeyStore::from(config))
    }

    /// Create client from environment: ASSETBAY_API_URL, ASSETBAY_API_KEY.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_config(&ApiConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The key store this client reads from. Share it with controllers that
    /// need to react to key changes.
    pub fn keys(&self) -> &ApiKeyStore {
        &self.keys
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        match self.keys.current() {
            Some(key) => Ok(request.header("X-API-Key", key)),
            None => Err(ApiError::NotConfigured),
        }
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let mut request = self.apply_auth(self.client.get(&url))?;

        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(normalize)?;
        decode(response).await
    }

    /// PUT a raw binary body and deserialize the JSON response.
    pub async fn put_bytes<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Bytes,
    ) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.put(&url))?.body(body);

        let response = request.send().await.map_err(normalize)?;
        decode(response).await
    }

    /// DELETE request. Deserializes the JSON response.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.delete(&url))?;

        let response = request.send().await.map_err(normalize)?;
        decode(response).await
    }
}

/// Map a reqwest error to the taxonomy: body-decode failures are `Decode`,
/// everything else (DNS, connect, timeout) is `Transport`.
fn normalize(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}

/// Check status and decode the body. Non-2xx responses are normalized into
/// `ApiError::Server`, preserving the structured `{error: {code, message}}`
/// payload when the body carries one.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => body.error.into(),
            Err(_) => {
                tracing::debug!(status = status.as_u16(), "unstructured error response");
                ApiError::Server {
                    code: status.as_u16(),
                    message: "Unknown error".to_string(),
                }
            }
        });
    }

    response.json().await.map_err(normalize)
}

pub use api::DeleteReceipt;
