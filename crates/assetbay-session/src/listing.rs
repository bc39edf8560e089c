//! Asset listing controller.
//!
//! Owns the paginated, searched view of server-known assets. Every trigger
//! (page change, committed search, invalidation, key change) issues a fetch
//! tagged with a monotonically increasing sequence number; a response is
//! applied only if it carries the newest issued sequence, so overlapping
//! fetches can never publish stale data (last-request-wins).
//!
//! With no API key configured the controller stays idle and issues no
//! network calls at all.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;

use assetbay_core::models::{Asset, AssetPage};
use assetbay_core::{ApiError, ApiKeyStore, Pager};

use crate::gateway::AssetGateway;
use crate::notify::Notifier;

/// Quiet period after the last keystroke before a search takes effect.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// Cache-invalidation signal. The upload queue bumps it on every terminal
/// transition; the listing refetches on each bump.
#[derive(Clone, Debug)]
pub struct RefreshSignal {
    tx: Arc<watch::Sender<u64>>,
}

impl RefreshSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    pub fn notify(&self) {
        self.tx.send_modify(|n| *n = n.wrapping_add(1));
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for RefreshSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Listing lifecycle. `Ready` and `Errored` are both re-entered via
/// `Loading` on the next trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPhase {
    Idle,
    Loading,
    Ready,
    Errored,
}

struct ListingState {
    pager: Pager,
    /// Latest raw input, not yet debounced.
    search_input: String,
    /// Committed (debounced) search term used for fetches.
    search: String,
    /// Bumped per keystroke; a debounce task only commits if still newest.
    search_epoch: u64,
    assets: Vec<Asset>,
    /// Sequence of the newest issued fetch. Responses for older sequences
    /// are discarded.
    issued: u64,
    phase: ListingPhase,
    last_error: Option<String>,
}

/// Paginated, searchable view of the server's assets.
///
/// Cheap to clone; all clones share one state. Must be created inside a
/// tokio runtime: construction spawns a background task that reacts to
/// invalidation and key-change events.
#[derive(Clone)]
pub struct AssetListing {
    gateway: Arc<dyn AssetGateway>,
    state: Arc<Mutex<ListingState>>,
    keys: ApiKeyStore,
    notifier: Notifier,
}

impl AssetListing {
    pub fn new(
        gateway: Arc<dyn AssetGateway>,
        items_per_page: u32,
        keys: ApiKeyStore,
        notifier: Notifier,
        refresh: &RefreshSignal,
    ) -> Self {
        let listing = Self {
            gateway,
            state: Arc::new(Mutex::new(ListingState {
                pager: Pager::new(items_per_page),
                search_input: String::new(),
                search: String::new(),
                search_epoch: 0,
                assets: Vec::new(),
                issued: 0,
                phase: ListingPhase::Idle,
                last_error: None,
            })),
            keys,
            notifier,
        };

        let this = listing.clone();
        let mut invalidations = refresh.subscribe();
        let mut key_changes = listing.keys.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = invalidations.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        this.refresh();
                    }
                    changed = key_changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        this.reset_for_new_key();
                    }
                }
            }
        });

        listing
    }

    fn lock(&self) -> MutexGuard<'_, ListingState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Snapshot accessors.

    pub fn assets(&self) -> Vec<Asset> {
        self.lock().assets.clone()
    }

    pub fn phase(&self) -> ListingPhase {
        self.lock().phase
    }

    /// True exactly while the newest fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.lock().phase == ListingPhase::Loading
    }

    /// The last fetch error, distinct from delete errors (which only surface
    /// as notifications).
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub fn search(&self) -> String {
        self.lock().search.clone()
    }

    pub fn current_page(&self) -> u64 {
        self.lock().pager.current_page()
    }

    pub fn total_pages(&self) -> u64 {
        self.lock().pager.total_pages()
    }

    pub fn total_items(&self) -> u64 {
        self.lock().pager.total_items()
    }

    pub fn items_per_page(&self) -> u32 {
        self.lock().pager.items_per_page()
    }

    /// Fetch the current `(items_per_page, page, search)` window. Skipped
    /// entirely when no API key is configured.
    pub fn refresh(&self) {
        let params = {
            let mut state = self.lock();
            state.issued += 1;
            if !self.keys.is_configured() {
                state.assets.clear();
                state.pager.reset();
                state.pager.set_total(0);
                state.last_error = None;
                state.phase = ListingPhase::Idle;
                return;
            }
            state.phase = ListingPhase::Loading;
            (
                state.issued,
                state.pager.items_per_page(),
                state.pager.offset(),
                state.search.clone(),
            )
        };

        let (seq, limit, offset, search) = params;
        let this = self.clone();
        tokio::spawn(async move {
            let term = if search.is_empty() {
                None
            } else {
                Some(search.as_str())
            };
            let result = this.gateway.list_assets(limit, offset, term).await;
            this.apply(seq, result);
        });
    }

    /// Update the search input. The change takes effect after the debounce
    /// window; committing a changed value resets to page 1 and triggers
    /// exactly one fetch.
    pub fn set_search(&self, query: impl Into<String>) {
        let epoch = {
            let mut state = self.lock();
            state.search_input = query.into();
            state.search_epoch += 1;
            state.search_epoch
        };

        let this = self.clone();
        tokio::spawn(async move {
            sleep(SEARCH_DEBOUNCE).await;
            this.commit_search(epoch);
        });
    }

    pub fn next_page(&self) {
        let moved = self.lock().pager.next();
        if moved {
            self.refresh();
        }
    }

    pub fn prev_page(&self) {
        let moved = self.lock().pager.prev();
        if moved {
            self.refresh();
        }
    }

    /// Out-of-range targets are silent no-ops.
    pub fn go_to_page(&self, page: u64) {
        let moved = self.lock().pager.go_to(page);
        if moved {
            self.refresh();
        }
    }

    /// Delete an asset. On success the listing is refetched; on failure it
    /// is left unchanged and the reason is surfaced as a notification.
    pub fn delete(&self, asset_id: &str) {
        let id = asset_id.to_string();
        let this = self.clone();
        tokio::spawn(async move {
            match this.gateway.delete_asset(&id).await {
                Ok(true) => {
                    tracing::info!(%id, "asset deleted");
                    this.notifier.success("Asset deleted successfully");
                    this.refresh();
                }
                Ok(false) => {
                    this.notifier.error("Failed to delete asset: Unknown error");
                }
                Err(err) if err.is_not_configured() => {
                    tracing::debug!(%id, "delete skipped, no API key configured");
                }
                Err(err) => {
                    this.notifier
                        .error(format!("Failed to delete asset: {}", err.user_message()));
                }
            }
        });
    }

    fn commit_search(&self, epoch: u64) {
        {
            let mut state = self.lock();
            if state.search_epoch != epoch {
                return; // superseded by a later keystroke
            }
            if state.search == state.search_input {
                return; // no effective change, no fetch
            }
            state.search = state.search_input.clone();
            state.pager.reset();
        }
        self.refresh();
    }

    /// Apply a fetch result if it is still the newest one issued.
    fn apply(&self, seq: u64, result: Result<AssetPage, ApiError>) {
        let refetch_clamped = {
            let mut state = self.lock();
            if seq != state.issued {
                tracing::debug!(seq, newest = state.issued, "discarding stale listing response");
                return;
            }

            match result {
                Ok(page) => {
                    let clamped = state.pager.set_total(page.total);
                    state.assets = page.assets;
                    state.phase = ListingPhase::Ready;
                    state.last_error = None;
                    clamped
                }
                Err(err) if err.is_not_configured() => {
                    state.phase = ListingPhase::Idle;
                    false
                }
                Err(err) => {
                    let message = err.user_message();
                    tracing::warn!(error = %message, "listing fetch failed");
                    state.phase = ListingPhase::Errored;
                    state.last_error = Some(message);
                    false
                }
            }
        };

        // The total shrank below the page we asked for; fetch the window the
        // pager clamped to.
        if refetch_clamped {
            self.refresh();
        }
    }

    /// Key changed: the old auth context's data and any in-flight responses
    /// are invalid. Clear everything, then refetch if a key is present.
    fn reset_for_new_key(&self) {
        {
            let mut state = self.lock();
            state.issued += 1;
            state.search_epoch += 1;
            state.search_input.clear();
            state.search.clear();
            state.assets.clear();
            state.pager.reset();
            state.pager.set_total(0);
            state.last_error = None;
            state.phase = ListingPhase::Idle;
        }
        if self.keys.is_configured() {
            self.refresh();
        }
    }
}
