//! Upload queue manager.
//!
//! One entry per submitted file, uploading concurrently with no cap and no
//! retry. While a transfer is outstanding the entry shows simulated progress
//! (+10 every 300 ms, capped at 90); only the resolution of the network call
//! completes it. Successful entries are evicted after a 2 s delay. Failed
//! entries persist until [`UploadQueue::dismiss`] or
//! [`UploadQueue::clear_errors`] — errors are never auto-evicted.
//!
//! Timer tasks (progress ticker, eviction) are owned by the queue entry and
//! aborted when the entry is removed, so nothing fires against a
//! no-longer-present item. The in-flight HTTP request itself is never
//! cancelled; a resolution arriving for a removed entry is ignored.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::sleep;

use assetbay_core::models::{UploadFile, UploadItem, UploadReceipt, UploadStatus};
use assetbay_core::ApiError;

use crate::gateway::AssetGateway;
use crate::listing::RefreshSignal;
use crate::notify::Notifier;

/// Interval between simulated progress increments.
pub const PROGRESS_TICK: Duration = Duration::from_millis(300);
/// Progress added per tick.
pub const PROGRESS_STEP: u8 = 10;
/// Simulated progress never passes this; 100 is reserved for real completion.
pub const PROGRESS_CEILING: u8 = 90;
/// Delay before a successful entry leaves the queue.
pub const EVICTION_DELAY: Duration = Duration::from_millis(2000);

struct Entry {
    item: UploadItem,
    /// Ticker and eviction tasks owned by this entry; aborted on removal.
    timers: Vec<AbortHandle>,
}

#[derive(Default)]
struct QueueState {
    entries: Vec<Entry>,
    next_ticket: u64,
}

impl QueueState {
    fn entry_mut(&mut self, ticket: u64) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.item.ticket == ticket)
    }
}

/// Ordered collection of in-flight and recently-completed uploads.
///
/// Cheap to clone; all clones share the same queue. Must be created inside a
/// tokio runtime, since submissions spawn driver tasks.
#[derive(Clone)]
pub struct UploadQueue {
    gateway: Arc<dyn AssetGateway>,
    state: Arc<Mutex<QueueState>>,
    notifier: Notifier,
    refresh: RefreshSignal,
}

impl UploadQueue {
    pub fn new(gateway: Arc<dyn AssetGateway>, notifier: Notifier, refresh: RefreshSignal) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(QueueState::default())),
            notifier,
            refresh,
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Enqueue files and immediately start one upload per file. An empty
    /// submission is a silent no-op. Returns the tickets assigned to the new
    /// entries, in input order.
    pub fn submit(&self, files: Vec<UploadFile>) -> Vec<u64> {
        if files.is_empty() {
            return Vec::new();
        }

        let mut tickets = Vec::with_capacity(files.len());
        {
            let mut state = self.lock();
            for file in &files {
                state.next_ticket += 1;
                let ticket = state.next_ticket;
                state.entries.push(Entry {
                    item: UploadItem::new(ticket, file.name.clone()),
                    timers: Vec::new(),
                });
                tickets.push(ticket);
            }
        }

        tracing::debug!(count = files.len(), "starting uploads");
        for (ticket, file) in tickets.iter().copied().zip(files) {
            self.begin(ticket, file);
        }
        tickets
    }

    /// Snapshot of the queue in insertion order.
    pub fn status(&self) -> Vec<UploadItem> {
        self.lock().entries.iter().map(|e| e.item.clone()).collect()
    }

    /// Number of entries not yet in a terminal state.
    pub fn in_flight(&self) -> usize {
        self.lock()
            .entries
            .iter()
            .filter(|e| !e.item.status.is_terminal())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Remove an entry regardless of state, aborting its timers. The upload
    /// request itself is not cancelled; its late resolution is ignored.
    pub fn dismiss(&self, ticket: u64) {
        self.remove(ticket);
    }

    /// Remove all entries in the error state.
    pub fn clear_errors(&self) {
        let removed: Vec<Entry> = {
            let mut state = self.lock();
            let (errors, rest): (Vec<Entry>, Vec<Entry>) = state
                .entries
                .drain(..)
                .partition(|e| e.item.status == UploadStatus::Error);
            state.entries = rest;
            errors
        };
        for entry in removed {
            for timer in entry.timers {
                timer.abort();
            }
        }
    }

    fn begin(&self, ticket: u64, file: UploadFile) {
        {
            let mut state = self.lock();
            match state.entry_mut(ticket) {
                Some(entry) => entry.item.status = UploadStatus::Uploading,
                None => return, // dismissed before we got here
            }
        }

        let ticker = {
            let this = self.clone();
            tokio::spawn(async move {
                let mut tick = tokio::time::interval(PROGRESS_TICK);
                tick.tick().await; // the first tick completes immediately
                loop {
                    tick.tick().await;
                    if !this.bump_progress(ticket) {
                        break;
                    }
                }
            })
        };

        {
            let this = self.clone();
            tokio::spawn(async move {
                let result = this.gateway.upload_asset(&file.name, file.bytes).await;
                this.settle(ticket, &file.name, result);
            });
        }

        let mut state = self.lock();
        match state.entry_mut(ticket) {
            Some(entry) => entry.timers.push(ticker.abort_handle()),
            None => ticker.abort(),
        }
    }

    /// One simulated progress increment. Returns false once the entry is
    /// terminal or gone, which stops the ticker.
    fn bump_progress(&self, ticket: u64) -> bool {
        let mut state = self.lock();
        match state.entry_mut(ticket) {
            Some(entry) if entry.item.status == UploadStatus::Uploading => {
                if entry.item.progress < PROGRESS_CEILING {
                    entry.item.progress += PROGRESS_STEP;
                }
                true
            }
            _ => false,
        }
    }

    /// Apply the resolution of an upload call. Entries already removed or
    /// already terminal are left alone, keeping transitions monotonic.
    fn settle(&self, ticket: u64, name: &str, result: Result<UploadReceipt, ApiError>) {
        let outcome = {
            let mut state = self.lock();
            let Some(entry) = state.entry_mut(ticket) else {
                tracing::debug!(name, "upload resolved for a dismissed entry");
                return;
            };
            if entry.item.status.is_terminal() {
                return;
            }

            match result {
                Ok(_) => {
                    entry.item.progress = 100;
                    entry.item.status = UploadStatus::Success;
                    tracing::info!(name, "upload completed");

                    let this = self.clone();
                    let eviction = tokio::spawn(async move {
                        sleep(EVICTION_DELAY).await;
                        this.remove(ticket);
                    });
                    entry.timers.push(eviction.abort_handle());
                    Some(Ok(()))
                }
                Err(err) if err.is_not_configured() => {
                    tracing::debug!(name, "upload skipped, no API key configured");
                    None
                }
                Err(err) => {
                    let message = err.user_message();
                    tracing::warn!(name, error = %message, "upload failed");
                    entry.item.status = UploadStatus::Error;
                    entry.item.error = Some(message.clone());
                    Some(Err(message))
                }
            }
        };

        let Some(outcome) = outcome else {
            // No request was made, so nothing changed server-side; drop the
            // entry quietly.
            self.remove(ticket);
            return;
        };

        match outcome {
            Ok(()) => self.notifier.success(format!("{name} uploaded successfully")),
            Err(message) => self
                .notifier
                .error(format!("Failed to upload {name}: {message}")),
        }

        // Either way the server state may have changed; refetch the listing.
        self.refresh.notify();
    }

    fn remove(&self, ticket: u64) {
        let entry = {
            let mut state = self.lock();
            state
                .entries
                .iter()
                .position(|e| e.item.ticket == ticket)
                .map(|idx| state.entries.remove(idx))
        };
        if let Some(entry) = entry {
            for timer in entry.timers {
                timer.abort();
            }
        }
    }
}
