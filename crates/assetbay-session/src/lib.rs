//! Assetbay session state machines.
//!
//! Two independent, collaborating controllers consumed by a presentation
//! layer:
//!
//! - [`UploadQueue`] owns in-flight and recently-completed uploads: one
//!   concurrent request per file, simulated progress while the transfer is
//!   outstanding, delayed eviction of completed entries.
//! - [`AssetListing`] owns the paginated, searched view of server-known
//!   assets: debounced search, sequence-numbered last-request-wins fetches,
//!   delete with refetch.
//!
//! They communicate through a [`RefreshSignal`]: every terminal upload
//! transition invalidates the listing so a completed upload becomes visible
//! without a manual reload. User-facing outcomes are emitted on a
//! [`Notifier`] channel.

pub mod gateway;
pub mod listing;
pub mod notify;
#[cfg(test)]
pub(crate) mod testing;
pub mod upload;

pub use gateway::AssetGateway;
pub use listing::{AssetListing, ListingPhase, RefreshSignal};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use upload::UploadQueue;
