//! Scriptable gateway for controller tests.
//!
//! Replies can resolve immediately or be held behind a oneshot gate, which
//! lets tests control the order in-flight calls complete in.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use tokio::sync::oneshot;

use assetbay_core::models::{Asset, AssetPage, UploadReceipt};
use assetbay_core::ApiError;

use crate::gateway::AssetGateway;

pub(crate) fn asset(id: &str) -> Asset {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    Asset {
        id: id.to_string(),
        name: format!("{id}.png"),
        path: format!("/files/{id}.png"),
        size: 1024,
        mime_type: "image/png".to_string(),
        created_at: ts,
        updated_at: ts,
        hash: None,
    }
}

pub(crate) fn page(total: u64, ids: &[&str]) -> AssetPage {
    AssetPage {
        success: true,
        total,
        limit: 0,
        offset: 0,
        assets: ids.iter().map(|id| asset(id)).collect(),
    }
}

pub(crate) fn receipt(name: &str) -> UploadReceipt {
    UploadReceipt {
        success: true,
        message: "uploaded".to_string(),
        asset: asset(name),
    }
}

type ListResult = Result<AssetPage, ApiError>;
type UploadResult = Result<UploadReceipt, ApiError>;

enum Reply<T> {
    Now(T),
    Wait(oneshot::Receiver<T>),
}

impl<T> Reply<T> {
    async fn resolve(self, fallback: impl FnOnce() -> T) -> T {
        match self {
            Reply::Now(value) => value,
            Reply::Wait(rx) => rx.await.unwrap_or_else(|_| fallback()),
        }
    }
}

#[derive(Default)]
pub(crate) struct MockGateway {
    list_calls: Mutex<Vec<(u32, u64, Option<String>)>>,
    list_replies: Mutex<VecDeque<Reply<ListResult>>>,
    upload_replies: Mutex<HashMap<String, VecDeque<Reply<UploadResult>>>>,
    delete_replies: Mutex<VecDeque<Result<bool, ApiError>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_list(&self, result: ListResult) {
        self.list_replies
            .lock()
            .unwrap()
            .push_back(Reply::Now(result));
    }

    /// Queue a list reply that resolves only when the returned sender fires.
    pub fn hold_list(&self) -> oneshot::Sender<ListResult> {
        let (tx, rx) = oneshot::channel();
        self.list_replies
            .lock()
            .unwrap()
            .push_back(Reply::Wait(rx));
        tx
    }

    pub fn script_upload_error(&self, name: &str, err: ApiError) {
        self.upload_replies
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(Reply::Now(Err(err)));
    }

    pub fn script_delete(&self, result: Result<bool, ApiError>) {
        self.delete_replies.lock().unwrap().push_back(result);
    }

    pub fn list_calls(&self) -> Vec<(u32, u64, Option<String>)> {
        self.list_calls.lock().unwrap().clone()
    }
}

/// Hold the next upload of `name` until the gate resolves it. Unscripted
/// uploads succeed immediately.
pub(crate) fn held_upload(gateway: &MockGateway, name: &str) -> UploadGate {
    let (tx, rx) = oneshot::channel();
    gateway
        .upload_replies
        .lock()
        .unwrap()
        .entry(name.to_string())
        .or_default()
        .push_back(Reply::Wait(rx));
    UploadGate {
        name: name.to_string(),
        tx,
    }
}

pub(crate) struct UploadGate {
    name: String,
    tx: oneshot::Sender<UploadResult>,
}

impl UploadGate {
    pub fn resolve_ok(self) {
        let _ = self.tx.send(Ok(receipt(&self.name)));
    }
}

#[async_trait]
impl AssetGateway for MockGateway {
    async fn list_assets(
        &self,
        limit: u32,
        offset: u64,
        search: Option<&str>,
    ) -> Result<AssetPage, ApiError> {
        self.list_calls
            .lock()
            .unwrap()
            .push((limit, offset, search.map(String::from)));
        let reply = self.list_replies.lock().unwrap().pop_front();
        match reply {
            None => Ok(page(0, &[])),
            Some(reply) => {
                reply
                    .resolve(|| Err(ApiError::Transport("mock gate dropped".to_string())))
                    .await
            }
        }
    }

    async fn upload_asset(
        &self,
        file_name: &str,
        _bytes: Bytes,
    ) -> Result<UploadReceipt, ApiError> {
        let reply = self
            .upload_replies
            .lock()
            .unwrap()
            .get_mut(file_name)
            .and_then(|queue| queue.pop_front());
        match reply {
            None => Ok(receipt(file_name)),
            Some(reply) => {
                reply
                    .resolve(|| Err(ApiError::Transport("mock gate dropped".to_string())))
                    .await
            }
        }
    }

    async fn delete_asset(&self, _id: &str) -> Result<bool, ApiError> {
        self.delete_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(true))
    }
}
