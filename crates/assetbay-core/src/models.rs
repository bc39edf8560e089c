//! Domain models and wire envelopes.
//!
//! Wire types use camelCase field names to match the server's JSON
//! (`mimeType`, `createdAt`). Upload-queue types are client-only state and
//! never cross the wire, but keep `Serialize` for CLI/JSON output.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server-tracked uploaded file record. Immutable client-side except via delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub path: String,
    pub size: u64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// One page of the asset listing, as returned by `GET /api/assets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetPage {
    pub success: bool,
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
    pub assets: Vec<Asset>,
}

/// Single-asset envelope, as returned by `GET /api/assets/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEnvelope {
    pub success: bool,
    pub asset: Asset,
}

/// Upload confirmation, as returned by `PUT /api/upload/{fileName}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub success: bool,
    pub message: String,
    pub asset: Asset,
}

/// Structured error payload inside a non-2xx response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

/// Error response envelope: `{"success": false, "error": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

/// A file selected for upload: name plus opaque binary payload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Lifecycle state of an upload-queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Success,
    Error,
}

impl UploadStatus {
    /// Success and error are terminal; nothing transitions out of them.
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Success | UploadStatus::Error)
    }
}

/// One row in the upload queue.
///
/// `ticket` is a queue-assigned monotonic id; all status updates key by it,
/// so two queued files with identical names stay fully distinct.
#[derive(Debug, Clone, Serialize)]
pub struct UploadItem {
    pub ticket: u64,
    pub name: String,
    /// 0-100. Simulated while uploading (capped at 90), forced to 100 on success.
    pub progress: u8,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadItem {
    pub fn new(ticket: u64, name: impl Into<String>) -> Self {
        Self {
            ticket,
            name: name.into(),
            progress: 0,
            status: UploadStatus::Pending,
            error: None,
        }
    }
}
