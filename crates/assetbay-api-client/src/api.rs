//! Domain methods for the Assetbay API client.
//!
//! Response types live in `assetbay_core::models`; the delete receipt is a
//! wire shape specific to this endpoint and is defined here.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use assetbay_core::models::{Asset, AssetEnvelope, AssetPage, UploadReceipt};
use assetbay_core::ApiError;

use crate::{ApiClient, API_PREFIX};

/// Delete confirmation, as returned by `DELETE /api/assets/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteReceipt {
    pub success: bool,
}

impl ApiClient {
    /// List assets with pagination and optional search filter.
    pub async fn list_assets(
        &self,
        limit: u32,
        offset: u64,
        search: Option<&str>,
    ) -> Result<AssetPage, ApiError> {
        let mut query = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
        if let Some(term) = search.filter(|t| !t.is_empty()) {
            query.push(("search", term.to_string()));
        }

        self.get(&format!("{API_PREFIX}/assets"), &query).await
    }

    /// Get a single asset by ID.
    pub async fn get_asset(&self, id: &str) -> Result<Asset, ApiError> {
        let envelope: AssetEnvelope = self
            .get(
                &format!("{API_PREFIX}/assets/{}", urlencoding::encode(id)),
                &[],
            )
            .await?;
        Ok(envelope.asset)
    }

    /// Upload a file as a raw PUT body. The file name becomes part of the
    /// path, percent-encoded.
    pub async fn upload_asset(
        &self,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<UploadReceipt, ApiError> {
        self.put_bytes(
            &format!("{API_PREFIX}/upload/{}", urlencoding::encode(file_name)),
            bytes,
        )
        .await
    }

    /// Delete an asset by ID. Returns the server's success flag.
    pub async fn delete_asset(&self, id: &str) -> Result<bool, ApiError> {
        let receipt: DeleteReceipt = self
            .delete(&format!("{API_PREFIX}/assets/{}", urlencoding::encode(id)))
            .await?;
        Ok(receipt.success)
    }

    /// Download URL for an asset. Pure URL construction, no network call and
    /// no auth check.
    pub fn download_url(&self, id: &str) -> String {
        self.build_url(&format!("{API_PREFIX}/download/{}", urlencoding::encode(id)))
    }
}
