//! Gateway trait: the seam between the state machines and the HTTP client.
//!
//! Controllers depend on this trait rather than on `ApiClient` directly so
//! tests can script responses and resolution order.

use async_trait::async_trait;
use bytes::Bytes;

use assetbay_api_client::ApiClient;
use assetbay_core::models::{AssetPage, UploadReceipt};
use assetbay_core::ApiError;

/// The subset of the API the session controllers call.
#[async_trait]
pub trait AssetGateway: Send + Sync {
    async fn list_assets(
        &self,
        limit: u32,
        offset: u64,
        search: Option<&str>,
    ) -> Result<AssetPage, ApiError>;

    async fn upload_asset(&self, file_name: &str, bytes: Bytes)
        -> Result<UploadReceipt, ApiError>;

    async fn delete_asset(&self, id: &str) -> Result<bool, ApiError>;
}

#[async_trait]
impl AssetGateway for ApiClient {
    async fn list_assets(
        &self,
        limit: u32,
        offset: u64,
        search: Option<&str>,
    ) -> Result<AssetPage, ApiError> {
        ApiClient::list_assets(self, limit, offset, search).await
    }

    async fn upload_asset(
        &self,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<UploadReceipt, ApiError> {
        ApiClient::upload_asset(self, file_name, bytes).await
    }

    async fn delete_asset(&self, id: &str) -> Result<bool, ApiError> {
        ApiClient::delete_asset(self, id).await
    }
}
