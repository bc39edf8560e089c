//! Assetbay Core Library
//!
//! This crate provides the domain models, error types, pagination arithmetic,
//! and configuration shared across all Assetbay components.

pub mod config;
pub mod error;
pub mod models;
pub mod pager;

// Re-export commonly used types
pub use config::{ApiConfig, ApiKeyStore};
pub use error::ApiError;
pub use models::{
    Asset, AssetEnvelope, AssetPage, ErrorBody, ErrorResponse, UploadFile, UploadItem,
    UploadReceipt, UploadStatus,
};
pub use pager::Pager;
