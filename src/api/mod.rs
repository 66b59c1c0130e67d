pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

use crate::models::{Asset, JobUpdate};

pub use client::HttpStatusApi;
pub use error::ApiError;

/// Remote operations the executor and heartbeat need from the status API.
#[async_trait]
pub trait StatusApi: Send + Sync {
    /// Look up an asset. `Ok(None)` means the store has no such asset.
    async fn fetch_asset(&self, asset_id: &str) -> Result<Option<Asset>, ApiError>;

    /// Download the raw bytes stored at `file_url`.
    async fn fetch_asset_file(&self, file_url: &str) -> Result<Vec<u8>, ApiError>;

    /// Record that `job_id` is still being worked on.
    async fn update_job_heartbeat(&self, job_id: &str) -> Result<(), ApiError>;

    async fn update_job_details(&self, job_id: &str, update: &JobUpdate) -> Result<(), ApiError>;

    async fn update_asset_content(&self, asset_id: &str, content: &str) -> Result<(), ApiError>;
}
