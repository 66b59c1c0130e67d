use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};

use super::StatusApi;
use super::error::ApiError;
use super::types::AssetContentUpdate;
use crate::models::{Asset, JobUpdate};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest-backed client for the job/asset status API.
pub struct HttpStatusApi {
    api_key: String,
    client: Client,
    base_url: String,
}

impl HttpStatusApi {
    /// Build a client for the API rooted at `base_url` (e.g. `https://app.example.com/api`).
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn patch_job(&self, job_id: &str, update: &JobUpdate) -> Result<(), ApiError> {
        let response = self
            .client
            .patch(self.url("asset-processing-job"))
            .bearer_auth(&self.api_key)
            .query(&[("jobId", job_id)])
            .json(update)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into [`ApiError::Status`], keeping the body as the message.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl StatusApi for HttpStatusApi {
    async fn fetch_asset(&self, asset_id: &str) -> Result<Option<Asset>, ApiError> {
        let response = self
            .client
            .get(self.url("asset"))
            .bearer_auth(&self.api_key)
            .query(&[("assetId", asset_id)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = check_status(response).await?.bytes().await?;
        let asset = serde_json::from_slice::<Asset>(&body)?;
        Ok(Some(asset))
    }

    async fn fetch_asset_file(&self, file_url: &str) -> Result<Vec<u8>, ApiError> {
        // File URLs point at blob storage, which must not see the API key.
        let response = self.client.get(file_url).send().await?;
        let bytes = check_status(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn update_job_heartbeat(&self, job_id: &str) -> Result<(), ApiError> {
        self.patch_job(job_id, &JobUpdate::heartbeat(Utc::now()))
            .await
    }

    async fn update_job_details(&self, job_id: &str, update: &JobUpdate) -> Result<(), ApiError> {
        self.patch_job(job_id, update).await
    }

    async fn update_asset_content(&self, asset_id: &str, content: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .patch(self.url("asset"))
            .bearer_auth(&self.api_key)
            .query(&[("assetId", asset_id)])
            .json(&AssetContentUpdate {
                content: content.to_string(),
            })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
