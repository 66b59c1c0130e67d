//! In-memory collaborators shared by unit tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{ApiError, StatusApi};
use crate::media::chunker::split_into_chunks;
use crate::media::{MediaError, Transcoder, Transcriber};
use crate::models::{Asset, Chunk, ContentType, JobStatus, JobUpdate};

/// One recorded call against [`FakeApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FetchAsset(String),
    FetchFile(String),
    Heartbeat(String),
    UpdateJob(String, JobUpdate),
    UpdateContent(String, String),
}

fn server_error(message: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        message: message.to_string(),
    }
}

/// Status API double that records every call and fails on request.
#[derive(Default)]
pub struct FakeApi {
    asset: Option<Asset>,
    file: Vec<u8>,
    fail_fetch_asset: bool,
    fail_fetch_file: bool,
    fail_content: bool,
    fail_statuses: Vec<JobStatus>,
    failing_heartbeats: HashSet<usize>,
    heartbeat_delay: Option<Duration>,
    heartbeat_attempts: Mutex<usize>,
    calls: Mutex<Vec<ApiCall>>,
}

impl FakeApi {
    pub fn with_asset(asset: Asset, file: &[u8]) -> Self {
        Self {
            asset: Some(asset),
            file: file.to_vec(),
            ..Default::default()
        }
    }

    pub fn failing_fetch_asset(mut self) -> Self {
        self.fail_fetch_asset = true;
        self
    }

    pub fn failing_fetch_file(mut self) -> Self {
        self.fail_fetch_file = true;
        self
    }

    pub fn failing_content_update(mut self) -> Self {
        self.fail_content = true;
        self
    }

    /// Reject job updates that set `status`.
    pub fn failing_status(mut self, status: JobStatus) -> Self {
        self.fail_statuses.push(status);
        self
    }

    /// Fail the given heartbeat attempts (1-based).
    pub fn failing_heartbeats(mut self, attempts: &[usize]) -> Self {
        self.failing_heartbeats = attempts.iter().copied().collect();
        self
    }

    pub fn heartbeat_delay(mut self, delay: Duration) -> Self {
        self.heartbeat_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than heartbeats, in order.
    pub fn work_calls(&self) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, ApiCall::Heartbeat(_)))
            .collect()
    }

    pub fn heartbeats_for(&self, job_id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ApiCall::Heartbeat(id) if id == job_id))
            .count()
    }

    pub fn job_updates(&self) -> Vec<JobUpdate> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::UpdateJob(_, update) => Some(update),
                _ => None,
            })
            .collect()
    }

    /// Status values written back, in order.
    pub fn statuses(&self) -> Vec<JobStatus> {
        self.job_updates().iter().filter_map(|u| u.status).collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StatusApi for FakeApi {
    async fn fetch_asset(&self, asset_id: &str) -> Result<Option<Asset>, ApiError> {
        self.record(ApiCall::FetchAsset(asset_id.to_string()));
        if self.fail_fetch_asset {
            return Err(server_error("asset lookup failed"));
        }
        Ok(self.asset.clone().filter(|a| a.id == asset_id))
    }

    async fn fetch_asset_file(&self, file_url: &str) -> Result<Vec<u8>, ApiError> {
        self.record(ApiCall::FetchFile(file_url.to_string()));
        if self.fail_fetch_file {
            return Err(server_error("blob download failed"));
        }
        Ok(self.file.clone())
    }

    async fn update_job_heartbeat(&self, job_id: &str) -> Result<(), ApiError> {
        let attempt = {
            let mut attempts = self.heartbeat_attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };
        if let Some(delay) = self.heartbeat_delay {
            tokio::time::sleep(delay).await;
        }
        self.record(ApiCall::Heartbeat(job_id.to_string()));
        if self.failing_heartbeats.contains(&attempt) {
            return Err(server_error("heartbeat rejected"));
        }
        Ok(())
    }

    async fn update_job_details(&self, job_id: &str, update: &JobUpdate) -> Result<(), ApiError> {
        self.record(ApiCall::UpdateJob(job_id.to_string(), update.clone()));
        if update
            .status
            .is_some_and(|status| self.fail_statuses.contains(&status))
        {
            return Err(server_error("job update rejected"));
        }
        Ok(())
    }

    async fn update_asset_content(&self, asset_id: &str, content: &str) -> Result<(), ApiError> {
        self.record(ApiCall::UpdateContent(
            asset_id.to_string(),
            content.to_string(),
        ));
        if self.fail_content {
            return Err(server_error("content update rejected"));
        }
        Ok(())
    }
}

/// Transcoder double: audio and "video" are both chunked from the raw bytes.
#[derive(Default)]
pub struct FakeTranscoder {
    fail: bool,
    calls: Mutex<Vec<(&'static str, String)>>,
}

impl FakeTranscoder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// `(operation, base_name)` pairs in call order.
    pub fn calls(&self) -> Vec<(&'static str, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn split_audio(
        &self,
        data: &[u8],
        max_chunk_size: usize,
        base_name: &str,
    ) -> Result<Vec<Chunk>, MediaError> {
        self.calls
            .lock()
            .unwrap()
            .push(("split_audio", base_name.to_string()));
        split_into_chunks(data, max_chunk_size, base_name)
    }

    async fn extract_audio_and_split(
        &self,
        data: &[u8],
        max_chunk_size: usize,
        base_name: &str,
    ) -> Result<Vec<Chunk>, MediaError> {
        self.calls
            .lock()
            .unwrap()
            .push(("extract_audio_and_split", base_name.to_string()));
        if self.fail {
            return Err(MediaError::NoAudioTrack);
        }
        split_into_chunks(data, max_chunk_size, base_name)
    }
}

/// Transcriber double returning canned texts by chunk index.
#[derive(Default)]
pub struct FakeTranscriber {
    texts: Vec<String>,
    fail: bool,
    seen: Mutex<Vec<String>>,
}

impl FakeTranscriber {
    pub fn with_texts(texts: &[&str]) -> Self {
        Self {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Names of chunks received, in order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe_chunks(&self, chunks: &[Chunk]) -> Result<Vec<String>, MediaError> {
        self.seen
            .lock()
            .unwrap()
            .extend(chunks.iter().map(|c| c.name.clone()));
        if self.fail {
            return Err(MediaError::Transcription {
                chunk: chunks.first().map(|c| c.name.clone()).unwrap_or_default(),
                status: 503,
                message: "backend overloaded".into(),
            });
        }
        Ok(chunks
            .iter()
            .map(|c| {
                self.texts
                    .get(c.index)
                    .cloned()
                    .unwrap_or_else(|| format!("chunk {}", c.index))
            })
            .collect())
    }
}

pub fn asset(file_type: ContentType, file_name: &str) -> Asset {
    Asset {
        id: "asset-1".into(),
        file_url: format!("https://blob.example.com/project-1/{file_name}"),
        file_name: file_name.into(),
        file_type,
        content: None,
        project_id: Some("project-1".into()),
        title: Some(file_name.into()),
        mime_type: None,
        size: None,
    }
}
