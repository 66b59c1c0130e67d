use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, instrument};

use crate::api::StatusApi;
use crate::error::JobError;
use crate::heartbeat::Heartbeat;
use crate::media::{Transcoder, Transcriber};
use crate::models::{Asset, ContentType, Job, JobUpdate};

/// Separator placed between the transcriptions of consecutive chunks.
const CHUNK_SEPARATOR: &str = "\n\n";

/// Immutable limits shared by the executor and its heartbeat task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    pub max_chunk_size_bytes: usize,
    pub heartbeat_interval: Duration,
}

/// How a job execution ended. Informational only: the job store already
/// holds the authoritative status by the time this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Failed(String),
}

/// Runs one job: fetch the asset, convert it to text, write the text back.
pub struct JobExecutor {
    api: Arc<dyn StatusApi>,
    transcoder: Arc<dyn Transcoder>,
    transcriber: Arc<dyn Transcriber>,
    config: ExecutorConfig,
}

impl JobExecutor {
    pub fn new(
        api: Arc<dyn StatusApi>,
        transcoder: Arc<dyn Transcoder>,
        transcriber: Arc<dyn Transcriber>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            api,
            transcoder,
            transcriber,
            config,
        }
    }

    /// Execute `job` to a terminal status.
    ///
    /// Never fails: every error ends up in the job's `failed` write-back.
    /// The heartbeat task is stopped and joined before this returns; if the
    /// future is dropped early, the heartbeat is cancelled with it.
    #[instrument(skip_all, fields(job_id = %job.id, asset_id = %job.asset_id))]
    pub async fn execute(&self, job: &Job) -> JobOutcome {
        info!(attempts = job.attempts, "processing job");

        let heartbeat = Heartbeat::spawn(
            Arc::clone(&self.api),
            &job.id,
            self.config.heartbeat_interval,
        );

        let outcome = match self.process(job).await {
            Ok(()) => {
                info!("job completed");
                JobOutcome::Completed
            }
            Err(err) => {
                let message = err.to_string();
                self.record_failure(job, &err, &message).await;
                JobOutcome::Failed(message)
            }
        };

        heartbeat.stop().await;
        outcome
    }

    async fn process(&self, job: &Job) -> Result<(), JobError> {
        self.api
            .update_job_details(&job.id, &JobUpdate::in_progress())
            .await?;

        let asset = self
            .api
            .fetch_asset(&job.asset_id)
            .await?
            .ok_or_else(|| JobError::AssetNotFound {
                job_id: job.id.clone(),
                asset_id: job.asset_id.clone(),
            })?;

        let data = self.api.fetch_asset_file(&asset.file_url).await?;
        let content = self.convert(&asset, data).await?;

        self.api.update_asset_content(&asset.id, &content).await?;
        self.api
            .update_job_details(&job.id, &JobUpdate::completed())
            .await?;
        Ok(())
    }

    /// Turn the downloaded bytes into plain text according to the asset's category.
    async fn convert(&self, asset: &Asset, data: Vec<u8>) -> Result<String, JobError> {
        let max_chunk_size = self.config.max_chunk_size_bytes;
        let base_name = base_name(&asset.file_name);

        let chunks = match &asset.file_type {
            ContentType::Text | ContentType::Markdown => {
                info!(file_name = %asset.file_name, "decoding text asset");
                return String::from_utf8(data).map_err(|source| JobError::Decode {
                    file_name: asset.file_name.clone(),
                    source,
                });
            }
            ContentType::Audio => {
                info!(bytes = data.len(), "splitting audio asset");
                self.transcoder
                    .split_audio(&data, max_chunk_size, base_name)
                    .await?
            }
            ContentType::Video => {
                info!(bytes = data.len(), "extracting audio from video asset");
                self.transcoder
                    .extract_audio_and_split(&data, max_chunk_size, base_name)
                    .await?
            }
            ContentType::Unsupported(raw) => {
                return Err(JobError::UnsupportedContentType(raw.clone()));
            }
        };

        info!(chunks = chunks.len(), "transcribing chunks");
        let texts = self.transcriber.transcribe_chunks(&chunks).await?;
        Ok(texts.join(CHUNK_SEPARATOR))
    }

    /// Best-effort `failed` write-back; its own failure is only logged.
    async fn record_failure(&self, job: &Job, err: &JobError, message: &str) {
        error!(error = %message, kind = %err.kind(), "job failed");

        let update = JobUpdate::failed(job, message);
        if let Err(e) = self.api.update_job_details(&job.id, &update).await {
            error!(error = %e, "failed to record job failure");
        }
    }
}

/// File name without any directory components.
fn base_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name)
}
