use thiserror::Error;

use crate::api::ApiError;
use crate::media::MediaError;

/// Everything that can end a job execution in the `failed` state.
///
/// None of these escape the executor; they are rendered into the job's
/// `errorMessage` instead.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Asset {asset_id} not found for asset processing job {job_id}")]
    AssetNotFound { job_id: String, asset_id: String },

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Failed to decode {file_name} as UTF-8 text: {source}")]
    Decode {
        file_name: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

impl JobError {
    /// Classify the failure for logs and for whoever decides on re-enqueueing.
    pub fn kind(&self) -> FailureKind {
        match self {
            JobError::AssetNotFound { .. }
            | JobError::UnsupportedContentType(_)
            | JobError::Decode { .. } => FailureKind::Business,
            JobError::Api(_) | JobError::Media(_) => FailureKind::System,
        }
    }
}

/// Classifies a job failure for retry logic decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The asset itself cannot be processed (missing, unsupported, undecodable).
    Business,
    /// A collaborator failed (status API, ffmpeg, transcription backend).
    System,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Business => write!(f, "Business"),
            FailureKind::System => write!(f, "System"),
        }
    }
}
