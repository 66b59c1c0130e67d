use thiserror::Error;

/// Errors raised by the transcoder and transcription backends.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("maximum chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("ffmpeg binary not found: {0}")]
    FfmpegNotFound(std::io::Error),

    #[error("ffmpeg failed (exit code {exit_code:?}): {stderr}")]
    FfmpegFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("no audio track found in video")]
    NoAudioTrack,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transcription failed for chunk {chunk} (status {status}): {message}")]
    Transcription {
        chunk: String,
        status: u16,
        message: String,
    },

    #[error("transcription network error: {0}")]
    Network(#[from] reqwest::Error),
}
