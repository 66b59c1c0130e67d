pub mod chunker;
pub mod error;
pub mod transcoder;
pub mod transcriber;

use async_trait::async_trait;

use crate::models::Chunk;

pub use error::MediaError;
pub use transcoder::FfmpegTranscoder;
pub use transcriber::WhisperTranscriber;

/// Turns raw audio or video bytes into transcription-ready chunks.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Split raw audio into ordered chunks of at most `max_chunk_size` bytes,
    /// named after `base_name`.
    async fn split_audio(
        &self,
        data: &[u8],
        max_chunk_size: usize,
        base_name: &str,
    ) -> Result<Vec<Chunk>, MediaError>;

    /// Extract the audio track of a video, then chunk it like [`Transcoder::split_audio`].
    async fn extract_audio_and_split(
        &self,
        data: &[u8],
        max_chunk_size: usize,
        base_name: &str,
    ) -> Result<Vec<Chunk>, MediaError>;
}

/// Speech-to-text backend.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe every chunk, returning one text per chunk in input order.
    async fn transcribe_chunks(&self, chunks: &[Chunk]) -> Result<Vec<String>, MediaError>;
}
