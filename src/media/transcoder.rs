//! ffmpeg-backed transcoder for audio and video assets.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use super::Transcoder;
use super::chunker::split_into_chunks;
use super::error::MediaError;
use crate::models::Chunk;

/// Bitrate of the extracted audio track. Low enough that a 24 MiB chunk
/// holds roughly 50 minutes of speech.
const EXTRACT_BITRATE: &str = "64k";

/// Transcoder that chunks audio directly and shells out to ffmpeg to pull
/// the audio track out of video containers.
pub struct FfmpegTranscoder {
    ffmpeg: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Run ffmpeg on `input` and return the mp3 audio track it writes to stdout.
    async fn extract_audio(&self, input: &Path) -> Result<Vec<u8>, MediaError> {
        let output = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-i"])
            .arg(input)
            .args(["-vn", "-acodec", "libmp3lame", "-b:a", EXTRACT_BITRATE, "-f", "mp3", "pipe:1"])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(MediaError::FfmpegNotFound)?;

        if !output.status.success() {
            return Err(MediaError::FfmpegFailed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(MediaError::NoAudioTrack);
        }
        Ok(output.stdout)
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn split_audio(
        &self,
        data: &[u8],
        max_chunk_size: usize,
        base_name: &str,
    ) -> Result<Vec<Chunk>, MediaError> {
        split_into_chunks(data, max_chunk_size, base_name)
    }

    async fn extract_audio_and_split(
        &self,
        data: &[u8],
        max_chunk_size: usize,
        base_name: &str,
    ) -> Result<Vec<Chunk>, MediaError> {
        if max_chunk_size == 0 {
            return Err(MediaError::InvalidChunkSize);
        }

        // Containers such as mp4 need a seekable input, so stage the bytes on disk.
        let suffix = Path::new(base_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let staged = tempfile::Builder::new()
            .prefix("asset-video-")
            .suffix(&suffix)
            .tempfile()?;
        tokio::fs::write(staged.path(), data).await?;

        let audio = self.extract_audio(staged.path()).await?;
        tracing::debug!(
            video_bytes = data.len(),
            audio_bytes = audio.len(),
            "extracted audio track"
        );

        let stem = Path::new(base_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("video");
        split_into_chunks(&audio, max_chunk_size, &format!("{stem}.mp3"))
    }
}
