//! Speech-to-text over an OpenAI-compatible `audio/transcriptions` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use futures::{FutureExt, StreamExt, TryStreamExt, stream};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::Transcriber;
use super::error::MediaError;
use crate::models::Chunk;

const API_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Whisper transcription client.
pub struct WhisperTranscriber {
    api_key: String,
    model: String,
    concurrency: usize,
    client: Client,
    base_url: String,
}

impl WhisperTranscriber {
    pub fn new(
        api_key: String,
        model: String,
        concurrency: usize,
        timeout: Duration,
    ) -> Result<Self, MediaError> {
        Self::with_base_url(api_key, model, concurrency, timeout, API_URL.to_string())
    }

    /// Create a transcriber pointing at a custom base URL (self-hosted Whisper, tests).
    pub fn with_base_url(
        api_key: String,
        model: String,
        concurrency: usize,
        timeout: Duration,
        base_url: String,
    ) -> Result<Self, MediaError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            api_key,
            model,
            concurrency: concurrency.max(1),
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn transcribe_chunk(&self, chunk: &Chunk) -> Result<String, MediaError> {
        let form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part(
                "file",
                Part::bytes(chunk.data.clone()).file_name(chunk.name.clone()),
            );

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MediaError::Transcription {
                chunk: chunk.name.clone(),
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<TranscriptionResponse>().await?;
        tracing::debug!(chunk = %chunk.name, index = chunk.index, chars = body.text.len(), "chunk transcribed");
        Ok(body.text)
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe_chunks(&self, chunks: &[Chunk]) -> Result<Vec<String>, MediaError> {
        // `buffered` yields results in input order even when requests overlap.
        // Boxing pins down one lifetime per future, which the Send check needs.
        let futures: Vec<_> = chunks
            .iter()
            .map(|chunk| self.transcribe_chunk(chunk).boxed())
            .collect();
        stream::iter(futures)
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}
