//! Configuração do worker carregada a partir de `asset-processor.toml`.
//!
//! A struct [`WorkerConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! Variáveis de ambiente (inclusive as vindas de `.env`) têm precedência sobre o arquivo.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::executor::ExecutorConfig;

/// Nome do arquivo de configuração procurado no diretório atual.
pub const DEFAULT_CONFIG_FILE: &str = "asset-processor.toml";

/// Configuração de nível superior do worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// URL base da API de status (ex.: `https://app.example.com/api`).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Chave enviada como bearer token para a API de status.
    #[serde(default)]
    pub server_api_key: String,

    /// Chave da API de transcrição.
    #[serde(default)]
    pub openai_api_key: String,

    /// Modelo de transcrição.
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    /// Quantos chunks são transcritos em paralelo.
    #[serde(default = "default_transcription_concurrency")]
    pub transcription_concurrency: usize,

    /// Tamanho máximo de cada chunk de áudio, em bytes.
    #[serde(default = "default_max_chunk_size_bytes")]
    pub max_chunk_size_bytes: usize,

    /// Intervalo entre heartbeats, em segundos.
    #[serde(default = "default_heartbeat_interval_seconds")]
    pub heartbeat_interval_seconds: u64,

    /// Timeout das requisições à API de status, em segundos.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Timeout de cada requisição de transcrição, em segundos.
    #[serde(default = "default_transcription_timeout_seconds")]
    pub transcription_timeout_seconds: u64,

    /// Caminho do binário do ffmpeg.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
}

fn default_api_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_transcription_concurrency() -> usize {
    4
}

// 24 MiB, abaixo do limite de 25 MB por upload do Whisper.
fn default_max_chunk_size_bytes() -> usize {
    24 * 1024 * 1024
}

fn default_heartbeat_interval_seconds() -> u64 {
    10
}

fn default_request_timeout_seconds() -> u64 {
    60
}

fn default_transcription_timeout_seconds() -> u64 {
    300
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            server_api_key: String::new(),
            openai_api_key: String::new(),
            transcription_model: default_transcription_model(),
            transcription_concurrency: default_transcription_concurrency(),
            max_chunk_size_bytes: default_max_chunk_size_bytes(),
            heartbeat_interval_seconds: default_heartbeat_interval_seconds(),
            request_timeout_seconds: default_request_timeout_seconds(),
            transcription_timeout_seconds: default_transcription_timeout_seconds(),
            ffmpeg_path: default_ffmpeg_path(),
        }
    }
}

impl WorkerConfig {
    /// Carrega a configuração de `path` (ou de `asset-processor.toml` no diretório atual).
    /// Usa valores padrão se o arquivo não existir; o ambiente sobrescreve o arquivo.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<WorkerConfig>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Aplica sobrescritas vindas do ambiente. `lookup` recebe o nome da variável.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = get("API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(key) = get("SERVER_API_KEY") {
            self.server_api_key = key;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.openai_api_key = key;
        }
        if let Some(size) = get("MAX_CHUNK_SIZE_BYTES") {
            self.max_chunk_size_bytes = size
                .parse()
                .with_context(|| format!("MAX_CHUNK_SIZE_BYTES is not a number: {size}"))?;
        }
        if let Some(secs) = get("HEARTBEAT_INTERVAL_SECONDS") {
            self.heartbeat_interval_seconds = secs
                .parse()
                .with_context(|| format!("HEARTBEAT_INTERVAL_SECONDS is not a number: {secs}"))?;
        }
        Ok(())
    }

    /// Rejeita valores que deixariam o executor inoperante.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            bail!("api_base_url must not be empty");
        }
        if self.max_chunk_size_bytes == 0 {
            bail!("max_chunk_size_bytes must be greater than zero");
        }
        if self.heartbeat_interval_seconds == 0 {
            bail!("heartbeat_interval_seconds must be greater than zero");
        }
        Ok(())
    }

    /// Valores imutáveis repassados ao executor e ao heartbeat.
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            max_chunk_size_bytes: self.max_chunk_size_bytes,
            heartbeat_interval: Duration::from_secs(self.heartbeat_interval_seconds),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn transcription_timeout(&self) -> Duration {
        Duration::from_secs(self.transcription_timeout_seconds)
    }

    /// Cópia segura para exibição: chaves são mascaradas.
    pub fn redacted(&self) -> Self {
        let mask = |key: &str| {
            if key.is_empty() {
                String::new()
            } else {
                "********".to_string()
            }
        };
        Self {
            server_api_key: mask(&self.server_api_key),
            openai_api_key: mask(&self.openai_api_key),
            ..self.clone()
        }
    }
}
