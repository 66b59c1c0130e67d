mod api;
mod cli;
mod config;
mod error;
mod executor;
mod heartbeat;
mod media;
mod models;
#[cfg(test)]
mod testing;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use api::HttpStatusApi;
use cli::{Cli, Command};
use config::WorkerConfig;
use executor::{JobExecutor, JobOutcome};
use media::{FfmpegTranscoder, WhisperTranscriber};
use models::Job;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let config = WorkerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Process { job } => process(&config, &job).await,
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config.redacted())?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "asset_processor=debug"
    } else {
        "asset_processor=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Execute the job described by the JSON snapshot at `path`.
async fn process(config: &WorkerConfig, path: &Path) -> Result<()> {
    let job = read_job(path).await?;
    if job.status.is_terminal() {
        tracing::warn!(job_id = %job.id, status = %job.status, "job is already terminal, processing anyway");
    }

    let api = HttpStatusApi::new(
        config.api_base_url.clone(),
        config.server_api_key.clone(),
        config.request_timeout(),
    )
    .context("failed to build status API client")?;
    let transcriber = WhisperTranscriber::new(
        config.openai_api_key.clone(),
        config.transcription_model.clone(),
        config.transcription_concurrency,
        config.transcription_timeout(),
    )
    .context("failed to build transcription client")?;
    let transcoder = FfmpegTranscoder::new(&config.ffmpeg_path);

    let executor = JobExecutor::new(
        Arc::new(api),
        Arc::new(transcoder),
        Arc::new(transcriber),
        config.executor_config(),
    );

    match executor.execute(&job).await {
        JobOutcome::Completed => Ok(()),
        JobOutcome::Failed(message) => bail!("job {} failed: {message}", job.id),
    }
}

async fn read_job(path: &Path) -> Result<Job> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).context("job file is not a valid job snapshot")
}
