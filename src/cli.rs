//! Interface de linha de comando do worker baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (process, config)
//! e flags globais (--config, --log-json, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Worker que converte assets enviados em conteúdo de texto puro.
#[derive(Debug, Parser)]
#[command(name = "asset-processor", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: `asset-processor.toml`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emite logs em JSON, um evento por linha.
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Executa um único job a partir do seu snapshot JSON.
    Process {
        /// Arquivo JSON com o job (`-` lê da entrada padrão).
        job: PathBuf,
    },

    /// Mostra a configuração efetiva, com as chaves mascaradas.
    Config,
}
