//! Quill CLI - signature capture and document embedding from the terminal
//!
//! The CLI provides:
//! - Live preview of a document template with recorded ink embedded
//! - Placeholder inspection for templates
//! - Signing requests kept in a local JSON store
//! - Signing a pending request with recorded signature and initials

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod store;

use commands::{markers, preview, request, sign};
use config::QuillConfig;
use store::FileSigningStore;

/// Quill CLI application
#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill - capture signatures and embed them into documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "QUILL_CONFIG")]
    config: Option<String>,

    /// Store file, overriding the configured path
    #[arg(long)]
    store: Option<std::path::PathBuf>,

    /// Log level, overriding the configured level
    #[arg(long)]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Render a template with recorded ink substituted into its placeholders
    Preview(preview::PreviewArgs),

    /// List the placeholders recognised in a template
    Markers(markers::MarkersArgs),

    /// Manage signing requests in the local store
    Request {
        #[command(subcommand)]
        command: request::RequestCommands,
    },

    /// Sign a pending request
    Sign(sign::SignArgs),

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        QuillConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }
    if let Some(path) = cli.store {
        config.store.path = path;
    }

    init_tracing(&config);

    match cli.command {
        Commands::Preview(args) => preview::execute(args, &config),
        Commands::Markers(args) => markers::execute(args),
        Commands::Request { command } => {
            let store = open_store(&config).await?;
            request::execute(command, &store).await
        }
        Commands::Sign(args) => {
            let store = Arc::new(open_store(&config).await?);
            sign::execute(args, &config, store).await
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn init_tracing(config: &QuillConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    // stdout carries command output; logs go to stderr.
    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn open_store(config: &QuillConfig) -> Result<FileSigningStore> {
    FileSigningStore::open(&config.store.path)
        .await
        .with_context(|| format!("Failed to open store: {}", config.store.path.display()))
}
