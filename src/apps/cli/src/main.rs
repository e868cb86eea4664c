//! ToolChat CLI
//!
//! Reads a chat-with-tools request (or raw model text) and prints normalized JSON.

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use toolchat_core::types::RequestBundle;
use toolchat_core::{extract_tool_calls, ChatWithToolsProcessor, ConfigService, OpenAICompatRunner};

#[derive(Parser)]
#[command(name = "toolchat-cli", version, about = "Tool-augmented chat turns for local model runners")]
struct Cli {
    /// Default to debug logging (overridden by TOOLCHAT_LOG_LEVEL)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one request bundle against the configured model server
    Process {
        /// Config file (defaults to <config dir>/toolchat/config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Request bundle JSON file, or `-` for stdin
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// Override runner.base_url
        #[arg(long)]
        base_url: Option<String>,

        /// Override runner.model
        #[arg(long)]
        model: Option<String>,
    },
    /// Recover tool calls from raw model output
    Extract {
        /// Raw text file, or `-` for stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read stdin")?;
            Ok(raw)
        }
    }
}

async fn run_process(
    config: Option<PathBuf>,
    request: Option<PathBuf>,
    base_url: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let mut config = ConfigService::load(config.as_deref())?;
    if let Some(base_url) = base_url {
        config.runner.base_url = base_url;
    }
    if let Some(model) = model {
        config.runner.model = model;
    }

    let raw = read_input(request.as_deref())?;
    let bundle: RequestBundle =
        serde_json::from_str(&raw).context("Request is not a valid request bundle")?;

    tracing::info!(
        "Processing request: base_url={}, model={}",
        config.runner.base_url,
        config.runner.model
    );
    let runner = OpenAICompatRunner::new(config.runner)?;
    let processor = ChatWithToolsProcessor::with_config(Arc::new(runner), config.processor);
    let output = processor.process(&bundle).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_extract(input: Option<PathBuf>) -> Result<()> {
    let raw = read_input(input.as_deref())?;
    let record = extract_tool_calls(&raw);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Process {
            config,
            request,
            base_url,
            model,
        } => run_process(config, request, base_url, model).await,
        Commands::Extract { input } => run_extract(input),
    }
}
