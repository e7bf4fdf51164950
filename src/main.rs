// SoulCare - Mental wellness companion
// Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use soulcare::config::{load_config, Config};
use soulcare::memory::DEFAULT_SESSION_ID;
use soulcare::pipeline::WellnessPipeline;
use soulcare::server::WellnessServer;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "soulcare")]
#[command(about = "Emotion-aware mental wellness chat service", version)]
struct Args {
    /// Run mode
    #[command(subcommand)]
    command: Command,

    /// Config file (default: ~/.soulcare/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Analyze one message and print the reply as JSON
    Analyze {
        /// Message text; read from stdin when omitted
        text: Option<String>,
        /// Session to record the exchange under
        #[arg(long, default_value = DEFAULT_SESSION_ID)]
        session: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    init_tracing(&config);

    match args.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            run_server(config).await
        }
        Command::Analyze { text, session } => {
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            run_analyze(&config, &session, &text).await
        }
    }
}

fn init_tracing(config: &Config) {
    // RUST_LOG wins; otherwise debug_logging picks the default level
    let default_level = if config.features.debug_logging {
        "debug"
    } else {
        "info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr so `analyze` output stays clean JSON
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    // Bridge log crate → tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();
}

fn read_stdin() -> Result<String> {
    if io::stdin().is_terminal() {
        anyhow::bail!("No message given. Pass it as an argument or pipe it on stdin.");
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read message from stdin")?;
    Ok(buffer)
}

/// Run HTTP server
async fn run_server(config: Config) -> Result<()> {
    let pipeline = Arc::new(WellnessPipeline::from_config(&config).await?);
    tracing::info!(model_loaded = pipeline.model_loaded(), "Pipeline ready");

    let server = WellnessServer::new(&config, pipeline);
    server.serve().await
}

/// Analyze a single message
async fn run_analyze(config: &Config, session: &str, text: &str) -> Result<()> {
    let pipeline = WellnessPipeline::from_config(config).await?;
    let reply = pipeline.submit_message(session, text).await?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
