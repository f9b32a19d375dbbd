use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use atlasd::cli::chat::{run_chat, ChatOpts};
use atlasd::config::AtlasConfig;
use atlasd::provider::OpenAiClient;
use atlasd::rest;
use atlasd::AppContext;

#[derive(Parser)]
#[command(
    name = "atlasd",
    about = "Atlas — streaming travel-assistant chat server and terminal client",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP port for the chat API
    #[arg(long, env = "ATLASD_PORT")]
    port: Option<u16>,

    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "ATLASD_BIND")]
    bind_address: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier for the generation service
    #[arg(long, env = "ATLASD_MODEL")]
    model: Option<String>,

    /// Path to the TOML config file
    #[arg(long, env = "ATLASD_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ATLASD_LOG", default_value = "info")]
    log: String,
}

#[derive(Subcommand)]
enum Command {
    /// Run the chat API server (default when no subcommand is given)
    Serve,
    /// Interactive terminal chat against a running server
    Chat {
        /// Relay endpoint URL (default: the local server's /api/stream)
        #[arg(long, env = "ATLASD_ENDPOINT")]
        endpoint: Option<String>,

        /// Single-shot query: print the reply and exit
        #[arg(long)]
        non_interactive: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(args.log.as_str())
        .compact()
        .init();

    match args.command {
        Some(Command::Chat {
            endpoint,
            non_interactive,
        }) => {
            let config = AtlasConfig::load(&args.config)?;
            let port = args.port.unwrap_or(config.port);
            let endpoint =
                endpoint.unwrap_or_else(|| format!("http://127.0.0.1:{port}/api/stream"));
            run_chat(ChatOpts {
                endpoint,
                non_interactive,
            })
            .await
        }
        Some(Command::Serve) | None => serve(args).await,
    }
}

async fn serve(args: Args) -> Result<()> {
    let mut config = AtlasConfig::load(&args.config)?;
    config.apply_overrides(args.port, args.bind_address, args.api_key, args.model);

    let api_key = config.api_key.clone().context(
        "no OpenAI API key configured — set OPENAI_API_KEY or api_key in config.toml",
    )?;

    let config = Arc::new(config);
    let responses = Arc::new(OpenAiClient::new(
        &config.api_base_url,
        &api_key,
        &config.model,
    ));
    let ctx = Arc::new(AppContext::new(config, responses));

    info!("starting atlasd v{}", env!("CARGO_PKG_VERSION"));
    rest::start_rest_server(ctx).await
}
