//! Reporting details worker.
//!
//! ```text
//!   trigger (stdin lines)        ┌──────────────────────────────────────────────┐
//!   ─────────────────────────────┼─▶ worker ──▶ handler ──▶ FlowProcessor        │
//!                                │                │                              │
//!                                │                ▼                              │
//!                                │        reference cache ◀── apiconfig client ──┼──▶ API config cache
//!                                │                │                              │
//!   GET /info ───────────────────┼─▶ http ────────┘                              │
//!                                └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use reporting_details::apiconfig::ApiConfigClient;
use reporting_details::config::{from_env, load_config, ServiceConfig, SystemEnv};
use reporting_details::flows::LoggingFlowProcessor;
use reporting_details::handler::RetrieveDetails;
use reporting_details::http::InfoServer;
use reporting_details::lifecycle::{signals, Shutdown};
use reporting_details::observability::{logging, metrics};
use reporting_details::reference::ReferenceCache;
use reporting_details::worker::MessageWorker;

#[derive(Parser)]
#[command(name = "reporting-details")]
#[command(about = "Resolves creditor institution stations for flow downloads", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle queue messages read line by line from stdin and serve /info
    Run,
    /// Resolve the station of one creditor institution and print it
    Resolve {
        /// Creditor institution fiscal code (idPA)
        id_pa: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => from_env(&SystemEnv)?,
    };

    logging::init(&config.observability);
    tracing::info!("reporting-details v{} starting", env!("CARGO_PKG_VERSION"));

    let client = Arc::new(ApiConfigClient::new(&config.api_config, &config.retry)?);
    let cache = Arc::new(ReferenceCache::new());
    let handler = RetrieveDetails::new(
        cache.clone(),
        client,
        Arc::new(LoggingFlowProcessor),
        config.flows.clone(),
    );

    match cli.command {
        Commands::Resolve { id_pa } => {
            let route = handler.resolve(&id_pa).await?;
            println!("{}", serde_json::to_string_pretty(&route)?);
            Ok(())
        }
        Commands::Run => run(config, cache, handler).await,
    }
}

async fn run(
    config: ServiceConfig,
    cache: Arc<ReferenceCache>,
    handler: RetrieveDetails,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // First refresh up front, so the first burst of messages finds a snapshot.
    if let Err(e) = handler.warm_up().await {
        tracing::warn!(error = %e, "Initial reference cache load failed, will retry on first message");
    }

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let server = InfoServer::new(cache);
    let server_shutdown = shutdown.clone();
    let server_task = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    let (tx, rx) = mpsc::channel(config.server.worker_concurrency * 2);
    let worker = MessageWorker::new(handler, config.server.worker_concurrency);
    let worker_task = tokio::spawn(worker.run(rx, shutdown.subscribe()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stop = shutdown.subscribe();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                None => {
                    tracing::info!("Input closed");
                    break;
                }
            },
            _ = stop.recv() => break,
        }
    }
    drop(tx);

    worker_task.await?;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
