//! Demo service for request-scoped structured logging.
//!
//! Serves a small weather forecast API whose handlers log through the
//! registered `LoggerService`, with correlation ids taken from SharePoint
//! style headers, query and form fields.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use scope_logger::config::{load_config, AppConfig};
use scope_logger::lifecycle::install;
use scope_logger::observability::init_tracing;
use scope_logger::{HttpServer, ServiceRegistry};

#[derive(Parser)]
#[command(name = "scope-logger")]
#[command(about = "Request-scoped structured logging demo service", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `server.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }

    init_tracing(&config.observability)?;

    tracing::info!("scope-logger v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = ?cli.config,
        bind_address = %config.server.bind_address,
        "Configuration loaded"
    );

    let logger = install(&config, &ServiceRegistry::global())?;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, logger)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
