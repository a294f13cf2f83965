//! River server binary.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ matcher ──▶ loaders (concurrent, per segment)
//!                                                   │
//!                                                   ▼
//!     Client Response ◀── JSON / HTML ◀── assembler ◀── merge mutations + dedupe head
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use river_server::assets::BuildManifest;
use river_server::config::load_or_default;
use river_server::lifecycle::{wait_for_signal, Shutdown};
use river_server::observability::{logging, metrics};
use river_server::{HttpServer, River};

#[derive(Debug, Parser)]
#[command(name = "river-server", version, about = "Server-rendered nested-route UI framework server")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "river.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(&cli.config)?;

    logging::init_tracing(&config.observability);
    tracing::info!("river-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        is_dev = config.river.is_dev,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let manifest = BuildManifest::load_or_empty(config.river.manifest_path.as_deref().map(Path::new))?;
    tracing::info!(build_id = %manifest.build_id, modules = manifest.paths.len(), "Build manifest loaded");

    let river = Arc::new(River::from_config(&config, manifest)?);
    let server = HttpServer::new(&config, river);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
