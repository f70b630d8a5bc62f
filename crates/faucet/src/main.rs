//! Faucet service binary

use clap::Parser;
use drip_common::utils::logging::init_logging;
use drip_faucet::api::router;
use drip_faucet::{FaucetConfig, FaucetService};
use drip_ledger::{Cluster, LedgerConnector, RpcConnector};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

/// Faucet service CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Target cluster (devnet, testnet, localnet)
    #[arg(long)]
    cluster: Option<Cluster>,

    /// RPC URL
    #[arg(long)]
    rpc_url: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment still applies.
    let _ = dotenv::dotenv();

    let args = Args::parse();

    // Load configuration
    let mut config = FaucetConfig::load(args.config.as_deref())?;

    // Override with CLI arguments
    if let Some(port) = args.port {
        config.port = port;
    }

    if let Some(cluster) = args.cluster {
        config.cluster = cluster;
    }

    if let Some(rpc_url) = args.rpc_url {
        config.rpc_url = Some(rpc_url);
    }

    if args.debug {
        config.logging.level = "debug".to_string();
    }

    init_logging(&config.logging)?;

    info!("Starting faucet service v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Cluster: {}", config.cluster);
    info!("  RPC URL: {}", config.rpc_endpoint());
    info!("  Commitment: {}", config.commitment.as_str());

    match config.sender_keypair() {
        Ok(sender) => info!("  Sender: {}", sender.pubkey()),
        Err(e) => warn!("Sender key unavailable, transfers will fail: {}", e),
    }

    let connector: Arc<dyn LedgerConnector> =
        Arc::new(RpcConnector::new(config.commitment, config.request_timeout())?);

    let addr: SocketAddr = config.listen_addr().parse()?;
    let service = Arc::new(FaucetService::new(Arc::new(config), connector));
    let app = router(service);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server started on port {}", addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down gracefully");
    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
