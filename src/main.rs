//! `clientreg` HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use clientreg::{ClientRegistry, RegistryError};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Client registry server.
#[derive(Parser, Debug)]
#[command(name = "clientreg")]
#[command(about = "In-memory client registry served over HTTP")]
struct Args {
    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "127.0.0.1:8080", env = "CLIENTREG_ADDR")]
    addr: SocketAddr,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info", env = "CLIENTREG_LOG_LEVEL")]
    log_level: String,

    /// Insert two demo clients at start-up.
    #[arg(long, env = "CLIENTREG_SEED_DEMO_DATA")]
    seed_demo_data: bool,
}

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("failed to seed demo data: {0}")]
    Seed(#[from] RegistryError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let registry = Arc::new(ClientRegistry::new());
    if args.seed_demo_data {
        registry.seed_demo_data()?;
        info!(clients = registry.len(), "demo data seeded");
    }

    let listener = TcpListener::bind(args.addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: args.addr,
            source,
        })?;

    clientreg::transport::serve(listener, registry, shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("client registry stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received shutdown signal"),
        Err(err) => {
            warn!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
