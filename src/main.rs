//! Supervisor API server binary.
//!
//! Serves the simulated demo plant. Real deployments embed the library
//! and inject their own `Plant` implementation the same way.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scada_supervisor::clock::SystemClock;
use scada_supervisor::config::{load_config, SupervisorConfig};
use scada_supervisor::domain::Plant;
use scada_supervisor::http::SupervisorServer;
use scada_supervisor::observability::metrics;
use scada_supervisor::sim::SimPlant;

#[derive(Parser)]
#[command(name = "scada-supervisor")]
#[command(about = "Supervisory SCADA API over REST and SSE", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scada_supervisor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("scada-supervisor v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SupervisorConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_path = %config.api.base_path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let clock = Arc::new(SystemClock);
    let plant: Arc<dyn Plant> = Arc::new(SimPlant::demo(clock.clone()));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = SupervisorServer::new(config, plant, clock);
    server.run(listener).await?;

    Ok(())
}
