use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use border_controller::config::{load_config, ObservabilityConfig};
use border_controller::lifecycle::{build_reconciler, signals, Shutdown};
use border_controller::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "border-controller")]
#[command(about = "Keeps a reverse proxy configured with the current service backends", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "/config/border-controller.toml")]
    config: PathBuf,

    /// Run a single reconciliation tick and exit.
    #[arg(long)]
    once: bool,

    /// Validate the configuration and exit.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(&ObservabilityConfig::default());
            tracing::error!(path = %cli.config.display(), error = %e, "Error during config parsing");
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("border-controller v{} starting", env!("CARGO_PKG_VERSION"));

    if cli.check_config {
        tracing::info!(path = %cli.config.display(), "Configuration valid");
        return Ok(());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let reconciler = build_reconciler(&config)?;

    if cli.once {
        let outcome = reconciler.tick().await?;
        tracing::info!(?outcome, "Single tick complete");
        return Ok(());
    }

    let shutdown = Shutdown::new();
    tokio::spawn(signals::listen(shutdown.clone()));

    reconciler.run(&shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
