//! Ledger host binary

use anyhow::Context;
use ledger_host::{Config, LedgerHost};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting token ledger host");

    // Load configuration
    let config = match std::env::var("LEDGER_CONFIG") {
        Ok(path) => Config::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        Err(_) => Config::from_env().context("failed to load config from environment")?,
    };

    let bootstrap = config.host.bootstrap_on_start;
    let host = LedgerHost::open(config).await?;
    tracing::info!("Ledger host opened successfully");

    if bootstrap {
        if let Some(tx_id) = host.bootstrap_if_empty().await? {
            tracing::info!(tx_id = %tx_id, "Ledger bootstrapped");
        }
    }

    tokio::signal::ctrl_c().await?;

    let stats = host.stats()?;
    tracing::info!(
        state_keys = stats.approximate_state_keys,
        receipts = stats.approximate_receipts,
        "Shutting down ledger host"
    );
    tracing::debug!(metrics = %host.metrics().render()?, "Final metrics");

    host.shutdown().await?;
    Ok(())
}
