//! Restaurant orders server
//!
//! Reads `ORDERS_CONFIG` (YAML file), `ORDERS_HOST` and `ORDERS_PORT`, then
//! serves the order API until Ctrl+C or SIGTERM.

use anyhow::Result;
use orders::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from_env()?;

    tracing::info!(
        address = %config.bind_address(),
        id_strategy = ?config.id_strategy,
        seed_orders = config.seed_orders.len(),
        "starting orders service"
    );

    ServerBuilder::new()
        .with_config(config)
        .serve_configured()
        .await
}
