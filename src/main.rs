//! Box-Spread Arbitrage Scanner
//!
//! Polls an underlying's option chain for box-spread arbitrage and hands
//! qualifying strike pairs to the order dispatcher.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use optionbox_arb::config::ScannerConfig;
use optionbox_arb::kite::KiteClient;
use optionbox_arb::scheduler::{LogOnlyDispatcher, PollingScheduler};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("optionbox_arb=info".parse().unwrap()),
        )
        .init();

    info!("========================================");
    info!("  Box-Spread Arbitrage Scanner");
    info!("========================================");

    dotenvy::dotenv().ok();
    let config = ScannerConfig::from_env();

    info!("Configuration:");
    info!("  Underlying: {}", config.underlying);
    info!("  Min profit: {:.2}", config.min_profit);
    info!("  Strike granularity: {}", config.strike_granularity);
    info!("  Poll interval: {:?}", config.poll_interval);
    info!("  Expiry cap: {}", config.expiry_cap);

    let kite = Arc::new(KiteClient::from_env().context("brokerage credentials missing")?);

    // Order routing is an external collaborator; the log-only dispatcher
    // records what would be traded without touching the broker.
    let dispatcher = Arc::new(LogOnlyDispatcher);

    let scheduler = PollingScheduler::new(kite.clone(), kite, dispatcher, config);

    // Cancellation is the only clean exit from the polling loop.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("[MAIN] shutdown signal received");
            signal_cancel.cancel();
        }
    });

    scheduler.run(cancel).await?;
    info!("[MAIN] scanner stopped");
    Ok(())
}
