//! Polling scheduler: the outer fetch -> compute -> dispatch loop.
//!
//! The universe (catalog, expiry, chain) is built exactly once; every cycle
//! after that takes a fresh quote snapshot, scans all strike pairs, and
//! hands qualifying pairs to the order dispatcher. A failed quote fetch
//! skips the cycle; a failed dispatch skips only that pair. The loop never
//! terminates on its own - cancellation is the only clean exit.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::{expiries_for, CatalogSource};
use crate::chain::{build_chain, OptionChain};
use crate::config::ScannerConfig;
use crate::error::{ScanError, ScanResult};
use crate::quotes::{QuoteBook, QuoteSource};
use crate::scanner::scan;

/// External order-routing collaborator.
///
/// The scanner only decides *that* and *for which strikes* an order should
/// be attempted; execution mechanics live behind this trait. Called at most
/// once per qualifying pair per cycle; failures are isolated per pair.
#[async_trait]
pub trait OrderDispatcher: Send + Sync {
    async fn submit(&self, lower: u32, higher: u32) -> anyhow::Result<()>;
}

/// Dispatcher that only logs what it would trade. Stands in for a live
/// executor in dry runs.
pub struct LogOnlyDispatcher;

#[async_trait]
impl OrderDispatcher for LogOnlyDispatcher {
    async fn submit(&self, lower: u32, higher: u32) -> anyhow::Result<()> {
        info!("[DISPATCH] would place box order at {}/{}", lower, higher);
        Ok(())
    }
}

/// Drives the scan loop on a fixed interval.
pub struct PollingScheduler {
    catalog: Arc<dyn CatalogSource>,
    quotes: Arc<dyn QuoteSource>,
    dispatcher: Arc<dyn OrderDispatcher>,
    config: ScannerConfig,
}

impl PollingScheduler {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        quotes: Arc<dyn QuoteSource>,
        dispatcher: Arc<dyn OrderDispatcher>,
        config: ScannerConfig,
    ) -> Self {
        Self {
            catalog,
            quotes,
            dispatcher,
            config,
        }
    }

    /// Load the catalog, pick the nearest expiry, and build the chain.
    /// Runs exactly once per session; any failure here is fatal.
    pub async fn build_universe(&self) -> ScanResult<OptionChain> {
        let instruments = self.catalog.load_instruments().await?;
        info!("[CATALOG] {} instruments loaded", instruments.len());

        let expiries = expiries_for(&self.config.underlying, &instruments, self.config.expiry_cap);
        let Some(expiry) = expiries.first().copied() else {
            return Err(ScanError::EmptyChain {
                underlying: self.config.underlying.clone(),
                expiry: None,
            });
        };
        info!(
            "[CATALOG] {} | {} near expiries | scanning {}",
            self.config.underlying,
            expiries.len(),
            expiry
        );

        let chain = build_chain(
            &self.config.underlying,
            expiry,
            &instruments,
            self.config.strike_granularity,
        )?;
        info!(
            "[CHAIN] {} contracts across {} strikes",
            chain.contract_count(),
            chain.strikes().len()
        );

        Ok(chain)
    }

    /// Run until cancelled. Returns early only if universe construction
    /// fails; per-cycle quote errors are logged and retried next tick.
    pub async fn run(&self, cancel: CancellationToken) -> ScanResult<()> {
        let chain = self.build_universe().await?;
        let identifiers = chain.identifiers();
        let mut cycle: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                info!("[SCAN] cancelled after {} cycles", cycle);
                return Ok(());
            }
            cycle += 1;

            match self.quotes.fetch_quotes(&identifiers).await {
                Ok(raw) => {
                    let book = QuoteBook::from_snapshot(&chain, raw);
                    let hits = scan(&chain, &book, self.config.min_profit);
                    debug!(
                        "[SCAN] cycle {} | {} legs quoted | {} qualifying pairs",
                        cycle,
                        book.len(),
                        hits.len()
                    );

                    for pair in &hits {
                        info!(
                            "[SCAN] cycle {} | box {}/{} | profit {:.2} over payoff {}",
                            cycle,
                            pair.lower,
                            pair.higher,
                            pair.profit,
                            pair.theoretical_payoff()
                        );
                        if let Err(e) = self.dispatcher.submit(pair.lower, pair.higher).await {
                            warn!(
                                "[DISPATCH] submit failed for {}/{}: {}",
                                pair.lower, pair.higher, e
                            );
                        }
                    }
                }
                Err(e) => {
                    warn!("[SCAN] cycle {} skipped: {}", cycle, e);
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("[SCAN] cancelled after {} cycles", cycle);
                    return Ok(());
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
    }
}
