//! Pairwise arbitrage scan over one quote snapshot.
//!
//! Pure query: no side effects, no retained state. Dispatching the results
//! is the scheduler's job.

use tracing::debug;

use crate::chain::OptionChain;
use crate::payoff::box_payoff;
use crate::quotes::QuoteBook;
use crate::types::StrikePair;

/// Evaluate every unordered pair of distinct strikes in the chain exactly
/// once (i < j over the sorted ladder) and keep the pairs whose long-box
/// profit strictly exceeds `min_profit`.
///
/// Results come out ordered by lower strike, then higher strike. Pairs with
/// an unknown payoff (any leg unquoted this cycle) are never emitted,
/// whatever the threshold.
pub fn scan(chain: &OptionChain, book: &QuoteBook, min_profit: f64) -> Vec<StrikePair> {
    let strikes = chain.strikes();
    let mut hits = Vec::new();

    for i in 0..strikes.len() {
        for j in (i + 1)..strikes.len() {
            let (lower, higher) = (strikes[i], strikes[j]);
            let payoff = box_payoff(lower, higher, book);
            if payoff.exceeds(min_profit) {
                let profit = payoff.value().unwrap_or_default();
                debug!(
                    "[SCAN] box {}/{} | payoff {} | profit {:.2}",
                    lower,
                    higher,
                    higher - lower,
                    profit
                );
                hits.push(StrikePair {
                    lower,
                    higher,
                    profit,
                });
            }
        }
    }

    hits
}
