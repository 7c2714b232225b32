//! Option chain construction for one (underlying, expiry) pair.
//!
//! The chain builder applies the liquidity/data-quality filter and fixes the
//! strike ladder for the whole scan session. Contracts failing the filter
//! are dropped silently; an empty result is the only error condition.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::OPTION_SEGMENT;
use crate::error::{ScanError, ScanResult};
use crate::types::{Instrument, OptionType};

/// The fixed contract universe for one scan session.
///
/// Built once at startup and immutable thereafter. The strike ladder is
/// strictly ascending with no duplicates, and every strike is an exact
/// multiple of the configured granularity.
#[derive(Debug, Clone)]
pub struct OptionChain {
    pub underlying: String,
    pub expiry: NaiveDate,
    /// Quote identifier -> (strike, option type)
    contracts: FxHashMap<String, (u32, OptionType)>,
    /// Sorted, deduplicated strike ladder
    strikes: Vec<u32>,
}

impl OptionChain {
    /// All quote identifiers in the chain, for snapshot requests.
    pub fn identifiers(&self) -> Vec<String> {
        self.contracts.keys().cloned().collect()
    }

    /// Strike and option type for a quote identifier, if it is in the chain.
    pub fn contract(&self, identifier: &str) -> Option<(u32, OptionType)> {
        self.contracts.get(identifier).copied()
    }

    pub fn strikes(&self) -> &[u32] {
        &self.strikes
    }

    pub fn contract_count(&self) -> usize {
        self.contracts.len()
    }
}

/// Build the option chain for `underlying` at `expiry`.
///
/// A contract is included iff its underlying name matches, its expiry
/// matches, its strike is an exact multiple of `granularity`, and its
/// segment marks it as a standard listed option. Fails with
/// `ScanError::EmptyChain` when nothing survives - a terminal condition for
/// the session, not something to retry.
pub fn build_chain(
    underlying: &str,
    expiry: NaiveDate,
    instruments: &[Instrument],
    granularity: u32,
) -> ScanResult<OptionChain> {
    let mut contracts = FxHashMap::default();
    let mut strikes: Vec<u32> = Vec::new();

    for ins in instruments {
        if ins.name != underlying || ins.expiry != Some(expiry) || ins.segment != OPTION_SEGMENT {
            continue;
        }
        let Some(strike) = eligible_strike(ins.strike, granularity) else {
            continue;
        };
        let Some(option_type) = OptionType::from_symbol(&ins.tradingsymbol) else {
            continue;
        };

        contracts.insert(ins.quote_identifier(), (strike, option_type));
        strikes.push(strike);
    }

    if contracts.is_empty() {
        return Err(ScanError::EmptyChain {
            underlying: underlying.to_string(),
            expiry: Some(expiry),
        });
    }

    strikes.sort_unstable();
    strikes.dedup();

    debug!(
        "[CHAIN] {} {} | {} contracts | {} strikes",
        underlying,
        expiry,
        contracts.len(),
        strikes.len()
    );

    Ok(OptionChain {
        underlying: underlying.to_string(),
        expiry,
        contracts,
        strikes,
    })
}

/// A strike is eligible when it is a positive integral multiple of the
/// granularity. Catalogs deliver strikes as floats; fractional strikes are
/// off-ladder by definition.
fn eligible_strike(strike: f64, granularity: u32) -> Option<u32> {
    if strike <= 0.0 || strike.fract() != 0.0 {
        return None;
    }
    let strike = strike as u32;
    (strike % granularity == 0).then_some(strike)
}
