//! Quote snapshots and the per-cycle quote index.
//!
//! A snapshot is fetched fresh every polling cycle and indexed by
//! (strike, option type) for payoff lookups. Contracts with no resting
//! orders are simply absent: a missing contract means "price unknown",
//! never zero.

use async_trait::async_trait;
use rustc_hash::FxHashMap;

use crate::chain::OptionChain;
use crate::error::ScanResult;
use crate::types::{OptionType, Quote};

/// Best bid/ask as returned by the quote source for one contract.
#[derive(Debug, Clone, Copy)]
pub struct TopOfBook {
    pub bid: f64,
    pub ask: f64,
}

/// Source of top-of-book quotes for a set of contract identifiers.
///
/// Fails with `ScanError::QuoteFetch` when the upstream call errors
/// outright. Identifiers with no depth are omitted from the result rather
/// than raising.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quotes(&self, identifiers: &[String])
        -> ScanResult<FxHashMap<String, TopOfBook>>;
}

/// Cycle-local index of one snapshot, keyed by (strike, option type).
///
/// Built from a single snapshot so every payoff evaluated in one scan reads
/// prices from the same wall-clock instant. Dropped at the end of the cycle.
#[derive(Debug, Default)]
pub struct QuoteBook {
    legs: FxHashMap<(u32, OptionType), Quote>,
}

impl QuoteBook {
    /// Index a raw snapshot against the session's chain.
    ///
    /// The option type comes from the trailing CE/PE marker on the
    /// identifier, not from a second upstream query. Identifiers outside the
    /// chain or without an option marker are ignored.
    pub fn from_snapshot(chain: &OptionChain, raw: FxHashMap<String, TopOfBook>) -> Self {
        let mut legs = FxHashMap::default();

        for (identifier, top) in raw {
            let Some((strike, _)) = chain.contract(&identifier) else {
                continue;
            };
            let Some(option_type) = OptionType::from_symbol(&identifier) else {
                continue;
            };
            legs.insert(
                (strike, option_type),
                Quote {
                    strike,
                    option_type,
                    bid: top.bid,
                    ask: top.ask,
                },
            );
        }

        Self { legs }
    }

    /// Quote for one leg, or `None` if the contract had no resting orders
    /// this cycle.
    pub fn get(&self, strike: u32, option_type: OptionType) -> Option<&Quote> {
        self.legs.get(&(strike, option_type))
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    #[cfg(test)]
    pub fn insert(&mut self, strike: u32, option_type: OptionType, bid: f64, ask: f64) {
        self.legs.insert(
            (strike, option_type),
            Quote {
                strike,
                option_type,
                bid,
                ask,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::build_chain;
    use crate::types::Instrument;
    use chrono::NaiveDate;

    fn expiry() -> NaiveDate {
        NaiveDate::parse_from_str("2024-08-28", "%Y-%m-%d").unwrap()
    }

    fn option(symbol: &str, strike: f64) -> Instrument {
        Instrument {
            tradingsymbol: symbol.to_string(),
            name: "BANKNIFTY".to_string(),
            strike,
            expiry: Some(expiry()),
            instrument_type: symbol[symbol.len() - 2..].to_string(),
            segment: "NFO-OPT".to_string(),
            exchange: "NFO".to_string(),
        }
    }

    fn chain() -> OptionChain {
        let instruments = vec![
            option("BANKNIFTY24AUG35000CE", 35000.0),
            option("BANKNIFTY24AUG35000PE", 35000.0),
        ];
        build_chain("BANKNIFTY", expiry(), &instruments, 500).unwrap()
    }

    #[test]
    fn test_index_derives_type_from_identifier_suffix() {
        let mut raw = FxHashMap::default();
        raw.insert(
            "NFO:BANKNIFTY24AUG35000CE".to_string(),
            TopOfBook { bid: 800.0, ask: 810.0 },
        );
        raw.insert(
            "NFO:BANKNIFTY24AUG35000PE".to_string(),
            TopOfBook { bid: 300.0, ask: 305.0 },
        );

        let book = QuoteBook::from_snapshot(&chain(), raw);
        assert_eq!(book.len(), 2);

        let call = book.get(35000, OptionType::Call).unwrap();
        assert_eq!(call.bid, 800.0);
        assert_eq!(call.ask, 810.0);

        let put = book.get(35000, OptionType::Put).unwrap();
        assert_eq!(put.bid, 300.0);
    }

    #[test]
    fn test_missing_contract_stays_missing() {
        let mut raw = FxHashMap::default();
        raw.insert(
            "NFO:BANKNIFTY24AUG35000CE".to_string(),
            TopOfBook { bid: 800.0, ask: 810.0 },
        );

        let book = QuoteBook::from_snapshot(&chain(), raw);
        assert!(book.get(35000, OptionType::Put).is_none());
    }

    #[test]
    fn test_identifiers_outside_chain_are_ignored() {
        let mut raw = FxHashMap::default();
        raw.insert(
            "NFO:NIFTY24AUG22000CE".to_string(),
            TopOfBook { bid: 10.0, ask: 11.0 },
        );

        let book = QuoteBook::from_snapshot(&chain(), raw);
        assert!(book.is_empty());
    }
}
