//! Core type definitions for the box-spread scanner.
//!
//! This module provides the instrument, quote, and payoff types shared by
//! the chain builder, payoff calculator, and scanner.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// OPTION TYPE
// =============================================================================

/// Call or put side of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Derive the option type from the trailing marker on a trading symbol
    /// (e.g. `NFO:BANKNIFTY24AUG35000CE`). Returns `None` for anything that
    /// is not an option symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        if symbol.ends_with("CE") {
            Some(OptionType::Call)
        } else if symbol.ends_with("PE") {
            Some(OptionType::Put)
        } else {
            None
        }
    }
}

// =============================================================================
// INSTRUMENTS
// =============================================================================

/// A tradable contract from the instrument catalog.
///
/// Sourced wholesale from the catalog with no filtering; eligibility is
/// decided later by the chain builder. Immutable for the scan session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    /// Exchange trading symbol (e.g. "BANKNIFTY24AUG35000CE")
    pub tradingsymbol: String,
    /// Underlying name (e.g. "BANKNIFTY")
    pub name: String,
    /// Strike price as delivered by the catalog (0.0 for non-options)
    pub strike: f64,
    /// Expiry date, absent for non-derivative instruments
    pub expiry: Option<NaiveDate>,
    /// Contract type marker ("CE", "PE", "FUT", "EQ", ...)
    pub instrument_type: String,
    /// Market segment tag (e.g. "NFO-OPT")
    pub segment: String,
    /// Listing exchange (e.g. "NFO")
    pub exchange: String,
}

impl Instrument {
    /// Exchange-qualified identifier used when requesting quotes.
    pub fn quote_identifier(&self) -> String {
        format!("{}:{}", self.exchange, self.tradingsymbol)
    }
}

// =============================================================================
// QUOTES
// =============================================================================

/// Top-of-book quote for one contract within a single polling cycle.
///
/// Superseded wholesale by the next cycle's snapshot; never merged or
/// carried across cycles.
#[derive(Debug, Clone, Copy)]
pub struct Quote {
    pub strike: u32,
    pub option_type: OptionType,
    /// Best resting buy-side price
    pub bid: f64,
    /// Best resting sell-side price
    pub ask: f64,
}

// =============================================================================
// PAYOFF
// =============================================================================

/// Outcome of evaluating a box spread for one strike pair.
///
/// `Unknown` means at least one of the four legs had no quote in the
/// snapshot. It is a normal outcome of incomplete market data, not an error,
/// and it compares below every finite threshold so it can never trigger a
/// dispatch - even against a negative `min_profit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payoff {
    /// Riskless profit of the long box, may be negative
    Known(f64),
    /// One or more legs had no resting orders
    Unknown,
}

impl Payoff {
    /// Whether this payoff clears the profitability threshold.
    pub fn exceeds(&self, min_profit: f64) -> bool {
        matches!(self, Payoff::Known(p) if *p > min_profit)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Payoff::Known(p) => Some(*p),
            Payoff::Unknown => None,
        }
    }
}

// =============================================================================
// STRIKE PAIRS
// =============================================================================

/// A qualifying strike pair emitted by one scan cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikePair {
    /// Lower strike (strictly less than `higher`)
    pub lower: u32,
    /// Higher strike
    pub higher: u32,
    /// Profit of the long box at this pair for the current snapshot
    pub profit: f64,
}

impl StrikePair {
    /// Fixed payoff of the box regardless of where the underlying settles.
    pub fn theoretical_payoff(&self) -> u32 {
        self.higher - self.lower
    }
}

// =============================================================================
// TESTS
// =============================================================================
