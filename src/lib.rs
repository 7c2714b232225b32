//! Box-Spread Arbitrage Scanner
//!
//! Scans the option chain of an underlying index for box-spread arbitrage:
//! call/put combinations at two strikes whose combined premium is below the
//! fixed payoff (strike difference) by more than a configured margin.

pub mod catalog;
pub mod chain;
pub mod config;
pub mod error;
pub mod kite;
pub mod payoff;
pub mod quotes;
pub mod scanner;
pub mod scheduler;
pub mod types;
