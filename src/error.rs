//! Error types for the box-spread scanner.

use chrono::NaiveDate;
use thiserror::Error;

/// Failures the scanner distinguishes between.
///
/// `CatalogUnavailable` and `EmptyChain` are fatal to the session: without a
/// contract universe there is nothing to poll. `QuoteFetch` is fatal only to
/// the cycle it occurred in; the scheduler logs it and retries on the next
/// tick. Missing depth for an individual contract is not an error at all and
/// never surfaces here.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("instrument catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// No contract survived universe construction. `expiry` is `None` when
    /// the underlying had no listed expiries to begin with.
    #[error("no eligible option contracts for {underlying}")]
    EmptyChain {
        underlying: String,
        expiry: Option<NaiveDate>,
    },

    #[error("quote fetch failed: {0}")]
    QuoteFetch(String),
}

pub type ScanResult<T> = Result<T, ScanError>;
