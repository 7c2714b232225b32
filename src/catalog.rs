//! Instrument catalog access and expiry selection.
//!
//! The catalog is the raw universe of tradable contracts; no filtering
//! happens here beyond picking out an underlying's expiry dates.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ScanResult;
use crate::types::Instrument;

/// Source of the full instrument list.
///
/// Implemented by the live brokerage client and by in-memory fixtures in
/// tests, so universe construction is testable without a live connection.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the raw instrument universe. Fails with
    /// `ScanError::CatalogUnavailable` if the upstream source cannot be
    /// reached or returns malformed records.
    async fn load_instruments(&self) -> ScanResult<Vec<Instrument>>;
}

/// Distinct expiry dates listed for an underlying, nearest first, capped to
/// the first `cap` entries.
///
/// Returns an empty Vec (not an error) when the underlying has no listed
/// contracts; whether that is terminal is the caller's decision.
pub fn expiries_for(underlying: &str, instruments: &[Instrument], cap: usize) -> Vec<NaiveDate> {
    let mut expiries: Vec<NaiveDate> = instruments
        .iter()
        .filter(|i| i.name == underlying)
        .filter_map(|i| i.expiry)
        .collect();

    expiries.sort_unstable();
    expiries.dedup();
    expiries.truncate(cap);
    expiries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instrument(name: &str, expiry: Option<&str>) -> Instrument {
        Instrument {
            tradingsymbol: format!("{}XX", name),
            name: name.to_string(),
            strike: 35000.0,
            expiry: expiry.map(|e| NaiveDate::parse_from_str(e, "%Y-%m-%d").unwrap()),
            instrument_type: "CE".to_string(),
            segment: "NFO-OPT".to_string(),
            exchange: "NFO".to_string(),
        }
    }

    #[test]
    fn test_expiries_nearest_first_capped() {
        let instruments = vec![
            instrument("BANKNIFTY", Some("2024-09-25")),
            instrument("BANKNIFTY", Some("2024-08-28")),
            instrument("BANKNIFTY", Some("2024-08-28")), // duplicate
            instrument("BANKNIFTY", Some("2024-10-30")),
            instrument("BANKNIFTY", Some("2024-11-27")),
            instrument("BANKNIFTY", Some("2024-12-24")),
            instrument("NIFTY", Some("2024-08-01")), // other underlying
        ];

        let expiries = expiries_for("BANKNIFTY", &instruments, 4);
        assert_eq!(expiries.len(), 4);
        assert_eq!(
            expiries[0],
            NaiveDate::parse_from_str("2024-08-28", "%Y-%m-%d").unwrap()
        );
        assert!(expiries.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_unknown_underlying_is_empty_not_error() {
        let instruments = vec![instrument("NIFTY", Some("2024-08-01"))];
        assert!(expiries_for("BANKNIFTY", &instruments, 4).is_empty());
    }

    #[test]
    fn test_instruments_without_expiry_are_skipped() {
        let instruments = vec![
            instrument("BANKNIFTY", None), // equity-style record
            instrument("BANKNIFTY", Some("2024-08-28")),
        ];
        assert_eq!(expiries_for("BANKNIFTY", &instruments, 4).len(), 1);
    }
}
