//! HTTP client for the Kite-style brokerage API.
//!
//! Implements both scanner-facing sources: the instrument catalog dump and
//! the batched top-of-book quote endpoint. Session setup (token refresh,
//! login flow) is out of scope; the access token arrives via environment.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::catalog::CatalogSource;
use crate::config::{HTTP_TIMEOUT_SECS, KITE_API_BASE};
use crate::error::{ScanError, ScanResult};
use crate::quotes::{QuoteSource, TopOfBook};
use crate::types::Instrument;

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Instrument record as delivered by the catalog dump.
#[derive(Debug, Deserialize)]
struct InstrumentRecord {
    tradingsymbol: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    strike: f64,
    /// "YYYY-MM-DD", empty for non-derivatives
    #[serde(default)]
    expiry: String,
    #[serde(default)]
    instrument_type: String,
    #[serde(default)]
    segment: String,
    #[serde(default)]
    exchange: String,
}

impl InstrumentRecord {
    fn into_instrument(self) -> Instrument {
        Instrument {
            expiry: NaiveDate::parse_from_str(&self.expiry, "%Y-%m-%d").ok(),
            tradingsymbol: self.tradingsymbol,
            name: self.name,
            strike: self.strike,
            instrument_type: self.instrument_type,
            segment: self.segment,
            exchange: self.exchange,
        }
    }
}

/// Envelope of the quote endpoint: per-identifier market depth.
#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(default)]
    #[allow(dead_code)]
    status: String,
    data: FxHashMap<String, QuoteRecord>,
}

#[derive(Debug, Deserialize)]
struct QuoteRecord {
    #[serde(default)]
    depth: DepthRecord,
}

#[derive(Debug, Deserialize, Default)]
struct DepthRecord {
    #[serde(default)]
    buy: Vec<DepthLevel>,
    #[serde(default)]
    sell: Vec<DepthLevel>,
}

#[derive(Debug, Deserialize)]
struct DepthLevel {
    price: f64,
    #[serde(default)]
    #[allow(dead_code)]
    quantity: u64,
}

impl DepthRecord {
    /// Best resting prices, or `None` when either side of the book is empty.
    /// The API pads empty depth with zero-price levels; those count as empty.
    fn top_of_book(&self) -> Option<TopOfBook> {
        let bid = self.buy.first().map(|l| l.price).filter(|p| *p > 0.0)?;
        let ask = self.sell.first().map(|l| l.price).filter(|p| *p > 0.0)?;
        Some(TopOfBook { bid, ask })
    }
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct KiteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    access_token: String,
}

impl KiteClient {
    pub fn new(base_url: &str, api_key: &str, access_token: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Build from `KITE_API_KEY` / `KITE_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("KITE_API_KEY").context("KITE_API_KEY not set")?;
        let access_token =
            std::env::var("KITE_ACCESS_TOKEN").context("KITE_ACCESS_TOKEN not set")?;
        Ok(Self::new(KITE_API_BASE, &api_key, &access_token))
    }

    fn authorization(&self) -> String {
        format!("token {}:{}", self.api_key, self.access_token)
    }
}

#[async_trait]
impl CatalogSource for KiteClient {
    async fn load_instruments(&self) -> ScanResult<Vec<Instrument>> {
        let url = format!("{}/instruments", self.base_url);

        let resp = self
            .http
            .get(&url)
            .header("X-Kite-Version", "3")
            .header("Authorization", self.authorization())
            .send()
            .await
            .map_err(|e| ScanError::CatalogUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ScanError::CatalogUnavailable(format!(
                "catalog API error {}: {}",
                status, body
            )));
        }

        let records: Vec<InstrumentRecord> = resp
            .json()
            .await
            .map_err(|e| ScanError::CatalogUnavailable(format!("malformed catalog: {}", e)))?;

        debug!("[KITE] catalog dump: {} records", records.len());
        Ok(records
            .into_iter()
            .map(InstrumentRecord::into_instrument)
            .collect())
    }
}

#[async_trait]
impl QuoteSource for KiteClient {
    async fn fetch_quotes(
        &self,
        identifiers: &[String],
    ) -> ScanResult<FxHashMap<String, TopOfBook>> {
        let url = format!("{}/quote", self.base_url);
        let query: Vec<(&str, &str)> = identifiers.iter().map(|i| ("i", i.as_str())).collect();

        let resp = self
            .http
            .get(&url)
            .query(&query)
            .header("X-Kite-Version", "3")
            .header("Authorization", self.authorization())
            .send()
            .await
            .map_err(|e| ScanError::QuoteFetch(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ScanError::QuoteFetch(format!(
                "quote API error {}: {}",
                status, body
            )));
        }

        let envelope: QuoteEnvelope = resp
            .json()
            .await
            .map_err(|e| ScanError::QuoteFetch(format!("malformed quote payload: {}", e)))?;

        // Contracts without resting orders are omitted, not zeroed.
        let mut quotes = FxHashMap::default();
        for (identifier, record) in envelope.data {
            if let Some(top) = record.depth.top_of_book() {
                quotes.insert(identifier, top);
            }
        }

        debug!(
            "[KITE] quoted {}/{} requested contracts",
            quotes.len(),
            identifiers.len()
        );
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_record_parsing() {
        let json = r#"{
            "tradingsymbol": "BANKNIFTY24AUG35000CE",
            "name": "BANKNIFTY",
            "strike": 35000.0,
            "expiry": "2024-08-28",
            "instrument_type": "CE",
            "segment": "NFO-OPT",
            "exchange": "NFO",
            "lot_size": 15
        }"#;

        let record: InstrumentRecord = serde_json::from_str(json).unwrap();
        let ins = record.into_instrument();
        assert_eq!(ins.name, "BANKNIFTY");
        assert_eq!(ins.strike, 35000.0);
        assert_eq!(
            ins.expiry,
            Some(NaiveDate::parse_from_str("2024-08-28", "%Y-%m-%d").unwrap())
        );
        assert_eq!(ins.quote_identifier(), "NFO:BANKNIFTY24AUG35000CE");
    }

    #[test]
    fn test_equity_record_has_no_expiry() {
        let json = r#"{"tradingsymbol": "SBIN", "name": "SBIN", "expiry": "",
                       "instrument_type": "EQ", "segment": "NSE", "exchange": "NSE"}"#;
        let record: InstrumentRecord = serde_json::from_str(json).unwrap();
        let ins = record.into_instrument();
        assert_eq!(ins.expiry, None);
        assert_eq!(ins.strike, 0.0);
    }

    #[test]
    fn test_quote_envelope_top_of_book() {
        let json = r#"{
            "status": "success",
            "data": {
                "NFO:BANKNIFTY24AUG35000CE": {
                    "depth": {
                        "buy": [{"price": 800.0, "quantity": 25}, {"price": 799.5, "quantity": 50}],
                        "sell": [{"price": 810.0, "quantity": 25}]
                    }
                },
                "NFO:BANKNIFTY24AUG35000PE": {
                    "depth": {
                        "buy": [{"price": 0, "quantity": 0}],
                        "sell": [{"price": 0, "quantity": 0}]
                    }
                }
            }
        }"#;

        let envelope: QuoteEnvelope = serde_json::from_str(json).unwrap();

        let call = envelope.data["NFO:BANKNIFTY24AUG35000CE"]
            .depth
            .top_of_book()
            .unwrap();
        assert_eq!(call.bid, 800.0);
        assert_eq!(call.ask, 810.0);

        // Zero-price padding means no resting orders.
        assert!(envelope.data["NFO:BANKNIFTY24AUG35000PE"]
            .depth
            .top_of_book()
            .is_none());
    }

    #[test]
    fn test_empty_depth_arrays() {
        let depth = DepthRecord::default();
        assert!(depth.top_of_book().is_none());
    }
}
