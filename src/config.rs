//! System configuration for the box-spread scanner.
//!
//! Constants carry the defaults; `ScannerConfig` overlays environment
//! overrides on top of them at startup.

use std::time::Duration;

/// Kite-style brokerage API base URL
pub const KITE_API_BASE: &str = "https://api.kite.trade";

// =============================================================================
// SCAN PARAMETERS
// =============================================================================

/// Default underlying whose option chain is scanned
pub const DEFAULT_UNDERLYING: &str = "BANKNIFTY";

/// Default minimum riskless profit (in rupees) before a box is dispatched
pub const DEFAULT_MIN_PROFIT: f64 = 40.0;

/// Strikes must be an exact multiple of this to be considered liquid
pub const DEFAULT_STRIKE_GRANULARITY: u32 = 500;

/// Seconds between two polling cycles
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Only the first N expiries are considered; liquidity degrades sharply
/// beyond near-term expiries and the scanner targets only the nearest.
pub const DEFAULT_EXPIRY_CAP: usize = 4;

/// Segment tag identifying standard listed options
pub const OPTION_SEGMENT: &str = "NFO-OPT";

/// HTTP client timeout (seconds)
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// RUNTIME CONFIGURATION
// =============================================================================

/// Runtime configuration, fixed for the lifetime of a scan session.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Underlying trading name (e.g. "BANKNIFTY")
    pub underlying: String,
    /// Minimum profit a box must clear before dispatch
    pub min_profit: f64,
    /// Strike ladder granularity
    pub strike_granularity: u32,
    /// Delay between polling cycles
    pub poll_interval: Duration,
    /// How many near-term expiries to consider
    pub expiry_cap: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            underlying: DEFAULT_UNDERLYING.to_string(),
            min_profit: DEFAULT_MIN_PROFIT,
            strike_granularity: DEFAULT_STRIKE_GRANULARITY,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            expiry_cap: DEFAULT_EXPIRY_CAP,
        }
    }
}

impl ScannerConfig {
    /// Build from environment variables, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            underlying: std::env::var("UNDERLYING").unwrap_or(defaults.underlying),
            min_profit: env_parse("MIN_PROFIT").unwrap_or(defaults.min_profit),
            strike_granularity: env_parse("STRIKE_GRANULARITY")
                .unwrap_or(defaults.strike_granularity),
            poll_interval: env_parse("POLL_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            expiry_cap: env_parse("EXPIRY_CAP").unwrap_or(defaults.expiry_cap),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScannerConfig::default();
        assert_eq!(config.underlying, "BANKNIFTY");
        assert_eq!(config.strike_granularity, 500);
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.expiry_cap, 4);
    }

    #[test]
    fn test_env_parse_rejects_garbage() {
        std::env::set_var("TEST_ENV_PARSE_GARBAGE", "not-a-number");
        assert_eq!(env_parse::<u64>("TEST_ENV_PARSE_GARBAGE"), None);
        std::env::remove_var("TEST_ENV_PARSE_GARBAGE");
    }
}
