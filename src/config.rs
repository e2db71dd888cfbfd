// =============================================================================
// Service Configuration
// =============================================================================
//
// Defaults with environment overrides.  The lookback windows and smoothing
// period are fixed product constants; they live here so handlers read them
// off the application context instead of scattered literals.
// =============================================================================

use tracing::info;

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_provider_base_url() -> String {
    "https://query1.finance.yahoo.com/v8/finance/chart".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

/// Runtime settings for the gateway.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Root URL of the market data chart API.
    pub provider_base_url: String,
    /// Per-request timeout for provider fetches, in seconds.
    pub fetch_timeout_secs: u64,

    /// Lookback for the advance-decline ratio (6 months).
    pub ad_lookback_days: i64,
    /// Lookback for RSI.
    pub rsi_lookback_days: i64,
    /// Lookback for the Vortex Indicator (1 year).
    pub vortex_lookback_days: i64,
    /// Smoothing window for RSI and Vortex.
    pub smoothing_period: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            provider_base_url: default_provider_base_url(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            ad_lookback_days: 180,
            rsi_lookback_days: 365,
            vortex_lookback_days: 365,
            smoothing_period: crate::indicators::DEFAULT_PERIOD,
        }
    }
}

impl ServiceConfig {
    /// Build the configuration from defaults plus environment overrides.
    ///
    /// Recognised variables: `TA_BIND_ADDR`, `TA_PROVIDER_BASE_URL`,
    /// `TA_FETCH_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("TA_BIND_ADDR") {
            if !addr.trim().is_empty() {
                config.bind_addr = addr.trim().to_string();
            }
        }
        if let Ok(url) = std::env::var("TA_PROVIDER_BASE_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if !url.is_empty() {
                config.provider_base_url = url;
            }
        }
        if let Ok(secs) = std::env::var("TA_FETCH_TIMEOUT_SECS") {
            if let Ok(secs) = secs.trim().parse::<u64>() {
                if secs > 0 {
                    config.fetch_timeout_secs = secs;
                }
            }
        }

        info!(
            bind_addr = %config.bind_addr,
            provider = %config.provider_base_url,
            fetch_timeout_secs = config.fetch_timeout_secs,
            "configuration loaded"
        );

        config
    }

    /// Provider fetch timeout as a `Duration`.
    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert!(config.provider_base_url.contains("yahoo"));
        assert_eq!(config.ad_lookback_days, 180);
        assert_eq!(config.rsi_lookback_days, 365);
        assert_eq!(config.vortex_lookback_days, 365);
        assert_eq!(config.smoothing_period, 14);
    }

    #[test]
    fn fetch_timeout_duration() {
        let config = ServiceConfig::default();
        assert_eq!(config.fetch_timeout(), std::time::Duration::from_secs(10));
    }
}
