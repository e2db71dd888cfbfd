// =============================================================================
// Yahoo Finance Chart API Client — daily OHLC history
// =============================================================================
//
// Public, unauthenticated endpoint.  The chart API rejects requests carrying
// the default reqwest User-Agent, so a browser-like one is sent instead.
//
// "Ticker not found" and "no data in range" both surface as an EMPTY bar
// vector — emptiness is the caller's NotFound signal.  Transport failures
// and other provider errors are typed `ProviderError` variants.
// =============================================================================

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::types::Bar;

/// User-Agent sent with every chart request.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Error code the chart API uses for unknown tickers.
const NOT_FOUND_CODE: &str = "Not Found";

// =============================================================================
// Error type
// =============================================================================

/// Failures raised by the market data provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (DNS, connect, timeout, ...).
    #[error("market data request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with an error of its own.
    #[error("market data provider error [{code}]: {description}")]
    Api { code: String, description: String },

    /// The response body did not match the chart schema.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

// =============================================================================
// Chart API response schema
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteColumns>,
}

/// Column-oriented OHLC data; individual cells may be null.
#[derive(Debug, Deserialize)]
struct QuoteColumns {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
}

// =============================================================================
// Client
// =============================================================================

/// Yahoo Finance chart API client.
#[derive(Debug, Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    /// Create a new `YahooClient`.
    ///
    /// # Arguments
    /// * `base_url` — chart API root, overridable so tests and alternative
    ///   mirrors can point elsewhere.
    /// * `timeout`  — per-request timeout applied to every fetch.
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Fetch daily bars for `ticker` covering the trailing `lookback_days`.
    ///
    /// Returns an empty vector when the provider has no data for the ticker
    /// or range.  The ticker string is passed through unvalidated.
    #[instrument(skip(self), name = "yahoo::fetch_daily")]
    pub async fn fetch_daily(
        &self,
        ticker: &str,
        lookback_days: i64,
    ) -> Result<Vec<Bar>, ProviderError> {
        let end = Utc::now();
        let start = end - Duration::days(lookback_days);
        let url = self.chart_url(ticker, start.timestamp(), end.timestamp());

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        let bars = Self::parse_chart(&body, status.is_success())?;
        debug!(ticker, count = bars.len(), "daily bars fetched");
        Ok(bars)
    }

    /// Build the chart request URL for one ticker and period range.
    fn chart_url(&self, ticker: &str, period1: i64, period2: i64) -> String {
        format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            self.base_url, ticker, period1, period2
        )
    }

    // -------------------------------------------------------------------------
    // Response parsing
    // -------------------------------------------------------------------------

    /// Parse a chart API body into bars.
    ///
    /// `http_ok` is the transport-level success flag; when the body is not
    /// chart JSON the flag decides between an `Api` error (provider answered
    /// with a non-chart failure page) and `Malformed` (success status but
    /// unusable payload).
    fn parse_chart(body: &str, http_ok: bool) -> Result<Vec<Bar>, ProviderError> {
        let parsed: ChartResponse = match serde_json::from_str(body) {
            Ok(p) => p,
            Err(e) if http_ok => return Err(ProviderError::Malformed(e.to_string())),
            Err(_) => {
                return Err(ProviderError::Api {
                    code: "http".to_string(),
                    description: truncate(body, 200),
                })
            }
        };

        if let Some(err) = parsed.chart.error {
            // Unknown ticker: not an error, just no data.
            if err.code == NOT_FOUND_CODE {
                return Ok(Vec::new());
            }
            return Err(ProviderError::Api {
                code: err.code,
                description: err.description,
            });
        }

        let Some(result) = parsed.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(Vec::new());
        };

        let Some(quote) = result.indicators.quote.into_iter().next() else {
            return Ok(Vec::new());
        };

        let mut bars = Vec::with_capacity(result.timestamp.len());
        for (i, &ts) in result.timestamp.iter().enumerate() {
            let cell = |col: &[Option<f64>]| col.get(i).copied().flatten();

            // Rows with any missing OHLC column are skipped (holidays,
            // partial sessions).
            let (Some(open), Some(high), Some(low), Some(close)) = (
                cell(&quote.open),
                cell(&quote.high),
                cell(&quote.low),
                cell(&quote.close),
            ) else {
                warn!(index = i, "skipping bar with missing OHLC column");
                continue;
            };

            let Some(date) = DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()) else {
                warn!(timestamp = ts, "skipping bar with out-of-range timestamp");
                continue;
            };

            bars.push(Bar::new(date, open, high, low, close));
        }

        Ok(bars)
    }
}

/// Truncate a body snippet for error messages.
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    const VALID_BODY: &str = r#"{"chart":{"result":[{"timestamp":[1704240000,1704326400,1704412800],"indicators":{"quote":[{"open":[185.0,186.0,187.0],"high":[186.0,187.0,188.0],"low":[184.0,185.0,186.0],"close":[185.5,186.5,187.5]}]}}],"error":null}}"#;

    #[test]
    fn parse_valid_body() {
        let bars = YahooClient::parse_chart(VALID_BODY, true).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].open, 185.0);
        assert_eq!(bars[2].close, 187.5);
        // 1704240000 = 2024-01-03 UTC.
        assert_eq!(bars[0].date.to_string(), "2024-01-03");
        // Ascending date order.
        assert!(bars[0].date < bars[1].date && bars[1].date < bars[2].date);
    }

    #[test]
    fn parse_skips_null_rows() {
        let body = r#"{"chart":{"result":[{"timestamp":[1704240000,1704326400,1704412800],"indicators":{"quote":[{"open":[185.0,null,187.0],"high":[186.0,null,188.0],"low":[184.0,null,186.0],"close":[185.5,null,187.5]}]}}],"error":null}}"#;
        let bars = YahooClient::parse_chart(body, true).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 187.5);
    }

    #[test]
    fn parse_not_found_is_empty() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let bars = YahooClient::parse_chart(body, false).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn parse_other_api_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Internal Server Error","description":"upstream exploded"}}}"#;
        let err = YahooClient::parse_chart(body, false).unwrap_err();
        assert!(matches!(err, ProviderError::Api { .. }));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[test]
    fn parse_empty_result_is_empty() {
        let body = r#"{"chart":{"result":[],"error":null}}"#;
        assert!(YahooClient::parse_chart(body, true).unwrap().is_empty());
    }

    #[test]
    fn parse_garbage_with_http_ok_is_malformed() {
        let err = YahooClient::parse_chart("not json", true).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[test]
    fn parse_garbage_with_http_error_is_api() {
        let err = YahooClient::parse_chart("<html>502 Bad Gateway</html>", false).unwrap_err();
        assert!(matches!(err, ProviderError::Api { .. }));
    }

    #[test]
    fn chart_url_shape() {
        let client = YahooClient::new(
            "https://query1.finance.yahoo.com/v8/finance/chart",
            std::time::Duration::from_secs(10),
        );
        let url = client.chart_url("AAPL", 1704067200, 1733011200);
        assert!(url.contains("/AAPL?"));
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("period2=1733011200"));
        assert!(url.contains("interval=1d"));
    }

    #[test]
    fn truncate_short_and_long() {
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }
}
