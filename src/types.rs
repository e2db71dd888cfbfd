// =============================================================================
// Shared types used across the indicator gateway
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of OHLC price history for a ticker.
///
/// Bars arrive from the provider ordered by date ascending and are treated
/// as read-only for the rest of the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }
}

/// Extract the close column from a series of bars.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closes_preserves_order() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = vec![
            Bar::new(d, 10.0, 11.0, 9.0, 10.5),
            Bar::new(d.succ_opt().unwrap(), 10.5, 12.0, 10.0, 11.5),
        ];
        assert_eq!(closes(&bars), vec![10.5, 11.5]);
    }

    #[test]
    fn closes_empty() {
        assert!(closes(&[]).is_empty());
    }
}
