// =============================================================================
// Relative Strength Index (RSI) — Simple Moving Average flavour
// =============================================================================
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Split each delta into a gain (positive part) and a loss
//          (absolute value of the negative part).
// Step 3 — avg_gain / avg_loss = plain SMA of the trailing `period` gains
//          and losses.  No Wilder smoothing: the gateway reports a single
//          point-in-time value, so only the most recent window matters.
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Sentinels when RS is undefined:
//   avg_loss == 0, gains present => 100.0 (all up-moves)
//   avg_loss == 0 == avg_gain    => 50.0  (no movement at all)
// =============================================================================

/// Compute the most recent RSI value for the given `closes` and `period`.
///
/// # Edge cases
/// - `period == 0` => `None`
/// - `closes.len() < period + 1` => `None` (need `period` deltas)
/// - Non-finite result => `None`
pub fn calculate(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    // Only the trailing `period + 1` closes contribute to the reported value.
    let window = &closes[closes.len() - (period + 1)..];

    let (sum_gain, sum_loss) = window
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0_f64, 0.0_f64), |(g, l), d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l + d.abs())
            }
        });

    let period_f = period as f64;
    let avg_gain = sum_gain / period_f;
    let avg_loss = sum_loss / period_f;

    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate(&[], 14).is_none());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(calculate(&[1.0, 2.0, 3.0], 0).is_none());
    }

    #[test]
    fn rsi_insufficient_data() {
        // Need period+1 closes (period deltas). 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert!(calculate(&closes, 14).is_none());
    }

    #[test]
    fn rsi_exact_minimum_data() {
        let closes: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        assert!(calculate(&closes, 14).is_some());
    }

    #[test]
    fn rsi_all_gains_is_ceiling() {
        // Strictly ascending closes => average loss = 0 => ceiling sentinel.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let rsi = calculate(&closes, 14).unwrap();
        assert!((rsi - 100.0).abs() < 1e-10, "expected 100.0, got {rsi}");
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        // Strictly descending closes => average gain = 0 => RSI = 0.
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let rsi = calculate(&closes, 14).unwrap();
        assert!(rsi.abs() < 1e-10, "expected 0.0, got {rsi}");
    }

    #[test]
    fn rsi_flat_market_is_neutral() {
        let closes = vec![100.0; 30];
        let rsi = calculate(&closes, 14).unwrap();
        assert!((rsi - 50.0).abs() < 1e-10, "expected 50.0, got {rsi}");
    }

    #[test]
    fn rsi_equal_gains_and_losses() {
        // Alternating +1 / -1 moves => avg_gain == avg_loss => RS = 1 => 50.
        let closes: Vec<f64> = (0..31)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let rsi = calculate(&closes, 14).unwrap();
        assert!((rsi - 50.0).abs() < 1e-10, "expected 50.0, got {rsi}");
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let rsi = calculate(&closes, 14).unwrap();
        assert!((0.0..=100.0).contains(&rsi), "RSI {rsi} out of range");
    }

    #[test]
    fn rsi_only_trailing_window_matters() {
        // A wild move outside the trailing window must not affect the value.
        let mut a: Vec<f64> = vec![500.0, 1.0];
        let tail: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        a.extend(&tail);
        assert_eq!(calculate(&a, 14), calculate(&tail, 14));
    }
}
