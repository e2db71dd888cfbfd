// =============================================================================
// Advance-Decline Ratio
// =============================================================================
//
// Classifies every close in the fetched window against the OPENING price of
// the first bar in that window:
//
//   close > open[0]  => advancer
//   close < open[0]  => decliner
//   close == open[0] => neither
//
// Ratio = advancers / decliners when decliners > 0.  When there are no
// decliners the raw advancer count is returned instead.  That fallback
// conflates a true ratio with a plain count under one number; it is the
// contract of the upstream API and is kept as-is.
// =============================================================================

use crate::types::Bar;

/// Compute the advance-decline ratio over `bars`.
///
/// # Returns
/// `None` when `bars` is empty (there is no reference open to classify
/// against).  Callers are expected to reject an empty series before this
/// point; the `None` is a backstop, not a valid zero-ratio.
pub fn calculate(bars: &[Bar]) -> Option<f64> {
    let open_ref = bars.first()?.open;

    let mut advancers: u32 = 0;
    let mut decliners: u32 = 0;
    for bar in bars {
        if bar.close > open_ref {
            advancers += 1;
        } else if bar.close < open_ref {
            decliners += 1;
        }
    }

    if decliners > 0 {
        Some(f64::from(advancers) / f64::from(decliners))
    } else {
        Some(f64::from(advancers))
    }
}
