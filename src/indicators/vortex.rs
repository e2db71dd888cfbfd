// =============================================================================
// Vortex Indicator (VI+ / VI-)
// =============================================================================
//
// Over the trailing `period` bar-to-bar shifts (each bar compared with the
// immediately preceding bar):
//
//   TR[i] = |high[i] - low[i-1]|     summed  => tr_sum
//   VM[i] = |low[i]  - close[i-1]|   summed  => VI+ = vm_sum / tr_sum
//   VP[i] = |high[i] - close[i-1]|   summed  => VI- = vp_sum / tr_sum
//
// These terms are the contract of the upstream API, not the textbook Vortex
// definition; they are kept verbatim.  Both outputs are ratios of sums of
// absolute values and therefore non-negative.
// =============================================================================

use crate::types::Bar;

/// Compute the most recent (VI+, VI-) pair for the given `bars` and `period`.
///
/// # Edge cases
/// - `period == 0` => `None`
/// - `bars.len() < period + 1` => `None` (the shift consumes one bar)
/// - True-range sum of zero (flat series) => `None` instead of dividing by
///   zero
/// - Non-finite sums => `None`
pub fn calculate(bars: &[Bar], period: usize) -> Option<(f64, f64)> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }

    let start = bars.len() - period;

    let mut tr_sum = 0.0_f64;
    let mut vm_sum = 0.0_f64;
    let mut vp_sum = 0.0_f64;
    for i in start..bars.len() {
        let prev = &bars[i - 1];
        tr_sum += (bars[i].high - prev.low).abs();
        vm_sum += (bars[i].low - prev.close).abs();
        vp_sum += (bars[i].high - prev.close).abs();
    }

    if tr_sum == 0.0 || !tr_sum.is_finite() || !vm_sum.is_finite() || !vp_sum.is_finite() {
        return None;
    }

    Some((vm_sum / tr_sum, vp_sum / tr_sum))
}
