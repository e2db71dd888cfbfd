// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators exposed by the
// gateway.  Every public function returns `Option<T>` so callers are forced
// to handle insufficient-data and numerical-edge-case scenarios.

pub mod ad_ratio;
pub mod rsi;
pub mod vortex;

/// Default smoothing window shared by RSI and the Vortex Indicator.
pub const DEFAULT_PERIOD: usize = 14;
