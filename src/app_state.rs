// =============================================================================
// Central Application State
// =============================================================================
//
// Constructed once in `main` and shared with every handler as
// `Arc<AppState>` via axum state — no module-level singletons.
//
// Thread safety: the configuration and provider client are immutable after
// construction; the only mutable shared value is an atomic request counter,
// so no locks are needed.  Every request works on its own freshly fetched
// price series.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::config::ServiceConfig;
use crate::provider::YahooClient;

/// Application context shared across all request tasks.
pub struct AppState {
    pub config: ServiceConfig,
    pub provider: YahooClient,

    /// Instant the service was started; used for uptime reporting.
    pub start_time: Instant,
    /// Indicator requests served since startup (HTTP and WebSocket).
    pub requests_served: AtomicU64,
}

impl AppState {
    /// Construct the state from the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let provider = YahooClient::new(
            config.provider_base_url.clone(),
            config.fetch_timeout(),
        );

        Self {
            config,
            provider,
            start_time: Instant::now(),
            requests_served: AtomicU64::new(0),
        }
    }

    /// Count one served indicator request.
    pub fn count_request(&self) -> u64 {
        self.requests_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Requests served so far.
    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }

    /// Seconds since startup.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_counter_increments() {
        let state = AppState::new(ServiceConfig::default());
        assert_eq!(state.requests_served(), 0);
        assert_eq!(state.count_request(), 1);
        assert_eq!(state.count_request(), 2);
        assert_eq!(state.requests_served(), 2);
    }
}
