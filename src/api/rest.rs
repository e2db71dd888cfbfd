// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Indicator endpoints live under `/technicalindicator/`; the paths and the
// response field names (including the spaced "Relative Strength Index" key)
// are the published contract of the upstream API and must not be renamed.
//
// Every failure is converted to a response at this boundary:
//   empty fetched series  => 404 {"error": "stock data not found"}
//   provider failure      => 500 {"error": <description>}
// Values that are undefined for the fetched history serialize as null.
//
// CORS is configured permissively for development; tighten `allow_origin`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::indicators::{ad_ratio, rsi, vortex};
use crate::provider::ProviderError;
use crate::types::{closes, Bar};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/technicalindicator/advance-decline-ratio/:ticker",
            get(advance_decline_ratio),
        )
        .route(
            "/technicalindicator/relative-strength-index/:ticker",
            get(relative_strength_index),
        )
        .route(
            "/technicalindicator/VortexIndicator/:ticker",
            get(vortex_indicator),
        )
        .route("/ws/VortexIndicator", get(crate::api::ws::ws_handler))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Error mapping
// =============================================================================

/// Request-level failure, converted to a JSON error response.
#[derive(Debug)]
pub enum ApiError {
    /// The provider returned no data for the ticker/range.
    NotFound,
    /// The provider or network failed.
    Upstream(String),
    /// Anything else that went wrong while serving the request.
    Internal(String),
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "stock data not found".to_string()),
            Self::Upstream(msg) | Self::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Root & health
// =============================================================================

const ROOT_PAGE: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <title>Technical Indicator API</title>
    </head>
    <body>
        <h1>Technical Indicator API</h1>
        <ul>
            <li><code>GET /technicalindicator/advance-decline-ratio/{ticker}</code></li>
            <li><code>GET /technicalindicator/relative-strength-index/{ticker}</code></li>
            <li><code>GET /technicalindicator/VortexIndicator/{ticker}</code></li>
            <li><code>WS  /ws/VortexIndicator</code></li>
            <li><code>GET /health</code></li>
        </ul>
    </body>
</html>
"#;

async fn root() -> Html<&'static str> {
    Html(ROOT_PAGE)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    requests_served: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
        requests_served: state.requests_served(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Indicator endpoints
// =============================================================================

#[derive(Debug, Serialize)]
pub struct AdRatioResponse {
    pub ticker: String,
    pub ad_ratio: f64,
}

async fn advance_decline_ratio(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Result<Json<AdRatioResponse>, ApiError> {
    state.count_request();
    let bars = state
        .provider
        .fetch_daily(&ticker, state.config.ad_lookback_days)
        .await
        .map_err(log_upstream)?;

    let resp = ad_ratio_response(ticker, &bars)?;
    info!(ticker = %resp.ticker, ad_ratio = resp.ad_ratio, "advance-decline ratio served");
    Ok(Json(resp))
}

/// Shape the advance-decline response from fetched bars.
fn ad_ratio_response(ticker: String, bars: &[Bar]) -> Result<AdRatioResponse, ApiError> {
    if bars.is_empty() {
        return Err(ApiError::NotFound);
    }
    // Non-empty series always yields a value; None here means a logic error.
    let ad_ratio = ad_ratio::calculate(bars)
        .ok_or_else(|| ApiError::Internal("advance-decline ratio undefined".to_string()))?;
    Ok(AdRatioResponse { ticker, ad_ratio })
}

#[derive(Debug, Serialize)]
pub struct RsiResponse {
    pub ticker: String,
    /// Published key of the upstream API; the spaces are deliberate.
    #[serde(rename = "Relative Strength Index")]
    pub relative_strength_index: Option<f64>,
}

async fn relative_strength_index(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Result<Json<RsiResponse>, ApiError> {
    state.count_request();
    let bars = state
        .provider
        .fetch_daily(&ticker, state.config.rsi_lookback_days)
        .await
        .map_err(log_upstream)?;

    let resp = rsi_response(ticker, &bars, state.config.smoothing_period)?;
    info!(
        ticker = %resp.ticker,
        rsi = ?resp.relative_strength_index,
        "relative strength index served"
    );
    Ok(Json(resp))
}

/// Shape the RSI response from fetched bars.
///
/// Insufficient history serializes as a null value, not an error.
fn rsi_response(ticker: String, bars: &[Bar], period: usize) -> Result<RsiResponse, ApiError> {
    if bars.is_empty() {
        return Err(ApiError::NotFound);
    }
    let relative_strength_index = rsi::calculate(&closes(bars), period);
    Ok(RsiResponse {
        ticker,
        relative_strength_index,
    })
}

#[derive(Debug, Serialize)]
pub struct VortexResponse {
    pub ticker: String,
    #[serde(rename = "Vortex_Indicator_Plus")]
    pub vortex_indicator_plus: Option<f64>,
    #[serde(rename = "Vortex_Indicator_Minus")]
    pub vortex_indicator_minus: Option<f64>,
}

async fn vortex_indicator(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Result<Json<VortexResponse>, ApiError> {
    state.count_request();
    let bars = state
        .provider
        .fetch_daily(&ticker, state.config.vortex_lookback_days)
        .await
        .map_err(log_upstream)?;

    let resp = vortex_response(ticker, &bars, state.config.smoothing_period)?;
    info!(
        ticker = %resp.ticker,
        vi_plus = ?resp.vortex_indicator_plus,
        vi_minus = ?resp.vortex_indicator_minus,
        "vortex indicator served"
    );
    Ok(Json(resp))
}

/// Shape the Vortex response from fetched bars.
fn vortex_response(ticker: String, bars: &[Bar], period: usize) -> Result<VortexResponse, ApiError> {
    if bars.is_empty() {
        return Err(ApiError::NotFound);
    }
    let pair = vortex::calculate(bars, period);
    Ok(VortexResponse {
        ticker,
        vortex_indicator_plus: pair.map(|(p, _)| p),
        vortex_indicator_minus: pair.map(|(_, m)| m),
    })
}

/// Log a provider failure before converting it to a response.
fn log_upstream(err: ProviderError) -> ApiError {
    warn!(error = %err, "provider fetch failed");
    err.into()
}
