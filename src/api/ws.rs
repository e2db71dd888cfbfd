// =============================================================================
// WebSocket Handler — Vortex Indicator request/reply stream
// =============================================================================
//
// Clients connect to `/ws/VortexIndicator` (the upgrade is accepted
// unconditionally) and then drive a strict request/reply loop: one text
// frame in, one text frame out.
//
// Request:  {"ticker": "AAPL", "calculate_indicator": true}
// Replies:
//   {"error": "..."}                                         — no data, or
//                                                              insufficient
//                                                              history
//   {"Vortex_Indicator_Plus": "Not calculated", ...}         — calculation
//                                                              not requested
//   {"Vortex_Indicator_Plus": 0.91, "Vortex_Indicator_Minus": 1.07}
//
// A malformed request or a provider failure sends one final error frame and
// ends the loop; the client must reconnect.  No data for a ticker and
// "not calculated" are per-message conditions — the loop continues.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::indicators::vortex;
use crate::types::Bar;

// =============================================================================
// Request shape
// =============================================================================

#[derive(Debug, Deserialize)]
struct StreamRequest {
    ticker: String,
    calculate_indicator: bool,
}

// =============================================================================
// Upgrade handler
// =============================================================================

/// Axum handler for the WebSocket upgrade request.  Every connection is
/// accepted; there is no handshake validation.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

// =============================================================================
// Connection loop
// =============================================================================

/// Manage one connection: read a frame, answer it, repeat until the client
/// leaves or a fatal condition ends the loop.
async fn handle_connection(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = Uuid::new_v4();
    info!(%conn_id, "vortex stream connected");

    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let (reply, keep_open) = answer(&state, &conn_id, &text).await;
                if let Err(e) = sender.send(Message::Text(reply)).await {
                    warn!(%conn_id, error = %e, "send failed — disconnecting");
                    break;
                }
                if !keep_open {
                    break;
                }
            }
            Ok(Message::Ping(data)) => {
                if sender.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Pong(_)) => {}
            Ok(Message::Binary(_)) => {
                debug!(%conn_id, "binary frame ignored");
            }
            Ok(Message::Close(_)) => {
                info!(%conn_id, "close frame received");
                break;
            }
            Err(e) => {
                warn!(%conn_id, error = %e, "receive error — disconnecting");
                break;
            }
        }
    }

    info!(%conn_id, "vortex stream closed");
}

/// Produce the reply for one incoming frame together with a keep-open flag.
async fn answer(state: &AppState, conn_id: &Uuid, text: &str) -> (String, bool) {
    let request: StreamRequest = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!(%conn_id, error = %e, "malformed stream request — closing after reply");
            return (error_payload(&format!("invalid request: {e}")), false);
        }
    };

    state.count_request();

    let bars = match state
        .provider
        .fetch_daily(&request.ticker, state.config.vortex_lookback_days)
        .await
    {
        Ok(bars) => bars,
        Err(e) => {
            warn!(%conn_id, ticker = %request.ticker, error = %e, "provider fetch failed — closing after reply");
            return (error_payload(&e.to_string()), false);
        }
    };

    debug!(%conn_id, ticker = %request.ticker, bars = bars.len(), "stream request answered");
    (
        build_reply(
            request.calculate_indicator,
            &bars,
            state.config.smoothing_period,
        ),
        true,
    )
}

// =============================================================================
// Reply building
// =============================================================================

/// Build the reply frame for a parsed request and its fetched series.
///
/// All branches here are per-message conditions; none of them close the
/// connection.
fn build_reply(calculate: bool, bars: &[Bar], period: usize) -> String {
    if bars.is_empty() {
        return error_payload("stock data not found");
    }

    if !calculate {
        return serde_json::json!({
            "Vortex_Indicator_Plus": "Not calculated",
            "Vortex_Indicator_Minus": "Not calculated",
        })
        .to_string();
    }

    match vortex::calculate(bars, period) {
        Some((vi_plus, vi_minus)) => serde_json::json!({
            "Vortex_Indicator_Plus": vi_plus,
            "Vortex_Indicator_Minus": vi_minus,
        })
        .to_string(),
        None => error_payload("insufficient history for vortex indicator"),
    }
}

fn error_payload(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
