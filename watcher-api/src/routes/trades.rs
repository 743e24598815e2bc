//! Trade history endpoints: live fetch, CSV import, connection probes,
//! and wallet market discovery

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use watcher_core::{DashboardStats, Trade};
use watcher_services::parse_csv;

use crate::AppState;

/// Query parameters for fetching wallet trades
#[derive(Debug, Deserialize)]
pub struct TradesQuery {
    /// Wallet address (0x + 40 hex characters)
    pub wallet: String,
    /// Free-text market query
    pub market: String,
}

/// Trade list with derived stats
#[derive(Debug, Serialize)]
pub struct TradesResponse {
    pub trades: Vec<Trade>,
    pub stats: DashboardStats,
    pub count: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameters for the connection test
#[derive(Debug, Deserialize)]
pub struct ConnectionQuery {
    pub wallet: String,
    pub market: String,
}

/// Result of probing both upstream endpoints
#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    pub market: bool,
    pub wallet: bool,
}

/// Create trade routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trades", get(get_trades))
        .route("/trades/csv", post(import_csv))
        .route("/connection/test", get(test_connection))
        .route("/wallets/{address}/markets", get(get_wallet_markets))
}

/// Strict Ethereum address shape: 0x followed by 40 hex characters
fn is_valid_wallet(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Fetch a wallet's trades on the market matching a query
async fn get_trades(
    State(state): State<AppState>,
    Query(params): Query<TradesQuery>,
) -> impl IntoResponse {
    if !is_valid_wallet(&params.wallet) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid wallet address".to_string(),
            }),
        )
            .into_response();
    }
    if params.market.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Market query must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    info!(
        "Fetching trades for wallet {} on market query {:?}",
        params.wallet, params.market
    );

    match state
        .trade_service
        .fetch_wallet_trades(&params.wallet, &params.market)
        .await
    {
        Ok(trades) => {
            let stats = DashboardStats::from_trades(&trades);
            let count = trades.len();
            info!("Returning {} trades", count);
            (
                StatusCode::OK,
                Json(TradesResponse {
                    trades,
                    stats,
                    count,
                }),
            )
                .into_response()
        }
        // The one path where upstream failure propagates, so the frontend
        // can render "connection failed" instead of "no trades"
        Err(e) => {
            error!("Failed to fetch wallet trades: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Parse an uploaded CSV export into trades plus stats
async fn import_csv(body: String) -> impl IntoResponse {
    let trades = parse_csv(&body);
    let stats = DashboardStats::from_trades(&trades);
    let count = trades.len();

    info!("Parsed {} trades from CSV upload", count);

    Json(TradesResponse {
        trades,
        stats,
        count,
    })
}

/// Probe the market search and activity endpoints concurrently
async fn test_connection(
    State(state): State<AppState>,
    Query(params): Query<ConnectionQuery>,
) -> impl IntoResponse {
    let (market, wallet) = tokio::join!(
        state.trade_service.test_market_connection(&params.market),
        state.trade_service.test_wallet_connection(&params.wallet),
    );

    Json(ConnectionResponse { market, wallet })
}

/// List the markets a wallet has been active in
async fn get_wallet_markets(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> impl IntoResponse {
    if !is_valid_wallet(&address) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid wallet address".to_string(),
            }),
        )
            .into_response();
    }

    let profile = state.trade_service.fetch_wallet_profile(&address).await;
    (StatusCode::OK, Json(profile)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_validation() {
        assert!(is_valid_wallet(
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        ));
        assert!(!is_valid_wallet("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(!is_valid_wallet("0x123"));
        assert!(!is_valid_wallet(
            "0xZZ9Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        ));
        assert!(!is_valid_wallet(""));
    }
}
