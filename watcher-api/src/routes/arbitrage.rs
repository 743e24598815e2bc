//! Arbitrage scan endpoints

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use watcher_core::ArbitrageOpportunity;
use watcher_services::default_threshold;

use crate::AppState;

/// Query parameters for the opportunity scan
#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    /// Maximum combined cost to include (default 0.995)
    pub threshold: Option<Decimal>,
}

/// Scan results
#[derive(Debug, Serialize)]
pub struct OpportunitiesResponse {
    pub opportunities: Vec<ArbitrageOpportunity>,
    pub count: usize,
}

/// Create arbitrage routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/arbitrage/opportunities", get(scan_opportunities))
        .route("/arbitrage/markets", get(list_market_prices))
}

/// Scan for markets priced below the threshold, best profit first
async fn scan_opportunities(
    State(state): State<AppState>,
    Query(params): Query<ScanQuery>,
) -> Json<OpportunitiesResponse> {
    let threshold = params.threshold.unwrap_or_else(default_threshold);

    let opportunities = state
        .arbitrage_scanner
        .scan_for_opportunities(threshold)
        .await;

    info!(
        "Returning {} arbitrage opportunities (threshold: {})",
        opportunities.len(),
        threshold
    );

    Json(OpportunitiesResponse {
        count: opportunities.len(),
        opportunities,
    })
}

/// List all scanned markets with prices, closest-to-arbitrage first
async fn list_market_prices(State(state): State<AppState>) -> Json<OpportunitiesResponse> {
    let opportunities = state.arbitrage_scanner.all_markets_with_prices().await;

    info!("Returning {} markets with prices", opportunities.len());

    Json(OpportunitiesResponse {
        count: opportunities.len(),
        opportunities,
    })
}
