//! API route definitions

mod analysis;
mod arbitrage;
mod health;
mod trades;

use crate::AppState;
use axum::Router;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(trades::routes())
        .merge(arbitrage::routes())
        .merge(analysis::routes())
}
