//! Whale Watcher API Server
//!
//! HTTP API backing the browser dashboard: wallet trade history with
//! derived stats, CSV import, arbitrage scanning, and strategy analysis.

mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use watcher_polymarket::PolymarketClient;
use watcher_services::{ArbitrageScanner, StrategyAnalyzer, TradeService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub trade_service: Arc<TradeService>,
    pub arbitrage_scanner: Arc<ArbitrageScanner>,
    pub strategy_analyzer: Arc<StrategyAnalyzer>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,watcher_api=debug")),
        )
        .init();

    info!("Starting Whale Watcher API");

    let polymarket = PolymarketClient::new();

    let state = AppState {
        trade_service: Arc::new(TradeService::new(polymarket.clone())),
        arbitrage_scanner: Arc::new(ArbitrageScanner::new(polymarket)),
        strategy_analyzer: Arc::new(StrategyAnalyzer::new()),
    };

    // Configure CORS for the frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Build router
    let app = Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .with_state(state);

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
