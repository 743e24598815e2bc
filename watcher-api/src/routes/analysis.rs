//! Strategy analysis endpoint

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use watcher_core::{Trade, WatcherError};
use watcher_services::AnalysisConfig;

use crate::AppState;

/// Request to generate a strategy summary.
///
/// Provider settings travel with the request; the server keeps no analysis
/// configuration of its own.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub config: AnalysisConfig,
    #[serde(default)]
    pub trades: Vec<Trade>,
}

/// Generated analysis text
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Create analysis routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/analysis", post(analyze))
}

/// Run the configured provider over the submitted trade history
async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    match state
        .strategy_analyzer
        .analyze(&request.config, &request.trades)
        .await
    {
        Ok(analysis) => (StatusCode::OK, Json(AnalyzeResponse { analysis })).into_response(),
        Err(e @ WatcherError::Config(_)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Strategy analysis failed: {}", e);
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
