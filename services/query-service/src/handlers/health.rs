use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub cache: String,
}

fn component_status(up: bool) -> String {
    if up { "up" } else { "down" }.to_string()
}

/// Health check endpoint; reports 503 when a backing store is unreachable
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_up = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Database health check failed: {}", e);
            false
        }
    };

    let cache_up = match &state.redis {
        Some(redis) => match redis.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache health check failed: {}", e);
                false
            }
        },
        None => true,
    };

    let healthy = database_up && cache_up;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "healthy" } else { "degraded" }.to_string(),
            service: "query-service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: component_status(database_up),
            cache: component_status(cache_up),
        }),
    )
}
