use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use read_model::{OrderSummary, ReadModelError};
use tracing::{error, info, warn};

use crate::state::AppState;

/// Order history of one customer
pub async fn my_orders_handler(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> Result<Json<Vec<OrderSummary>>, (StatusCode, String)> {
    info!("Fetching order history for user: {}", user_name);

    let cancel = state.shutdown.child_token();

    match state.orders.get(&user_name, &cancel).await {
        Ok(orders) => {
            info!(
                "Successfully retrieved {} orders for user: {}",
                orders.len(),
                user_name
            );
            Ok(Json(orders))
        }
        Err(ReadModelError::Cancelled) => {
            warn!("Order history request for {} cancelled by shutdown", user_name);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                "Service is shutting down".to_string(),
            ))
        }
        Err(e) => {
            error!("Failed to fetch order history for {}: {}", user_name, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch order history: {}", e),
            ))
        }
    }
}
