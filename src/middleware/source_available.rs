use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Answers 503 before auth or any query runs when the production database
/// is not reachable.
pub async fn require_production_source(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    state.charts.ensure_available().await?;
    Ok(next.run(request).await)
}
