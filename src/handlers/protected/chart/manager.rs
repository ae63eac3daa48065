// handlers/protected/chart/manager.rs - GET /api/chart/manager

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};

use super::params::ChartQuery;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::{ChartPoint, Granularity};
use crate::state::AppState;

/// Plant overview: target vs. actual per department for one day.
/// Always answers the four departments, zero-filled when idle.
pub async fn manager_overview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> Result<Json<Vec<ChartPoint>>, ApiError> {
    let date = ChartQuery::from_extractor(query)?.required_date()?;
    tracing::debug!("Plant overview for {} requested by {}", date, user.username);

    let points = state.charts.aggregate(&Granularity::Plant, date).await?;
    Ok(Json(points))
}
