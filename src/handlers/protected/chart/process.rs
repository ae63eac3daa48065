// handlers/protected/chart/process.rs - GET /api/chart/process

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};

use super::params::ChartQuery;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::{ChartPoint, Granularity};
use crate::state::AppState;

/// Per-machine target vs. actual (with NG count), optionally for one process
pub async fn process_view(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> Result<Json<Vec<ChartPoint>>, ApiError> {
    let query = ChartQuery::from_extractor(query)?;
    let date = query.required_date()?;
    let process = query.process();
    tracing::debug!("Process view for {} ({:?}) requested by {}", date, process, user.username);

    let points = state.charts.aggregate(&Granularity::Process { process }, date).await?;
    Ok(Json(points))
}
