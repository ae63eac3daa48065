// handlers/protected/chart/machine.rs - GET /api/chart/machine and /api/chart/machines

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};

use super::params::ChartQuery;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::{ChartPoint, Granularity};
use crate::state::AppState;

/// Hour-by-hour output of one machine: 24 rows, `00:00` to `23:00`
pub async fn machine_detail(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> Result<Json<Vec<ChartPoint>>, ApiError> {
    let query = ChartQuery::from_extractor(query)?;
    let date = query.required_date()?;
    let machine = query.required_machine()?;
    tracing::debug!("Hourly detail for {} on {} requested by {}", machine, date, user.username);

    let points = state.charts.aggregate(&Granularity::Hourly { machine }, date).await?;
    Ok(Json(points))
}

/// Machines active on a day (today, server-local, when `tanggal` is omitted)
pub async fn machine_list(
    State(state): State<AppState>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, ApiError> {
    let today = chrono::Local::now().date_naive();
    let date = ChartQuery::from_extractor(query)?.date_or(today)?;

    let machines = state.charts.machine_list(date).await?;
    Ok(Json(machines))
}
