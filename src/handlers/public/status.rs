// handlers/public/status.rs - GET /, GET /health and the 404 fallback

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "BESQ production chart API",
        "version": version,
        "endpoints": {
            "login": "POST /login (public)",
            "manager": "GET /api/chart/manager?tanggal=YYYY-MM-DD (MANAGER)",
            "process": "GET /api/chart/process?tanggal=YYYY-MM-DD[&proses=] (MANAGER, LEADER)",
            "machine": "GET /api/chart/machine?tanggal=YYYY-MM-DD&no_mc= (MANAGER, LEADER, OPERATOR)",
            "machines": "GET /api/chart/machines[?tanggal=YYYY-MM-DD] (MANAGER, LEADER, OPERATOR)",
            "health": "GET /health (public)",
        }
    }))
}

/// Login needs the credential store; charts need the production database.
/// Either one missing reports 503.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let credentials = match DatabaseManager::health_check(state.users.pool()).await {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            tracing::error!("Credential store health check failed: {}", e);
            "unavailable".to_string()
        }
    };
    let production = match state.charts.ensure_available().await {
        Ok(()) => "ok".to_string(),
        Err(_) => "unavailable".to_string(),
    };

    let healthy = credentials == "ok" && production == "ok";
    let status = if healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (
        status,
        Json(json!({
            "status": if healthy { "ok" } else { "degraded" },
            "timestamp": now,
            "credential_store": credentials,
            "production_database": production,
        })),
    )
}

/// Router fallback for paths no route matches
pub async fn not_found() -> ApiError {
    ApiError::not_found("No such endpoint; see GET / for the list")
}
