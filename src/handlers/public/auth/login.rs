// handlers/public/auth/login.rs - POST /login handler

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::services::LoginOutcome;
use crate::state::AppState;

/// Fields are optional so a missing one becomes a 400 with field errors
/// instead of axum's default 422.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    fn into_credentials(self) -> Result<(String, String), ApiError> {
        let mut field_errors = HashMap::new();
        let username = self.username.filter(|u| !u.trim().is_empty());
        let password = self.password.filter(|p| !p.is_empty());

        if username.is_none() {
            field_errors.insert("username".to_string(), "This field is required".to_string());
        }
        if password.is_none() {
            field_errors.insert("password".to_string(), "This field is required".to_string());
        }

        match (username, password) {
            (Some(username), Some(password)) => Ok((username.trim().to_string(), password)),
            _ => Err(ApiError::validation_error("Missing required fields", Some(field_errors))),
        }
    }
}

/// POST /login - Authenticate and receive a 24h bearer token
///
/// Expected Input:
/// ```json
/// { "username": "leader_prs", "password": "..." }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI...", "role": "LEADER", "department": "PRESSING" }
/// ```
///
/// Unknown users and wrong passwords get the same 401 body.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginOutcome>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let (username, password) = payload.into_credentials()?;

    let outcome = state.authenticator.login(&username, &password).await?;
    Ok(Json(outcome))
}
