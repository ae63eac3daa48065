use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthError, Claims, JwtKeys, Role};
use crate::error::ApiError;

/// Authenticated caller, available to handlers as `Extension<AuthUser>`
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: String,
    pub department: Option<String>,
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role,
            department: claims.department,
            username: claims.username,
        }
    }
}

/// Middleware state: the verification key plus the roles one route accepts
#[derive(Clone)]
pub struct RoleGate {
    keys: Arc<JwtKeys>,
    allowed: &'static [Role],
}

impl RoleGate {
    pub fn new(keys: Arc<JwtKeys>, allowed: &'static [Role]) -> Self {
        Self { keys, allowed }
    }

    /// Verify the bearer token and check its role against the allow-list.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let token = extract_bearer(headers)?;
        let claims = self.keys.verify(token)?;

        if !self.allowed.iter().any(|role| role.as_str() == claims.role) {
            tracing::debug!("User '{}' with role '{}' denied", claims.username, claims.role);
            return Err(AuthError::Forbidden(claims.role));
        }

        Ok(AuthUser::from(claims))
    }
}

/// JWT + role middleware for protected routes
pub async fn role_gate(
    State(gate): State<RoleGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = gate.authorize(request.headers())?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::MissingToken("Invalid Authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err(AuthError::MissingToken("Empty bearer token")),
        None => Err(AuthError::MissingToken("Authorization header must use Bearer token format")),
    }
}
