use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::auth::{verify_password, AuthError, Claims, JwtKeys, Role};
use crate::database::UserRepository;

/// Result of a successful login, echoed to the client as-is.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub role: Role,
    pub department: Option<String>,
}

#[derive(Clone)]
pub struct Authenticator {
    users: UserRepository,
    keys: Arc<JwtKeys>,
}

impl Authenticator {
    pub fn new(users: UserRepository, keys: Arc<JwtKeys>) -> Self {
        Self { users, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!("Login rejected: unknown user '{}'", username);
            return Err(AuthError::NotFound);
        };

        // argon2 verification blocks for tens of milliseconds
        let password = password.to_string();
        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !matches {
            warn!("Login rejected: wrong password for '{}'", username);
            return Err(AuthError::InvalidCredential);
        }

        let role: Role = user.role.parse()?;
        let claims = Claims::new(user.id, role, user.department.clone(), user.username.clone());
        let token = self.keys.sign(&claims)?;

        info!("User '{}' logged in as {}", user.username, role);
        Ok(LoginOutcome { token, role, department: user.department })
    }
}
