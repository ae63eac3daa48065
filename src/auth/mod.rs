use std::fmt;
use std::str::FromStr;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime of every issued token.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Manager,
    Leader,
    Operator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "MANAGER",
            Role::Leader => "LEADER",
            Role::Operator => "OPERATOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MANAGER" => Ok(Role::Manager),
            "LEADER" => Ok(Role::Leader),
            "OPERATOR" => Ok(Role::Operator),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// Role allow-lists for the chart endpoints. Each endpoint lists every
/// role it accepts; there is no implied hierarchy.
pub mod allow {
    use super::Role;

    pub const PLANT_OVERVIEW: &[Role] = &[Role::Manager];
    pub const PROCESS_VIEW: &[Role] = &[Role::Manager, Role::Leader];
    pub const MACHINE_DETAIL: &[Role] = &[Role::Manager, Role::Leader, Role::Operator];
    pub const MACHINE_LIST: &[Role] = &[Role::Manager, Role::Leader, Role::Operator];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    /// Kept as the raw string so the gate can reject unknown roles with 403
    pub role: String,
    #[serde(default)]
    pub department: Option<String>,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i64, role: Role, department: Option<String>, username: String) -> Self {
        Self::issued_at(user_id, role, department, username, Utc::now().timestamp())
    }

    pub fn issued_at(
        user_id: i64,
        role: Role,
        department: Option<String>,
        username: String,
        iat: i64,
    ) -> Self {
        Self {
            user_id,
            role: role.as_str().to_string(),
            department,
            username,
            iat,
            exp: iat + TOKEN_TTL_SECS,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user not found")]
    NotFound,

    #[error("password does not match")]
    InvalidCredential,

    #[error("missing bearer token: {0}")]
    MissingToken(&'static str),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("role '{0}' is not allowed here")]
    Forbidden(String),

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] crate::database::DatabaseError),
}

/// HS256 key pair derived from the shared secret
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verifies signature and expiry; a missing or non-string role fails decoding.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// A stored hash that does not parse is treated as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}
