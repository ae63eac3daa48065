use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `users` table in the credential store
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserCredential {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub department: Option<String>,
}

/// Input for inserting a credential; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub department: Option<String>,
}
