use std::str::FromStr;
use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::{info, warn};

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Opens the two pools the service works with: the local SQLite credential
/// store and the external MySQL production database.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open (creating the file if needed) the credential store.
    pub async fn credentials_pool(url: &str, max_connections: u32) -> Result<SqlitePool, DatabaseError> {
        if url.trim().is_empty() {
            return Err(DatabaseError::ConfigMissing("CREDENTIALS_DATABASE_URL"));
        }

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        info!("Connected to credential store: {}", url);
        Ok(pool)
    }

    /// Connect to the production database. A failed connection is logged and
    /// yields `None` so login keeps working while charts report unavailable.
    pub async fn production_pool(
        url: Option<&str>,
        max_connections: u32,
        connection_timeout: Duration,
    ) -> Option<MySqlPool> {
        let Some(url) = url else {
            warn!("No production database configured; chart endpoints will answer 503");
            return None;
        };

        let result = MySqlPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(connection_timeout)
            .connect(url)
            .await;

        match result {
            Ok(pool) => {
                info!("Connected to production database (read-only): {}", Self::redact_url(url));
                Some(pool)
            }
            Err(e) => {
                warn!(
                    "Cannot reach production database {}: {}. Login stays available, charts will answer 503",
                    Self::redact_url(url),
                    e
                );
                None
            }
        }
    }

    /// Pings the credential store
    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Strip the password from a connection URL before it reaches the logs.
    pub fn redact_url(raw: &str) -> String {
        match url::Url::parse(raw) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.to_string()
            }
            Err(_) => "<unparseable url>".to_string(),
        }
    }

    /// Backtick-quote a MySQL identifier after checking it is a plain name.
    pub fn quote_identifier(name: &str) -> Result<String, DatabaseError> {
        if Self::is_valid_identifier(name) {
            Ok(format!("`{}`", name))
        } else {
            Err(DatabaseError::InvalidIdentifier(name.to_string()))
        }
    }

    fn is_valid_identifier(name: &str) -> bool {
        !name.is_empty()
            && name.len() <= 64
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
