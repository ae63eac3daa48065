use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub production: ProductionConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite URL of the local credential store
    pub credentials_url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub query_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionConfig {
    /// MySQL URL of the factory production database. `None` starts the
    /// server with charts reporting unavailable.
    pub url: Option<String>,
    pub event_table: String,
    pub standard_lot_table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    #[serde(skip_serializing)]
    pub seed_password: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set outside development")]
    MissingJwtSecret,

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.bind_host = v;
        }
        if let Some(port) = env::var("SERVER_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("CREDENTIALS_DATABASE_URL") {
            self.database.credentials_url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_QUERY_TIMEOUT_SECS") {
            self.database.query_timeout_secs = v.parse().unwrap_or(self.database.query_timeout_secs);
        }

        // Production source overrides
        if let Ok(v) = env::var("PRODUCTION_DATABASE_URL") {
            self.production.url = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Ok(v) = env::var("PRODUCTION_EVENT_TABLE") {
            self.production.event_table = v;
        }
        if let Ok(v) = env::var("PRODUCTION_STDLOT_TABLE") {
            self.production.standard_lot_table = v;
        }

        // API overrides
        if let Ok(v) = env::var("API_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SEED_DEFAULT_PASSWORD") {
            self.security.seed_password = Some(v);
        }

        self
    }

    /// Checks the settings that cannot be defaulted safely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() && self.environment != Environment::Development {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.database.credentials_url.trim().is_empty() {
            return Err(ConfigError::Empty("CREDENTIALS_DATABASE_URL"));
        }
        if self.production.event_table.is_empty() {
            return Err(ConfigError::Empty("PRODUCTION_EVENT_TABLE"));
        }
        if self.production.standard_lot_table.is_empty() {
            return Err(ConfigError::Empty("PRODUCTION_STDLOT_TABLE"));
        }
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind_host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                credentials_url: "sqlite://besq.db".to_string(),
                max_connections: 5,
                connection_timeout: 5,
                query_timeout_secs: 30,
            },
            production: ProductionConfig {
                url: Some("mysql://root@127.0.0.1:3306/factory_db".to_string()),
                event_table: "vtrx_lwp_prs".to_string(),
                standard_lot_table: "v_stdlot".to_string(),
            },
            api: ApiConfig {
                request_timeout_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:5173".to_string()],
                jwt_secret: String::new(),
                seed_password: Some("123456".to_string()),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                bind_host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                credentials_url: "sqlite://besq.db".to_string(),
                max_connections: 10,
                connection_timeout: 5,
                query_timeout_secs: 20,
            },
            production: ProductionConfig {
                url: None,
                event_table: "vtrx_lwp_prs".to_string(),
                standard_lot_table: "v_stdlot".to_string(),
            },
            api: ApiConfig {
                request_timeout_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: Vec::new(),
                jwt_secret: String::new(),
                seed_password: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                bind_host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                credentials_url: "sqlite://besq.db".to_string(),
                max_connections: 20,
                connection_timeout: 3,
                query_timeout_secs: 15,
            },
            production: ProductionConfig {
                url: None,
                event_table: "vtrx_lwp_prs".to_string(),
                standard_lot_table: "v_stdlot".to_string(),
            },
            api: ApiConfig {
                request_timeout_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: Vec::new(),
                jwt_secret: String::new(),
                seed_password: None,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
