//! Server configuration from environment variables.

use std::env;
use std::str::FromStr;

use blogicum_infra::database::DatabaseConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` when `DATABASE_URL` is unset; the server then runs on the
    /// in-memory store.
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("PORT", 8080),
            database: env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
                url,
                max_connections: env_or("DB_MAX_CONNECTIONS", 100),
                min_connections: env_or("DB_MIN_CONNECTIONS", 10),
            }),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
