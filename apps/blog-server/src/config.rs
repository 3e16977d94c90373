//! Application configuration loaded from environment variables.

use std::env;

use campus_core::domain::DEFAULT_PER_PAGE;
use campus_infra::JwtConfig;
use campus_infra::database::DatabaseConfig;

use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub posts_per_page: u64,
    pub telemetry: TelemetryConfig,
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut db = DatabaseConfig::new(url);
            if let Some(max) = parsed("DB_MAX_CONNECTIONS") {
                db.max_connections = max;
            }
            if let Some(min) = parsed("DB_MIN_CONNECTIONS") {
                db.min_connections = min;
            }
            db
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            jwt: JwtConfig::from_env(),
            posts_per_page: parsed("POSTS_PER_PAGE").unwrap_or(DEFAULT_PER_PAGE),
            telemetry: TelemetryConfig::from_env(),
        }
    }
}
