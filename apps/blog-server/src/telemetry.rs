//! Tracing subscriber setup for the blog server.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,blog_server=debug,campus_core=debug,campus_infra=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// `RUST_ENV`, reported once at startup.
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            environment: "development".to_string(),
        }
    }
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `LOG_FORMAT=json|pretty` wins; otherwise production logs JSON.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = lookup("RUST_ENV").unwrap_or_else(|| "development".to_string());
        let format = match lookup("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            _ if environment == "production" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        Self {
            format,
            environment,
        }
    }
}

/// Install the global tracing subscriber.
pub fn init_telemetry(config: &TelemetryConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
    }

    tracing::info!(
        environment = %config.environment,
        format = ?config.format,
        "Telemetry initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> TelemetryConfig {
        TelemetryConfig::from_lookup(|key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn test_defaults_to_pretty_in_development() {
        let config = config(&[]);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_production_logs_json_unless_overridden() {
        assert_eq!(config(&[("RUST_ENV", "production")]).format, LogFormat::Json);
        assert_eq!(
            config(&[("RUST_ENV", "production"), ("LOG_FORMAT", "pretty")]).format,
            LogFormat::Pretty
        );
        assert_eq!(config(&[("LOG_FORMAT", "JSON")]).format, LogFormat::Json);
    }
}
