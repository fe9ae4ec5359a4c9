pub mod tracing;

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Output format of the log subscriber
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per event, for log aggregation
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`, falling back to JSON when `APP_ENV=production`
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var("LOG_FORMAT") {
            Ok(raw) if !raw.trim().is_empty() => {
                raw.parse().map_err(|details| ConfigError::ParseError {
                    key: "LOG_FORMAT".to_string(),
                    details,
                })
            }
            _ => {
                let app_env = env::var("APP_ENV").unwrap_or_default();
                if app_env.eq_ignore_ascii_case("production") {
                    Ok(LogFormat::Json)
                } else {
                    Ok(LogFormat::Pretty)
                }
            }
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, LogFormat::Json)
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected pretty or json)", other)),
        }
    }
}
