//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.tracing.service_name, "unknown");
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn reads_tracing_section() {
        let config = parse_config(
            r#"
            [tracing]
            service_name = "service-a"
            port = 8080
            trace_id_128bit = true
            "#,
        )
        .unwrap();
        assert_eq!(config.tracing.service_name, "service-a");
        assert_eq!(config.tracing.port, 8080);
        assert!(config.tracing.trace_id_128bit);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = parse_config("[tracing]\nservice_name = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().contains("service_name"));
    }

    #[test]
    fn rejects_bad_toml() {
        assert!(matches!(parse_config("[tracing"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/zipkin.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
