//! Configuration validation module.
//!
//! Provides comprehensive validation for all configuration values,
//! failing fast on invalid configuration rather than at runtime.

use crate::AppConfig;
use std::fmt;
use std::fmt::Write as _;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Sampling ratio must be between 0.0 and 1.0.
    InvalidSamplingRatio { value: f64 },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// A count that must be at least one is zero.
    ZeroValue { name: String },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {name}: {value} (must be 1-65535)")
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({min}) cannot be greater than max ({max})"
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {value} exceeds maximum allowed ({maximum})")
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {url_type} URL: {message}")
            }
            Self::InvalidSamplingRatio { value } => {
                write!(
                    f,
                    "Invalid sampling ratio: {value} (must be between 0.0 and 1.0)"
                )
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout '{name}' must be positive, got {value}")
            }
            Self::ZeroValue { name } => write!(f, "'{name}' must be at least 1"),
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{value}' (valid: trace, debug, info, warn, error)"
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] =
        &["trace", "debug", "info", "warn", "error", "off"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(&config.server, &mut errors);
        Self::validate_database(&config.database, &mut errors);
        Self::validate_redis(&config.redis, &mut errors);
        Self::validate_cache(&config.cache, &mut errors);
        Self::validate_rate_limit(&config.rate_limit, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(config: &crate::ServerConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.port == 0 {
            errors.push(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: config.port,
            });
        }

        if config.request_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "server.request_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_database(config: &crate::DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.url.is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else if !config.url.starts_with("postgres://")
            && !config.url.starts_with("postgresql://")
        {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL must start with postgres:// or postgresql://".to_string(),
            });
        }

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
                value: 0,
            });
        }
        if config.idle_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.idle_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_redis(config: &crate::RedisConfig, errors: &mut Vec<ConfigValidationError>) {
        if !config.enabled {
            return;
        }

        if !config.url.starts_with("redis://") && !config.url.starts_with("rediss://") {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            });
        }

        if config.pool_size > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
    }

    fn validate_cache(config: &crate::CacheConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.ttl_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "cache.ttl_secs".to_string(),
                value: 0,
            });
        }
        if config.read_attempts == 0 {
            errors.push(ConfigValidationError::ZeroValue {
                name: "cache.read_attempts".to_string(),
            });
        }
    }

    fn validate_rate_limit(
        config: &crate::RateLimitConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        if config.enabled && config.requests_per_minute == 0 {
            errors.push(ConfigValidationError::ZeroValue {
                name: "rate_limit.requests_per_minute".to_string(),
            });
        }
    }

    fn validate_observability(
        config: &crate::ObservabilityConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        // Each directive is either `level` or `target=level`.
        let valid_level = config.log_level.split(',').all(|directive| {
            let level = directive.rsplit('=').next().unwrap_or_default().trim();
            Self::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str())
        });
        if !valid_level {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }

        if !(0.0..=1.0).contains(&config.sampling_ratio) {
            errors.push(ConfigValidationError::InvalidSamplingRatio {
                value: config.sampling_ratio,
            });
        }

        if let Some(ref endpoint) = config.otlp_endpoint {
            if Url::parse(endpoint).is_err() {
                errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "otlp_endpoint".to_string(),
                    message: format!("Invalid URL format: {endpoint}"),
                });
            }
        }
    }
}

/// Formats validation errors for display.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        let _ = writeln!(output, "  {}. {}", i + 1, error);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_passes() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidPort { name, .. } if name == "server.port"
        )));
    }

    #[test]
    fn test_invalid_pool_size() {
        let mut config = AppConfig::default();
        config.database.min_connections = 100;
        config.database.max_connections = 10;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidPoolSize { .. })));
    }

    #[test]
    fn test_database_url_must_be_postgres() {
        let mut config = AppConfig::default();
        config.database.url = "mysql://localhost/pantry".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidUrl { url_type, .. } if url_type == "database"
        )));
    }

    #[test]
    fn test_empty_database_url() {
        let mut config = AppConfig::default();
        config.database.url = String::new();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_invalid_redis_url_only_checked_when_enabled() {
        let mut config = AppConfig::default();
        config.redis.url = "http://localhost:6379".to_string();
        assert!(ConfigValidator::validate(&config).is_err());

        config.redis.enabled = false;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_cache_settings() {
        let mut config = AppConfig::default();
        config.cache.ttl_secs = 0;
        config.cache.read_attempts = 0;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_zero_rate_limit() {
        let mut config = AppConfig::default();
        config.rate_limit.requests_per_minute = 0;
        assert!(ConfigValidator::validate(&config).is_err());

        config.rate_limit.enabled = false;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_log_level_directives() {
        let mut config = AppConfig::default();
        config.observability.log_level = "warn,pantry=trace".to_string();
        assert!(ConfigValidator::validate(&config).is_ok());

        config.observability.log_level = "loud".to_string();
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidLogLevel { .. })));
    }

    #[test]
    fn test_invalid_sampling_ratio() {
        let mut config = AppConfig::default();
        config.observability.sampling_ratio = 1.5;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_multiple_errors() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        config.database.min_connections = 100;
        config.database.max_connections = 10;
        config.cache.read_attempts = 0;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }

    #[test]
    fn test_format_validation_errors() {
        let errors = vec![
            ConfigValidationError::ZeroValue {
                name: "cache.read_attempts".to_string(),
            },
            ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: 0,
            },
        ];

        let output = format_validation_errors(&errors);
        assert!(output.contains("cache.read_attempts"));
        assert!(output.contains("Invalid port"));
    }
}
