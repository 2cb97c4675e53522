//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use pantry_core::{PantryError, PantryResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "PANTRY";

/// Layered configuration loader.
///
/// Sources are applied in order, later ones overriding earlier ones:
/// 1. `{dir}/default.toml`
/// 2. `{dir}/{environment}.toml`
/// 3. `{dir}/local.toml` (not committed)
/// 4. Environment variables, e.g. `PANTRY_DATABASE__URL`
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    env_prefix: String,
    environment: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader reading files from `config_dir`.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            env_prefix: ENV_PREFIX.to_string(),
            environment: None,
        }
    }

    /// Creates a loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Overrides the environment variable prefix.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Selects the environment file explicitly instead of reading
    /// `{PREFIX}_ENVIRONMENT`.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> PantryResult<AppConfig> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = self.environment.clone().unwrap_or_else(|| {
            std::env::var(format!("{}_ENVIRONMENT", self.env_prefix))
                .unwrap_or_else(|_| "development".to_string())
        });

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{name}.toml"));
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins"),
        );

        let config = builder.build().map_err(config_error_to_pantry_error)?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_pantry_error)?;
        app_config.app.environment = environment;

        ConfigValidator::validate(&app_config)
            .map_err(|errors| PantryError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }
}

/// Loads configuration from `./config` and the process environment.
pub fn load_config() -> PantryResult<AppConfig> {
    ConfigLoader::from_default_location().load()
}

fn config_error_to_pantry_error(err: ConfigError) -> PantryError {
    PantryError::Configuration(err.to_string())
}
