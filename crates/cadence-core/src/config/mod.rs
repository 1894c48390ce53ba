use anyhow::Result;
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError};
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL, DEFAULT_MAX_ITERATIONS, DEFAULT_TIMEZONE, ENV_PREFIX,
};
use crate::error::{CoreError, CoreResult};

mod fields;

pub use fields::FieldMapping;


#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub recurrence: RecurrenceConfig,
    #[serde(default)]
    pub fields: FieldMapping,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceConfig {
    /// Timezone applied to rules that do not carry their own.
    pub default_timezone: String,
    /// Safety ceiling on cursor steps for one expansion.
    pub max_iterations: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, an optional `cadence.{toml,json,yaml}` file
    /// and `CADENCE__*` environment variables into a `Settings`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating it fails.
    pub fn load() -> Result<Self> {
        let settings = with_defaults(Config::builder())?
            // TOML/JSON/YAML file
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            // Env
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Loads settings from an in-memory TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if the document cannot be parsed or
    /// deserialized, and `CoreError::InvalidConfiguration` if validation fails.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let settings = with_defaults(Config::builder())
            .map_err(|e| CoreError::ConfigError(e.to_string()))?
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize::<Settings>())
            .map_err(|e| CoreError::ConfigError(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks values that deserialize fine but cannot be used.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` for an empty default timezone,
    /// a zero iteration ceiling, or an invalid field mapping.
    pub fn validate(&self) -> CoreResult<()> {
        if self.recurrence.default_timezone.trim().is_empty() {
            return Err(CoreError::InvalidConfiguration(
                "recurrence.default_timezone must not be empty".to_string(),
            ));
        }
        if self.recurrence.max_iterations == 0 {
            return Err(CoreError::InvalidConfiguration(
                "recurrence.max_iterations must be at least 1".to_string(),
            ));
        }
        self.fields.validate()
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> std::result::Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("recurrence.default_timezone", DEFAULT_TIMEZONE)?
        .set_default("recurrence.max_iterations", DEFAULT_MAX_ITERATIONS)?
        .set_default("logging.level", DEFAULT_LOG_LEVEL)
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(
        default_timezone = %settings.recurrence.default_timezone,
        max_iterations = settings.recurrence.max_iterations,
        "Settings loaded"
    );
    Ok(settings)
}
