//! Environment-driven settings for the data access layer.

use thiserror::Error;

pub const ENV_SUPPRESS_PROVIDER_STDOUT: &str = "ASHARE_SUPPRESS_PROVIDER_STDOUT";
pub const ENV_ROW_LIMIT: &str = "ASHARE_ROW_LIMIT";
pub const ENV_UTC_OFFSET_HOURS: &str = "ASHARE_UTC_OFFSET_HOURS";

/// Rows shown by table renderers when the caller sets no limit.
pub const DEFAULT_ROW_LIMIT: usize = 250;
/// China Standard Time.
pub const DEFAULT_UTC_OFFSET_HOURS: i8 = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a boolean (true/false/1/0), got '{value}'")]
    InvalidBool { name: &'static str, value: String },
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidRowLimit { name: &'static str, value: String },
    #[error("{name} must be a whole-hour offset between -12 and 14, got '{value}'")]
    InvalidUtcOffset { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataConfig {
    /// Silence stdout while the provider logs in and out.
    pub suppress_provider_stdout: bool,
    pub default_row_limit: usize,
    /// Offset used to decide which calendar day is "today".
    pub calendar_utc_offset_hours: i8,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            suppress_provider_stdout: true,
            default_row_limit: DEFAULT_ROW_LIMIT,
            calendar_utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }
}

impl DataConfig {
    /// Loads settings from `ASHARE_*` variables; absent values keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`DataConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_SUPPRESS_PROVIDER_STDOUT) {
            config.suppress_provider_stdout = parse_bool(ENV_SUPPRESS_PROVIDER_STDOUT, &value)?;
        }

        if let Some(value) = lookup(ENV_ROW_LIMIT) {
            config.default_row_limit = match value.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(ConfigError::InvalidRowLimit {
                        name: ENV_ROW_LIMIT,
                        value,
                    })
                }
            };
        }

        if let Some(value) = lookup(ENV_UTC_OFFSET_HOURS) {
            config.calendar_utc_offset_hours = match value.trim().parse::<i8>() {
                Ok(hours) if (-12..=14).contains(&hours) => hours,
                _ => {
                    return Err(ConfigError::InvalidUtcOffset {
                        name: ENV_UTC_OFFSET_HOURS,
                        value,
                    })
                }
            };
        }

        Ok(config)
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: value.to_owned(),
        }),
    }
}
