//! Crate configuration.
//!
//! # Responsibility
//! - Hold DDL rendering options and table-option defaults.
//! - Hold logging backend options.
//! - Load both from JSON text or a JSON file.
//!
//! # Invariants
//! - Every field has a default, so an empty JSON object is a valid config.
//! - A config returned by `from_json_str`/`from_file` has passed `validate`.

use crate::error::ConfigError;
use crate::logging::{default_log_level, normalize_level};
use crate::schema::is_identifier;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ENGINE: &str = "InnoDB";
pub const DEFAULT_CHARSET: &str = "utf8mb4";
pub const DEFAULT_COLLATE: &str = "utf8mb4_unicode_ci";

const DEFAULT_MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_LOG_FILES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TablekitConfig {
    pub logging: LoggingConfig,
    pub schema: SchemaConfig,
}

impl TablekitConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|err| ConfigError::Invalid(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            ConfigError::Invalid(format!("failed to read `{}`: {err}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schema.validate()?;
        self.logging.validate()
    }
}

/// DDL rendering options and table-option defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Whether `ddl_of_create_table_default` emits `create or replace`.
    pub or_replace: bool,
    /// Joins DDL lines; `"\n"` or `"\r\n"`.
    pub line_separator: String,
    pub default_engine: String,
    pub default_charset: String,
    pub default_collate: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            or_replace: true,
            line_separator: "\n".to_string(),
            default_engine: DEFAULT_ENGINE.to_string(),
            default_charset: DEFAULT_CHARSET.to_string(),
            default_collate: DEFAULT_COLLATE.to_string(),
        }
    }
}

impl SchemaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.line_separator != "\n" && self.line_separator != "\r\n" {
            return Err(ConfigError::Invalid(format!(
                "line_separator must be \\n or \\r\\n, got {:?}",
                self.line_separator
            )));
        }
        for option in [
            &self.default_engine,
            &self.default_charset,
            &self.default_collate,
        ] {
            if !is_identifier(option) {
                return Err(ConfigError::InvalidIdentifier(option.clone()));
            }
        }
        Ok(())
    }
}

/// Logging backend options; see [`crate::logging::init_logging`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files; stderr when unset.
    pub log_dir: Option<PathBuf>,
    pub max_file_size_bytes: u64,
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
            max_file_size_bytes: DEFAULT_MAX_LOG_FILE_SIZE_BYTES,
            max_files: DEFAULT_MAX_LOG_FILES,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.level).map_err(ConfigError::Invalid)?;
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        if self.max_files == 0 || self.max_file_size_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_files and max_file_size_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
