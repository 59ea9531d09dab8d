//! Application configuration.
//!
//! Loaded from an optional TOML file; every section and key falls back to a
//! default, and command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use loan_core::form::{DEFAULT_APR_OPTIONS, DEFAULT_NUM_PAYMENTS_OPTIONS, FormDefaults};
use loan_core::store::StoreConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "loan-estimator.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub form: FormConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                backend: "sqlite".to_string(),
                connection_string: "sqlite:loan.db".to_string(),
            },
            form: FormConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Selector options and the values the clear action returns to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub default_apr: String,
    pub default_num_payments: String,
    pub apr_options: Vec<String>,
    pub num_payments_options: Vec<String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        let defaults = FormDefaults::default();
        Self {
            default_apr: defaults.apr,
            default_num_payments: defaults.num_payments,
            apr_options: DEFAULT_APR_OPTIONS.iter().map(|s| s.to_string()).collect(),
            num_payments_options: DEFAULT_NUM_PAYMENTS_OPTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl FormConfig {
    pub fn defaults(&self) -> FormDefaults {
        FormDefaults {
            apr: self.default_apr.clone(),
            num_payments: self.default_num_payments.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or any `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    /// Append log records to this file as well.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} options must not be empty")]
    NoOptions(&'static str),

    #[error("default {field} '{value}' is not one of the options {options:?}")]
    DefaultNotAnOption {
        field: &'static str,
        value: String,
        options: Vec<String>,
    },
}

impl AppConfig {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read if present in the working directory, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reset defaults must be selectable, or clearing the form would leave a
    /// selector empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_default("APR", &self.form.default_apr, &self.form.apr_options)?;
        check_default(
            "number of payments",
            &self.form.default_num_payments,
            &self.form.num_payments_options,
        )
    }
}

fn check_default(
    field: &'static str,
    value: &str,
    options: &[String],
) -> Result<(), ConfigError> {
    if options.is_empty() {
        return Err(ConfigError::NoOptions(field));
    }
    if !options.iter().any(|o| o == value) {
        return Err(ConfigError::DefaultNotAnOption {
            field,
            value: value.to_string(),
            options: options.to_vec(),
        });
    }
    Ok(())
}
