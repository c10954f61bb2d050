//! Application configuration
//!
//! Settings come from built-in defaults, then an optional JSON file, then
//! environment variables:
//!   NAT_GAS_PRICES, NAT_GAS_DATE_FORMAT, NAT_GAS_YEARLY_ORDER, NAT_GAS_CHANGEPOINTS

use crate::error::ConfigError;
use crate::forecast::ForecastConfig;
use crate::history::DEFAULT_DATE_FORMAT;
use crate::input::ContractForm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the historical price file
pub const DEFAULT_PRICE_FILE: &str = "Nat_Gas.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Historical Dates/Prices CSV
    pub price_file: PathBuf,

    /// chrono format of the Dates column
    pub date_format: String,

    /// Forecast model settings
    pub forecast: ForecastConfig,

    /// Initial values of the pricing form
    pub form: ContractForm,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            price_file: PathBuf::from(DEFAULT_PRICE_FILE),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            forecast: ForecastConfig::default(),
            form: ContractForm::default(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file; missing keys keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("NAT_GAS_PRICES") {
            self.price_file = PathBuf::from(path);
        }
        if let Some(format) = lookup("NAT_GAS_DATE_FORMAT") {
            self.date_format = format;
        }
        if let Some(value) = lookup("NAT_GAS_YEARLY_ORDER") {
            self.forecast.yearly_order = parse_env("NAT_GAS_YEARLY_ORDER", value)?;
        }
        if let Some(value) = lookup("NAT_GAS_CHANGEPOINTS") {
            self.forecast.n_changepoints = parse_env("NAT_GAS_CHANGEPOINTS", value)?;
        }
        Ok(())
    }
}

fn parse_env(name: &'static str, value: String) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { name, value })
}
