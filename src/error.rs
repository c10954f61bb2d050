//! Error types for loading, forecasting and pricing

use chrono::NaiveDate;
use thiserror::Error;

/// Problems with user-entered contract inputs
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate { field: String, value: String },
    #[error("{field}: '{value}' is not a number")]
    InvalidNumber { field: String, value: String },
    #[error("{field}: value must be finite")]
    NonFinite { field: String },
    #[error("{field}: volume must be greater than zero, got {value}")]
    NonPositiveVolume { field: String, value: f64 },
    #[error("{field}: fee cannot be negative, got {value}")]
    NegativeFee { field: String, value: f64 },
    #[error("max storage capacity must be greater than zero, got {0}")]
    NonPositiveCapacity(f64),
    #[error("{dates} has {date_count} entries but {volumes} has {volume_count}")]
    MismatchedLists {
        dates: String,
        volumes: String,
        date_count: usize,
        volume_count: usize,
    },
    #[error("at least one injection is required")]
    NoInjections,
    #[error("at least one withdrawal is required")]
    NoWithdrawals,
}

/// Problems with the historical price file
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read price file: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: cannot parse date '{value}' with format '{format}'")]
    DateParse {
        row: usize,
        value: String,
        format: String,
    },
    #[error("row {row}: price {value} is not finite")]
    NonFinitePrice { row: usize, value: f64 },
    #[error("price file contains no observations")]
    EmptyHistory,
    #[error("price file lists {0} more than once")]
    DuplicateDate(NaiveDate),
}

/// Schedule violations found while walking the storage events
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("injection of {volume} on {date} exceeds max storage of {capacity} (holding {inventory})")]
    CapacityExceeded {
        date: NaiveDate,
        volume: f64,
        inventory: f64,
        capacity: f64,
    },
    #[error("withdrawal of {volume} on {date} but only {inventory} in storage")]
    InsufficientInventory {
        date: NaiveDate,
        volume: f64,
        inventory: f64,
    },
}

/// Problems fitting the forecasting model
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("invalid forecast setting {name}: {reason}")]
    InvalidConfig { name: &'static str, reason: String },
    #[error("model fit is degenerate: normal equations are not positive definite")]
    Degenerate,
}

/// Problems loading the application configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("environment variable {name}='{value}' is invalid")]
    Env { name: &'static str, value: String },
}

/// Any failure surfaced by a pricing request
#[derive(Debug, Error)]
pub enum PricingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
}
