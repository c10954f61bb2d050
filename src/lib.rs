//! Gas Storage Pricer - net value of natural gas storage contracts
//!
//! This library provides:
//! - Historical price loading from Dates/Prices CSV files
//! - An additive trend + yearly seasonality price forecaster
//! - Contract valuation over injection/withdrawal schedules with fees and capacity
//! - A read-only pricing service and an interactive front end

pub mod config;
pub mod contract;
pub mod error;
pub mod forecast;
pub mod frontend;
pub mod history;
pub mod input;
pub mod service;

// Re-export commonly used types
pub use contract::{ContractPricer, ContractRequest, ContractResult, FeeSchedule, StorageEvent, StorageFeeBasis};
pub use error::{PricingError, ValidationError};
pub use forecast::{ForecastConfig, PriceForecaster, TrendSeasonalityModel};
pub use history::{PriceHistory, PriceObservation};
pub use input::ContractForm;
pub use service::PricingService;
