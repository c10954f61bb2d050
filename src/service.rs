//! Pricing service holding the fitted price model
//!
//! The model is fitted once from the price history, then shared read-only by
//! every pricing and forecast request.
//!
//! # Example
//! ```ignore
//! let service = PricingService::from_csv_path("Nat_Gas.csv", DEFAULT_DATE_FORMAT, &ForecastConfig::default())?;
//! let result = service.price(&request)?;
//! println!("Contract Value: {}", result.net_value);
//! ```

use crate::contract::{ContractPricer, ContractRequest, ContractResult};
use crate::error::PricingError;
use crate::forecast::{FitSummary, ForecastConfig, TrendSeasonalityModel};
use crate::history::{load_prices, PriceHistory, PriceObservation};
use chrono::{Months, NaiveDate};
use std::path::Path;

/// Read-only pricing service built around one fitted model
#[derive(Debug, Clone)]
pub struct PricingService {
    model: TrendSeasonalityModel,
}

impl PricingService {
    /// Fit the model to an already loaded history
    pub fn from_history(history: &PriceHistory, config: &ForecastConfig) -> Result<Self, PricingError> {
        Ok(Self {
            model: TrendSeasonalityModel::fit(history, config)?,
        })
    }

    /// Load the price file and fit the model
    pub fn from_csv_path<P: AsRef<Path>>(
        path: P,
        date_format: &str,
        config: &ForecastConfig,
    ) -> Result<Self, PricingError> {
        let history = load_prices(path, date_format)?;
        Self::from_history(&history, config)
    }

    /// Value a contract against the fitted model
    pub fn price(&self, request: &ContractRequest) -> Result<ContractResult, PricingError> {
        ContractPricer::new(&self.model).price(request)
    }

    /// Price estimate for a single date
    pub fn forecast(&self, date: NaiveDate) -> f64 {
        self.model.predict(date)
    }

    /// Estimates on `from` and every following month through `to`
    pub fn forecast_curve(&self, from: NaiveDate, to: NaiveDate) -> Vec<PriceObservation> {
        (0..)
            .map_while(|i| from.checked_add_months(Months::new(i)))
            .take_while(|d| *d <= to)
            .map(|d| PriceObservation::new(d, self.model.predict(d)))
            .collect()
    }

    pub fn fit_summary(&self) -> FitSummary {
        self.model.summary()
    }
}
