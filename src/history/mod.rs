//! Historical price series and CSV loading

pub mod loader;

pub use loader::{load_prices, load_prices_from_reader, DEFAULT_DATE_FORMAT};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A single observed price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    /// Currency per volume unit ($/MMBtu)
    pub price: f64,
}

impl PriceObservation {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Chronologically ordered price observations with unique dates
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    observations: Vec<PriceObservation>,
}

impl PriceHistory {
    /// Build a history from observations in any order.
    ///
    /// Rejects an empty series and repeated dates.
    pub fn new(mut observations: Vec<PriceObservation>) -> Result<Self, DataError> {
        if observations.is_empty() {
            return Err(DataError::EmptyHistory);
        }

        observations.sort_by_key(|o| o.date);
        if let Some(pair) = observations.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(DataError::DuplicateDate(pair[0].date));
        }

        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.observations[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].date
    }

    /// Exact observed price on a date, if the date is in the series
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|idx| self.observations[idx].price)
    }
}
