//! Price forecasting from the historical series

mod model;

pub use model::{FitSummary, ForecastConfig, TrendSeasonalityModel};

use chrono::NaiveDate;

/// Source of price estimates for arbitrary dates.
///
/// Dates before, inside or after the fitted history are all valid; the
/// implementation extrapolates rather than failing.
pub trait PriceForecaster {
    fn price_at(&self, date: NaiveDate) -> f64;
}

impl<T: PriceForecaster + ?Sized> PriceForecaster for &T {
    fn price_at(&self, date: NaiveDate) -> f64 {
        (**self).price_at(date)
    }
}
