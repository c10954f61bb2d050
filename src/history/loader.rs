//! Load historical prices from a Dates/Prices CSV file

use super::{PriceHistory, PriceObservation};
use crate::error::DataError;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use log::debug;
use std::io::Read;
use std::path::Path;

/// Date format used by the price file, e.g. `10/31/20`
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%y";

/// Raw CSV row matching the price file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Dates")]
    dates: String,
    #[serde(rename = "Prices")]
    prices: f64,
}

impl CsvRow {
    fn to_observation(self, row: usize, date_format: &str) -> Result<PriceObservation, DataError> {
        let date = NaiveDate::parse_from_str(&self.dates, date_format).map_err(|_| {
            DataError::DateParse {
                row,
                value: self.dates.clone(),
                format: date_format.to_string(),
            }
        })?;

        if !self.prices.is_finite() {
            return Err(DataError::NonFinitePrice { row, value: self.prices });
        }

        Ok(PriceObservation::new(date, self.prices))
    }
}

/// Load the price history from a CSV file
pub fn load_prices<P: AsRef<Path>>(path: P, date_format: &str) -> Result<PriceHistory, DataError> {
    let path = path.as_ref();
    debug!("Loading price history from {}", path.display());
    let file = std::fs::File::open(path)?;
    load_prices_from_reader(file, date_format)
}

/// Load the price history from any reader (e.g., string buffer)
pub fn load_prices_from_reader<R: Read>(reader: R, date_format: &str) -> Result<PriceHistory, DataError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut observations = Vec::new();

    for (idx, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        observations.push(row.to_observation(idx + 1, date_format)?);
    }

    let history = PriceHistory::new(observations)?;
    debug!(
        "Loaded {} observations from {} to {}",
        history.len(),
        history.first_date(),
        history.last_date()
    );
    Ok(history)
}
