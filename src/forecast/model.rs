//! Additive trend + yearly seasonality price model
//!
//! The model is fitted once as a penalized least-squares problem:
//! - Trend: intercept, slope and piecewise-linear changepoint hinges
//! - Seasonality: yearly Fourier series on absolute day numbers
//!
//! Prices are scaled by their maximum magnitude and time by the history span,
//! so the penalties are comparable across data sets.

use super::PriceForecaster;
use crate::error::ForecastError;
use crate::history::PriceHistory;
use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use ndarray::{Array1, Array2};
use ndarray_linalg::cholesky::SolveC;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Days per seasonal cycle
const YEAR_DAYS: f64 = 365.25;

/// Ridge applied to every coefficient so the normal equations stay positive definite
const BASE_RIDGE: f64 = 1e-9;

/// Upper bound on `yearly_order`
pub const MAX_YEARLY_ORDER: usize = 50;

/// Upper bound on `n_changepoints`
pub const MAX_CHANGEPOINTS: usize = 200;

/// Settings for the trend + seasonality fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of yearly Fourier terms (each adds a sine and a cosine)
    pub yearly_order: usize,

    /// Maximum number of trend changepoints
    pub n_changepoints: usize,

    /// Fraction of the history in which changepoints may be placed
    pub changepoint_range: f64,

    /// Ridge penalty on changepoint slope adjustments
    pub changepoint_penalty: f64,

    /// Ridge penalty on Fourier coefficients
    pub seasonality_penalty: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            yearly_order: 4,
            n_changepoints: 5,
            changepoint_range: 0.8,
            changepoint_penalty: 0.5,
            seasonality_penalty: 0.01,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.yearly_order > MAX_YEARLY_ORDER {
            return Err(ForecastError::InvalidConfig {
                name: "yearly_order",
                reason: format!("must be at most {}, got {}", MAX_YEARLY_ORDER, self.yearly_order),
            });
        }
        if self.n_changepoints > MAX_CHANGEPOINTS {
            return Err(ForecastError::InvalidConfig {
                name: "n_changepoints",
                reason: format!("must be at most {}, got {}", MAX_CHANGEPOINTS, self.n_changepoints),
            });
        }
        if !self.changepoint_range.is_finite()
            || self.changepoint_range <= 0.0
            || self.changepoint_range > 1.0
        {
            return Err(ForecastError::InvalidConfig {
                name: "changepoint_range",
                reason: format!("must be in (0, 1], got {}", self.changepoint_range),
            });
        }
        if !self.changepoint_penalty.is_finite() || self.changepoint_penalty < 0.0 {
            return Err(ForecastError::InvalidConfig {
                name: "changepoint_penalty",
                reason: format!("must be finite and >= 0, got {}", self.changepoint_penalty),
            });
        }
        if !self.seasonality_penalty.is_finite() || self.seasonality_penalty < 0.0 {
            return Err(ForecastError::InvalidConfig {
                name: "seasonality_penalty",
                reason: format!("must be finite and >= 0, got {}", self.seasonality_penalty),
            });
        }
        Ok(())
    }
}

/// Summary of a fitted model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitSummary {
    pub observations: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub changepoints: Vec<NaiveDate>,
    pub yearly_order: usize,
    /// In-sample root mean squared error in price units
    pub rmse: f64,
}

/// Fitted additive trend + seasonality model
#[derive(Debug, Clone)]
pub struct TrendSeasonalityModel {
    start: NaiveDate,
    end: NaiveDate,
    span_days: f64,
    y_scale: f64,
    /// Changepoint locations in scaled time
    changepoints: Vec<f64>,
    changepoint_dates: Vec<NaiveDate>,
    yearly_order: usize,
    coefficients: Array1<f64>,
    observations: usize,
    rmse: f64,
}

impl TrendSeasonalityModel {
    /// Fit the model to a price history
    pub fn fit(history: &PriceHistory, config: &ForecastConfig) -> Result<Self, ForecastError> {
        config.validate()?;

        let obs = history.observations();
        let n = obs.len();
        let start = history.first_date();
        let end = history.last_date();
        let span_days = ((end - start).num_days() as f64).max(1.0);

        let y_scale = obs
            .iter()
            .map(|o| o.price.abs())
            .fold(0.0_f64, f64::max);
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };

        let changepoint_dates = select_changepoints(history, config);
        let changepoints: Vec<f64> = changepoint_dates
            .iter()
            .map(|d| (*d - start).num_days() as f64 / span_days)
            .collect();

        let mut model = Self {
            start,
            end,
            span_days,
            y_scale,
            changepoints,
            changepoint_dates,
            yearly_order: config.yearly_order,
            coefficients: Array1::zeros(0),
            observations: n,
            rmse: 0.0,
        };

        let p = model.n_features();
        let mut x = Array2::<f64>::zeros((n, p));
        let mut y = Array1::<f64>::zeros(n);
        for (i, o) in obs.iter().enumerate() {
            x.row_mut(i).assign(&model.features(o.date));
            y[i] = o.price / y_scale;
        }

        let mut xtx = x.t().dot(&x);
        let xty = x.t().dot(&y);
        for (j, penalty) in model.penalties(config).iter().enumerate() {
            xtx[[j, j]] += penalty;
        }

        model.coefficients = xtx.solvec(&xty).map_err(|e| {
            debug!("Cholesky solve failed: {}", e);
            ForecastError::Degenerate
        })?;

        let sse: f64 = obs
            .iter()
            .map(|o| (model.predict(o.date) - o.price).powi(2))
            .sum();
        model.rmse = (sse / n as f64).sqrt();

        info!(
            "Fitted price model on {} observations ({} to {}), {} changepoints, yearly order {}, rmse {:.4}",
            n,
            start,
            end,
            model.changepoints.len(),
            model.yearly_order,
            model.rmse
        );
        debug!("Model coefficients: {:?}", model.coefficients);

        Ok(model)
    }

    /// Point estimate of the price on a date
    pub fn predict(&self, date: NaiveDate) -> f64 {
        self.coefficients.dot(&self.features(date)) * self.y_scale
    }

    /// In-sample root mean squared error in price units
    pub fn fit_rmse(&self) -> f64 {
        self.rmse
    }

    pub fn summary(&self) -> FitSummary {
        FitSummary {
            observations: self.observations,
            first_date: self.start,
            last_date: self.end,
            changepoints: self.changepoint_dates.clone(),
            yearly_order: self.yearly_order,
            rmse: self.rmse,
        }
    }

    fn n_features(&self) -> usize {
        2 + self.changepoints.len() + 2 * self.yearly_order
    }

    /// Design row: [1, t, hinges..., sin/cos pairs...]
    fn features(&self, date: NaiveDate) -> Array1<f64> {
        let t = (date - self.start).num_days() as f64 / self.span_days;
        let mut row = Vec::with_capacity(self.n_features());

        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints.iter().map(|&c| (t - c).max(0.0)));

        let day = date.num_days_from_ce() as f64;
        for k in 1..=self.yearly_order {
            let angle = 2.0 * PI * k as f64 * day / YEAR_DAYS;
            row.push(angle.sin());
            row.push(angle.cos());
        }

        Array1::from(row)
    }

    fn penalties(&self, config: &ForecastConfig) -> Vec<f64> {
        let mut penalties = vec![BASE_RIDGE; 2];
        penalties.extend(std::iter::repeat(BASE_RIDGE + config.changepoint_penalty).take(self.changepoints.len()));
        penalties.extend(std::iter::repeat(BASE_RIDGE + config.seasonality_penalty).take(2 * self.yearly_order));
        penalties
    }
}

impl PriceForecaster for TrendSeasonalityModel {
    fn price_at(&self, date: NaiveDate) -> f64 {
        self.predict(date)
    }
}

/// Changepoints on observation dates spread evenly over the first part of the history
fn select_changepoints(history: &PriceHistory, config: &ForecastConfig) -> Vec<NaiveDate> {
    let obs = history.observations();
    let hist_size = (obs.len() as f64 * config.changepoint_range).floor() as usize;
    let count = config.n_changepoints.min(hist_size.saturating_sub(1));
    if count == 0 {
        return Vec::new();
    }

    let last = (hist_size - 1) as f64;
    let mut dates: Vec<NaiveDate> = (1..=count)
        .map(|i| {
            let idx = (last * i as f64 / count as f64).round() as usize;
            obs[idx].date
        })
        .collect();
    dates.dedup();
    dates
}
