//! Storage events, fee schedule and the pricing request

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether gas goes into or out of storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Buy gas and put it into storage
    Injection,
    /// Take gas out of storage and sell it
    Withdrawal,
}

/// A dated injection or withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageEvent {
    pub date: NaiveDate,
    /// Volume in MMBtu, always positive
    pub volume: f64,
    pub direction: Direction,
}

impl StorageEvent {
    pub fn injection(date: NaiveDate, volume: f64) -> Self {
        Self { date, volume, direction: Direction::Injection }
    }

    pub fn withdrawal(date: NaiveDate, volume: f64) -> Self {
        Self { date, volume, direction: Direction::Withdrawal }
    }

    fn validate(&self, field: &str) -> Result<(), ValidationError> {
        if !self.volume.is_finite() {
            return Err(ValidationError::NonFinite { field: field.to_string() });
        }
        if self.volume <= 0.0 {
            return Err(ValidationError::NonPositiveVolume {
                field: field.to_string(),
                value: self.volume,
            });
        }
        Ok(())
    }
}

/// How the monthly storage fee is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StorageFeeBasis {
    /// $/unit/month on the inventory held
    #[default]
    PerUnit,
    /// $/month while any gas is held
    Flat,
}

/// Fees and the storage capacity limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub monthly_storage_fee: f64,
    pub injection_fee_per_unit: f64,
    pub withdrawal_fee_per_unit: f64,
    pub max_storage_capacity: f64,
    #[serde(default)]
    pub storage_fee_basis: StorageFeeBasis,
}

impl FeeSchedule {
    /// No fees, capacity only
    pub fn free(max_storage_capacity: f64) -> Self {
        Self {
            monthly_storage_fee: 0.0,
            injection_fee_per_unit: 0.0,
            withdrawal_fee_per_unit: 0.0,
            max_storage_capacity,
            storage_fee_basis: StorageFeeBasis::PerUnit,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let fees = [
            ("monthly storage fee", self.monthly_storage_fee),
            ("injection fee", self.injection_fee_per_unit),
            ("withdrawal fee", self.withdrawal_fee_per_unit),
        ];
        for (field, value) in fees {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { field: field.to_string() });
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeFee { field: field.to_string(), value });
            }
        }

        if !self.max_storage_capacity.is_finite() {
            return Err(ValidationError::NonFinite { field: "max storage capacity".to_string() });
        }
        if self.max_storage_capacity <= 0.0 {
            return Err(ValidationError::NonPositiveCapacity(self.max_storage_capacity));
        }
        Ok(())
    }
}

/// A single injection/withdrawal schedule to price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRequest {
    pub injections: Vec<StorageEvent>,
    pub withdrawals: Vec<StorageEvent>,
    pub fees: FeeSchedule,
}

impl ContractRequest {
    /// Build a request from dated volumes
    pub fn new(
        injections: &[(NaiveDate, f64)],
        withdrawals: &[(NaiveDate, f64)],
        fees: FeeSchedule,
    ) -> Self {
        Self {
            injections: injections.iter().map(|&(d, v)| StorageEvent::injection(d, v)).collect(),
            withdrawals: withdrawals.iter().map(|&(d, v)| StorageEvent::withdrawal(d, v)).collect(),
            fees,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.injections.is_empty() {
            return Err(ValidationError::NoInjections);
        }
        if self.withdrawals.is_empty() {
            return Err(ValidationError::NoWithdrawals);
        }
        for event in &self.injections {
            event.validate("injection volume")?;
        }
        for event in &self.withdrawals {
            event.validate("withdrawal volume")?;
        }
        self.fees.validate()
    }

    /// All events in date order; injections precede withdrawals on the same date
    pub fn schedule(&self) -> Vec<StorageEvent> {
        let mut events: Vec<StorageEvent> = self
            .injections
            .iter()
            .chain(self.withdrawals.iter())
            .copied()
            .collect();
        events.sort_by_key(|e| (e.date, e.direction));
        events
    }

    /// Copy of this request with every volume multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |events: &[StorageEvent]| -> Vec<StorageEvent> {
            events
                .iter()
                .map(|e| StorageEvent { volume: e.volume * factor, ..*e })
                .collect()
        };
        Self {
            injections: scale(&self.injections),
            withdrawals: scale(&self.withdrawals),
            fees: self.fees,
        }
    }
}
