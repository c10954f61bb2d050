//! Inventory tracking while walking the storage schedule

use super::events::{FeeSchedule, StorageEvent, StorageFeeBasis};
use crate::error::ScheduleError;
use chrono::NaiveDate;

/// Average month length in days
pub const DAYS_PER_MONTH: f64 = 365.25 / 12.0;

/// Relative slack on volume comparisons so decimal volumes that sum exactly
/// to the capacity or to the inventory are accepted
const VOLUME_TOLERANCE: f64 = 1e-12;

/// Fractional months from `from` to `to`
pub fn months_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_MONTH
}

/// Gas held in storage at a point in the schedule
#[derive(Debug, Clone, Default)]
pub struct InventoryState {
    /// Volume currently held
    pub inventory: f64,

    /// Date of the last processed event
    pub last_date: Option<NaiveDate>,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage cost for holding the current inventory until `date`.
    ///
    /// Returns (months elapsed, cost). Nothing accrues before the first event.
    pub fn accrue_storage(&self, date: NaiveDate, fees: &FeeSchedule) -> (f64, f64) {
        let Some(last) = self.last_date else {
            return (0.0, 0.0);
        };

        let months = months_between(last, date);
        let cost = match fees.storage_fee_basis {
            StorageFeeBasis::PerUnit => self.inventory * fees.monthly_storage_fee * months,
            StorageFeeBasis::Flat if self.inventory > 0.0 => fees.monthly_storage_fee * months,
            StorageFeeBasis::Flat => 0.0,
        };
        (months, cost)
    }

    /// Add an injection, enforcing the capacity limit
    pub fn inject(&mut self, event: &StorageEvent, capacity: f64) -> Result<(), ScheduleError> {
        let filled = self.inventory + event.volume;
        if filled > capacity * (1.0 + VOLUME_TOLERANCE) {
            return Err(ScheduleError::CapacityExceeded {
                date: event.date,
                volume: event.volume,
                inventory: self.inventory,
                capacity,
            });
        }
        self.inventory = filled.min(capacity);
        self.last_date = Some(event.date);
        Ok(())
    }

    /// Remove a withdrawal, refusing to go below zero
    pub fn withdraw(&mut self, event: &StorageEvent) -> Result<(), ScheduleError> {
        if event.volume > self.inventory * (1.0 + VOLUME_TOLERANCE) {
            return Err(ScheduleError::InsufficientInventory {
                date: event.date,
                volume: event.volume,
                inventory: self.inventory,
            });
        }
        let remaining = self.inventory - event.volume;
        // Rounding dust from decimal volumes counts as empty
        self.inventory = if remaining <= event.volume * VOLUME_TOLERANCE {
            0.0
        } else {
            remaining
        };
        self.last_date = Some(event.date);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_months_between() {
        assert_relative_eq!(months_between(date(2023, 1, 1), date(2024, 1, 1)), 365.0 / DAYS_PER_MONTH);
        assert_eq!(months_between(date(2023, 6, 1), date(2023, 6, 1)), 0.0);
        assert!(months_between(date(2023, 6, 1), date(2023, 12, 1)) > 5.9);
    }

    #[test]
    fn test_capacity_and_inventory_limits() {
        let mut state = InventoryState::new();
        state.inject(&StorageEvent::injection(date(2023, 6, 1), 80.0), 100.0).unwrap();

        let over = state.inject(&StorageEvent::injection(date(2023, 7, 1), 30.0), 100.0);
        assert!(matches!(over, Err(ScheduleError::CapacityExceeded { .. })));
        assert_eq!(state.inventory, 80.0);

        // Filling exactly to capacity is allowed
        state.inject(&StorageEvent::injection(date(2023, 7, 1), 20.0), 100.0).unwrap();

        let under = state.withdraw(&StorageEvent::withdrawal(date(2023, 8, 1), 150.0));
        assert!(matches!(under, Err(ScheduleError::InsufficientInventory { .. })));

        state.withdraw(&StorageEvent::withdrawal(date(2023, 8, 1), 100.0)).unwrap();
        assert_eq!(state.inventory, 0.0);
    }

    #[test]
    fn test_decimal_volumes_fill_exactly_to_capacity() {
        let mut state = InventoryState::new();
        state.inject(&StorageEvent::injection(date(2023, 6, 1), 0.1), 0.3).unwrap();
        state.inject(&StorageEvent::injection(date(2023, 7, 1), 0.2), 0.3).unwrap();
        assert!(state.inventory <= 0.3);

        let over = state.inject(&StorageEvent::injection(date(2023, 8, 1), 0.001), 0.3);
        assert!(matches!(over, Err(ScheduleError::CapacityExceeded { .. })));
    }

    #[test]
    fn test_decimal_volumes_empty_storage_exactly() {
        let mut state = InventoryState::new();
        state.inject(&StorageEvent::injection(date(2023, 6, 1), 0.3), 1.0).unwrap();
        state.withdraw(&StorageEvent::withdrawal(date(2023, 9, 1), 0.1)).unwrap();
        state.withdraw(&StorageEvent::withdrawal(date(2023, 12, 1), 0.2)).unwrap();
        assert_eq!(state.inventory, 0.0);

        let under = state.withdraw(&StorageEvent::withdrawal(date(2024, 1, 1), 1e-6));
        assert!(matches!(under, Err(ScheduleError::InsufficientInventory { .. })));
    }

    #[test]
    fn test_storage_accrual_by_basis() {
        let mut fees = FeeSchedule::free(1_000.0);
        fees.monthly_storage_fee = 0.5;

        let mut state = InventoryState::new();
        assert_eq!(state.accrue_storage(date(2023, 6, 1), &fees), (0.0, 0.0));

        state.inject(&StorageEvent::injection(date(2023, 1, 1), 100.0), 1_000.0).unwrap();
        let (months, cost) = state.accrue_storage(date(2024, 1, 1), &fees);
        assert_relative_eq!(cost, 100.0 * 0.5 * months);

        fees.storage_fee_basis = StorageFeeBasis::Flat;
        let (months, cost) = state.accrue_storage(date(2024, 1, 1), &fees);
        assert_relative_eq!(cost, 0.5 * months);

        state.withdraw(&StorageEvent::withdrawal(date(2024, 1, 1), 100.0)).unwrap();
        let (_, cost) = state.accrue_storage(date(2024, 6, 1), &fees);
        assert_eq!(cost, 0.0);
    }
}
