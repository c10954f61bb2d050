//! Contract valuation over a single injection/withdrawal schedule

use super::events::{ContractRequest, Direction};
use super::inventory::InventoryState;
use super::ledger::{ContractResult, LedgerRow};
use crate::error::PricingError;
use crate::forecast::PriceForecaster;
use log::{debug, warn};

/// Prices contracts against a forecaster
pub struct ContractPricer<F> {
    forecaster: F,
}

impl<F: PriceForecaster> ContractPricer<F> {
    pub fn new(forecaster: F) -> Self {
        Self { forecaster }
    }

    /// Value a contract: withdrawal revenue minus purchase cost, event fees and storage.
    ///
    /// Events are walked in date order. Storage accrues between consecutive
    /// events on the inventory held over that interval.
    pub fn price(&self, request: &ContractRequest) -> Result<ContractResult, PricingError> {
        request.validate()?;

        let fees = &request.fees;
        let mut state = InventoryState::new();
        let mut result = ContractResult::new();

        for event in request.schedule() {
            let (months_held, storage_cost) = state.accrue_storage(event.date, fees);
            let price = self.forecaster.price_at(event.date);

            let (gas_value, event_fee) = match event.direction {
                Direction::Injection => {
                    state.inject(&event, fees.max_storage_capacity)?;
                    (-price * event.volume, fees.injection_fee_per_unit * event.volume)
                }
                Direction::Withdrawal => {
                    state.withdraw(&event)?;
                    (price * event.volume, fees.withdrawal_fee_per_unit * event.volume)
                }
            };

            let row = LedgerRow {
                date: event.date,
                direction: event.direction,
                volume: event.volume,
                price,
                gas_value,
                event_fee,
                months_held,
                storage_cost,
                inventory_after: state.inventory,
                net_cashflow: gas_value - event_fee - storage_cost,
            };
            debug!(
                "{} {:?} {:.2} @ {:.4}: cashflow {:.2}, inventory {:.2}",
                row.date, row.direction, row.volume, row.price, row.net_cashflow, row.inventory_after
            );
            result.add_row(row);
        }

        if result.final_inventory > 0.0 {
            warn!(
                "{:.2} units remain in storage after the last withdrawal and are not valued",
                result.final_inventory
            );
        }

        Ok(result)
    }
}
