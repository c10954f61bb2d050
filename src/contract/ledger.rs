//! Per-event ledger and the contract valuation result

use super::events::Direction;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One processed storage event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub date: NaiveDate,
    pub direction: Direction,
    pub volume: f64,

    /// Forecast price used for the event
    pub price: f64,

    /// Gas bought (negative) or sold (positive) at the forecast price
    pub gas_value: f64,

    /// Injection or withdrawal fee paid
    pub event_fee: f64,

    /// Months since the previous event
    pub months_held: f64,

    /// Storage cost accrued since the previous event
    pub storage_cost: f64,

    /// Inventory after the event
    pub inventory_after: f64,

    /// gas_value - event_fee - storage_cost
    pub net_cashflow: f64,
}

/// Net value of a contract with its breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractResult {
    pub net_value: f64,
    pub sale_revenue: f64,
    pub purchase_cost: f64,
    pub injection_fees: f64,
    pub withdrawal_fees: f64,
    pub storage_cost: f64,
    pub final_inventory: f64,
    pub ledger: Vec<LedgerRow>,
}

impl ContractResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a ledger row and roll it into the totals
    pub fn add_row(&mut self, row: LedgerRow) {
        match row.direction {
            Direction::Injection => {
                self.purchase_cost += -row.gas_value;
                self.injection_fees += row.event_fee;
            }
            Direction::Withdrawal => {
                self.sale_revenue += row.gas_value;
                self.withdrawal_fees += row.event_fee;
            }
        }
        self.storage_cost += row.storage_cost;
        self.net_value += row.net_cashflow;
        self.final_inventory = row.inventory_after;
        self.ledger.push(row);
    }

    /// Total fees of every kind
    pub fn total_fees(&self) -> f64 {
        self.injection_fees + self.withdrawal_fees + self.storage_cost
    }
}
