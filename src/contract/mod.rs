//! Storage contract valuation

mod events;
mod inventory;
mod ledger;
mod pricer;

pub use events::{ContractRequest, Direction, FeeSchedule, StorageEvent, StorageFeeBasis};
pub use inventory::{months_between, InventoryState, DAYS_PER_MONTH};
pub use ledger::{ContractResult, LedgerRow};
pub use pricer::ContractPricer;
