//! Text form inputs and their validation into a pricing request

use crate::contract::{ContractRequest, FeeSchedule, StorageEvent, StorageFeeBasis};
use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format for contract event dates
pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator for multiple events in one field
pub const LIST_SEPARATOR: char = ';';

/// The labeled text fields of the pricing form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    InjectionDates,
    InjectionVolumes,
    WithdrawalDates,
    WithdrawalVolumes,
    StorageFee,
    InjectionFee,
    WithdrawalFee,
    MaxStorage,
}

impl FormField {
    /// Fields in the order they are presented
    pub const ALL: [FormField; 8] = [
        FormField::InjectionDates,
        FormField::InjectionVolumes,
        FormField::WithdrawalDates,
        FormField::WithdrawalVolumes,
        FormField::StorageFee,
        FormField::InjectionFee,
        FormField::WithdrawalFee,
        FormField::MaxStorage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::InjectionDates => "Injection Date (YYYY-MM-DD)",
            FormField::InjectionVolumes => "Injection Volume (MMBtu)",
            FormField::WithdrawalDates => "Withdrawal Date (YYYY-MM-DD)",
            FormField::WithdrawalVolumes => "Withdrawal Volume (MMBtu)",
            FormField::StorageFee => "Storage Monthly Fee ($/MMBtu/Month)",
            FormField::InjectionFee => "Injection Fee ($/MMBtu)",
            FormField::WithdrawalFee => "Withdrawal Fee ($/MMBtu)",
            FormField::MaxStorage => "Max Storage (MMBtu)",
        }
    }

    /// Short name used in error messages
    fn name(&self) -> &'static str {
        match self {
            FormField::InjectionDates => "injection date",
            FormField::InjectionVolumes => "injection volume",
            FormField::WithdrawalDates => "withdrawal date",
            FormField::WithdrawalVolumes => "withdrawal volume",
            FormField::StorageFee => "storage monthly fee",
            FormField::InjectionFee => "injection fee",
            FormField::WithdrawalFee => "withdrawal fee",
            FormField::MaxStorage => "max storage",
        }
    }
}

/// Raw text of every form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractForm {
    pub injection_dates: String,
    pub injection_volumes: String,
    pub withdrawal_dates: String,
    pub withdrawal_volumes: String,
    pub storage_fee: String,
    pub injection_fee: String,
    pub withdrawal_fee: String,
    pub max_storage: String,
    pub storage_fee_basis: StorageFeeBasis,
}

impl Default for ContractForm {
    fn default() -> Self {
        Self {
            injection_dates: "2023-06-01".to_string(),
            injection_volumes: "200000".to_string(),
            withdrawal_dates: "2023-12-01".to_string(),
            withdrawal_volumes: "200000".to_string(),
            storage_fee: "0.02".to_string(),
            injection_fee: "0.10".to_string(),
            withdrawal_fee: "0.05".to_string(),
            max_storage: "600000".to_string(),
            storage_fee_basis: StorageFeeBasis::PerUnit,
        }
    }
}

impl ContractForm {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::InjectionDates => &self.injection_dates,
            FormField::InjectionVolumes => &self.injection_volumes,
            FormField::WithdrawalDates => &self.withdrawal_dates,
            FormField::WithdrawalVolumes => &self.withdrawal_volumes,
            FormField::StorageFee => &self.storage_fee,
            FormField::InjectionFee => &self.injection_fee,
            FormField::WithdrawalFee => &self.withdrawal_fee,
            FormField::MaxStorage => &self.max_storage,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::InjectionDates => &mut self.injection_dates,
            FormField::InjectionVolumes => &mut self.injection_volumes,
            FormField::WithdrawalDates => &mut self.withdrawal_dates,
            FormField::WithdrawalVolumes => &mut self.withdrawal_volumes,
            FormField::StorageFee => &mut self.storage_fee,
            FormField::InjectionFee => &mut self.injection_fee,
            FormField::WithdrawalFee => &mut self.withdrawal_fee,
            FormField::MaxStorage => &mut self.max_storage,
        }
    }

    /// Validate every field and build the pricing request
    pub fn parse(&self) -> Result<ContractRequest, ValidationError> {
        let injections = self.parse_events(FormField::InjectionDates, FormField::InjectionVolumes)?
            .into_iter()
            .map(|(d, v)| StorageEvent::injection(d, v))
            .collect();
        let withdrawals = self.parse_events(FormField::WithdrawalDates, FormField::WithdrawalVolumes)?
            .into_iter()
            .map(|(d, v)| StorageEvent::withdrawal(d, v))
            .collect();

        let fees = FeeSchedule {
            monthly_storage_fee: parse_number(FormField::StorageFee, &self.storage_fee)?,
            injection_fee_per_unit: parse_number(FormField::InjectionFee, &self.injection_fee)?,
            withdrawal_fee_per_unit: parse_number(FormField::WithdrawalFee, &self.withdrawal_fee)?,
            max_storage_capacity: parse_number(FormField::MaxStorage, &self.max_storage)?,
            storage_fee_basis: self.storage_fee_basis,
        };

        let request = ContractRequest { injections, withdrawals, fees };
        request.validate()?;
        Ok(request)
    }

    fn parse_events(
        &self,
        dates_field: FormField,
        volumes_field: FormField,
    ) -> Result<Vec<(NaiveDate, f64)>, ValidationError> {
        let dates = split_list(self.field(dates_field));
        let volumes = split_list(self.field(volumes_field));
        if dates.len() != volumes.len() {
            return Err(ValidationError::MismatchedLists {
                dates: dates_field.name().to_string(),
                volumes: volumes_field.name().to_string(),
                date_count: dates.len(),
                volume_count: volumes.len(),
            });
        }

        dates
            .iter()
            .zip(volumes.iter())
            .map(|(d, v)| -> Result<(NaiveDate, f64), ValidationError> {
                Ok((parse_date(dates_field, d)?, parse_number(volumes_field, v)?))
            })
            .collect()
    }
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_date(field: FormField, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), EVENT_DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field: field.name().to_string(),
        value: raw.to_string(),
    })
}

fn parse_number(field: FormField, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw.trim().parse().map_err(|_| ValidationError::InvalidNumber {
        field: field.name().to_string(),
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field: field.name().to_string() });
    }
    Ok(value)
}
