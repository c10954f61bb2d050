//! End-to-end properties of contract valuation against a fitted price model

use approx::{assert_abs_diff_eq, assert_relative_eq};
use chrono::{Datelike, Months, NaiveDate};
use gas_storage_pricer::error::ScheduleError;
use gas_storage_pricer::history::load_prices_from_reader;
use gas_storage_pricer::{ContractRequest, FeeSchedule, ForecastConfig, PricingError, PricingService, StorageFeeBasis};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Four years of month-end prices with winter peaks, as CSV text
fn seasonal_csv() -> String {
    let mut csv = String::from("Dates,Prices\n");
    let first = date(2020, 11, 1);
    for i in 0..48 {
        let month_end = first.checked_add_months(Months::new(i + 1)).unwrap().pred_opt().unwrap();
        let winter = matches!(month_end.month(), 11 | 12 | 1 | 2);
        let price = 10.0 + 0.05 * i as f64 + if winter { 1.2 } else { 0.0 } + 0.1 * (i as f64 * 7.3).sin();
        csv.push_str(&format!("{},{:.2}\n", month_end.format("%m/%d/%y"), price));
    }
    csv
}

fn seasonal_service() -> PricingService {
    let history = load_prices_from_reader(seasonal_csv().as_bytes(), "%m/%d/%y").unwrap();
    PricingService::from_history(&history, &ForecastConfig::default()).unwrap()
}

fn base_fees() -> FeeSchedule {
    FeeSchedule {
        monthly_storage_fee: 0.02,
        injection_fee_per_unit: 0.10,
        withdrawal_fee_per_unit: 0.05,
        max_storage_capacity: 600_000.0,
        storage_fee_basis: StorageFeeBasis::PerUnit,
    }
}

fn summer_to_winter(fees: FeeSchedule) -> ContractRequest {
    ContractRequest::new(
        &[(date(2023, 6, 1), 200_000.0)],
        &[(date(2023, 12, 1), 200_000.0)],
        fees,
    )
}

#[test]
fn same_day_round_trip_without_fees_is_worth_nothing() {
    let service = seasonal_service();
    let request = ContractRequest::new(
        &[(date(2023, 6, 1), 50_000.0)],
        &[(date(2023, 6, 1), 50_000.0)],
        FeeSchedule::free(100_000.0),
    );

    let result = service.price(&request).unwrap();
    assert_abs_diff_eq!(result.net_value, 0.0, epsilon = 1e-9);
    assert_eq!(result.storage_cost, 0.0);
}

#[test]
fn net_value_decreases_in_every_fee() {
    let service = seasonal_service();
    let base = service.price(&summer_to_winter(base_fees())).unwrap().net_value;

    let bumps: [fn(&mut FeeSchedule); 3] = [
        |f| f.monthly_storage_fee += 0.01,
        |f| f.injection_fee_per_unit += 0.01,
        |f| f.withdrawal_fee_per_unit += 0.01,
    ];
    for bump in bumps {
        let mut fees = base_fees();
        bump(&mut fees);
        let bumped = service.price(&summer_to_winter(fees)).unwrap().net_value;
        assert!(bumped < base, "{} should be below {}", bumped, base);
    }
}

#[test]
fn net_value_is_linear_in_volume() {
    let service = seasonal_service();
    let request = ContractRequest::new(
        &[(date(2023, 5, 1), 100_000.0), (date(2023, 7, 1), 50_000.0)],
        &[(date(2023, 12, 1), 80_000.0), (date(2024, 1, 15), 70_000.0)],
        FeeSchedule { max_storage_capacity: 1e9, ..base_fees() },
    );

    let single = service.price(&request).unwrap().net_value;
    let tripled = service.price(&request.scaled(3.0)).unwrap().net_value;
    assert_relative_eq!(tripled, 3.0 * single, max_relative = 1e-9);
}

#[test]
fn in_sample_forecast_tracks_history() {
    let history = load_prices_from_reader(seasonal_csv().as_bytes(), "%m/%d/%y").unwrap();
    let service = PricingService::from_history(&history, &ForecastConfig::default()).unwrap();
    let tolerance = 4.0 * service.fit_summary().rmse + 1e-9;

    for obs in history.observations() {
        let error = (service.forecast(obs.date) - obs.price).abs();
        assert!(error <= tolerance, "{}: error {} > {}", obs.date, error, tolerance);
    }
}

#[test]
fn two_point_history_example() {
    let csv = "Dates,Prices\n06/01/23,2.00\n12/01/23,3.00\n";
    let history = load_prices_from_reader(csv.as_bytes(), "%m/%d/%y").unwrap();
    let service = PricingService::from_history(&history, &ForecastConfig::default()).unwrap();

    let request = ContractRequest::new(
        &[(date(2023, 6, 1), 10_000.0)],
        &[(date(2023, 12, 1), 10_000.0)],
        FeeSchedule::free(1e6),
    );
    let result = service.price(&request).unwrap();
    assert_relative_eq!(result.net_value, 10_000.0, max_relative = 1e-3);
}

#[test]
fn winter_withdrawal_beats_summer_injection() {
    let service = seasonal_service();
    let result = service.price(&summer_to_winter(FeeSchedule::free(600_000.0))).unwrap();
    assert!(result.net_value > 0.0);
}

#[test]
fn over_capacity_schedule_is_rejected() {
    let service = seasonal_service();
    let request = ContractRequest::new(
        &[(date(2023, 6, 1), 400_000.0), (date(2023, 7, 1), 300_000.0)],
        &[(date(2023, 12, 1), 700_000.0)],
        base_fees(),
    );

    match service.price(&request) {
        Err(PricingError::Schedule(ScheduleError::CapacityExceeded { date: d, inventory, .. })) => {
            assert_eq!(d, date(2023, 7, 1));
            assert_eq!(inventory, 400_000.0);
        }
        other => panic!("expected capacity error, got {:?}", other.map(|r| r.net_value)),
    }
}
