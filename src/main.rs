//! Natural gas storage contract pricer CLI
//!
//! Without a subcommand, starts the interactive pricing form.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gas_storage_pricer::{
    config::AppConfig,
    frontend::{format_currency, InteractiveSession},
    input::EVENT_DATE_FORMAT,
    ContractForm, PricingService, StorageFeeBasis,
};
use log::info;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gas_storage_pricer")]
#[command(about = "Estimate the net value of a natural gas storage contract")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Historical price CSV (Dates, Prices)
    #[arg(short, long)]
    prices: Option<PathBuf>,

    /// chrono format of the Dates column
    #[arg(long)]
    date_format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive pricing form
    Interactive,
    /// Price a single schedule; fields default to the configured form values
    Price {
        /// Injection date(s), YYYY-MM-DD, ';'-separated
        #[arg(long)]
        injection_date: Option<String>,
        /// Injection volume(s) in MMBtu, ';'-separated
        #[arg(long)]
        injection_volume: Option<String>,
        /// Withdrawal date(s), YYYY-MM-DD, ';'-separated
        #[arg(long)]
        withdrawal_date: Option<String>,
        /// Withdrawal volume(s) in MMBtu, ';'-separated
        #[arg(long)]
        withdrawal_volume: Option<String>,
        /// Monthly storage fee
        #[arg(long)]
        storage_fee: Option<String>,
        /// Injection fee per MMBtu
        #[arg(long)]
        injection_fee: Option<String>,
        /// Withdrawal fee per MMBtu
        #[arg(long)]
        withdrawal_fee: Option<String>,
        /// Max storage capacity in MMBtu
        #[arg(long)]
        max_storage: Option<String>,
        /// Charge the storage fee per month held instead of per unit per month
        #[arg(long)]
        flat_storage_fee: bool,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forecast prices for dates (YYYY-MM-DD) or a monthly range
    Forecast {
        dates: Vec<String>,
        /// First month of a monthly curve
        #[arg(long, requires = "to")]
        from: Option<String>,
        /// Last date of a monthly curve
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// Show the fitted model summary
    Fit {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), EVENT_DATE_FORMAT)
        .with_context(|| format!("'{}' is not a valid date (expected YYYY-MM-DD)", raw))
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    config.apply_env_overrides()?;
    if let Some(path) = &cli.prices {
        config.price_file = path.clone();
    }
    if let Some(format) = &cli.date_format {
        config.date_format = format.clone();
    }
    Ok(config)
}

fn load_service(config: &AppConfig) -> Result<PricingService> {
    PricingService::from_csv_path(&config.price_file, &config.date_format, &config.forecast)
        .with_context(|| format!("building price model from {}", config.price_file.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!("Using price file {}", config.price_file.display());

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let stdin = io::stdin();
            let mut session = InteractiveSession::new(stdin.lock(), io::stdout());
            if let Some(service) = session.load_service(&config)? {
                session.run(&service, config.form.clone())?;
            }
        }
        Commands::Price {
            injection_date,
            injection_volume,
            withdrawal_date,
            withdrawal_volume,
            storage_fee,
            injection_fee,
            withdrawal_fee,
            max_storage,
            flat_storage_fee,
            json,
        } => {
            let defaults = config.form.clone();
            let form = ContractForm {
                injection_dates: injection_date.unwrap_or(defaults.injection_dates),
                injection_volumes: injection_volume.unwrap_or(defaults.injection_volumes),
                withdrawal_dates: withdrawal_date.unwrap_or(defaults.withdrawal_dates),
                withdrawal_volumes: withdrawal_volume.unwrap_or(defaults.withdrawal_volumes),
                storage_fee: storage_fee.unwrap_or(defaults.storage_fee),
                injection_fee: injection_fee.unwrap_or(defaults.injection_fee),
                withdrawal_fee: withdrawal_fee.unwrap_or(defaults.withdrawal_fee),
                max_storage: max_storage.unwrap_or(defaults.max_storage),
                storage_fee_basis: if flat_storage_fee {
                    StorageFeeBasis::Flat
                } else {
                    defaults.storage_fee_basis
                },
            };

            let request = form.parse()?;
            let service = load_service(&config)?;
            let result = service.price(&request)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "{:<12} {:<10} {:>14} {:>10} {:>16} {:>14}",
                    "Date", "Event", "Volume", "Price", "Cashflow", "Inventory"
                );
                println!("{}", "-".repeat(81));
                for row in &result.ledger {
                    println!(
                        "{:<12} {:<10} {:>14.2} {:>10.4} {:>16.2} {:>14.2}",
                        row.date.to_string(),
                        format!("{:?}", row.direction),
                        row.volume,
                        row.price,
                        row.net_cashflow,
                        row.inventory_after,
                    );
                }
                println!();
                println!("  Sale revenue:    {}", format_currency(result.sale_revenue));
                println!("  Purchase cost:   {}", format_currency(result.purchase_cost));
                println!("  Injection fees:  {}", format_currency(result.injection_fees));
                println!("  Withdrawal fees: {}", format_currency(result.withdrawal_fees));
                println!("  Storage cost:    {}", format_currency(result.storage_cost));
                println!("\nContract Value: {}", format_currency(result.net_value));
            }
        }
        Commands::Forecast { dates, from, to } => {
            let service = load_service(&config)?;
            for raw in &dates {
                let date = parse_date(raw)?;
                println!("{}  {:.4}", date, service.forecast(date));
            }
            if let (Some(from), Some(to)) = (from, to) {
                for point in service.forecast_curve(parse_date(&from)?, parse_date(&to)?) {
                    println!("{}  {:.4}", point.date, point.price);
                }
            }
        }
        Commands::Fit { json } => {
            let summary = load_service(&config)?.fit_summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Observations: {}", summary.observations);
                println!("Range:        {} to {}", summary.first_date, summary.last_date);
                println!("Yearly order: {}", summary.yearly_order);
                println!("Changepoints: {:?}", summary.changepoints);
                println!("Fit RMSE:     {:.4}", summary.rmse);
            }
        }
    }

    Ok(())
}
