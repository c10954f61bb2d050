//! Interactive terminal front end
//!
//! Presents the pricing form one labeled field at a time, prices the
//! contract synchronously and shows the value or the error. Errors never end
//! the session; the user can correct any field and calculate again.

use crate::config::AppConfig;
use crate::contract::ContractResult;
use crate::error::PricingError;
use crate::input::{ContractForm, FormField};
use crate::service::PricingService;
use log::{error, info};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Format an amount as `$1,234.56`
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Validate the form and price it
pub fn calculate(service: &PricingService, form: &ContractForm) -> Result<ContractResult, PricingError> {
    let request = form.parse()?;
    service.price(&request)
}

/// Text shown after pressing calculate
pub fn result_message(outcome: &Result<ContractResult, PricingError>) -> String {
    match outcome {
        Ok(result) => format!("Contract Value: {}", format_currency(result.net_value)),
        Err(e) => format!("Error: {}", e),
    }
}

/// Prompt-driven session over any input and output
pub struct InteractiveSession<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveSession<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read one line; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, label: &str, current: &str) -> io::Result<Option<String>> {
        write!(self.output, "{} [{}]: ", label, current)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Fit the model from the configured price file.
    ///
    /// On failure the error is shown and another path is requested; a blank
    /// answer or end of input gives up.
    pub fn load_service(&mut self, config: &AppConfig) -> io::Result<Option<PricingService>> {
        let mut path = config.price_file.clone();
        loop {
            match PricingService::from_csv_path(&path, &config.date_format, &config.forecast) {
                Ok(service) => {
                    info!("Loaded price model from {}", path.display());
                    return Ok(Some(service));
                }
                Err(e) => {
                    error!("Failed to load {}: {}", path.display(), e);
                    writeln!(self.output, "Error: {}", e)?;
                }
            }

            write!(self.output, "Price file path (blank to quit): ")?;
            self.output.flush()?;
            match self.read_line()? {
                Some(answer) if !answer.is_empty() => path = PathBuf::from(answer),
                _ => return Ok(None),
            }
        }
    }

    /// Run the form loop until the user stops or input ends
    pub fn run(&mut self, service: &PricingService, mut form: ContractForm) -> io::Result<()> {
        writeln!(self.output, "Natural Gas Contract Pricing")?;
        writeln!(self.output, "Press enter to keep a value; separate multiple events with ';'.")?;

        loop {
            writeln!(self.output)?;
            for field in FormField::ALL {
                let current = form.field(field).to_string();
                match self.prompt(field.label(), &current)? {
                    Some(value) if !value.is_empty() => *form.field_mut(field) = value,
                    Some(_) => {}
                    None => return Ok(()),
                }
            }

            let outcome = calculate(service, &form);
            writeln!(self.output, "{}", result_message(&outcome))?;

            match self.prompt("Calculate again? (y/n)", "y")? {
                Some(answer) if answer.eq_ignore_ascii_case("n") || answer.eq_ignore_ascii_case("no") => {
                    return Ok(())
                }
                Some(_) => {}
                None => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastConfig;
    use crate::history::load_prices_from_reader;
    use std::io::Cursor;

    fn service() -> PricingService {
        let csv = "Dates,Prices\n06/01/23,2.00\n12/01/23,3.00\n";
        let history = load_prices_from_reader(csv.as_bytes(), "%m/%d/%y").unwrap();
        PricingService::from_history(&history, &ForecastConfig::default()).unwrap()
    }

    fn run_session(input: &str) -> String {
        let mut output = Vec::new();
        let mut session = InteractiveSession::new(Cursor::new(input.as_bytes()), &mut output);
        session.run(&service(), ContractForm::default()).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(-1_234_567.891), "-$1,234,567.89");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_defaults_produce_a_value() {
        let output = run_session("\n\n\n\n\n\n\n\nn\n");
        assert!(output.contains("Contract Value: $"), "{}", output);
        assert!(!output.contains("Error"));
    }

    #[test]
    fn test_error_then_correction() {
        // First pass: bad injection date. Second pass: fixed date.
        let input = "not-a-date\n\n\n\n\n\n\n\ny\n2023-06-01\n\n\n\n\n\n\n\nn\n";
        let output = run_session(input);

        assert!(output.contains("Error: injection date: 'not-a-date' is not a valid date"), "{}", output);
        assert!(output.contains("Contract Value: $"), "{}", output);
    }

    #[test]
    fn test_capacity_error_is_shown() {
        let input = "\n\n\n\n\n\n\n100000\nn\n";
        let output = run_session(input);
        assert!(output.contains("Error: injection of 200000"), "{}", output);
    }

    #[test]
    fn test_end_of_input_stops_quietly() {
        let output = run_session("\n\n");
        assert!(!output.contains("Contract Value"));
    }

    #[test]
    fn test_load_service_reports_missing_file() {
        let config = AppConfig {
            price_file: PathBuf::from("no/such/prices.csv"),
            ..AppConfig::default()
        };
        let mut output = Vec::new();
        let mut session = InteractiveSession::new(Cursor::new("\n".as_bytes()), &mut output);

        let service = session.load_service(&config).unwrap();
        assert!(service.is_none());
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Error: cannot read price file"), "{}", text);
    }
}
