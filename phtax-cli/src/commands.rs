//! Command implementations behind the `phtax` subcommands.
//!
//! Each function takes already-parsed inputs and returns the text to print.

use anyhow::{Context, Result, bail};
use phtax_core::calculations::{
    ContributionCalculator, CustomsDutyCalculator, IncomeTaxSchedule, calculate_employer_contributions,
    calculate_tax, calculate_vat,
};
use phtax_core::rates::INCOME_TAX_BRACKETS;
use phtax_core::CustomsInput;
use phtax_data::{RateCatalogue, TariffCatalogue};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::TariffConfig;
use crate::report::{self, CheckOutcome, OutputFormat};

pub const SALARY_HINT: &str = "Enter a monthly salary greater than zero to see the computation.";
pub const VAT_HINT: &str = "Enter an amount greater than zero to see the VAT breakdown.";
pub const CUSTOMS_HINT: &str =
    "Enter an FOB/FCA value and an exchange rate greater than zero to see the duty computation.";

/// Shipment details as entered, before the duty rate is settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomsRequest {
    pub fob_fca_value: Decimal,
    pub freight: Decimal,
    pub exchange_rate: Decimal,
    /// Percent; ignored when `tariff_code` is set.
    pub duty_rate: Decimal,
    pub tariff_code: Option<String>,
    pub is_dangerous_cargo: bool,
    pub brokerage_fee: Decimal,
    pub excise_tax_rate: Decimal,
}

/// The embedded tariff catalogue, or the configured replacement.
pub fn load_tariffs(config: &TariffConfig) -> Result<TariffCatalogue> {
    match &config.catalogue {
        Some(path) => TariffCatalogue::load_from_path(path)
            .with_context(|| format!("loading tariff catalogue {}", path.display())),
        None => TariffCatalogue::builtin().context("loading built-in tariff catalogue"),
    }
}

pub fn compensation(
    monthly_salary: Decimal,
    include_employer: bool,
    format: OutputFormat,
) -> Result<String> {
    if monthly_salary <= Decimal::ZERO {
        return Ok(report::hint(SALARY_HINT, format)?);
    }

    let calc = calculate_tax(monthly_salary);
    let employer = include_employer.then(|| calculate_employer_contributions(monthly_salary));
    info!(salary = %monthly_salary, bracket = %calc.tax_bracket, "Computed compensation tax");

    Ok(report::compensation(&calc, employer.as_ref(), format)?)
}

pub fn vat(
    amount: Decimal,
    inclusive: bool,
    format: OutputFormat,
) -> Result<String> {
    if amount <= Decimal::ZERO {
        return Ok(report::hint(VAT_HINT, format)?);
    }

    let calc = calculate_vat(amount, inclusive);
    Ok(report::vat(&calc, inclusive, format)?)
}

pub fn customs(
    request: &CustomsRequest,
    tariffs: &TariffCatalogue,
    format: OutputFormat,
) -> Result<String> {
    if request.fob_fca_value <= Decimal::ZERO || request.exchange_rate <= Decimal::ZERO {
        return Ok(report::hint(CUSTOMS_HINT, format)?);
    }

    let input = CustomsInput {
        fob_fca_value: request.fob_fca_value,
        freight: request.freight,
        exchange_rate: request.exchange_rate,
        rate_of_duty: request.duty_rate,
        is_dangerous_cargo: request.is_dangerous_cargo,
        brokerage_fee: request.brokerage_fee,
        excise_tax_rate: request.excise_tax_rate,
    };

    let item = match &request.tariff_code {
        Some(code) => {
            let Some(item) = tariffs.find_by_code(code) else {
                bail!("unknown AHTN code '{code}' (try `phtax tariffs <description>`)");
            };
            debug!(ahtn = %item.ahtn, rate = %item.rate, "Using tariff line");
            Some(item)
        }
        None => None,
    };

    let calculator = CustomsDutyCalculator::default();
    let effective = CustomsInput {
        rate_of_duty: item.map_or(input.rate_of_duty, |i| i.rate),
        ..input
    };
    if !calculator.fits(&effective) {
        bail!("shipment amounts are too large to compute");
    }

    let calc = match item {
        Some(item) => calculator.calculate_for_tariff(item, &input),
        None => calculator.calculate(&input),
    };

    Ok(report::customs(&calc, format)?)
}

pub fn tariffs(
    catalogue: &TariffCatalogue,
    query: &str,
    limit: usize,
    format: OutputFormat,
) -> Result<String> {
    let found = catalogue.search(query, limit);
    debug!(query, matches = found.len(), "Searched tariffs");
    Ok(report::tariffs(query, &found, format)?)
}

pub fn rates(
    catalogue: &RateCatalogue,
    category: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let references = match category {
        Some(category) => catalogue.by_category(category),
        None => catalogue.references().iter().collect(),
    };
    Ok(report::rates(category, &references, format)?)
}

fn outcome(
    name: &str,
    result: Result<String>,
) -> CheckOutcome {
    match result {
        Ok(detail) => CheckOutcome {
            name: name.to_string(),
            passed: true,
            detail,
        },
        Err(err) => CheckOutcome {
            name: name.to_string(),
            passed: false,
            detail: format!("{err:#}"),
        },
    }
}

/// Validates the built-in tables and the reference catalogues.
pub fn run_checks(tariff_config: &TariffConfig) -> Vec<CheckOutcome> {
    let schedule = IncomeTaxSchedule::default();
    let contributions = ContributionCalculator::default();
    let rate_catalogue = RateCatalogue::builtin();

    let mut outcomes = vec![
        outcome(
            "income tax brackets",
            schedule
                .validate()
                .map(|()| format!("{} brackets", schedule.brackets().len()))
                .map_err(Into::into),
        ),
        outcome(
            "SSS schedule",
            contributions
                .validate_sss_table()
                .map(|()| format!("{} rows", contributions.sss_table().len()))
                .map_err(Into::into),
        ),
        outcome(
            "tariff catalogue",
            load_tariffs(tariff_config).map(|c| format!("{} items", c.len())),
        ),
    ];

    outcomes.push(outcome(
        "rate reference catalogue",
        rate_catalogue
            .as_ref()
            .map(|c| format!("{} tax types", c.references().len()))
            .map_err(|e| anyhow::anyhow!("{e}")),
    ));

    outcomes.push(outcome(
        "income tax reference tiers",
        match &rate_catalogue {
            Ok(catalogue) => income_tax_reference_matches(catalogue),
            Err(_) => Err(anyhow::anyhow!("rate reference catalogue unavailable")),
        },
    ));

    outcomes
}

fn income_tax_reference_matches(catalogue: &RateCatalogue) -> Result<String> {
    let reference = catalogue
        .by_category("Income Tax")
        .into_iter()
        .find(|r| r.tax_type.starts_with("Individual Income Tax"))
        .context("no individual income tax entry")?;

    if reference.tiers.len() != INCOME_TAX_BRACKETS.len() {
        bail!(
            "{} tiers listed, calculator uses {}",
            reference.tiers.len(),
            INCOME_TAX_BRACKETS.len()
        );
    }
    for (idx, (tier, bracket)) in reference.tiers.iter().zip(INCOME_TAX_BRACKETS.iter()).enumerate() {
        let same = tier.min == bracket.min_income
            && tier.max == bracket.max_income
            && tier.rate == bracket.tax_rate
            && tier.base_amount.unwrap_or_default() == bracket.base_tax;
        if !same {
            bail!("tier {idx} differs from the calculator bracket");
        }
    }
    Ok("matches calculator".to_string())
}

#[cfg(test)]
mod tests {
    use phtax_core::TariffItem;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::utils::{MAX_AMOUNT, parse_amount};

    fn request() -> CustomsRequest {
        CustomsRequest {
            fob_fca_value: dec!(100),
            freight: dec!(0),
            exchange_rate: dec!(58.5),
            duty_rate: dec!(10),
            tariff_code: None,
            is_dangerous_cargo: false,
            brokerage_fee: dec!(700),
            excise_tax_rate: dec!(0),
        }
    }

    fn catalogue() -> TariffCatalogue {
        TariffCatalogue::from_records(vec![TariffItem {
            ahtn: "8471.30.20".to_string(),
            description: "Laptops".to_string(),
            rate: dec!(5),
        }])
    }

    #[test]
    fn zero_salary_prints_hint() {
        let out = compensation(Decimal::ZERO, false, OutputFormat::Text).unwrap();

        assert_eq!(out, SALARY_HINT);
    }

    #[test]
    fn employer_flag_adds_section() {
        let out = compensation(dec!(30000), true, OutputFormat::Text).unwrap();

        assert!(out.contains("Employer share"), "{out}");
    }

    #[test]
    fn compensation_json_has_employer_totals() {
        let out = compensation(dec!(50000), true, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(json["tax_bracket"], "20% Tax Rate");
        assert!(json["employer"]["total_contributions"].is_string());
    }

    #[test]
    fn zero_amount_vat_prints_hint() {
        assert_eq!(vat(Decimal::ZERO, true, OutputFormat::Text).unwrap(), VAT_HINT);
    }

    #[test]
    fn oversized_salary_prints_hint() {
        let salary = parse_amount("9999999999999999999999999999");

        let out = compensation(salary, true, OutputFormat::Text).unwrap();

        assert_eq!(out, SALARY_HINT);
    }

    #[test]
    fn oversized_vat_amount_prints_hint() {
        let amount = parse_amount("79,228,162,514,264,337,593,543,950,335");

        assert_eq!(vat(amount, false, OutputFormat::Text).unwrap(), VAT_HINT);
        let json: serde_json::Value =
            serde_json::from_str(&vat(amount, true, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["hint"], VAT_HINT);
    }

    #[test]
    fn largest_accepted_amounts_compute() {
        let salary = compensation(MAX_AMOUNT, true, OutputFormat::Text).unwrap();
        let split = vat(MAX_AMOUNT, false, OutputFormat::Text).unwrap();

        assert!(salary.contains("Net take-home pay"), "{salary}");
        assert!(split.contains("₱120,000,000,000,000.00"), "{split}");
    }

    #[test]
    fn oversized_shipment_is_an_error() {
        let request = CustomsRequest {
            fob_fca_value: MAX_AMOUNT,
            exchange_rate: MAX_AMOUNT,
            ..request()
        };

        let err = customs(&request, &catalogue(), OutputFormat::Text).unwrap_err();

        assert!(err.to_string().contains("too large"), "{err}");
    }

    #[test]
    fn customs_needs_exchange_rate() {
        let request = CustomsRequest {
            exchange_rate: Decimal::ZERO,
            ..request()
        };

        let out = customs(&request, &catalogue(), OutputFormat::Text).unwrap();

        assert_eq!(out, CUSTOMS_HINT);
    }

    #[test]
    fn customs_worked_example_totals() {
        let out = customs(&request(), &catalogue(), OutputFormat::Text).unwrap();

        assert!(out.contains("₱7,643.70"), "{out}");
        assert!(out.contains("₱1,893.94"), "{out}");
    }

    #[test]
    fn customs_tariff_sets_duty_rate() {
        let request = CustomsRequest {
            tariff_code: Some("84713020".to_string()),
            ..request()
        };

        let out = customs(&request, &catalogue(), OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(json["goods"]["ahtn_code"], "8471.30.20");
        assert_eq!(
            json["charges"]["customs_duty"]
                .as_str()
                .unwrap()
                .parse::<Decimal>()
                .unwrap(),
            dec!(298.35)
        );
    }

    #[test]
    fn customs_unknown_tariff_is_an_error() {
        let request = CustomsRequest {
            tariff_code: Some("0000.00.00".to_string()),
            ..request()
        };

        let err = customs(&request, &catalogue(), OutputFormat::Text).unwrap_err();

        assert!(err.to_string().contains("unknown AHTN code"));
    }

    #[test]
    fn rates_unknown_category() {
        let catalogue = RateCatalogue::builtin().unwrap();

        let out = rates(&catalogue, Some("Sin Taxes"), OutputFormat::Text).unwrap();

        assert_eq!(out, "No tax rates found for category 'Sin Taxes'.");
    }

    #[test]
    fn builtin_checks_all_pass() {
        let outcomes = run_checks(&TariffConfig::default());

        assert_eq!(outcomes.len(), 5);
        for outcome in &outcomes {
            assert!(outcome.passed, "{}: {}", outcome.name, outcome.detail);
        }
    }

    #[test]
    fn missing_tariff_file_fails_check() {
        let config = TariffConfig {
            catalogue: Some("/nonexistent/tariffs.csv".into()),
            ..TariffConfig::default()
        };

        let outcomes = run_checks(&config);

        let tariff = outcomes.iter().find(|o| o.name == "tariff catalogue").unwrap();
        assert!(!tariff.passed);
    }
}
