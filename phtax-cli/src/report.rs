//! Text and JSON rendering of calculation results.
//!
//! Text output rounds every amount half-up to centavos; JSON output carries
//! the unrounded values.

use std::fmt::Write as _;

use clap::ValueEnum;
use phtax_core::{
    CustomsCalculation, EmployerContributions, TariffItem, TaxCalculation, VatCalculation,
};
use phtax_data::{RateReference, RateTier};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::utils::{format_php, format_php_whole, format_rate, format_usd};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const LABEL_WIDTH: usize = 34;
const VALUE_WIDTH: usize = 18;

fn heading(
    out: &mut String,
    title: &str,
) {
    let _ = writeln!(out, "{title}");
}

fn row(
    out: &mut String,
    label: &str,
    value: &str,
) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$}{value:>VALUE_WIDTH$}");
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

#[derive(Serialize)]
struct Hint<'a> {
    hint: &'a str,
}

/// Message shown instead of a result when the primary input is missing.
pub fn hint(
    message: &str,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(message.to_string()),
        OutputFormat::Json => to_json(&Hint { hint: message }),
    }
}

#[derive(Serialize)]
struct CompensationReport<'a> {
    #[serde(flatten)]
    employee: &'a TaxCalculation,
    #[serde(skip_serializing_if = "Option::is_none")]
    employer: Option<&'a EmployerContributions>,
}

pub fn compensation(
    calc: &TaxCalculation,
    employer: Option<&EmployerContributions>,
    format: OutputFormat,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return to_json(&CompensationReport {
            employee: calc,
            employer,
        });
    }

    let mut out = String::new();
    heading(
        &mut out,
        &format!("Compensation income tax on {} a month", format_php(calc.gross_salary)),
    );
    out.push('\n');

    heading(&mut out, "Monthly deductions");
    row(&mut out, "SSS", &format_php(calc.sss_contribution));
    row(&mut out, "PhilHealth", &format_php(calc.phil_health_contribution));
    row(&mut out, "Pag-IBIG", &format_php(calc.pagibig_contribution));
    row(&mut out, "Total contributions", &format_php(calc.total_contributions));
    row(&mut out, "Taxable income", &format_php(calc.taxable_income));
    row(&mut out, "Withholding tax", &format_php(calc.monthly_tax));
    row(&mut out, "Net take-home pay", &format_php(calc.net_salary));
    out.push('\n');

    heading(&mut out, "Annual");
    row(&mut out, "Gross salary", &format_php(calc.annual_salary));
    row(&mut out, "Taxable income", &format_php(calc.annual_taxable_income));
    row(&mut out, "Income tax", &format_php(calc.annual_tax));
    row(&mut out, "Tax bracket", &calc.tax_bracket);

    if let Some(employer) = employer {
        out.push('\n');
        heading(&mut out, "Employer share (monthly)");
        row(&mut out, "SSS (incl. EC)", &format_php(employer.sss_contribution));
        row(&mut out, "PhilHealth", &format_php(employer.phil_health_contribution));
        row(&mut out, "Pag-IBIG", &format_php(employer.pagibig_contribution));
        row(&mut out, "Total", &format_php(employer.total_contributions));
    }

    Ok(out)
}

pub fn vat(
    calc: &VatCalculation,
    inclusive: bool,
    format: OutputFormat,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return to_json(calc);
    }

    let mut out = String::new();
    heading(
        &mut out,
        if inclusive {
            "VAT breakdown (amount includes 12% VAT)"
        } else {
            "VAT breakdown (12% VAT added to amount)"
        },
    );
    row(&mut out, "Net of VAT", &format_php(calc.net_amount));
    row(&mut out, "VAT", &format_php(calc.vat_amount));
    row(&mut out, "Gross amount", &format_php(calc.gross_amount));
    Ok(out)
}

pub fn customs(
    calc: &CustomsCalculation,
    format: OutputFormat,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return to_json(calc);
    }

    let mut out = String::new();
    if !calc.goods.ahtn_code.is_empty() {
        heading(
            &mut out,
            &format!("{} {}", calc.goods.ahtn_code, calc.goods.description),
        );
        row(&mut out, "Rate of duty", &format!("{}%", calc.goods.rate_of_duty.normalize()));
        out.push('\n');
    }

    let value = &calc.dutiable_value;
    heading(&mut out, "Dutiable value");
    row(&mut out, "FOB/FCA value", &format_usd(value.fob_fca_value));
    row(&mut out, "Freight", &format_usd(value.freight));
    row(&mut out, "Insurance", &format_usd(value.insurance));
    row(&mut out, "Total (USD)", &format_usd(value.total_dutiable_value_foreign));
    row(&mut out, "Total (PHP)", &format_php(value.total_dutiable_value_php));
    out.push('\n');

    let charges = &calc.charges;
    heading(&mut out, "Landed cost");
    row(&mut out, "Customs duty", &format_php(charges.customs_duty));
    row(&mut out, "Excise tax", &format_php(charges.excise_tax));
    row(&mut out, "Brokerage fee", &format_php(charges.brokerage_fee));
    row(&mut out, "Import processing charge", &format_php(charges.import_processing_charge));
    row(&mut out, "BIR documentary stamp tax", &format_php(charges.bir_documentary_stamp_tax));
    row(&mut out, "Customs documentary stamp", &format_php(charges.customs_documentary_stamp));
    row(&mut out, "Total landed cost", &format_php(charges.total_landed_cost));
    out.push('\n');

    let summary = &calc.summary;
    heading(&mut out, "Taxes payable");
    row(&mut out, "Customs duty", &format_php(summary.customs_duty));
    row(&mut out, "VAT", &format_php(summary.vat));
    row(&mut out, "Excise tax", &format_php(summary.excise_tax));
    row(&mut out, "Import processing charge", &format_php(summary.import_processing_charge));
    row(&mut out, "BIR documentary stamp tax", &format_php(summary.bir_documentary_stamp_tax));
    row(&mut out, "Customs documentary stamp", &format_php(summary.customs_documentary_stamp));
    row(&mut out, "Total tax", &format_php(summary.total_tax_amount));

    Ok(out)
}

pub fn tariffs(
    query: &str,
    items: &[&TariffItem],
    format: OutputFormat,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return to_json(items);
    }
    if items.is_empty() {
        return Ok(format!("No tariff items match '{}'.", query.trim()));
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:>6}  Description", "AHTN", "Duty");
    for item in items {
        let rate = format!("{}%", item.rate.normalize());
        let _ = writeln!(out, "{:<12} {:>6}  {}", item.ahtn, rate, item.description);
    }
    Ok(out)
}

/// Income range column of a rate tier.
pub fn tier_range(tier: &RateTier) -> String {
    match tier.max {
        Some(max) => format!("{} - {}", format_php_whole(tier.min), format_php_whole(max)),
        None if tier.min > Decimal::ZERO => format!("{} and above", format_php_whole(tier.min)),
        None => "All amounts".to_string(),
    }
}

pub fn rates(
    category: Option<&str>,
    references: &[&RateReference],
    format: OutputFormat,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return to_json(references);
    }
    if references.is_empty() {
        return Ok(match category {
            Some(category) => format!("No tax rates found for category '{}'.", category.trim()),
            None => "No tax rates found.".to_string(),
        });
    }

    let mut out = String::new();
    for (idx, reference) in references.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        heading(
            &mut out,
            &format!("{} [{}]", reference.tax_type, reference.category),
        );
        let _ = writeln!(
            out,
            "  {} (effective {})",
            reference.description, reference.effective_date
        );
        for tier in &reference.tiers {
            let _ = writeln!(
                out,
                "    {:<30} {:>7}  {}",
                tier_range(tier),
                format_rate(tier.rate),
                tier.description
            );
        }
    }
    Ok(out)
}

/// Result of one `phtax check` item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

pub fn checks(
    outcomes: &[CheckOutcome],
    format: OutputFormat,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return to_json(outcomes);
    }

    let mut out = String::new();
    for outcome in outcomes {
        let status = if outcome.passed { "ok" } else { "FAILED" };
        let _ = writeln!(out, "{:<28} {:<6} {}", outcome.name, status, outcome.detail);
    }
    Ok(out)
}
