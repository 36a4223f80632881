use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monthly compensation breakdown for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculation {
    pub gross_salary: Decimal,
    pub annual_salary: Decimal,
    pub sss_contribution: Decimal,
    pub phil_health_contribution: Decimal,
    pub pagibig_contribution: Decimal,
    pub total_contributions: Decimal,
    /// Monthly taxable income (gross less contributions).
    pub taxable_income: Decimal,
    pub annual_taxable_income: Decimal,
    pub monthly_tax: Decimal,
    pub annual_tax: Decimal,
    pub net_salary: Decimal,
    /// Display label such as `"20% Tax Rate"`.
    pub tax_bracket: String,
}

/// Employer-side contributions owed on top of the gross salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerContributions {
    /// SSS employer share including the EC premium.
    pub sss_contribution: Decimal,
    pub phil_health_contribution: Decimal,
    pub pagibig_contribution: Decimal,
    pub total_contributions: Decimal,
}
