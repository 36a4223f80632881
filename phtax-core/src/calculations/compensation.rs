//! Monthly compensation: contributions, withholding tax and take-home pay.
//!
//! # Computation
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Employee SSS, PhilHealth and Pag-IBIG contributions |
//! | 2    | Monthly taxable income: gross salary less step 1 |
//! | 3    | Annual taxable income: step 2 × 12 |
//! | 4    | Annual tax from the graduated schedule |
//! | 5    | Monthly tax: step 4 ÷ 12 |
//! | 6    | Net salary: gross less step 1 less step 5 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use phtax_core::calculations::calculate_tax;
//!
//! let result = calculate_tax(dec!(50000));
//!
//! assert_eq!(result.total_contributions, dec!(3200));
//! assert_eq!(result.annual_taxable_income, dec!(561600));
//! assert_eq!(result.annual_tax, dec!(54820));
//! assert_eq!(result.tax_bracket, "20% Tax Rate");
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculations::contributions::ContributionCalculator;
use crate::calculations::income_tax::IncomeTaxSchedule;
use crate::models::TaxCalculation;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Combines the contribution calculator with an income tax schedule.
#[derive(Debug, Clone, Copy)]
pub struct CompensationCalculator<'a> {
    contributions: ContributionCalculator<'a>,
    income_tax: IncomeTaxSchedule<'a>,
}

impl Default for CompensationCalculator<'static> {
    fn default() -> Self {
        Self::new(ContributionCalculator::default(), IncomeTaxSchedule::default())
    }
}

impl<'a> CompensationCalculator<'a> {
    pub fn new(
        contributions: ContributionCalculator<'a>,
        income_tax: IncomeTaxSchedule<'a>,
    ) -> Self {
        Self {
            contributions,
            income_tax,
        }
    }

    /// Calculates the full monthly breakdown for `monthly_salary`.
    pub fn calculate(
        &self,
        monthly_salary: Decimal,
    ) -> TaxCalculation {
        let sss_contribution = self.contributions.sss(monthly_salary);
        let phil_health_contribution = self.contributions.phil_health(monthly_salary);
        let pagibig_contribution = self.contributions.pagibig(monthly_salary);
        let total_contributions = sss_contribution + phil_health_contribution + pagibig_contribution;

        let taxable_income = monthly_salary - total_contributions;
        let annual_taxable_income = taxable_income * MONTHS_PER_YEAR;

        let annual_tax = self.income_tax.annual_tax(annual_taxable_income);
        let monthly_tax = annual_tax / MONTHS_PER_YEAR;

        debug!(
            salary = %monthly_salary,
            contributions = %total_contributions,
            annual_taxable_income = %annual_taxable_income,
            annual_tax = %annual_tax,
            "Calculated compensation tax"
        );

        TaxCalculation {
            gross_salary: monthly_salary,
            annual_salary: monthly_salary * MONTHS_PER_YEAR,
            sss_contribution,
            phil_health_contribution,
            pagibig_contribution,
            total_contributions,
            taxable_income,
            annual_taxable_income,
            monthly_tax,
            annual_tax,
            net_salary: monthly_salary - total_contributions - monthly_tax,
            tax_bracket: self.income_tax.bracket_description(annual_taxable_income),
        }
    }
}

/// Monthly compensation breakdown using the current tables.
pub fn calculate_tax(monthly_salary: Decimal) -> TaxCalculation {
    CompensationCalculator::default().calculate(monthly_salary)
}
