//! Graduated income tax on annual taxable compensation.
//!
//! # Schedule
//!
//! | Annual taxable income      | Tax                                   |
//! |----------------------------|---------------------------------------|
//! | up to 250,000              | 0                                     |
//! | 250,000 to 400,000         | 15% of the excess over 250,000        |
//! | 400,000 to 800,000         | 22,500 + 20% of the excess over 400,000 |
//! | 800,000 to 2,000,000       | 102,500 + 25% of the excess over 800,000 |
//! | 2,000,000 to 8,000,000     | 402,500 + 30% of the excess over 2,000,000 |
//! | above 8,000,000            | 2,202,500 + 35% of the excess over 8,000,000 |
//!
//! # Boundary values
//!
//! Brackets are scanned in ascending order and the first bracket whose upper
//! bound is greater than or equal to the income wins. An income exactly on a
//! boundary is therefore taxed in the lower bracket. Both brackets give the
//! same tax at the boundary, but the reported marginal rate is the lower one.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use phtax_core::calculations::{calculate_income_tax, tax_bracket_description};
//!
//! assert_eq!(calculate_income_tax(dec!(561600)), dec!(54820));
//! assert_eq!(tax_bracket_description(dec!(561600)), "20% Tax Rate");
//! assert_eq!(tax_bracket_description(dec!(250000)), "0% Tax Rate");
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::non_negative;
use crate::error::RateTableError;
use crate::models::IncomeTaxBracket;
use crate::rates::INCOME_TAX_BRACKETS;

/// Calculator over a progressive bracket table.
///
/// Brackets must be sorted ascending by `min_income`; [`validate`] checks
/// that and the other table invariants.
///
/// [`validate`]: IncomeTaxSchedule::validate
#[derive(Debug, Clone, Copy)]
pub struct IncomeTaxSchedule<'a> {
    brackets: &'a [IncomeTaxBracket],
}

impl Default for IncomeTaxSchedule<'static> {
    fn default() -> Self {
        Self::new(&INCOME_TAX_BRACKETS)
    }
}

impl<'a> IncomeTaxSchedule<'a> {
    pub fn new(brackets: &'a [IncomeTaxBracket]) -> Self {
        Self { brackets }
    }

    pub fn brackets(&self) -> &'a [IncomeTaxBracket] {
        self.brackets
    }

    /// Returns the bracket an ascending scan selects for `income`.
    ///
    /// `None` only when the table is empty or its last bracket is bounded
    /// below `income`.
    pub fn bracket_for(
        &self,
        income: Decimal,
    ) -> Option<&'a IncomeTaxBracket> {
        self.brackets.iter().find(|b| b.covers(income))
    }

    /// Calculates the annual tax due on `annual_taxable_income`.
    ///
    /// Negative income is not rejected; it falls in the first bracket and
    /// yields zero tax.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use phtax_core::calculations::IncomeTaxSchedule;
    ///
    /// let schedule = IncomeTaxSchedule::default();
    ///
    /// // 102,500 + 25% of (1,000,000 - 800,000)
    /// assert_eq!(schedule.annual_tax(dec!(1000000)), dec!(152500));
    /// ```
    pub fn annual_tax(
        &self,
        annual_taxable_income: Decimal,
    ) -> Decimal {
        if annual_taxable_income < Decimal::ZERO {
            warn!(
                income = %annual_taxable_income,
                "Annual taxable income is negative; no income tax applies"
            );
        }

        let Some(bracket) = self.bracket_for(annual_taxable_income) else {
            warn!(
                income = %annual_taxable_income,
                "No income tax bracket covers this income"
            );
            return Decimal::ZERO;
        };

        debug!(
            income = %annual_taxable_income,
            bracket_min = %bracket.min_income,
            rate = %bracket.tax_rate,
            "Selected income tax bracket"
        );

        let excess = non_negative(annual_taxable_income - bracket.min_income);
        bracket.base_tax + excess * bracket.tax_rate
    }

    /// Describes the marginal rate that applies, e.g. `"25% Tax Rate"`.
    ///
    /// Returns an empty string when no bracket covers the income.
    pub fn bracket_description(
        &self,
        annual_taxable_income: Decimal,
    ) -> String {
        match self.bracket_for(annual_taxable_income) {
            Some(bracket) if bracket.tax_rate.is_zero() => "0% Tax Rate".to_string(),
            Some(bracket) => {
                let percent = (bracket.tax_rate * Decimal::ONE_HUNDRED)
                    .round_dp(0)
                    .normalize();
                format!("{percent}% Tax Rate")
            }
            None => String::new(),
        }
    }

    /// Checks that the table is a valid progressive schedule.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableError`] if:
    /// - the table is empty, or the first bracket does not start at 0
    /// - a bracket other than the last is unbounded, or the last is bounded
    /// - a bracket does not start where the previous one ends
    /// - a rate is outside [0, 1]
    /// - a `base_tax` differs from the tax owed at that bracket's floor
    pub fn validate(&self) -> Result<(), RateTableError> {
        let Some(first) = self.brackets.first() else {
            return Err(RateTableError::Empty);
        };
        if !first.min_income.is_zero() {
            return Err(RateTableError::FirstBracketNotZero(first.min_income));
        }

        let last_index = self.brackets.len() - 1;
        let mut expected_min = Decimal::ZERO;
        let mut expected_base = Decimal::ZERO;

        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
                return Err(RateTableError::InvalidRate {
                    index,
                    rate: bracket.tax_rate,
                });
            }
            if bracket.min_income != expected_min {
                return Err(RateTableError::Gap {
                    index,
                    expected: expected_min,
                    found: bracket.min_income,
                });
            }
            if bracket.base_tax != expected_base {
                return Err(RateTableError::InconsistentBaseTax {
                    index,
                    expected: expected_base,
                    found: bracket.base_tax,
                });
            }

            match bracket.max_income {
                None if index != last_index => {
                    return Err(RateTableError::UnboundedBeforeEnd { index });
                }
                None => {}
                Some(_) if index == last_index => return Err(RateTableError::LastBracketBounded),
                Some(max) => {
                    expected_base = bracket.base_tax + (max - bracket.min_income) * bracket.tax_rate;
                    expected_min = max;
                }
            }
        }

        Ok(())
    }
}

/// Annual income tax using the current schedule.
pub fn calculate_income_tax(annual_taxable_income: Decimal) -> Decimal {
    IncomeTaxSchedule::default().annual_tax(annual_taxable_income)
}

/// Marginal-rate label using the current schedule.
pub fn tax_bracket_description(annual_taxable_income: Decimal) -> String {
    IncomeTaxSchedule::default().bracket_description(annual_taxable_income)
}
