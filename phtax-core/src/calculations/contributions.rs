//! Mandatory monthly contributions: SSS, PhilHealth and Pag-IBIG.
//!
//! Every function takes the monthly gross salary and returns a monthly peso
//! amount. Employee shares are deducted before income tax; employer shares
//! are an additional cost to the employer.
//!
//! | Scheme     | Employee share                                       |
//! |------------|------------------------------------------------------|
//! | SSS        | Bracket lookup, 5% of the monthly salary credit      |
//! | PhilHealth | 2.5% of salary, salary capped at 100,000             |
//! | Pag-IBIG   | 1% up to 1,500, 2% above, capped at 200              |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use phtax_core::calculations::{calculate_pagibig, calculate_phil_health, calculate_sss};
//!
//! assert_eq!(calculate_sss(dec!(50000)), dec!(1750));
//! assert_eq!(calculate_phil_health(dec!(50000)), dec!(1250));
//! assert_eq!(calculate_pagibig(dec!(50000)), dec!(200));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::RateTableError;
use crate::models::{ContributionRates, EmployerContributions, SssBracket};
use crate::rates::{CONTRIBUTION_RATES, sss_brackets};

/// Contribution calculator over an SSS table and a set of rates.
#[derive(Debug, Clone, Copy)]
pub struct ContributionCalculator<'a> {
    sss_table: &'a [SssBracket],
    rates: &'a ContributionRates,
}

impl Default for ContributionCalculator<'static> {
    fn default() -> Self {
        Self::new(sss_brackets(), &CONTRIBUTION_RATES)
    }
}

impl<'a> ContributionCalculator<'a> {
    pub fn new(
        sss_table: &'a [SssBracket],
        rates: &'a ContributionRates,
    ) -> Self {
        Self { sss_table, rates }
    }

    pub fn sss_table(&self) -> &'a [SssBracket] {
        self.sss_table
    }

    /// Finds the SSS row for `monthly_salary`.
    ///
    /// Rows are scanned in ascending order; the first row whose upper bound
    /// is at or above the salary wins. A salary above every bounded row
    /// falls back to the last row.
    pub fn sss_bracket(
        &self,
        monthly_salary: Decimal,
    ) -> Option<&'a SssBracket> {
        let bracket = self
            .sss_table
            .iter()
            .find(|b| b.covers(monthly_salary))
            .or_else(|| self.sss_table.last());

        if let Some(bracket) = bracket {
            debug!(
                salary = %monthly_salary,
                salary_credit = %bracket.salary_credit.total,
                "Selected SSS bracket"
            );
        }
        bracket
    }

    /// Employee SSS contribution.
    pub fn sss(
        &self,
        monthly_salary: Decimal,
    ) -> Decimal {
        warn_if_negative(monthly_salary);
        self.sss_bracket(monthly_salary)
            .map_or(Decimal::ZERO, |b| b.employee.total)
    }

    /// Employee PhilHealth premium.
    ///
    /// Salary above the income ceiling is ignored. There is no premium floor:
    /// a low salary yields a proportionally low premium.
    pub fn phil_health(
        &self,
        monthly_salary: Decimal,
    ) -> Decimal {
        warn_if_negative(monthly_salary);
        let rates = &self.rates.phil_health;
        monthly_salary.min(rates.income_ceiling) * (rates.rate / Decimal::TWO)
    }

    /// Employee Pag-IBIG contribution.
    pub fn pagibig(
        &self,
        monthly_salary: Decimal,
    ) -> Decimal {
        warn_if_negative(monthly_salary);
        let rates = &self.rates.pagibig;
        let rate = if monthly_salary <= rates.threshold {
            rates.low_rate
        } else {
            rates.high_rate
        };
        (monthly_salary * rate).min(rates.max_contribution)
    }

    /// Employer-side contributions for the same salary.
    ///
    /// The SSS figure includes the EC premium. The PhilHealth employer half
    /// equals the employee half.
    pub fn employer_contributions(
        &self,
        monthly_salary: Decimal,
    ) -> EmployerContributions {
        let sss_contribution = self
            .sss_bracket(monthly_salary)
            .map_or(Decimal::ZERO, |b| b.employer.total);
        let phil_health_contribution = self.phil_health(monthly_salary);
        let pagibig = &self.rates.pagibig;
        let pagibig_contribution =
            (monthly_salary * pagibig.employer_rate).min(pagibig.max_contribution);

        EmployerContributions {
            sss_contribution,
            phil_health_contribution,
            pagibig_contribution,
            total_contributions: sss_contribution + phil_health_contribution + pagibig_contribution,
        }
    }

    /// Checks the SSS table for ordering, gaps and inconsistent totals.
    ///
    /// Consecutive rows must meet exactly one centavo apart, the first row
    /// must start at 0 and only the last row may be unbounded.
    ///
    /// # Errors
    ///
    /// Returns the first [`RateTableError`] found.
    pub fn validate_sss_table(&self) -> Result<(), RateTableError> {
        let Some(first) = self.sss_table.first() else {
            return Err(RateTableError::Empty);
        };
        if !first.compensation_min.is_zero() {
            return Err(RateTableError::FirstBracketNotZero(first.compensation_min));
        }

        let cent = Decimal::new(1, 2);
        let last_index = self.sss_table.len() - 1;
        let mut expected_min = Decimal::ZERO;

        for (index, bracket) in self.sss_table.iter().enumerate() {
            if bracket.compensation_min != expected_min {
                return Err(RateTableError::Gap {
                    index,
                    expected: expected_min,
                    found: bracket.compensation_min,
                });
            }

            let parts = bracket.employer.total + bracket.employee.total;
            if parts != bracket.total_contribution {
                return Err(RateTableError::InconsistentTotal {
                    index,
                    expected: parts,
                    found: bracket.total_contribution,
                });
            }

            match bracket.compensation_max {
                None if index != last_index => {
                    return Err(RateTableError::UnboundedBeforeEnd { index });
                }
                None => {}
                Some(_) if index == last_index => return Err(RateTableError::LastBracketBounded),
                Some(max) => expected_min = max + cent,
            }
        }

        Ok(())
    }
}

fn warn_if_negative(monthly_salary: Decimal) {
    if monthly_salary < Decimal::ZERO {
        warn!(salary = %monthly_salary, "Monthly salary is negative");
    }
}

/// Employee SSS contribution using the current table.
pub fn calculate_sss(monthly_salary: Decimal) -> Decimal {
    ContributionCalculator::default().sss(monthly_salary)
}

/// Employee PhilHealth premium using the current rates.
pub fn calculate_phil_health(monthly_salary: Decimal) -> Decimal {
    ContributionCalculator::default().phil_health(monthly_salary)
}

/// Employee Pag-IBIG contribution using the current rates.
pub fn calculate_pagibig(monthly_salary: Decimal) -> Decimal {
    ContributionCalculator::default().pagibig(monthly_salary)
}

/// Employer-side contributions using the current tables.
pub fn calculate_employer_contributions(monthly_salary: Decimal) -> EmployerContributions {
    ContributionCalculator::default().employer_contributions(monthly_salary)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // SSS tests
    // =========================================================================

    #[test]
    fn sss_lowest_bracket_for_zero_salary() {
        assert_eq!(calculate_sss(dec!(0)), dec!(250));
    }

    #[test]
    fn sss_uses_range_upper_bound_inclusively() {
        assert_eq!(calculate_sss(dec!(5249.99)), dec!(250));
        assert_eq!(calculate_sss(dec!(5250)), dec!(275));
    }

    #[test]
    fn sss_fractional_centavo_above_row_max_goes_to_next_row() {
        assert_eq!(calculate_sss(dec!(5249.995)), dec!(275));
        assert_eq!(calculate_sss(dec!(5249.991)), dec!(275));
        assert_eq!(calculate_sss(dec!(5249.989)), dec!(250));
    }

    #[test]
    fn sss_mid_table_salary() {
        // Credit 20,000 covers 19,750 to 20,249.99
        assert_eq!(calculate_sss(dec!(20000)), dec!(1000));
    }

    #[test]
    fn sss_high_salary_uses_top_row() {
        assert_eq!(calculate_sss(dec!(34750)), dec!(1750));
        assert_eq!(calculate_sss(dec!(50000)), dec!(1750));
        assert_eq!(calculate_sss(dec!(1000000)), dec!(1750));
    }

    #[test]
    fn sss_falls_back_to_last_row_when_table_is_bounded() {
        let mut table: Vec<SssBracket> = sss_brackets()[..3].to_vec();
        table[2].compensation_max = Some(dec!(6249.99));
        let calculator = ContributionCalculator::new(&table, &CONTRIBUTION_RATES);

        assert_eq!(calculator.sss(dec!(90000)), dec!(300));
    }

    #[test]
    fn sss_with_empty_table_is_zero() {
        let calculator = ContributionCalculator::new(&[], &CONTRIBUTION_RATES);

        assert_eq!(calculator.sss(dec!(20000)), dec!(0));
    }

    #[test]
    fn sss_is_non_decreasing_and_flat_above_cap() {
        let mut previous = Decimal::ZERO;
        let mut salary = Decimal::ZERO;

        while salary <= dec!(60000) {
            let contribution = calculate_sss(salary);
            assert!(contribution >= previous, "decreased at {salary}");
            if salary >= dec!(34750) {
                assert_eq!(contribution, dec!(1750));
            }
            previous = contribution;
            salary += dec!(137.31);
        }
    }

    #[test]
    fn validate_sss_table_accepts_current_table() {
        assert_eq!(ContributionCalculator::default().validate_sss_table(), Ok(()));
    }

    #[test]
    fn validate_sss_table_rejects_gap() {
        let mut table = sss_brackets().to_vec();
        table[4].compensation_min = dec!(7000);
        let calculator = ContributionCalculator::new(&table, &CONTRIBUTION_RATES);

        assert_eq!(
            calculator.validate_sss_table(),
            Err(RateTableError::Gap {
                index: 4,
                expected: dec!(6750),
                found: dec!(7000),
            })
        );
    }

    #[test]
    fn validate_sss_table_rejects_bad_total() {
        let mut table = sss_brackets().to_vec();
        table[0].total_contribution = dec!(700);
        let calculator = ContributionCalculator::new(&table, &CONTRIBUTION_RATES);

        assert_eq!(
            calculator.validate_sss_table(),
            Err(RateTableError::InconsistentTotal {
                index: 0,
                expected: dec!(760),
                found: dec!(700),
            })
        );
    }

    #[test]
    fn validate_sss_table_rejects_bounded_last_row() {
        let table = sss_brackets()[..3].to_vec();
        let calculator = ContributionCalculator::new(&table, &CONTRIBUTION_RATES);

        assert_eq!(
            calculator.validate_sss_table(),
            Err(RateTableError::LastBracketBounded)
        );
    }

    // =========================================================================
    // PhilHealth tests
    // =========================================================================

    #[test]
    fn phil_health_is_half_the_combined_rate() {
        assert_eq!(calculate_phil_health(dec!(50000)), dec!(1250));
    }

    #[test]
    fn phil_health_caps_salary_at_ceiling() {
        assert_eq!(calculate_phil_health(dec!(100000)), dec!(2500));
        assert_eq!(calculate_phil_health(dec!(250000)), dec!(2500));
    }

    #[test]
    fn phil_health_has_no_premium_floor() {
        // An older schedule raised this to a 275 minimum; the income-ceiling
        // schedule applies the rate directly.
        assert_eq!(calculate_phil_health(dec!(5000)), dec!(125));
        assert_eq!(calculate_phil_health(dec!(0)), dec!(0));
    }

    // =========================================================================
    // Pag-IBIG tests
    // =========================================================================

    #[test]
    fn pagibig_low_rate_at_threshold() {
        assert_eq!(calculate_pagibig(dec!(1500)), dec!(15));
    }

    #[test]
    fn pagibig_high_rate_above_threshold() {
        assert_eq!(calculate_pagibig(dec!(1500.01)), dec!(30.0002));
        assert_eq!(calculate_pagibig(dec!(8000)), dec!(160));
    }

    #[test]
    fn pagibig_is_capped() {
        assert_eq!(calculate_pagibig(dec!(10000)), dec!(200));
        assert_eq!(calculate_pagibig(dec!(50000)), dec!(200));
    }

    #[test]
    fn pagibig_never_exceeds_cap() {
        let mut salary = Decimal::ZERO;
        while salary <= dec!(200000) {
            assert!(calculate_pagibig(salary) <= dec!(200), "over cap at {salary}");
            salary += dec!(997.5);
        }
    }

    // =========================================================================
    // employer_contributions tests
    // =========================================================================

    #[test]
    fn employer_contributions_for_top_bracket() {
        let employer = calculate_employer_contributions(dec!(50000));

        assert_eq!(employer.sss_contribution, dec!(3530));
        assert_eq!(employer.phil_health_contribution, dec!(1250));
        assert_eq!(employer.pagibig_contribution, dec!(200));
        assert_eq!(employer.total_contributions, dec!(4980));
    }

    #[test]
    fn employer_pagibig_uses_flat_rate_below_threshold() {
        let employer = calculate_employer_contributions(dec!(1000));

        assert_eq!(employer.pagibig_contribution, dec!(20));
        assert_eq!(employer.sss_contribution, dec!(510));
    }
}
