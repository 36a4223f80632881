use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySalaryCredit {
    pub regular_ss: Decimal,
    pub mpf: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerShare {
    pub regular_ss: Decimal,
    pub mpf: Decimal,
    pub ec: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeShare {
    pub regular_ss: Decimal,
    pub mpf: Decimal,
    pub total: Decimal,
}

/// One row of the SSS contribution schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SssBracket {
    pub compensation_min: Decimal,
    /// Inclusive upper bound; `None` on the last row.
    pub compensation_max: Option<Decimal>,
    pub salary_credit: MonthlySalaryCredit,
    pub employer: EmployerShare,
    pub employee: EmployeeShare,
    pub total_contribution: Decimal,
}

impl SssBracket {
    /// Whether an ascending scan stops at this row for `monthly_salary`.
    ///
    /// Only the upper bound is checked; rows earlier in the table have
    /// already claimed lower salaries.
    pub fn covers(
        &self,
        monthly_salary: Decimal,
    ) -> bool {
        self.compensation_max.is_none_or(|max| monthly_salary <= max)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::rates::sss_brackets;

    #[test]
    fn covers_checks_upper_bound_only() {
        let second = &sss_brackets()[1];

        assert!(second.covers(dec!(5749.99)));
        // below the row's minimum, but an ascending scan never reaches it there
        assert!(second.covers(dec!(100)));
        assert!(!second.covers(dec!(5750)));
    }

    #[test]
    fn last_row_covers_everything() {
        let last = sss_brackets().last().unwrap();

        assert!(last.covers(dec!(1000000)));
    }
}
