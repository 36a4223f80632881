//! Current-year rate tables.
//!
//! Every constant here is the single authoritative version used by the
//! calculators. Historical schedules are intentionally absent.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    ContributionRates, EmployeeShare, EmployerShare, IncomeTaxBracket, MonthlySalaryCredit,
    PagibigRates, PhilHealthRates, SssBracket,
};

/// Graduated income tax rates for individuals (TRAIN law, 2023 onward).
pub static INCOME_TAX_BRACKETS: [IncomeTaxBracket; 6] = [
    IncomeTaxBracket {
        min_income: dec!(0),
        max_income: Some(dec!(250000)),
        tax_rate: dec!(0.00),
        base_tax: dec!(0),
    },
    IncomeTaxBracket {
        min_income: dec!(250000),
        max_income: Some(dec!(400000)),
        tax_rate: dec!(0.15),
        base_tax: dec!(0),
    },
    IncomeTaxBracket {
        min_income: dec!(400000),
        max_income: Some(dec!(800000)),
        tax_rate: dec!(0.20),
        base_tax: dec!(22500),
    },
    IncomeTaxBracket {
        min_income: dec!(800000),
        max_income: Some(dec!(2000000)),
        tax_rate: dec!(0.25),
        base_tax: dec!(102500),
    },
    IncomeTaxBracket {
        min_income: dec!(2000000),
        max_income: Some(dec!(8000000)),
        tax_rate: dec!(0.30),
        base_tax: dec!(402500),
    },
    IncomeTaxBracket {
        min_income: dec!(8000000),
        max_income: None,
        tax_rate: dec!(0.35),
        base_tax: dec!(2202500),
    },
];

pub static CONTRIBUTION_RATES: ContributionRates = ContributionRates {
    phil_health: PhilHealthRates {
        rate: dec!(0.05),
        income_ceiling: dec!(100000),
    },
    pagibig: PagibigRates {
        low_rate: dec!(0.01),
        high_rate: dec!(0.02),
        threshold: dec!(1500),
        employer_rate: dec!(0.02),
        max_contribution: dec!(200),
    },
};

pub const VAT_RATE: Decimal = dec!(0.12);

/// Insurance as a share of the FOB/FCA value when the cargo is not hazardous.
pub const INSURANCE_RATE: Decimal = dec!(0.02);
pub const DANGEROUS_CARGO_INSURANCE_RATE: Decimal = dec!(0.04);

pub const IMPORT_PROCESSING_CHARGE: Decimal = dec!(250);
pub const BIR_DOCUMENTARY_STAMP_TAX: Decimal = dec!(30);
pub const CUSTOMS_DOCUMENTARY_STAMP: Decimal = dec!(100);

/// Parameters the SSS contribution schedule is derived from.
///
/// The published schedule is a table of 500-peso salary-credit steps; every
/// row follows from these values, so the table is built rather than typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SssSchedule {
    pub min_salary_credit: Decimal,
    pub max_salary_credit: Decimal,
    pub credit_step: Decimal,
    /// Salary credit above this goes to the Mandatory Provident Fund.
    pub regular_ss_ceiling: Decimal,
    pub employee_rate: Decimal,
    pub employer_rate: Decimal,
    /// EC premium for salary credits below `ec_threshold`.
    pub ec_low: Decimal,
    pub ec_high: Decimal,
    pub ec_threshold: Decimal,
}

/// SSS schedule effective January 2025.
pub const SSS_SCHEDULE: SssSchedule = SssSchedule {
    min_salary_credit: dec!(5000),
    max_salary_credit: dec!(35000),
    credit_step: dec!(500),
    regular_ss_ceiling: dec!(20000),
    employee_rate: dec!(0.05),
    employer_rate: dec!(0.10),
    ec_low: dec!(10),
    ec_high: dec!(30),
    ec_threshold: dec!(15000),
};

impl SssSchedule {
    /// Expands the schedule into its bracket table, ascending by compensation.
    pub fn brackets(&self) -> Vec<SssBracket> {
        let half_step = self.credit_step / Decimal::TWO;
        let cent = Decimal::new(1, 2);

        let mut brackets = Vec::new();
        let mut credit = self.min_salary_credit;
        while credit <= self.max_salary_credit {
            let compensation_min = if credit == self.min_salary_credit {
                Decimal::ZERO
            } else {
                credit - half_step
            };
            let compensation_max = if credit == self.max_salary_credit {
                None
            } else {
                Some(credit + half_step - cent)
            };
            brackets.push(self.bracket_for_credit(credit, compensation_min, compensation_max));
            credit += self.credit_step;
        }
        brackets
    }

    fn bracket_for_credit(
        &self,
        credit: Decimal,
        compensation_min: Decimal,
        compensation_max: Option<Decimal>,
    ) -> SssBracket {
        let regular_credit = credit.min(self.regular_ss_ceiling);
        let mpf_credit = credit - regular_credit;
        let ec = if credit < self.ec_threshold {
            self.ec_low
        } else {
            self.ec_high
        };

        let employer = EmployerShare {
            regular_ss: regular_credit * self.employer_rate,
            mpf: mpf_credit * self.employer_rate,
            ec,
            total: (regular_credit + mpf_credit) * self.employer_rate + ec,
        };
        let employee = EmployeeShare {
            regular_ss: regular_credit * self.employee_rate,
            mpf: mpf_credit * self.employee_rate,
            total: (regular_credit + mpf_credit) * self.employee_rate,
        };

        SssBracket {
            compensation_min,
            compensation_max,
            salary_credit: MonthlySalaryCredit {
                regular_ss: regular_credit,
                mpf: mpf_credit,
                total: credit,
            },
            employer,
            employee,
            total_contribution: employer.total + employee.total,
        }
    }
}

static SSS_BRACKETS: LazyLock<Vec<SssBracket>> = LazyLock::new(|| SSS_SCHEDULE.brackets());

/// The current SSS contribution table.
pub fn sss_brackets() -> &'static [SssBracket] {
    &SSS_BRACKETS
}
