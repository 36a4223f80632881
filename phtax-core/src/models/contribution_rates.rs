use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhilHealthRates {
    /// Combined employee + employer premium rate, split evenly.
    pub rate: Decimal,
    /// Monthly income above this amount is not subject to the premium.
    pub income_ceiling: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagibigRates {
    pub low_rate: Decimal,
    pub high_rate: Decimal,
    /// Salaries at or below this use `low_rate`.
    pub threshold: Decimal,
    pub employer_rate: Decimal,
    pub max_contribution: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRates {
    pub phil_health: PhilHealthRates,
    pub pagibig: PagibigRates,
}
