use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the progressive income tax schedule.
///
/// `max_income` is an inclusive upper bound; `None` marks the open-ended top
/// bracket. `base_tax` is the tax already owed at `min_income`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub base_tax: Decimal,
}

impl IncomeTaxBracket {
    /// Whether an ascending scan stops at this bracket for `income`.
    pub fn covers(
        &self,
        income: Decimal,
    ) -> bool {
        self.max_income.is_none_or(|max| income <= max)
    }
}
