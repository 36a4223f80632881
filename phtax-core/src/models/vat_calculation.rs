use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatCalculation {
    pub vat_amount: Decimal,
    pub net_amount: Decimal,
    pub gross_amount: Decimal,
}
