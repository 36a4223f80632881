use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tariff line from the ASEAN Harmonized Tariff Nomenclature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffItem {
    pub ahtn: String,
    pub description: String,
    /// Ad-valorem duty rate in percent (e.g. `10` for 10%).
    pub rate: Decimal,
}
