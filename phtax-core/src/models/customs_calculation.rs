use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shipment parameters for a customs duty computation.
///
/// Percentages (`rate_of_duty`, `excise_tax_rate`) are whole-number percents.
/// Foreign-currency amounts are in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomsInput {
    pub fob_fca_value: Decimal,
    pub freight: Decimal,
    pub exchange_rate: Decimal,
    pub rate_of_duty: Decimal,
    pub is_dangerous_cargo: bool,
    pub brokerage_fee: Decimal,
    pub excise_tax_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GoodsInfo {
    pub ahtn_code: String,
    pub description: String,
    pub rate_of_duty: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutiableValue {
    pub fob_fca_value: Decimal,
    pub freight: Decimal,
    pub insurance: Decimal,
    pub total_dutiable_value_foreign: Decimal,
    pub total_dutiable_value_php: Decimal,
}

/// Landed-cost view: includes the brokerage fee, excludes VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomsCharges {
    pub customs_duty: Decimal,
    pub excise_tax: Decimal,
    pub brokerage_fee: Decimal,
    pub import_processing_charge: Decimal,
    pub bir_documentary_stamp_tax: Decimal,
    pub customs_documentary_stamp: Decimal,
    pub total_landed_cost: Decimal,
}

/// Tax view: includes VAT, excludes the brokerage fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomsSummary {
    pub customs_duty: Decimal,
    pub vat: Decimal,
    pub excise_tax: Decimal,
    pub import_processing_charge: Decimal,
    pub bir_documentary_stamp_tax: Decimal,
    pub customs_documentary_stamp: Decimal,
    pub total_tax_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomsCalculation {
    pub goods: GoodsInfo,
    pub dutiable_value: DutiableValue,
    pub charges: CustomsCharges,
    pub summary: CustomsSummary,
}
