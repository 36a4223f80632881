//! Customs duty and landed cost for imported goods.
//!
//! # Computation
//!
//! Each step uses the results of the steps before it.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Insurance: FOB/FCA × 2% (4% for dangerous cargo) |
//! | 2    | Dutiable value (USD): FOB/FCA + freight + insurance |
//! | 3    | Dutiable value (PHP): step 2 × exchange rate |
//! | 4    | Customs duty: step 3 × rate of duty |
//! | 5    | Excise tax: step 3 × excise rate (zero when the rate is zero) |
//! | 6    | Fixed charges: import processing 250, BIR documentary stamp 30, customs documentary stamp 100 |
//! | 7    | Total landed cost: step 3 + duty + excise + brokerage + fixed charges |
//! | 8    | VAT: step 7 × 12% |
//! | 9    | Total tax: duty + VAT + excise + fixed charges |
//!
//! The brokerage fee is a service fee, not a tax: it is part of the landed
//! cost (and so of the VAT base) but not of the total tax amount.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use phtax_core::calculations::calculate_customs_duty;
//! use phtax_core::models::CustomsInput;
//!
//! let result = calculate_customs_duty(&CustomsInput {
//!     fob_fca_value: dec!(100),
//!     freight: dec!(0),
//!     exchange_rate: dec!(58.5),
//!     rate_of_duty: dec!(10),
//!     is_dangerous_cargo: false,
//!     brokerage_fee: dec!(700),
//!     excise_tax_rate: dec!(0),
//! });
//!
//! assert_eq!(result.dutiable_value.total_dutiable_value_php, dec!(5967));
//! assert_eq!(result.charges.total_landed_cost, dec!(7643.70));
//! assert_eq!(result.summary.vat, dec!(917.244));
//! assert_eq!(result.summary.total_tax_amount, dec!(1893.944));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::percent;
use crate::models::{
    CustomsCalculation, CustomsCharges, CustomsInput, CustomsSummary, DutiableValue, GoodsInfo,
    TariffItem,
};
use crate::rates::{
    BIR_DOCUMENTARY_STAMP_TAX, CUSTOMS_DOCUMENTARY_STAMP, DANGEROUS_CARGO_INSURANCE_RATE,
    IMPORT_PROCESSING_CHARGE, INSURANCE_RATE, VAT_RATE,
};

/// Fixed rates and charges applied to every import entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomsRates {
    pub insurance_rate: Decimal,
    pub dangerous_cargo_insurance_rate: Decimal,
    pub import_processing_charge: Decimal,
    pub bir_documentary_stamp_tax: Decimal,
    pub customs_documentary_stamp: Decimal,
    pub vat_rate: Decimal,
}

impl Default for CustomsRates {
    fn default() -> Self {
        Self {
            insurance_rate: INSURANCE_RATE,
            dangerous_cargo_insurance_rate: DANGEROUS_CARGO_INSURANCE_RATE,
            import_processing_charge: IMPORT_PROCESSING_CHARGE,
            bir_documentary_stamp_tax: BIR_DOCUMENTARY_STAMP_TAX,
            customs_documentary_stamp: CUSTOMS_DOCUMENTARY_STAMP,
            vat_rate: VAT_RATE,
        }
    }
}

impl CustomsRates {
    fn fixed_charges(&self) -> Decimal {
        self.import_processing_charge + self.bir_documentary_stamp_tax + self.customs_documentary_stamp
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CustomsDutyCalculator {
    rates: CustomsRates,
}

impl CustomsDutyCalculator {
    pub fn new(rates: CustomsRates) -> Self {
        Self { rates }
    }

    /// Runs the full landed-cost computation.
    ///
    /// The goods code and description in the result are empty; use
    /// [`calculate_for_tariff`] to carry a tariff line through.
    ///
    /// [`calculate_for_tariff`]: CustomsDutyCalculator::calculate_for_tariff
    ///
    /// # Panics
    ///
    /// Panics on `Decimal` overflow; check untrusted input with
    /// [`fits`](CustomsDutyCalculator::fits) first.
    pub fn calculate(
        &self,
        input: &CustomsInput,
    ) -> CustomsCalculation {
        if input.exchange_rate <= Decimal::ZERO {
            warn!(
                exchange_rate = %input.exchange_rate,
                "Exchange rate is not positive; PHP values will be zero or negative"
            );
        }

        // Steps 1-3
        let dutiable_value = self.dutiable_value(input);
        let php_value = dutiable_value.total_dutiable_value_php;

        // Steps 4-5
        let customs_duty = php_value * percent(input.rate_of_duty);
        let excise_tax = self.excise_tax(php_value, input.excise_tax_rate);

        // Steps 6-7
        let fixed_charges = self.rates.fixed_charges();
        let total_landed_cost =
            php_value + customs_duty + excise_tax + input.brokerage_fee + fixed_charges;

        // Steps 8-9
        let vat = total_landed_cost * self.rates.vat_rate;
        let total_tax_amount = customs_duty + vat + excise_tax + fixed_charges;

        debug!(
            dutiable_value_php = %php_value,
            customs_duty = %customs_duty,
            landed_cost = %total_landed_cost,
            vat = %vat,
            "Calculated customs duty"
        );

        CustomsCalculation {
            goods: GoodsInfo {
                ahtn_code: String::new(),
                description: String::new(),
                rate_of_duty: input.rate_of_duty,
            },
            dutiable_value,
            charges: CustomsCharges {
                customs_duty,
                excise_tax,
                brokerage_fee: input.brokerage_fee,
                import_processing_charge: self.rates.import_processing_charge,
                bir_documentary_stamp_tax: self.rates.bir_documentary_stamp_tax,
                customs_documentary_stamp: self.rates.customs_documentary_stamp,
                total_landed_cost,
            },
            summary: CustomsSummary {
                customs_duty,
                vat,
                excise_tax,
                import_processing_charge: self.rates.import_processing_charge,
                bir_documentary_stamp_tax: self.rates.bir_documentary_stamp_tax,
                customs_documentary_stamp: self.rates.customs_documentary_stamp,
                total_tax_amount,
            },
        }
    }

    /// Runs the computation with the duty rate taken from `item`.
    ///
    /// `input.rate_of_duty` is ignored; the result's goods section carries
    /// the item's code, description and rate.
    pub fn calculate_for_tariff(
        &self,
        item: &TariffItem,
        input: &CustomsInput,
    ) -> CustomsCalculation {
        let input = CustomsInput {
            rate_of_duty: item.rate,
            ..*input
        };
        let mut result = self.calculate(&input);
        result.goods = GoodsInfo {
            ahtn_code: item.ahtn.clone(),
            description: item.description.clone(),
            rate_of_duty: item.rate,
        };
        result
    }

    /// Whether every intermediate value of [`calculate`] for `input` fits in
    /// a `Decimal`.
    ///
    /// Estimates with absolute values and the higher insurance rate, so it
    /// may reject an input that would only just fit.
    ///
    /// [`calculate`]: CustomsDutyCalculator::calculate
    pub fn fits(
        &self,
        input: &CustomsInput,
    ) -> bool {
        self.largest_amount(input).is_some()
    }

    fn largest_amount(
        &self,
        input: &CustomsInput,
    ) -> Option<Decimal> {
        let insurance_rate = self
            .rates
            .insurance_rate
            .max(self.rates.dangerous_cargo_insurance_rate);
        let insurance = input.fob_fca_value.abs().checked_mul(insurance_rate)?;
        let foreign = input
            .fob_fca_value
            .abs()
            .checked_add(input.freight.abs())?
            .checked_add(insurance)?;
        let php = foreign.checked_mul(input.exchange_rate.abs())?;

        let percents = input.rate_of_duty.abs().checked_add(input.excise_tax_rate.abs())?;
        let duties = php.checked_mul(percent(percents))?;
        let landed = php
            .checked_add(duties)?
            .checked_add(input.brokerage_fee.abs())?
            .checked_add(self.rates.fixed_charges())?;
        let vat = landed.checked_mul(self.rates.vat_rate)?;

        landed.checked_add(vat)
    }

    fn insurance(
        &self,
        input: &CustomsInput,
    ) -> Decimal {
        let rate = if input.is_dangerous_cargo {
            self.rates.dangerous_cargo_insurance_rate
        } else {
            self.rates.insurance_rate
        };
        input.fob_fca_value * rate
    }

    fn dutiable_value(
        &self,
        input: &CustomsInput,
    ) -> DutiableValue {
        let insurance = self.insurance(input);
        let total_foreign = input.fob_fca_value + input.freight + insurance;

        DutiableValue {
            fob_fca_value: input.fob_fca_value,
            freight: input.freight,
            insurance,
            total_dutiable_value_foreign: total_foreign,
            total_dutiable_value_php: total_foreign * input.exchange_rate,
        }
    }

    fn excise_tax(
        &self,
        php_value: Decimal,
        excise_tax_rate: Decimal,
    ) -> Decimal {
        if excise_tax_rate > Decimal::ZERO {
            php_value * percent(excise_tax_rate)
        } else {
            Decimal::ZERO
        }
    }
}

/// Landed-cost computation with the standard charges.
///
/// # Panics
///
/// Panics on `Decimal` overflow, see [`CustomsDutyCalculator::fits`].
pub fn calculate_customs_duty(input: &CustomsInput) -> CustomsCalculation {
    CustomsDutyCalculator::default().calculate(input)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample_input() -> CustomsInput {
        CustomsInput {
            fob_fca_value: dec!(100),
            freight: dec!(0),
            exchange_rate: dec!(58.5),
            rate_of_duty: dec!(10),
            is_dangerous_cargo: false,
            brokerage_fee: dec!(700),
            excise_tax_rate: dec!(0),
        }
    }

    #[test]
    fn sample_shipment_fits() {
        assert!(CustomsDutyCalculator::default().fits(&sample_input()));
    }

    #[test]
    fn oversized_shipment_does_not_fit() {
        let calculator = CustomsDutyCalculator::default();
        let input = CustomsInput {
            fob_fca_value: dec!(1000000000000000),
            exchange_rate: dec!(1000000000000000),
            ..sample_input()
        };

        assert!(!calculator.fits(&input));
    }

    #[test]
    fn huge_duty_rate_does_not_fit() {
        let input = CustomsInput {
            fob_fca_value: dec!(1000000000000),
            exchange_rate: dec!(1000000),
            rate_of_duty: dec!(1000000000000000),
            ..sample_input()
        };

        assert!(!CustomsDutyCalculator::default().fits(&input));
    }

    #[test]
    fn sample_shipment_dutiable_value() {
        let result = calculate_customs_duty(&sample_input());

        assert_eq!(
            result.dutiable_value,
            DutiableValue {
                fob_fca_value: dec!(100),
                freight: dec!(0),
                insurance: dec!(2.00),
                total_dutiable_value_foreign: dec!(102.00),
                total_dutiable_value_php: dec!(5967.00),
            }
        );
    }

    #[test]
    fn sample_shipment_charges() {
        let result = calculate_customs_duty(&sample_input());

        assert_eq!(
            result.charges,
            CustomsCharges {
                customs_duty: dec!(596.70),
                excise_tax: dec!(0),
                brokerage_fee: dec!(700),
                import_processing_charge: dec!(250),
                bir_documentary_stamp_tax: dec!(30),
                customs_documentary_stamp: dec!(100),
                total_landed_cost: dec!(7643.70),
            }
        );
    }

    #[test]
    fn sample_shipment_summary() {
        let result = calculate_customs_duty(&sample_input());

        assert_eq!(
            result.summary,
            CustomsSummary {
                customs_duty: dec!(596.70),
                vat: dec!(917.244),
                excise_tax: dec!(0),
                import_processing_charge: dec!(250),
                bir_documentary_stamp_tax: dec!(30),
                customs_documentary_stamp: dec!(100),
                total_tax_amount: dec!(1893.944),
            }
        );
    }

    #[test]
    fn goods_info_is_blank_without_tariff() {
        let result = calculate_customs_duty(&sample_input());

        assert_eq!(
            result.goods,
            GoodsInfo {
                ahtn_code: String::new(),
                description: String::new(),
                rate_of_duty: dec!(10),
            }
        );
    }

    #[test]
    fn dangerous_cargo_doubles_insurance() {
        let input = CustomsInput {
            is_dangerous_cargo: true,
            ..sample_input()
        };

        let result = calculate_customs_duty(&input);

        assert_eq!(result.dutiable_value.insurance, dec!(4.00));
        assert_eq!(result.dutiable_value.total_dutiable_value_foreign, dec!(104.00));
    }

    #[test]
    fn freight_is_part_of_dutiable_value() {
        let input = CustomsInput {
            freight: dec!(25),
            ..sample_input()
        };

        let result = calculate_customs_duty(&input);

        // 100 + 25 + 2 = 127 USD at 58.5
        assert_eq!(result.dutiable_value.total_dutiable_value_php, dec!(7429.5));
    }

    #[test]
    fn excise_tax_enters_landed_cost_and_total_tax() {
        let input = CustomsInput {
            excise_tax_rate: dec!(20),
            ..sample_input()
        };

        let result = calculate_customs_duty(&input);

        // 20% of 5,967
        assert_eq!(result.charges.excise_tax, dec!(1193.4));
        assert_eq!(result.summary.excise_tax, dec!(1193.4));
        assert_eq!(result.charges.total_landed_cost, dec!(8837.1));
        // 12% of 8,837.10
        assert_eq!(result.summary.vat, dec!(1060.452));
        // 596.70 + 1,060.452 + 1,193.40 + 380
        assert_eq!(result.summary.total_tax_amount, dec!(3230.552));
    }

    #[test]
    fn negative_excise_rate_is_ignored() {
        let input = CustomsInput {
            excise_tax_rate: dec!(-5),
            ..sample_input()
        };

        let result = calculate_customs_duty(&input);

        assert_eq!(result.charges.excise_tax, dec!(0));
    }

    #[test]
    fn brokerage_fee_is_excluded_from_total_tax() {
        let without_fee = calculate_customs_duty(&CustomsInput {
            brokerage_fee: dec!(0),
            ..sample_input()
        });
        let with_fee = calculate_customs_duty(&sample_input());

        assert_eq!(
            with_fee.charges.total_landed_cost - without_fee.charges.total_landed_cost,
            dec!(700)
        );
        // Only the VAT on the fee reaches the total tax.
        assert_eq!(
            with_fee.summary.total_tax_amount - without_fee.summary.total_tax_amount,
            dec!(84)
        );
    }

    #[test]
    fn calculate_for_tariff_uses_item_rate() {
        let item = TariffItem {
            ahtn: "8471.30.20".to_string(),
            description: "Laptops and notebooks".to_string(),
            rate: dec!(0),
        };

        let result = CustomsDutyCalculator::default().calculate_for_tariff(&item, &sample_input());

        assert_eq!(result.goods.ahtn_code, "8471.30.20");
        assert_eq!(result.goods.description, "Laptops and notebooks");
        assert_eq!(result.goods.rate_of_duty, dec!(0));
        assert_eq!(result.charges.customs_duty, dec!(0));
    }

    #[test]
    fn custom_rates_change_fixed_charges() {
        let calculator = CustomsDutyCalculator::new(CustomsRates {
            import_processing_charge: dec!(500),
            ..CustomsRates::default()
        });

        let result = calculator.calculate(&sample_input());

        assert_eq!(result.charges.import_processing_charge, dec!(500));
        assert_eq!(result.charges.total_landed_cost, dec!(7893.70));
    }
}
