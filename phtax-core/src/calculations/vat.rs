//! Value-added tax decomposition.
//!
//! An amount is either VAT-exclusive (the net price, VAT is added on top) or
//! VAT-inclusive (the gross price, VAT is extracted from it).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use phtax_core::calculations::calculate_vat;
//!
//! let added = calculate_vat(dec!(1000), false);
//! assert_eq!(added.vat_amount, dec!(120));
//! assert_eq!(added.gross_amount, dec!(1120));
//!
//! let extracted = calculate_vat(dec!(1120), true);
//! assert_eq!(extracted.net_amount, dec!(1000));
//! assert_eq!(extracted.vat_amount, dec!(120));
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::VatCalculation;
use crate::rates::VAT_RATE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VatCalculator {
    rate: Decimal,
}

impl Default for VatCalculator {
    fn default() -> Self {
        Self::new(VAT_RATE)
    }
}

impl VatCalculator {
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Splits `amount` into net, VAT and gross parts.
    ///
    /// When `is_vat_inclusive` is true the amount is the gross price;
    /// otherwise it is the net price.
    pub fn calculate(
        &self,
        amount: Decimal,
        is_vat_inclusive: bool,
    ) -> VatCalculation {
        if amount < Decimal::ZERO {
            warn!(amount = %amount, "VAT amount is negative");
        }

        if is_vat_inclusive {
            let net_amount = amount / (Decimal::ONE + self.rate);
            VatCalculation {
                vat_amount: amount - net_amount,
                net_amount,
                gross_amount: amount,
            }
        } else {
            let vat_amount = amount * self.rate;
            VatCalculation {
                vat_amount,
                net_amount: amount,
                gross_amount: amount + vat_amount,
            }
        }
    }
}

/// VAT decomposition at the standard 12% rate.
pub fn calculate_vat(
    amount: Decimal,
    is_vat_inclusive: bool,
) -> VatCalculation {
    VatCalculator::default().calculate(amount, is_vat_inclusive)
}
