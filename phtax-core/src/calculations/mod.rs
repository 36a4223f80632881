//! Tax and customs calculators.
//!
//! Each calculator is a small struct over borrowed rate tables, with a free
//! function wrapper that uses the current tables from [`crate::rates`].
//! All calculations are pure; no result is rounded.

pub mod common;
pub mod compensation;
pub mod contributions;
pub mod customs;
pub mod income_tax;
pub mod vat;

pub use compensation::{CompensationCalculator, calculate_tax};
pub use contributions::{
    ContributionCalculator, calculate_employer_contributions, calculate_pagibig,
    calculate_phil_health, calculate_sss,
};
pub use customs::{CustomsDutyCalculator, CustomsRates, calculate_customs_duty};
pub use income_tax::{IncomeTaxSchedule, calculate_income_tax, tax_bracket_description};
pub use vat::{VatCalculator, calculate_vat};
