//! Philippine compensation tax, VAT and customs duty calculators.

pub mod calculations;
pub mod error;
pub mod models;
pub mod rates;

pub use error::RateTableError;
pub use models::*;
