//! Reference data for the Philippine tax calculators: the AHTN tariff
//! catalogue and the tax-rate reference catalogue.

pub mod rate_reference;
pub mod tariff;

pub use rate_reference::{
    RateCatalogue, RateRecord, RateReference, RateReferenceLoader, RateReferenceLoaderError,
    RateTier,
};
pub use tariff::{DEFAULT_SEARCH_LIMIT, TariffCatalogue, TariffLoader, TariffLoaderError};
