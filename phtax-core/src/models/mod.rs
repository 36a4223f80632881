mod contribution_rates;
mod customs_calculation;
mod income_tax_bracket;
mod sss_bracket;
mod tariff_item;
mod tax_calculation;
mod vat_calculation;

pub use contribution_rates::{ContributionRates, PagibigRates, PhilHealthRates};
pub use customs_calculation::{
    CustomsCalculation, CustomsCharges, CustomsInput, CustomsSummary, DutiableValue, GoodsInfo,
};
pub use income_tax_bracket::IncomeTaxBracket;
pub use sss_bracket::{EmployeeShare, EmployerShare, MonthlySalaryCredit, SssBracket};
pub use tariff_item::TariffItem;
pub use tax_calculation::{EmployerContributions, TaxCalculation};
pub use vat_calculation::VatCalculation;
