//! Tax-rate reference catalogue.
//!
//! Each CSV row is one tier of a tax; consecutive rows sharing the same
//! `category` and `tax_type` make up one [`RateReference`]. Empty `max` and
//! `base_amount` cells mean "no upper bound" and "no fixed amount".

use std::io::Read;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_RATES: &str = include_str!("../data/tax_rates.csv");

/// Errors that can occur when loading the rate reference data.
#[derive(Debug, Error)]
pub enum RateReferenceLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("{tax_type}: tier {tier} has rate {rate}, expected 0 to 1")]
    InvalidRate {
        tax_type: String,
        tier: usize,
        rate: Decimal,
    },

    #[error("{tax_type}: tier {tier} has max {max} below min {min}")]
    InvertedRange {
        tax_type: String,
        tier: usize,
        min: Decimal,
        max: Decimal,
    },
}

impl From<csv::Error> for RateReferenceLoaderError {
    fn from(err: csv::Error) -> Self {
        RateReferenceLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the rate reference CSV.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateRecord {
    pub category: String,
    pub tax_type: String,
    pub description: String,
    pub effective_date: String,
    pub min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max: Option<Decimal>,
    /// Rate as a fraction (e.g. `0.12` for 12%).
    pub rate: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub base_amount: Option<Decimal>,
    pub tier_description: String,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// One tier of a tax or contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateTier {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub rate: Decimal,
    pub base_amount: Option<Decimal>,
    pub description: String,
}

/// Reference information for one tax type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateReference {
    pub category: String,
    pub tax_type: String,
    pub description: String,
    pub effective_date: String,
    pub tiers: Vec<RateTier>,
}

/// Parser for the rate reference CSV.
pub struct RateReferenceLoader;

impl RateReferenceLoader {
    /// Parse rows and group them into references.
    ///
    /// References keep the order in which their first row appears; tiers keep
    /// file order. Header details (description, effective date) come from the
    /// first row of each group.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RateReference>, RateReferenceLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut references: Vec<RateReference> = Vec::new();
        for result in csv_reader.deserialize() {
            let record: RateRecord = result?;

            let position = references
                .iter()
                .position(|r| r.category == record.category && r.tax_type == record.tax_type);
            let reference = match position {
                Some(idx) => &mut references[idx],
                None => {
                    references.push(RateReference {
                        category: record.category.clone(),
                        tax_type: record.tax_type.clone(),
                        description: record.description.clone(),
                        effective_date: record.effective_date.clone(),
                        tiers: Vec::new(),
                    });
                    let last = references.len() - 1;
                    &mut references[last]
                }
            };

            let tier = reference.tiers.len();
            if record.rate < Decimal::ZERO || record.rate > Decimal::ONE {
                return Err(RateReferenceLoaderError::InvalidRate {
                    tax_type: record.tax_type,
                    tier,
                    rate: record.rate,
                });
            }
            if let Some(max) = record.max.filter(|max| *max < record.min) {
                return Err(RateReferenceLoaderError::InvertedRange {
                    tax_type: record.tax_type,
                    tier,
                    min: record.min,
                    max,
                });
            }

            reference.tiers.push(RateTier {
                min: record.min,
                max: record.max,
                rate: record.rate,
                base_amount: record.base_amount,
                description: record.tier_description,
            });
        }

        Ok(references)
    }
}

/// Read-only collection of [`RateReference`] entries.
#[derive(Debug, Clone, Default)]
pub struct RateCatalogue {
    references: Vec<RateReference>,
}

impl RateCatalogue {
    /// The catalogue embedded in this crate.
    pub fn builtin() -> Result<Self, RateReferenceLoaderError> {
        RateReferenceLoader::parse(BUILTIN_RATES.as_bytes()).map(Self::from_references)
    }

    pub fn from_references(references: Vec<RateReference>) -> Self {
        Self { references }
    }

    pub fn references(&self) -> &[RateReference] {
        &self.references
    }

    /// Distinct category names in catalogue order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for reference in &self.references {
            if !categories.contains(&reference.category.as_str()) {
                categories.push(&reference.category);
            }
        }
        categories
    }

    /// All references in `category`, compared case-insensitively.
    pub fn by_category(
        &self,
        category: &str,
    ) -> Vec<&RateReference> {
        let category = category.trim();
        self.references
            .iter()
            .filter(|r| r.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// The reference for `tax_type`, compared case-insensitively.
    pub fn find(
        &self,
        tax_type: &str,
    ) -> Option<&RateReference> {
        let tax_type = tax_type.trim();
        self.references
            .iter()
            .find(|r| r.tax_type.eq_ignore_ascii_case(tax_type))
    }
}
