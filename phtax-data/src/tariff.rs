//! AHTN tariff catalogue.
//!
//! ## CSV Format
//!
//! | Column        | Type    | Notes                                   |
//! |---------------|---------|-----------------------------------------|
//! | `ahtn`        | string  | e.g. `8471.30.20`                       |
//! | `description` | string  | Quote values containing commas          |
//! | `rate`        | decimal | Ad-valorem duty in percent, 0 to 100    |
//!
//! A catalogue ships with the crate (`data/tariffs.csv`); a replacement file
//! with the same columns can be loaded with [`TariffCatalogue::load_from_path`].

use std::io::Read;
use std::path::Path;

use phtax_core::TariffItem;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

const BUILTIN_TARIFFS: &str = include_str!("../data/tariffs.csv");

/// Number of matches returned by a description search unless told otherwise.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Errors that can occur when loading tariff data.
#[derive(Debug, Error)]
pub enum TariffLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read tariff file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("row {row} has an empty AHTN code")]
    MissingCode { row: usize },

    #[error("tariff {ahtn} has duty rate {rate}, expected 0 to 100")]
    InvalidRate { ahtn: String, rate: Decimal },
}

impl From<csv::Error> for TariffLoaderError {
    fn from(err: csv::Error) -> Self {
        TariffLoaderError::CsvParse(err.to_string())
    }
}

/// Parser for tariff CSV data.
pub struct TariffLoader;

impl TariffLoader {
    /// Parse tariff records from a CSV reader, in file order.
    ///
    /// Whitespace around values is trimmed.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TariffItem>, TariffLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut items = Vec::new();
        for (idx, result) in csv_reader.deserialize().enumerate() {
            let item: TariffItem = result?;
            let row = idx + 1;

            if item.ahtn.is_empty() {
                return Err(TariffLoaderError::MissingCode { row });
            }
            if item.rate < Decimal::ZERO || item.rate > Decimal::ONE_HUNDRED {
                return Err(TariffLoaderError::InvalidRate {
                    ahtn: item.ahtn,
                    rate: item.rate,
                });
            }
            items.push(item);
        }

        Ok(items)
    }
}

/// Searchable, read-only list of tariff lines.
#[derive(Debug, Clone, Default)]
pub struct TariffCatalogue {
    items: Vec<TariffItem>,
}

impl TariffCatalogue {
    /// The catalogue embedded in this crate.
    pub fn builtin() -> Result<Self, TariffLoaderError> {
        TariffLoader::parse(BUILTIN_TARIFFS.as_bytes()).map(Self::from_records)
    }

    pub fn from_records(items: Vec<TariffItem>) -> Self {
        Self { items }
    }

    /// Load a catalogue from a CSV file on disk.
    pub fn load_from_path(path: &Path) -> Result<Self, TariffLoaderError> {
        let file = std::fs::File::open(path).map_err(|source| TariffLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let items = TariffLoader::parse(file)?;
        debug!(path = %path.display(), count = items.len(), "Loaded tariff catalogue");
        Ok(Self::from_records(items))
    }

    pub fn items(&self) -> &[TariffItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items whose description contains `query`, ignoring case.
    ///
    /// At most `limit` items are returned, in catalogue order. A blank query
    /// matches nothing.
    pub fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Vec<&TariffItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.items
            .iter()
            .filter(|item| item.description.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    /// Looks up an item by AHTN code.
    ///
    /// Dots and spaces are ignored, so `84713020` finds `8471.30.20`.
    pub fn find_by_code(
        &self,
        code: &str,
    ) -> Option<&TariffItem> {
        let wanted = normalize_code(code);
        if wanted.is_empty() {
            return None;
        }
        self.items.iter().find(|item| normalize_code(&item.ahtn) == wanted)
    }
}

/// Drops punctuation and whitespace and upper-cases what is left.
fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
