//! `phtax.toml` configuration.
//!
//! ```toml
//! [customs]
//! exchange_rate = "58.50"
//! brokerage_fee = "700"
//! excise_tax_rate = "0"
//!
//! [tariffs]
//! search_limit = 10
//! catalogue = "my_tariffs.csv"
//!
//! [logging]
//! level = "info"
//! file = "phtax.log"
//! ```
//!
//! Every table and key is optional.

use std::path::{Path, PathBuf};

use phtax_data::DEFAULT_SEARCH_LIMIT;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "PHTAX_CONFIG";

/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "phtax.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub customs: CustomsConfig,
    pub tariffs: TariffConfig,
    pub logging: LoggingConfig,
}

/// Defaults for the customs command's optional arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomsConfig {
    /// PHP per USD. No default; the command prints a hint when unset.
    pub exchange_rate: Option<Decimal>,
    pub brokerage_fee: Decimal,
    /// Whole-number percent.
    pub excise_tax_rate: Decimal,
}

impl Default for CustomsConfig {
    fn default() -> Self {
        Self {
            exchange_rate: None,
            brokerage_fee: Decimal::from(700),
            excise_tax_rate: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    pub search_limit: usize,
    /// Replaces the embedded tariff catalogue when set.
    pub catalogue: Option<PathBuf>,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            search_limit: DEFAULT_SEARCH_LIMIT,
            catalogue: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Parses a TOML document. `origin` is only used in error messages.
    pub fn parse(
        contents: &str,
        origin: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Loads the configuration from the first source that applies:
    ///
    /// 1. `explicit` (the `--config` flag); must exist
    /// 2. the file named by `PHTAX_CONFIG`; must exist
    /// 3. `./phtax.toml`, when present
    /// 4. built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Self::load_from(explicit, from_env.as_deref(), Path::new(DEFAULT_CONFIG_FILE))
    }

    /// [`Config::load`] with the environment lookup and the working-directory
    /// file passed in.
    pub fn load_from(
        explicit: Option<&Path>,
        from_env: Option<&Path>,
        local: &Path,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit.or(from_env) {
            debug!(path = %path.display(), "Loading config");
            return Self::from_file(path);
        }
        if local.is_file() {
            debug!(path = %local.display(), "Loading config");
            return Self::from_file(local);
        }
        debug!("No config file; using defaults");
        Ok(Self::default())
    }
}
