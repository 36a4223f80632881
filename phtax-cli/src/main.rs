use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use phtax_data::RateCatalogue;
use tracing::debug;

use phtax_cli::commands::{self, CustomsRequest};
use phtax_cli::utils::parse_amount;
use phtax_cli::{Config, OutputFormat, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Philippine tax calculators: compensation income tax, VAT and customs duty.
///
/// Amounts may be typed the way they are written ("₱50,000.00"); anything
/// other than digits and the first decimal point is ignored.
#[derive(Debug, Parser)]
#[command(name = "phtax", version, about)]
struct Cli {
    /// Config file (defaults to $PHTAX_CONFIG, then ./phtax.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log level or filter directive; overrides the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Monthly withholding tax, contributions and net pay for a salary.
    Compensation {
        /// Gross monthly salary in PHP.
        #[arg(allow_hyphen_values = true)]
        salary: String,

        /// Also show the employer's share of contributions.
        #[arg(long)]
        employer: bool,
    },

    /// Split an amount into net and 12% VAT.
    Vat {
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// The amount already includes VAT.
        #[arg(long)]
        inclusive: bool,
    },

    /// Duties, taxes and landed cost of an import shipment.
    Customs {
        /// FOB/FCA value in USD.
        #[arg(long)]
        fob: String,

        /// PHP per USD (defaults to [customs] exchange_rate).
        #[arg(long)]
        exchange_rate: Option<String>,

        /// Freight in USD.
        #[arg(long)]
        freight: Option<String>,

        /// Rate of duty in percent.
        #[arg(long, conflicts_with = "tariff")]
        duty_rate: Option<String>,

        /// AHTN code; takes the rate of duty from the tariff catalogue.
        #[arg(long)]
        tariff: Option<String>,

        /// Dangerous cargo (4% insurance instead of 2%).
        #[arg(long)]
        dangerous: bool,

        /// Brokerage fee in PHP (defaults to [customs] brokerage_fee).
        #[arg(long)]
        brokerage_fee: Option<String>,

        /// Excise tax in percent (defaults to [customs] excise_tax_rate).
        #[arg(long)]
        excise_rate: Option<String>,
    },

    /// Search the tariff catalogue by description.
    Tariffs {
        query: String,

        /// Maximum number of matches (defaults to [tariffs] search_limit).
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the tax-rate reference tables.
    Rates {
        /// Only this category, e.g. "Income Tax".
        #[arg(long)]
        category: Option<String>,
    },

    /// Validate the built-in rate tables and catalogues.
    Check,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    logging::init_logging(level, config.logging.file.as_deref())?;
    debug!(?config, "Configuration loaded");

    let format = cli.format;
    let output = match cli.command {
        Command::Compensation { salary, employer } => {
            commands::compensation(parse_amount(&salary), employer, format)?
        }
        Command::Vat { amount, inclusive } => {
            commands::vat(parse_amount(&amount), inclusive, format)?
        }
        Command::Customs {
            fob,
            exchange_rate,
            freight,
            duty_rate,
            tariff,
            dangerous,
            brokerage_fee,
            excise_rate,
        } => {
            let customs = &config.customs;
            let request = CustomsRequest {
                fob_fca_value: parse_amount(&fob),
                freight: freight.as_deref().map(parse_amount).unwrap_or_default(),
                exchange_rate: exchange_rate
                    .as_deref()
                    .map(parse_amount)
                    .or(customs.exchange_rate)
                    .unwrap_or_default(),
                duty_rate: duty_rate.as_deref().map(parse_amount).unwrap_or_default(),
                tariff_code: tariff,
                is_dangerous_cargo: dangerous,
                brokerage_fee: brokerage_fee
                    .as_deref()
                    .map(parse_amount)
                    .unwrap_or(customs.brokerage_fee),
                excise_tax_rate: excise_rate
                    .as_deref()
                    .map(parse_amount)
                    .unwrap_or(customs.excise_tax_rate),
            };
            let catalogue = match request.tariff_code {
                Some(_) => commands::load_tariffs(&config.tariffs)?,
                None => Default::default(),
            };
            commands::customs(&request, &catalogue, format)?
        }
        Command::Tariffs { query, limit } => {
            let catalogue = commands::load_tariffs(&config.tariffs)?;
            let limit = limit.unwrap_or(config.tariffs.search_limit);
            commands::tariffs(&catalogue, &query, limit, format)?
        }
        Command::Rates { category } => {
            let catalogue = RateCatalogue::builtin().context("loading rate reference catalogue")?;
            commands::rates(&catalogue, category.as_deref(), format)?
        }
        Command::Check => {
            let outcomes = commands::run_checks(&config.tariffs);
            println!("{}", phtax_cli::report::checks(&outcomes, format)?.trim_end());
            let failed = outcomes.iter().filter(|o| !o.passed).count();
            if failed > 0 {
                bail!("{failed} check(s) failed");
            }
            return Ok(());
        }
    };

    println!("{}", output.trim_end());
    Ok(())
}
