use rust_decimal::Decimal;
use thiserror::Error;

/// Consistency violations found when checking a rate table.
///
/// The calculators never return these; they come from the `validate`
/// helpers, which callers run once against the tables they intend to use.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    #[error("rate table is empty")]
    Empty,

    #[error("first bracket must start at 0, got {0}")]
    FirstBracketNotZero(Decimal),

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd { index: usize },

    #[error("last bracket must be unbounded")]
    LastBracketBounded,

    #[error("bracket {index} starts at {found}, expected {expected}")]
    Gap {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} has rate {rate}, expected a value between 0 and 1")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {index} has base tax {found}, expected {expected}")]
    InconsistentBaseTax {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} contribution total {found} does not match its parts ({expected})")]
    InconsistentTotal {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },
}
