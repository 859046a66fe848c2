//! Binding and expansion error types.

use crate::lexer::LexError;
use thiserror::Error;

/// Caller-usage errors: a mismatch between a template and the arguments
/// bound against it. Distinct from lex/parse errors, which indicate
/// malformed template text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A parameter name was bound that the template never declares.
    #[error("unknown parameter `{name}`: not present in the compiled template")]
    UnknownParameter {
        /// The parameter name.
        name: String,
    },
}

/// Contract violations in an expansion request.
///
/// These indicate bad caller code rather than bad data, and are kept
/// distinct from [`BindError`] for that reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    /// The expansion list was not sorted strictly ascending by position.
    #[error("expansion list not sorted ascending by position at index {index}")]
    Unsorted {
        /// Index of the first out-of-order entry.
        index: usize,
    },

    /// An expansion referenced a position with no matching placeholder.
    #[error("expansion position {position} has no placeholder in a statement with {count}")]
    PositionOutOfRange {
        /// The offending 1-based position.
        position: usize,
        /// Number of placeholders actually present.
        count: usize,
    },

    /// The statement text failed to scan.
    #[error(transparent)]
    Scan(#[from] LexError),
}
