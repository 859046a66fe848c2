//! Parse error types.

use crate::lexer::LexError;
use thiserror::Error;

/// Errors produced while parsing a condition fragment.
///
/// The parser does not recover: the first failure aborts the whole
/// compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token that cannot appear at this point in the grammar.
    #[error("unexpected token `{text}` at offset {offset}")]
    UnexpectedToken {
        /// Source text of the offending token.
        text: String,
        /// Byte offset of the token.
        offset: usize,
    },

    /// A parenthesized expression was never closed.
    #[error("missing closing parenthesis for group opened at offset {offset}")]
    UnclosedParen {
        /// Byte offset of the opening parenthesis.
        offset: usize,
    },

    /// An expression was required but none was present.
    #[error("empty expression")]
    EmptyExpression,

    /// The fragment failed to tokenize.
    #[error(transparent)]
    Lex(#[from] LexError),
}
