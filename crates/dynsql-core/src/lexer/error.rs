//! Lexical error types.

use thiserror::Error;

/// Errors produced while tokenizing template text.
///
/// A lex failure is fatal to the compilation that encountered it and is
/// never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A string literal was opened but never closed.
    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString {
        /// Byte offset of the opening delimiter.
        offset: usize,
    },

    /// A character with no meaning in the template language.
    #[error("unexpected character `{ch}` at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset of the character.
        offset: usize,
    },

    /// A real literal carried a long suffix (`L`/`l`).
    #[error("real literal at offset {offset} cannot take a long suffix")]
    LongSuffixOnReal {
        /// Byte offset of the start of the literal.
        offset: usize,
    },

    /// A numeric literal that does not fit its type.
    #[error("invalid numeric literal `{text}` at offset {offset}")]
    InvalidNumber {
        /// The literal text.
        text: String,
        /// Byte offset of the start of the literal.
        offset: usize,
    },
}
