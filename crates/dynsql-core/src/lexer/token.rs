//! Token types for the template condition language.

use super::Span;

/// The kind of token produced by the lexer.
///
/// This is a closed set. The condition grammar consumes a subset of it;
/// the remaining punctuation belongs to template features that share the
/// same token stream.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Integer literal (e.g. `42`).
    Int(i64),
    /// Long literal (e.g. `42L`).
    Long(i64),
    /// Hexadecimal integer literal (e.g. `0xFF`).
    HexInt(i64),
    /// Hexadecimal long literal (e.g. `0xFFL`).
    HexLong(i64),
    /// Real literal (e.g. `3.14`, `1e10`, `2.5d`).
    Real(f64),
    /// Single-precision real literal (e.g. `3.4f`).
    Float(f32),
    /// String literal in any of the three quote syntaxes.
    Str(String),
    /// Identifier (e.g. `user_name`, `$tmp`).
    Ident(String),

    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// :
    Colon,
    /// #
    Hash,
    /// .
    Dot,
    /// @
    At,
    /// !
    Bang,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// = or ==
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// Logical AND, produced from its word spelling.
    And,

    /// End of input.
    Eof,
}

/// Alternative word spellings for operator tokens, sorted by spelling so
/// lookup is a binary search over a read-only table.
const OPERATOR_SPELLINGS: &[(&str, TokenKind)] = &[
    ("and", TokenKind::And),
    ("div", TokenKind::Slash),
    ("eq", TokenKind::Eq),
    ("ge", TokenKind::GtEq),
    ("gt", TokenKind::Gt),
    ("le", TokenKind::LtEq),
    ("lt", TokenKind::Lt),
    ("mod", TokenKind::Percent),
    ("ne", TokenKind::NotEq),
    ("neq", TokenKind::NotEq),
    ("not", TokenKind::NotEq),
];

/// Looks up the operator token for an alternative word spelling.
///
/// Matching is case-insensitive. Only 2-3 character identifiers can be
/// spellings; anything longer stays an identifier.
#[must_use]
pub fn operator_for_word(word: &str) -> Option<TokenKind> {
    if !(2..=3).contains(&word.len()) {
        return None;
    }
    let lower = word.to_ascii_lowercase();
    OPERATOR_SPELLINGS
        .binary_search_by_key(&lower.as_str(), |&(spelling, _)| spelling)
        .ok()
        .map(|idx| OPERATOR_SPELLINGS[idx].1.clone())
}

/// A token with its location in the template source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The byte range in the source.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is the end-of-input token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the source text this token was produced from.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spelling_table_is_sorted() {
        assert!(
            OPERATOR_SPELLINGS
                .windows(2)
                .all(|pair| pair[0].0 < pair[1].0)
        );
    }

    #[test]
    fn test_operator_for_word() {
        assert_eq!(operator_for_word("eq"), Some(TokenKind::Eq));
        assert_eq!(operator_for_word("GE"), Some(TokenKind::GtEq));
        assert_eq!(operator_for_word("NeQ"), Some(TokenKind::NotEq));
        assert_eq!(operator_for_word("mod"), Some(TokenKind::Percent));
        assert_eq!(operator_for_word("and"), Some(TokenKind::And));
    }

    #[test]
    fn test_non_spellings_stay_identifiers() {
        assert_eq!(operator_for_word("neqx"), None);
        assert_eq!(operator_for_word("e"), None);
        assert_eq!(operator_for_word("count"), None);
        assert_eq!(operator_for_word("id"), None);
    }

    #[test]
    fn test_token_is_eof() {
        let eof = Token::new(TokenKind::Eof, Span::new(4, 4));
        let ident = Token::new(TokenKind::Ident(String::from("a")), Span::new(0, 1));
        assert!(eof.is_eof());
        assert!(!ident.is_eof());
    }

    #[test]
    fn test_token_text() {
        let source = "name >= 10";
        let op = Token::new(TokenKind::GtEq, Span::new(5, 7));
        assert_eq!(op.text(source), ">=");
    }
}
