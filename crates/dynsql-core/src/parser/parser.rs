//! Recursive-descent parser for condition fragments.

use super::ParseError;
use crate::ast::{ComparisonOp, Expr, Literal};
use crate::lexer::{Lexer, Token, TokenKind};

/// Maps a token to its comparison operator, if it is one.
const fn comparison_op(kind: &TokenKind) -> Option<ComparisonOp> {
    match kind {
        TokenKind::Eq => Some(ComparisonOp::Eq),
        TokenKind::NotEq => Some(ComparisonOp::NotEq),
        TokenKind::Lt => Some(ComparisonOp::Lt),
        TokenKind::LtEq => Some(ComparisonOp::LtEq),
        TokenKind::Gt => Some(ComparisonOp::Gt),
        TokenKind::GtEq => Some(ComparisonOp::GtEq),
        _ => None,
    }
}

/// Condition fragment parser.
///
/// Precedence tiers, lowest to highest: logical AND, comparison, atom.
pub struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser for `input`, tokenizing it eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Lex`] when the input fails to tokenize.
    pub fn new(input: &'a str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self {
            input,
            tokens,
            pos: 0,
        })
    }

    /// Parses `input` as a complete condition expression.
    ///
    /// # Errors
    ///
    /// Fails when the input does not tokenize, does not match the condition
    /// grammar, or carries trailing tokens.
    pub fn parse(input: &'a str) -> Result<Expr, ParseError> {
        let mut parser = Self::new(input)?;
        let expr = parser.parse_expression()?;
        parser.expect_eof()?;
        Ok(expr)
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Moves past the current token; the trailing Eof token is never left.
    fn bump(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> ParseError {
        let token = self.current();
        let text = if token.is_eof() {
            String::from("<eof>")
        } else {
            String::from(token.text(self.input))
        };
        ParseError::UnexpectedToken {
            text,
            offset: token.span.start,
        }
    }

    /// Parses a full expression (the AND tier).
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyExpression`] when no expression is
    /// present, or any error from the tiers below.
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        if self.current().is_eof() {
            return Err(ParseError::EmptyExpression);
        }
        self.parse_and()
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_comparison()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_comparison()?;
            expr = expr.and(right);
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_atom()?;
        while let Some(op) = comparison_op(&self.current().kind) {
            self.bump();
            let right = self.parse_atom()?;
            expr = expr.comparison(op, right);
        }
        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Int(v)
            | TokenKind::Long(v)
            | TokenKind::HexInt(v)
            | TokenKind::HexLong(v) => {
                self.bump();
                Ok(Expr::Literal(Literal::Int(v)))
            }
            TokenKind::Real(v) => {
                self.bump();
                Ok(Expr::Literal(Literal::Real(v)))
            }
            TokenKind::Float(v) => {
                self.bump();
                Ok(Expr::Literal(Literal::Real(f64::from(v))))
            }
            TokenKind::Str(value) => {
                self.bump();
                Ok(Expr::Literal(Literal::Str(value)))
            }
            TokenKind::Ident(_) => self.parse_column(),
            TokenKind::LeftParen => self.parse_group(),
            _ => Err(self.unexpected()),
        }
    }

    /// Parses a column reference: an optional binary-collation marker, then
    /// a bare or dotted identifier chain.
    fn parse_column(&mut self) -> Result<Expr, ParseError> {
        let mut binary_collation = false;
        if let TokenKind::Ident(word) = &self.current().kind {
            if word.eq_ignore_ascii_case("binary") && self.next_is_ident() {
                binary_collation = true;
                self.bump();
            }
        }

        let mut name = self.expect_ident()?;
        let mut qualified = false;
        while self.eat(&TokenKind::Dot) {
            qualified = true;
            name.push('.');
            name.push_str(&self.expect_ident()?);
        }

        Ok(Expr::Column {
            name,
            qualified,
            binary_collation,
        })
    }

    fn next_is_ident(&self) -> bool {
        matches!(
            self.tokens.get(self.pos + 1).map(|t| &t.kind),
            Some(TokenKind::Ident(_))
        )
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = &self.current().kind {
            let name = name.clone();
            self.bump();
            Ok(name)
        } else {
            Err(self.unexpected())
        }
    }

    /// Parses a parenthesized sub-expression or comma-separated list.
    fn parse_group(&mut self) -> Result<Expr, ParseError> {
        let open_offset = self.current().span.start;
        self.bump(); // (

        if self.check(&TokenKind::RightParen) {
            return Err(ParseError::EmptyExpression);
        }

        let first = self.parse_and()?;
        if self.check(&TokenKind::Comma) {
            let mut items = vec![first];
            while self.eat(&TokenKind::Comma) {
                items.push(self.parse_and()?);
            }
            if self.eat(&TokenKind::RightParen) {
                return Ok(Expr::List(items));
            }
            return Err(ParseError::UnclosedParen {
                offset: open_offset,
            });
        }

        if self.eat(&TokenKind::RightParen) {
            Ok(first)
        } else {
            Err(ParseError::UnclosedParen {
                offset: open_offset,
            })
        }
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if self.current().is_eof() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison() {
        let expr = Parser::parse("age >= 18").unwrap();
        assert_eq!(
            expr,
            Expr::column("age").comparison(ComparisonOp::GtEq, Expr::Literal(Literal::Int(18)))
        );
    }

    #[test]
    fn test_word_operator_comparison() {
        assert_eq!(
            Parser::parse("age ge 18").unwrap(),
            Parser::parse("age >= 18").unwrap()
        );
        assert_eq!(
            Parser::parse("status neq 'gone'").unwrap(),
            Parser::parse("status <> 'gone'").unwrap()
        );
    }

    #[test]
    fn test_and_is_left_leaning() {
        let expr = Parser::parse("a = 1 and b = 2 and c = 3").unwrap();
        let Expr::And { left, right } = &expr else {
            panic!("expected a conjunction, got {expr:?}");
        };
        assert!(matches!(**left, Expr::And { .. }));
        assert!(matches!(**right, Expr::Comparison { .. }));
    }

    #[test]
    fn test_qualified_column() {
        let expr = Parser::parse("t.status = 'active'").unwrap();
        let Expr::Comparison { left, .. } = expr else {
            panic!("expected a comparison");
        };
        assert_eq!(
            *left,
            Expr::Column {
                name: String::from("t.status"),
                qualified: true,
                binary_collation: false,
            }
        );
    }

    #[test]
    fn test_binary_collation_marker() {
        let expr = Parser::parse("binary name = 'Ab'").unwrap();
        let Expr::Comparison { left, .. } = expr else {
            panic!("expected a comparison");
        };
        assert_eq!(
            *left,
            Expr::Column {
                name: String::from("name"),
                qualified: false,
                binary_collation: true,
            }
        );
    }

    #[test]
    fn test_binary_alone_is_a_column() {
        // Without a following identifier, `binary` is an ordinary column.
        let expr = Parser::parse("binary = 1").unwrap();
        let Expr::Comparison { left, .. } = expr else {
            panic!("expected a comparison");
        };
        assert_eq!(*left, Expr::column("binary"));
    }

    #[test]
    fn test_parenthesized_group() {
        assert_eq!(
            Parser::parse("(a = 1)").unwrap(),
            Parser::parse("a = 1").unwrap()
        );
    }

    #[test]
    fn test_expression_list() {
        let expr = Parser::parse("(1, 2, 3)").unwrap();
        assert_eq!(
            expr,
            Expr::List(vec![
                Expr::Literal(Literal::Int(1)),
                Expr::Literal(Literal::Int(2)),
                Expr::Literal(Literal::Int(3)),
            ])
        );
    }

    #[test]
    fn test_grouping_overrides_chaining() {
        let expr = Parser::parse("a and (b and c)").unwrap();
        let Expr::And { left, right } = &expr else {
            panic!("expected a conjunction, got {expr:?}");
        };
        assert_eq!(**left, Expr::column("a"));
        assert!(matches!(**right, Expr::And { .. }));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Parser::parse(""), Err(ParseError::EmptyExpression));
        assert_eq!(Parser::parse("()"), Err(ParseError::EmptyExpression));
    }

    #[test]
    fn test_unclosed_paren() {
        assert_eq!(
            Parser::parse("(a = 1"),
            Err(ParseError::UnclosedParen { offset: 0 })
        );
    }

    #[test]
    fn test_missing_operand() {
        assert_eq!(
            Parser::parse("a ="),
            Err(ParseError::UnexpectedToken {
                text: String::from("<eof>"),
                offset: 3,
            })
        );
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        assert!(matches!(
            Parser::parse("a = 1 b"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_tokens_outside_grammar_rejected() {
        assert!(matches!(
            Parser::parse("# = 1"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_lex_failure_surfaces() {
        assert!(matches!(
            Parser::parse("a = 'oops"),
            Err(ParseError::Lex(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        let expr = Parser::parse("t.status = 'active' and t.age ge 18").unwrap();
        assert_eq!(expr.to_string(), "t.status = 'active' AND t.age >= 18");
    }
}
