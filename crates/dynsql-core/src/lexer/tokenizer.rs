//! Tokenizer for the template condition language.

use super::token::operator_for_word;
use super::{LexError, Span, Token, TokenKind};

/// A lexer that tokenizes condition fragment text.
///
/// Total and terminating: every call consumes at least one byte or yields
/// the end-of-input token.
pub struct Lexer<'a> {
    /// The input text.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes the current character when it matches `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self
            .peek()
            .is_some_and(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
        {
            self.advance();
        }
    }

    /// Creates a token spanning from the token start to the current position.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    /// Scans an identifier, re-classifying 2-3 character word spellings of
    /// operators.
    fn scan_identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match operator_for_word(text) {
            Some(kind) => self.make_token(kind),
            None => self.make_token(TokenKind::Ident(String::from(text))),
        }
    }

    /// Scans a quoted string literal; doubling the delimiter escapes it.
    fn scan_string(&mut self, quote: char) -> Result<Token, LexError> {
        self.advance(); // opening delimiter
        let mut value = String::new();

        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    if self.peek_next() == Some(quote) {
                        value.push(quote);
                        self.advance();
                        self.advance();
                    } else {
                        self.advance();
                        return Ok(self.make_token(TokenKind::Str(value)));
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => {
                    return Err(LexError::UnterminatedString { offset: self.start });
                }
            }
        }
    }

    /// Scans a numeric literal.
    fn scan_number(&mut self) -> Result<Token, LexError> {
        if self.peek() == Some('0') && matches!(self.peek_next(), Some('x' | 'X')) {
            return self.scan_hex();
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let mut is_real = false;

        // A dot only joins the literal when a digit follows; `3.` stays an
        // integer so member access after a literal still lexes.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_real = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) && self.exponent_follows() {
            is_real = true;
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let digits_end = self.pos;
        match self.peek() {
            Some('l' | 'L') => {
                if is_real {
                    return Err(LexError::LongSuffixOnReal { offset: self.start });
                }
                self.advance();
                let value = self.parse_int(digits_end)?;
                Ok(self.make_token(TokenKind::Long(value)))
            }
            Some('f' | 'F') => {
                self.advance();
                let value = self.parse_f32(digits_end)?;
                Ok(self.make_token(TokenKind::Float(value)))
            }
            Some('d' | 'D') => {
                self.advance();
                let value = self.parse_f64(digits_end)?;
                Ok(self.make_token(TokenKind::Real(value)))
            }
            _ if is_real => {
                let value = self.parse_f64(digits_end)?;
                Ok(self.make_token(TokenKind::Real(value)))
            }
            _ => {
                let value = self.parse_int(digits_end)?;
                Ok(self.make_token(TokenKind::Int(value)))
            }
        }
    }

    /// Returns true when the `e`/`E` at the current position starts a valid
    /// exponent (a digit, or a sign followed by a digit).
    fn exponent_follows(&self) -> bool {
        let mut chars = self.input[self.pos..].chars();
        chars.next(); // e / E
        match chars.next() {
            Some(c) if c.is_ascii_digit() => true,
            Some('+' | '-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    /// Scans a hexadecimal literal (`0x...`, optionally long-suffixed).
    fn scan_hex(&mut self) -> Result<Token, LexError> {
        self.advance(); // 0
        self.advance(); // x / X
        let digits_start = self.pos;

        while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.advance();
        }
        if self.pos == digits_start {
            return Err(self.invalid_number());
        }

        let value = i64::from_str_radix(&self.input[digits_start..self.pos], 16)
            .map_err(|_| self.invalid_number())?;

        if matches!(self.peek(), Some('l' | 'L')) {
            self.advance();
            Ok(self.make_token(TokenKind::HexLong(value)))
        } else {
            Ok(self.make_token(TokenKind::HexInt(value)))
        }
    }

    fn parse_int(&self, end: usize) -> Result<i64, LexError> {
        self.input[self.start..end]
            .parse()
            .map_err(|_| self.invalid_number())
    }

    fn parse_f64(&self, end: usize) -> Result<f64, LexError> {
        self.input[self.start..end]
            .parse()
            .map_err(|_| self.invalid_number())
    }

    fn parse_f32(&self, end: usize) -> Result<f32, LexError> {
        self.input[self.start..end]
            .parse()
            .map_err(|_| self.invalid_number())
    }

    fn invalid_number(&self) -> LexError {
        LexError::InvalidNumber {
            text: String::from(&self.input[self.start..self.pos]),
            offset: self.start,
        }
    }

    /// Scans the next token.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for unterminated string literals, malformed
    /// numeric literals, and characters outside the template language.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        let token = match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            ',' => self.make_token(TokenKind::Comma),
            ':' => self.make_token(TokenKind::Colon),
            '#' => self.make_token(TokenKind::Hash),
            '.' => self.make_token(TokenKind::Dot),
            '@' => self.make_token(TokenKind::At),
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '%' => self.make_token(TokenKind::Percent),
            '=' => {
                self.eat('=');
                self.make_token(TokenKind::Eq)
            }
            '!' => {
                if self.eat('=') {
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Bang)
                }
            }
            '<' => {
                if self.eat('=') {
                    self.make_token(TokenKind::LtEq)
                } else if self.eat('>') {
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            '>' => {
                if self.eat('=') {
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }
            '\'' | '`' | '"' => {
                self.pos = self.start;
                return self.scan_string(c);
            }
            c if c.is_ascii_digit() => {
                self.pos = self.start;
                return self.scan_number();
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                self.pos = self.start;
                self.scan_identifier()
            }
            c => {
                return Err(LexError::UnexpectedChar {
                    ch: c,
                    offset: self.start,
                });
            }
        };
        Ok(token)
    }

    /// Tokenizes the entire input.
    ///
    /// The returned sequence always ends with a [`TokenKind::Eof`] token.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered; no partial token stream
    /// is produced.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}
