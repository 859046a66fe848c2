//! # dynsql-core
//!
//! A dynamic SQL compilation engine: declarative SQL templates carrying
//! named placeholders, boolean condition fragments and array-valued
//! parameters are compiled into positional statements ready for a database
//! driver to bind.
//!
//! This crate provides:
//! - A hand-written lexer and recursive descent parser for condition
//!   fragments, producing an expression tree a template renderer evaluates
//!   to include or exclude template portions
//! - A named-parameter index table mapping `:name` markers to statement
//!   positions
//! - A bind-time array-expansion pass that rewrites a placeholder into a
//!   comma-joined run when the bound value is a multi-element collection
//!
//! Everything is a pure, synchronous transformation: no I/O, no shared
//! mutable state, and compiled templates are safe to cache and share
//! across threads.
//!
//! ## Named parameters and array expansion
//!
//! ```rust
//! use dynsql_core::CompiledTemplate;
//!
//! let template = CompiledTemplate::compile(
//!     "SELECT * FROM user WHERE login = :login AND id IN(:ids)",
//! )?;
//! assert_eq!(
//!     template.sql(),
//!     "SELECT * FROM user WHERE login = ? AND id IN(?)",
//! );
//!
//! // Bind time: `ids` is a 3-element collection.
//! let bound = template.expand_with(&[("ids", 3)])?;
//! assert_eq!(
//!     bound.sql(),
//!     "SELECT * FROM user WHERE login = ? AND id IN(?,?,?)",
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Condition fragments
//!
//! ```rust
//! use dynsql_core::Parser;
//!
//! let condition = Parser::parse("t.status = 'active' and t.age ge 18")?;
//! assert_eq!(condition.to_string(), "t.status = 'active' AND t.age >= 18");
//! # Ok::<(), dynsql_core::ParseError>(())
//! ```

pub mod ast;
pub mod bind;
pub mod lexer;
pub mod parser;

pub use ast::{ComparisonOp, Expr, Literal};
pub use bind::{
    expand, remap, BindError, BoundStatement, CompiledTemplate, ExpansionError, NamedBinding,
    PlaceholderExpansion, Positions, TemplateCache,
};
pub use lexer::{LexError, Lexer, Span, Token, TokenKind};
pub use parser::{ParseError, Parser};
