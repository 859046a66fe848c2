//! Condition expression AST.

use core::fmt;

/// Comparison operators usable in condition fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// =
    Eq,
    /// <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
}

impl ComparisonOp {
    /// Returns the SQL spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

/// A literal value in a condition fragment.
///
/// The lexer's long and hexadecimal kinds collapse to [`Literal::Int`], and
/// its single-precision kind to [`Literal::Real`]: the distinction matters
/// for lexing, not for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal.
    Int(i64),
    /// Real literal.
    Real(f64),
    /// String literal.
    Str(String),
}

/// A parsed condition expression.
///
/// Built bottom-up by the parser and handed to a rendering collaborator.
/// Binary variants own their children exclusively, so a value is always a
/// tree; it is discarded after one compilation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A bare or dotted column reference.
    Column {
        /// Column name, including any qualifier (`t.col`).
        name: String,
        /// True when the reference was qualified with a dot.
        qualified: bool,
        /// True when the reference was prefixed with the binary-collation
        /// marker.
        binary_collation: bool,
    },
    /// A literal value.
    Literal(Literal),
    /// A comparison between two sub-expressions.
    Comparison {
        /// The comparison operator.
        op: ComparisonOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A logical conjunction.
    And {
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A comma-separated expression list.
    List(Vec<Expr>),
}

impl Expr {
    /// Creates a bare, unqualified column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            name: name.into(),
            qualified: false,
            binary_collation: false,
        }
    }

    /// Creates a comparison of `self` against `right`.
    #[must_use]
    pub fn comparison(self, op: ComparisonOp, right: Self) -> Self {
        Self::Comparison {
            op,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    /// Creates a conjunction of `self` and `right`.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        Self::And {
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    /// Left-folds `operands` with `combine`.
    ///
    /// Zero operands yield `None`, a single operand is returned unwrapped,
    /// and two or more fold into a left-leaning tree.
    pub fn fold<F>(operands: Vec<Self>, combine: F) -> Option<Self>
    where
        F: FnMut(Self, Self) -> Self,
    {
        let mut iter = operands.into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, combine))
    }

    /// Left-folds `operands` into a conjunction.
    #[must_use]
    pub fn fold_and(operands: Vec<Self>) -> Option<Self> {
        Self::fold(operands, Self::and)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "'{}'", value.replace('\'', "''")),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column {
                name,
                binary_collation,
                ..
            } => {
                if *binary_collation {
                    write!(f, "BINARY {name}")
                } else {
                    write!(f, "{name}")
                }
            }
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Comparison { op, left, right } => {
                write!(f, "{left} {} {right}", op.as_str())
            }
            Self::And { left, right } => write!(f, "{left} AND {right}"),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}
