//! Abstract syntax tree for condition fragments.

mod expression;

pub use expression::{ComparisonOp, Expr, Literal};
