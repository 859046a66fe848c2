//! Named-parameter compilation and bind-time array expansion.
//!
//! Two passes over template text. At compile time, every `:name` marker is
//! rewritten into a bare positional placeholder and an index table records
//! which position(s) each name occupies. At bind time, a placeholder whose
//! bound value is a multi-element collection is expanded into a
//! comma-joined run, and every later position is shifted accordingly.

mod cache;
mod error;
mod expand;
mod named;
mod scan;

pub use cache::TemplateCache;
pub use error::{BindError, ExpansionError};
pub use expand::{expand, remap, PlaceholderExpansion};
pub use named::{BoundStatement, CompiledTemplate, NamedBinding, Positions};
