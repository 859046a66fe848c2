//! Named-parameter index table.
//!
//! Compile-time pass over a SQL template: every `:name` marker becomes a
//! bare positional placeholder, and the table remembers which position(s)
//! each name occupies so the binding collaborator can set values by
//! position.

use tracing::debug;

use super::expand::{push_run, remap, PlaceholderExpansion};
use super::scan::{fragments, Fragment};
use super::BindError;
use crate::lexer::LexError;

/// The statement position(s) a named parameter occupies.
///
/// One logical parameter may satisfy several occurrences of the same name
/// in a single template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Positions {
    /// A single occurrence.
    One(usize),
    /// Multiple occurrences, in template order.
    Many(Vec<usize>),
}

impl Positions {
    /// Appends a further occurrence.
    fn push(&mut self, position: usize) {
        match self {
            Self::One(first) => *self = Self::Many(vec![*first, position]),
            Self::Many(all) => all.push(position),
        }
    }

    /// The occurrences as a slice, in template order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        match self {
            Self::One(position) => std::slice::from_ref(position),
            Self::Many(all) => all,
        }
    }

    /// Number of occurrences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true when there are no occurrences. Never the case for a
    /// binding produced by compilation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// The association between a named parameter and its statement positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBinding {
    name: String,
    positions: Positions,
}

impl NamedBinding {
    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The position(s) this name occupies, in template order.
    #[must_use]
    pub const fn positions(&self) -> &Positions {
        &self.positions
    }
}

/// A compiled template: the canonical positional statement plus the
/// name-to-position index table.
///
/// Compilation is a deterministic pure function of the template text, so a
/// compiled template is safe to cache and share read-only across threads.
/// The bind-time [`expand_with`](Self::expand_with) pass copies instead of
/// mutating, so concurrent callers may bind different-length arrays against
/// the same cached artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    sql: String,
    bindings: Vec<NamedBinding>,
    /// Byte offset of each `?` in `sql`, indexed by position - 1.
    offsets: Vec<usize>,
}

impl CompiledTemplate {
    /// Compiles a template, replacing every named marker with a positional
    /// placeholder and recording each name's statement position(s).
    ///
    /// Markers inside string literals and comments are left verbatim.
    /// Bindings are kept in first-seen order; repeated names append to the
    /// existing binding. Identical input yields byte-identical output.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] when the template contains an unterminated
    /// string literal.
    pub fn compile(template: &str) -> Result<Self, LexError> {
        let parts = fragments(template)?;
        let mut sql = String::with_capacity(template.len());
        let mut bindings: Vec<NamedBinding> = Vec::new();
        let mut offsets = Vec::new();

        for part in parts {
            match part {
                Fragment::Text(text) => sql.push_str(text),
                Fragment::Placeholder => {
                    offsets.push(sql.len());
                    sql.push('?');
                }
                Fragment::Named(name) => {
                    offsets.push(sql.len());
                    sql.push('?');
                    let position = offsets.len();
                    match bindings.iter_mut().find(|b| b.name == name) {
                        Some(binding) => binding.positions.push(position),
                        None => bindings.push(NamedBinding {
                            name: String::from(name),
                            positions: Positions::One(position),
                        }),
                    }
                }
            }
        }

        debug!(
            params = offsets.len(),
            named = bindings.len(),
            "compiled template"
        );
        Ok(Self {
            sql,
            bindings,
            offsets,
        })
    }

    /// The canonical positional-placeholder statement.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// All named bindings, in first-seen order.
    #[must_use]
    pub fn bindings(&self) -> &[NamedBinding] {
        &self.bindings
    }

    /// Total number of positional slots in the canonical statement.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.offsets.len()
    }

    /// Looks up the binding for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnknownParameter`] when the template never
    /// declares `name`: a template/arguments mismatch, not a template
    /// syntax error.
    pub fn binding(&self, name: &str) -> Result<&NamedBinding, BindError> {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| BindError::UnknownParameter {
                name: String::from(name),
            })
    }

    /// Rewrites the statement for this invocation's concrete arities and
    /// returns a fresh [`BoundStatement`] with every binding position
    /// remapped.
    ///
    /// `self` is never mutated; the compiled artifact stays valid for
    /// concurrent callers binding other arities. Later entries for the same
    /// name override earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnknownParameter`] for a name the template does
    /// not declare.
    pub fn expand_with(&self, arities: &[(&str, usize)]) -> Result<BoundStatement, BindError> {
        let mut by_name: Vec<(&str, usize)> = Vec::with_capacity(arities.len());
        for &(name, arity) in arities {
            match by_name.iter_mut().find(|(seen, _)| *seen == name) {
                Some(entry) => entry.1 = arity,
                None => by_name.push((name, arity)),
            }
        }

        let mut expansions = Vec::new();
        for &(name, arity) in &by_name {
            let binding = self.binding(name)?;
            for &position in binding.positions.as_slice() {
                expansions.push(PlaceholderExpansion::new(position, arity));
            }
        }
        expansions.sort_unstable_by_key(|e| e.position);

        let sql = self.splice(&expansions);
        let bindings = self
            .bindings
            .iter()
            .map(|b| NamedBinding {
                name: b.name.clone(),
                positions: remap_positions(&b.positions, &expansions),
            })
            .collect();

        debug!(expanded = expansions.len(), "expanded statement");
        Ok(BoundStatement { sql, bindings })
    }

    /// Rewrites the canonical statement by splicing a placeholder run at
    /// each expanded offset. Expansion positions come from this template's
    /// own bindings, so every one matches an offset.
    fn splice(&self, expansions: &[PlaceholderExpansion]) -> String {
        if expansions.is_empty() {
            return self.sql.clone();
        }

        let growth: usize = expansions.iter().map(|e| 2 * (e.slots() - 1)).sum();
        let mut out = String::with_capacity(self.sql.len() + growth);
        let mut prev = 0;

        for e in expansions {
            let offset = self.offsets[e.position - 1];
            out.push_str(&self.sql[prev..offset]);
            push_run(&mut out, e.slots());
            prev = offset + 1;
        }
        out.push_str(&self.sql[prev..]);
        out
    }
}

/// A statement rewritten for one invocation's concrete arities.
///
/// Valid only for that invocation; the originating [`CompiledTemplate`] is
/// left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundStatement {
    sql: String,
    bindings: Vec<NamedBinding>,
}

impl BoundStatement {
    /// The rewritten statement text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bindings whose positions are valid for the rewritten statement.
    #[must_use]
    pub fn bindings(&self) -> &[NamedBinding] {
        &self.bindings
    }

    /// Looks up the binding for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnknownParameter`] when the template never
    /// declared `name`.
    pub fn binding(&self, name: &str) -> Result<&NamedBinding, BindError> {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| BindError::UnknownParameter {
                name: String::from(name),
            })
    }
}

fn remap_positions(positions: &Positions, expansions: &[PlaceholderExpansion]) -> Positions {
    match positions {
        Positions::One(position) => Positions::One(remap(*position, expansions)),
        Positions::Many(all) => {
            Positions::Many(all.iter().map(|&p| remap(p, expansions)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_named_markers() {
        let template =
            CompiledTemplate::compile("SELECT * FROM user WHERE login = :login AND age > :age")
                .unwrap();
        assert_eq!(
            template.sql(),
            "SELECT * FROM user WHERE login = ? AND age > ?"
        );
        assert_eq!(template.param_count(), 2);

        let names: Vec<&str> = template.bindings().iter().map(NamedBinding::name).collect();
        assert_eq!(names, vec!["login", "age"]);
        assert_eq!(
            template.binding("login").unwrap().positions(),
            &Positions::One(1)
        );
        assert_eq!(
            template.binding("age").unwrap().positions(),
            &Positions::One(2)
        );
    }

    #[test]
    fn test_repeated_name_collects_positions() {
        let template = CompiledTemplate::compile(
            "SELECT * FROM msg WHERE sender = :id OR recipient = :id",
        )
        .unwrap();
        assert_eq!(
            template.sql(),
            "SELECT * FROM msg WHERE sender = ? OR recipient = ?"
        );
        let positions = template.binding("id").unwrap().positions();
        assert_eq!(positions, &Positions::Many(vec![1, 2]));
        assert_eq!(positions.len(), 2);
    }

    #[test]
    fn test_mixed_anonymous_and_named() {
        let template =
            CompiledTemplate::compile("UPDATE t SET a = ?, b = :b WHERE id = ?").unwrap();
        assert_eq!(template.sql(), "UPDATE t SET a = ?, b = ? WHERE id = ?");
        assert_eq!(template.param_count(), 3);
        assert_eq!(
            template.binding("b").unwrap().positions(),
            &Positions::One(2)
        );
    }

    #[test]
    fn test_markers_in_literals_and_comments_survive() {
        let template = CompiledTemplate::compile(
            "SELECT ':nope' FROM t /* :skip */ WHERE a = :a -- :gone\n",
        )
        .unwrap();
        assert_eq!(
            template.sql(),
            "SELECT ':nope' FROM t /* :skip */ WHERE a = ? -- :gone\n"
        );
        assert_eq!(template.bindings().len(), 1);
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let template = "SELECT * FROM t WHERE a = :a AND b IN(:b) AND c = :a";
        let first = CompiledTemplate::compile(template).unwrap();
        let second = CompiledTemplate::compile(template).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_parameter() {
        let template = CompiledTemplate::compile("SELECT * FROM t WHERE a = :a").unwrap();
        assert_eq!(
            template.binding("missing"),
            Err(BindError::UnknownParameter {
                name: String::from("missing"),
            })
        );
        assert!(template.expand_with(&[("missing", 3)]).is_err());
    }

    #[test]
    fn test_expand_with_rewrites_and_remaps() {
        let template = CompiledTemplate::compile(
            "SELECT * FROM user WHERE login = :login AND id IN(:ids) AND age > :age",
        )
        .unwrap();

        let bound = template.expand_with(&[("ids", 3)]).unwrap();
        assert_eq!(
            bound.sql(),
            "SELECT * FROM user WHERE login = ? AND id IN(?,?,?) AND age > ?"
        );
        assert_eq!(bound.binding("login").unwrap().positions(), &Positions::One(1));
        assert_eq!(bound.binding("ids").unwrap().positions(), &Positions::One(2));
        assert_eq!(bound.binding("age").unwrap().positions(), &Positions::One(5));
    }

    #[test]
    fn test_expand_with_repeated_name() {
        let template =
            CompiledTemplate::compile("a IN(:ids) AND b = :b AND c IN(:ids)").unwrap();
        let bound = template.expand_with(&[("ids", 2)]).unwrap();
        assert_eq!(bound.sql(), "a IN(?,?) AND b = ? AND c IN(?,?)");
        assert_eq!(
            bound.binding("ids").unwrap().positions(),
            &Positions::Many(vec![1, 4])
        );
        assert_eq!(bound.binding("b").unwrap().positions(), &Positions::One(3));
    }

    #[test]
    fn test_expand_with_leaves_template_untouched() {
        let template = CompiledTemplate::compile("id IN(:ids)").unwrap();
        let before = template.clone();
        let _ = template.expand_with(&[("ids", 4)]).unwrap();
        assert_eq!(template, before);
    }

    #[test]
    fn test_expand_with_degenerate_arity() {
        let template = CompiledTemplate::compile("id IN(:ids)").unwrap();
        let bound = template.expand_with(&[("ids", 1)]).unwrap();
        assert_eq!(bound.sql(), "id IN(?)");
        let bound = template.expand_with(&[("ids", 0)]).unwrap();
        assert_eq!(bound.sql(), "id IN(?)");
    }

    #[test]
    fn test_expand_with_no_arities_is_identity() {
        let template = CompiledTemplate::compile("a = :a AND b = ?").unwrap();
        let bound = template.expand_with(&[]).unwrap();
        assert_eq!(bound.sql(), template.sql());
        assert_eq!(bound.bindings(), template.bindings());
    }

    #[test]
    fn test_expand_with_later_entry_wins() {
        let template = CompiledTemplate::compile("id IN(:ids)").unwrap();
        let bound = template.expand_with(&[("ids", 2), ("ids", 4)]).unwrap();
        assert_eq!(bound.sql(), "id IN(?,?,?,?)");
    }
}
