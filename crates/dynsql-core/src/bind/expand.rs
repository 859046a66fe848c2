//! Bind-time array expansion.
//!
//! When a bound value is a multi-element collection, its single placeholder
//! is rewritten into a comma-joined run and every later position shifts by
//! the accumulated `arity - 1`.

use super::scan::{fragments, Fragment};
use super::ExpansionError;

/// One placeholder to expand: the 1-based ordinal of a `?` in the canonical
/// statement and the number of value slots the bound collection occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderExpansion {
    /// 1-based ordinal of the placeholder in the canonical statement.
    pub position: usize,
    /// Number of literal slots the bound value occupies.
    pub arity: usize,
}

impl PlaceholderExpansion {
    /// Creates a new expansion record.
    #[must_use]
    pub const fn new(position: usize, arity: usize) -> Self {
        Self { position, arity }
    }

    /// Slots this expansion occupies in the rewritten statement.
    ///
    /// Arity `0` and `1` are degenerate: the placeholder is left as a
    /// single `?`, so both occupy one slot.
    #[must_use]
    pub const fn slots(self) -> usize {
        if self.arity < 2 {
            1
        } else {
            self.arity
        }
    }
}

/// Returns the index of the first entry that breaks strict ascending order.
fn first_unsorted(expansions: &[PlaceholderExpansion]) -> Option<usize> {
    (1..expansions.len()).find(|&i| expansions[i - 1].position >= expansions[i].position)
}

/// Remaps a 1-based placeholder position across `expansions`.
///
/// The result is the original position plus the accumulated `slots - 1` of
/// every expansion strictly before it; an expansion exactly at `position`
/// does not shift its own first slot.
///
/// # Panics
///
/// Panics when `expansions` is not sorted strictly ascending by position.
/// That is a caller contract violation, not a data error.
#[must_use]
pub fn remap(position: usize, expansions: &[PlaceholderExpansion]) -> usize {
    assert!(
        first_unsorted(expansions).is_none(),
        "placeholder expansions must be sorted strictly ascending by position"
    );
    expansions
        .iter()
        .take_while(|e| e.position < position)
        .map(|e| e.slots() - 1)
        .sum::<usize>()
        + position
}

/// Rewrites `statement`, replacing each expanded placeholder with an
/// `arity`-long comma-joined run of placeholders.
///
/// Placeholders are counted in statement order; markers inside string
/// literals and comments are not counted. An empty expansion list returns
/// the statement unchanged.
///
/// # Errors
///
/// Returns [`ExpansionError::Unsorted`] when the list is not strictly
/// ascending, [`ExpansionError::PositionOutOfRange`] when a position has no
/// matching placeholder, and [`ExpansionError::Scan`] when the statement
/// text contains an unterminated literal. Both non-scan cases are caller
/// contract violations; no partially rewritten statement is ever returned.
pub fn expand(
    statement: &str,
    expansions: &[PlaceholderExpansion],
) -> Result<String, ExpansionError> {
    if let Some(index) = first_unsorted(expansions) {
        return Err(ExpansionError::Unsorted { index });
    }

    let parts = fragments(statement)?;
    let mut out = String::with_capacity(statement.len());
    let mut pending = expansions.iter().peekable();
    let mut position = 0_usize;

    for part in parts {
        match part {
            Fragment::Text(text) => out.push_str(text),
            Fragment::Named(name) => {
                // Named markers never occur in a canonical statement; any
                // present pass through untouched.
                out.push(':');
                out.push_str(name);
            }
            Fragment::Placeholder => {
                position += 1;
                let slots = match pending.peek() {
                    Some(e) if e.position == position => {
                        let slots = e.slots();
                        pending.next();
                        slots
                    }
                    _ => 1,
                };
                push_run(&mut out, slots);
            }
        }
    }

    if let Some(e) = pending.next() {
        return Err(ExpansionError::PositionOutOfRange {
            position: e.position,
            count: position,
        });
    }
    Ok(out)
}

/// Appends a comma-joined run of `slots` placeholders.
pub(crate) fn push_run(out: &mut String, slots: usize) {
    for i in 0..slots {
        if i > 0 {
            out.push(',');
        }
        out.push('?');
    }
}
