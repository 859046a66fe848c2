//! Compiled-template cache.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::named::CompiledTemplate;
use crate::lexer::LexError;

/// A read-mostly cache of compiled templates keyed by template text.
///
/// Population is idempotent: compilation happens outside the write lock,
/// and when two callers race on the same template the loser adopts the
/// winner's entry. Lookups of unrelated templates are never serialized
/// against each other.
#[derive(Debug, Default)]
pub struct TemplateCache {
    inner: RwLock<HashMap<String, Arc<CompiledTemplate>>>,
}

impl TemplateCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled form of `template`, compiling on first use.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] when the template fails to compile; failures
    /// are not cached.
    pub fn get_or_compile(&self, template: &str) -> Result<Arc<CompiledTemplate>, LexError> {
        {
            let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(found) = inner.get(template) {
                return Ok(Arc::clone(found));
            }
        }

        let compiled = Arc::new(CompiledTemplate::compile(template)?);
        debug!(template_len = template.len(), "template cache miss");

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let entry = inner
            .entry(String::from(template))
            .or_insert_with(|| Arc::clone(&compiled));
        Ok(Arc::clone(entry))
    }

    /// Number of cached templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true when the cache holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached template.
    pub fn clear(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_lookup_reuses_entry() {
        let cache = TemplateCache::new();
        let first = cache.get_or_compile("SELECT * FROM t WHERE a = :a").unwrap();
        let second = cache.get_or_compile("SELECT * FROM t WHERE a = :a").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_templates_get_distinct_entries() {
        let cache = TemplateCache::new();
        let a = cache.get_or_compile("SELECT 1 WHERE x = :x").unwrap();
        let b = cache.get_or_compile("SELECT 2 WHERE y = :y").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = TemplateCache::new();
        assert!(cache.get_or_compile("SELECT 'oops").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = TemplateCache::new();
        let _ = cache.get_or_compile("SELECT 1").unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(TemplateCache::new());
        let template = "SELECT * FROM t WHERE id IN(:ids)";

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get_or_compile(template).unwrap())
            })
            .collect();

        let compiled: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(cache.len(), 1);
        for c in &compiled {
            assert_eq!(c.sql(), "SELECT * FROM t WHERE id IN(?)");
        }
    }
}
