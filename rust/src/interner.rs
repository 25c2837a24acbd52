//! String interning for task and resource ids.
//!
//! Ids are mapped to dense indices in declaration order, so index order is
//! catalog order and per-id data can live in plain vectors.

use rustc_hash::FxHashMap;

/// Dense index of an interned id.
pub type IdIndex = usize;

/// Maps id strings to indices and back.
#[derive(Debug, Clone)]
pub struct IdInterner {
    to_index: FxHashMap<String, IdIndex>,
    from_index: Vec<String>,
}

impl IdInterner {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_index: Vec::with_capacity(capacity),
        }
    }

    /// Intern a string, returning its index.
    /// If already interned, returns the existing index.
    pub fn intern(&mut self, s: &str) -> IdIndex {
        if let Some(&idx) = self.to_index.get(s) {
            return idx;
        }
        self.push(s)
    }

    /// Intern a string that must not have been seen before.
    ///
    /// Returns `None` (and changes nothing) for a duplicate.
    pub fn insert_new(&mut self, s: &str) -> Option<IdIndex> {
        if self.to_index.contains_key(s) {
            return None;
        }
        Some(self.push(s))
    }

    fn push(&mut self, s: &str) -> IdIndex {
        let idx = self.from_index.len();
        self.from_index.push(s.to_string());
        self.to_index.insert(s.to_string(), idx);
        idx
    }

    #[inline]
    pub fn get(&self, s: &str) -> Option<IdIndex> {
        self.to_index.get(s).copied()
    }

    #[inline]
    pub fn resolve(&self, idx: IdIndex) -> Option<&str> {
        self.from_index.get(idx).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.from_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_index.is_empty()
    }
}

impl Default for IdInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let mut interner = IdInterner::with_capacity(4);

        let a = interner.intern("A");
        let b = interner.intern("B");
        let again = interner.intern("A");

        assert_eq!(a, again);
        assert_eq!((a, b), (0, 1));
        assert_eq!(interner.resolve(b), Some("B"));
        assert_eq!(interner.get("missing"), None);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_insert_new_rejects_duplicates() {
        let mut interner = IdInterner::default();
        assert_eq!(interner.insert_new("tech"), Some(0));
        assert_eq!(interner.insert_new("tech"), None);
        assert_eq!(interner.insert_new("server"), Some(1));
        assert_eq!(interner.len(), 2);
    }
}
