//! Per-client cache of raw command output
//!
//! Entries are keyed by the composed command line and hold every raw line the
//! run produced, prefixes intact. Nothing is evicted: a caller that needs
//! fresh output uses a new client.

use std::collections::HashMap;

use tracing::debug;

#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<String, Vec<String>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored lines for `key`, running `compute` only on a miss.
    ///
    /// A failed `compute` leaves the cache untouched, so the next request for
    /// the same key runs again.
    pub fn get_or_compute<F, E>(&mut self, key: &str, compute: F) -> Result<&[String], E>
    where
        F: FnOnce() -> Result<Vec<String>, E>,
    {
        if !self.entries.contains_key(key) {
            debug!("cache miss: {}", key);
            let lines = compute()?;
            self.entries.insert(key.to_string(), lines);
        } else {
            debug!("cache hit: {}", key);
        }
        Ok(self.entries.get(key).map(Vec::as_slice).unwrap_or_default())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn given_repeated_key_when_get_or_compute_then_computes_once() {
        let mut cache = ResultCache::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Ok::<_, ()>(vec!["info: a".to_string(), "exit: 0".to_string()])
        };

        let first = cache.get_or_compute("p4 -s info", compute).unwrap().to_vec();
        let second = cache.get_or_compute("p4 -s info", compute).unwrap().to_vec();

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn given_failing_compute_when_get_or_compute_then_nothing_cached() {
        let mut cache = ResultCache::new();

        let result = cache.get_or_compute("p4 -s info", || Err::<Vec<String>, _>("boom"));

        assert_eq!(result, Err("boom"));
        assert!(!cache.contains("p4 -s info"));
        assert!(cache.is_empty());
    }

    #[test]
    fn given_distinct_keys_when_get_or_compute_then_separate_entries() {
        let mut cache = ResultCache::new();
        cache
            .get_or_compute("p4 -s where 'a'", || Ok::<_, ()>(vec!["info: a".into()]))
            .unwrap();
        cache
            .get_or_compute("p4 -s where 'b'", || Ok::<_, ()>(vec!["info: b".into()]))
            .unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("p4 -s where 'b'"), Some(&["info: b".to_string()][..]));
    }
}
