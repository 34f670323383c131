//! Insertion-ordered multiset used for frequency counting

use std::collections::HashMap;
use std::hash::Hash;

use crate::types::OrderedMap;

/// Counts occurrences while remembering the order keys were first seen.
///
/// Rankings use a stable sort, so equal counts keep first-seen order.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    counts: Vec<(K, u64)>,
    index: HashMap<K, usize>,
    total: u64,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self {
            counts: Vec::new(),
            index: HashMap::new(),
            total: 0,
        }
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.counts[slot].1 = self.counts[slot].1.saturating_add(1),
            None => {
                self.index.insert(key.clone(), self.counts.len());
                self.counts.push((key, 1));
            }
        }
        self.total = self.total.saturating_add(1);
    }

    pub fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for key in keys {
            self.add(key);
        }
    }

    /// Number of values added, repeats included
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct keys
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// All `(key, count)` pairs, highest count first
    pub fn most_common(&self) -> Vec<(K, u64)> {
        let mut ranked = self.counts.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The `n` highest-count pairs
    pub fn top(&self, n: usize) -> Vec<(K, u64)> {
        let mut ranked = self.most_common();
        ranked.truncate(n);
        ranked
    }

    /// Counts in first-seen order
    pub fn into_ordered(self) -> OrderedMap<K, u64> {
        self.counts.into()
    }
}

impl<K: Eq + Hash + Clone> Default for Tally<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally_of(keys: &[&str]) -> Tally<String> {
        let mut tally = Tally::new();
        tally.extend(keys.iter().map(|k| k.to_string()));
        tally
    }

    #[test]
    fn test_empty_tally() {
        let tally: Tally<String> = Tally::new();
        assert!(tally.is_empty());
        assert_eq!(tally.total(), 0);
        assert!(tally.most_common().is_empty());
    }

    #[test]
    fn test_counts_and_totals() {
        let tally = tally_of(&["A", "B", "A", "C", "A"]);
        assert_eq!(tally.total(), 5);
        assert_eq!(tally.distinct(), 3);
        assert_eq!(tally.most_common()[0], ("A".to_string(), 3));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let tally = tally_of(&["B", "A", "C", "A", "B"]);
        let ranked = tally.most_common();
        assert_eq!(
            ranked,
            vec![
                ("B".to_string(), 2),
                ("A".to_string(), 2),
                ("C".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_top_truncates() {
        let tally = tally_of(&["A", "B", "C", "D"]);
        let top = tally.top(3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].0, "A");
        assert_eq!(top[2].0, "C");
    }

    #[test]
    fn test_into_ordered_keeps_insertion_order() {
        let tally = tally_of(&["Z", "A", "A"]);
        let ordered = tally.into_ordered();
        let keys: Vec<&str> = ordered.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Z", "A"]);
    }
}
