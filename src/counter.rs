//! Insertion-ordered frequency counter
//!
//! Counts occurrences of string-valued categories (lemmas, prepositions,
//! combination keys). Counts only increase; ties in the sorted view break
//! by insertion order, so repeated finalization is stable. Persisted as a
//! JSON object whose entries are in descending-count order, and read back
//! with the file order as the insertion order, so tables round-trip
//! losslessly.

use rustc_hash::FxHashMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Frequency table: category value → occurrence count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counter {
    counts: FxHashMap<String, u64>,
    /// Keys in first-seen order, for stable tie-breaking
    order: Vec<String>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Count for a key (0 when absent)
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Total of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Increment a key by one
    pub fn add(&mut self, key: &str) {
        self.add_count(key, 1);
    }

    /// Increment a key by `n`
    pub fn add_count(&mut self, key: &str, n: u64) {
        match self.counts.get_mut(key) {
            Some(count) => *count += n,
            None => {
                self.counts.insert(key.to_string(), n);
                self.order.push(key.to_string());
            }
        }
    }

    /// Count every item of an iterator
    pub fn update<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            self.add(item.as_ref());
        }
    }

    /// Value-wise addition of another counter; associative and commutative
    /// in the resulting counts (tie-break order may depend on merge order)
    pub fn merge(&mut self, other: &Counter) {
        for key in &other.order {
            self.add_count(key, other.counts[key]);
        }
    }

    /// Entries sorted by descending count; equal counts keep first-seen order
    pub fn most_common(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .order
            .iter()
            .map(|k| (k.as_str(), self.counts[k]))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1)); // stable: ties keep insertion order
        entries
    }

    /// Keys in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Counter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut counter = Counter::new();
        counter.update(iter);
        counter
    }
}

impl Serialize for Counter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.most_common();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, count) in entries {
            map.serialize_entry(key, &count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Counter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CounterVisitor;

        impl<'de> Visitor<'de> for CounterVisitor {
            type Value = Counter;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of string keys to counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Counter, A::Error> {
                let mut counter = Counter::new();
                while let Some((key, count)) = access.next_entry::<String, u64>()? {
                    counter.add_count(&key, count);
                }
                Ok(counter)
            }
        }

        deserializer.deserialize_map(CounterVisitor)
    }
}
