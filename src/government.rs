//! Prepositional government dictionary
//!
//! Maps each preposition to the set of grammatical cases it licenses.
//! Loaded once from a JSON resource (`{"в": ["Acc", "Loc"], ...}`) and
//! injected into the components that classify combinations; there is no
//! process-global dictionary.
//!
//! Known asymmetry, preserved deliberately: a preposition absent from the
//! dictionary classifies as [`Classification::NotApplicable`], which
//! downstream counts as correct. Unknown prepositions are therefore never
//! flagged, only known prepositions with unlicensed cases are.

use rustc_hash::{FxHashMap, FxHashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Error loading the government dictionary; its absence is fatal
#[derive(Debug, Error)]
pub enum GovernmentError {
    #[error("cannot read government dictionary: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse government dictionary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of checking one preposition/case pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Known preposition, licensed case
    Correct,
    /// Known preposition, case not licensed
    Filtered,
    /// No preposition, or preposition not in the dictionary
    NotApplicable,
}

/// Preposition → licensed cases, immutable after loading
#[derive(Debug, Clone, Default)]
pub struct Government {
    licensed: FxHashMap<String, FxHashSet<String>>,
}

impl Government {
    /// Load from a JSON file mapping preposition to a list of cases
    pub fn from_path(path: &Path) -> Result<Self, GovernmentError> {
        Self::from_reader(File::open(path)?)
    }

    /// Load from any JSON reader
    pub fn from_reader(reader: impl Read) -> Result<Self, GovernmentError> {
        let raw: FxHashMap<String, Vec<String>> = serde_json::from_reader(reader)?;
        Ok(Self::from_entries(raw))
    }

    /// Build from in-memory entries (used by tests and embedders)
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        let licensed = entries
            .into_iter()
            .map(|(prep, cases)| (prep, cases.into_iter().collect()))
            .collect();
        Self { licensed }
    }

    /// Classify a preposition/case pair against the dictionary
    ///
    /// `None` preposition means the noun has no governing preposition.
    pub fn classify(&self, preposition: Option<&str>, case: &str) -> Classification {
        let Some(prep) = preposition else {
            return Classification::NotApplicable;
        };
        match self.licensed.get(prep) {
            None => Classification::NotApplicable,
            Some(cases) if cases.contains(case) => Classification::Correct,
            Some(_) => Classification::Filtered,
        }
    }
}
