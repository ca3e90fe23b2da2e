//! Verbgov: verb government patterns from dependency treebanks
//!
//! Extracts verb argument-structure patterns (verb + preposition +
//! governed noun, with grammatical features) from CoNLL-U parsed
//! sentences, aggregates them into frequency statistics, classifies them
//! against a prepositional-government dictionary, and supports querying
//! the resulting combination tables and retrieving example sentences.

pub mod combination; // Seven-field combination keys
pub mod conllu; // CoNLL-U file parsing
pub mod counter; // Insertion-ordered frequency tables
pub mod extract; // Pattern extractors (verbs, nouns, prepositions, combinations)
pub mod government; // Prepositional government dictionary and classification
pub mod query; // Field-constraint filtering of combination tables
pub mod retrieve; // Example sentence retrieval
pub mod stats; // Corpus statistics aggregation and merging
pub mod store; // Statistics persistence
pub mod tree; // Dependency tree model

// Re-exports for convenience
pub use combination::{Combination, KeyError, NO_PREPOSITION, SEPARATOR};
pub use conllu::{FileSentenceReader, ParseError, SentenceReader};
pub use counter::Counter;
pub use extract::{CombinationOutcome, NounExtraction};
pub use government::{Classification, Government, GovernmentError};
pub use query::CombinationFilter;
pub use retrieve::{Examples, find_examples};
pub use stats::{CancelFlag, ScanReport, Statistics};
pub use store::{StatsStore, StoreConfig, StoreError};
pub use tree::{Features, Sentence, Token, TokenId};
