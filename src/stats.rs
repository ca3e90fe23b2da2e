//! Corpus statistics aggregation
//!
//! Folds per-sentence extraction results into eleven running counters:
//! sentence and word counts plus nine frequency tables. Aggregation is pure
//! accumulation (counters only increase); finalization order comes from
//! [`Counter::most_common`] at serialization time. The aggregator has no
//! deduplication: scanning the same source twice double-counts, and the
//! skip-if-already-collected guard lives in the store layer.

use crate::conllu::ParseError;
use crate::counter::Counter;
use crate::extract;
use crate::government::Government;
use crate::tree::Sentence;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag, checked at each sentence boundary
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that in-progress scans stop at the next sentence boundary
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What a scan skipped or dropped, and whether it ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Sentences dropped because they failed to parse
    pub sentences_skipped: usize,
    /// Noun children dropped for incomplete morphology
    pub nouns_skipped_incomplete: usize,
    /// Noun children dropped by the numeral-modifier exclusion
    pub nouns_excluded_numeral: usize,
    /// True when the scan stopped early on a [`CancelFlag`]
    pub cancelled: bool,
}

/// Frequency statistics for one source corpus (or a merge of several)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub sentences: u64,
    pub words: u64,
    pub verbs: Counter,
    pub nouns: Counter,
    pub case: Counter,
    pub number: Counter,
    pub animacy: Counter,
    pub relation: Counter,
    pub prepositions: Counter,
    pub combinations: Counter,
    pub filtered: Counter,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sentence into the counters
    ///
    /// Runs all extractors and returns the combination skip counts so
    /// callers can account for dropped noun children.
    pub fn observe(
        &mut self,
        sentence: &Sentence,
        government: &Government,
    ) -> (usize, usize) {
        self.sentences += 1;
        self.words += sentence.word_count() as u64;

        self.verbs.update(extract::verbs(sentence));

        let nouns = extract::nouns(sentence);
        self.nouns.update(nouns.nouns);
        self.case.update(nouns.case);
        self.number.update(nouns.number);
        self.animacy.update(nouns.animacy);
        self.relation.update(nouns.relation);

        self.prepositions.update(extract::prepositions(sentence));

        let outcome = extract::combinations(sentence, government);
        self.combinations
            .update(outcome.correct.iter().map(|c| c.encode()));
        self.filtered
            .update(outcome.filtered.iter().map(|c| c.encode()));
        (outcome.skipped_incomplete, outcome.excluded_numeral)
    }

    /// Scan a whole source, folding every parsed sentence exactly once
    ///
    /// Unparsable sentences are skipped (counted in the report, logged at
    /// warn level); the scan itself never fails on malformed input. The
    /// cancel flag is checked once per sentence.
    pub fn scan<I>(
        &mut self,
        sentences: I,
        government: &Government,
        cancel: Option<&CancelFlag>,
    ) -> ScanReport
    where
        I: IntoIterator<Item = Result<Sentence, ParseError>>,
    {
        let mut report = ScanReport::default();
        for result in sentences {
            if cancel.is_some_and(CancelFlag::is_cancelled) {
                report.cancelled = true;
                break;
            }
            match result {
                Ok(sentence) => {
                    let (incomplete, numeral) = self.observe(&sentence, government);
                    report.nouns_skipped_incomplete += incomplete;
                    report.nouns_excluded_numeral += numeral;
                }
                Err(e) => {
                    warn!("skipping unparsable sentence: {e}");
                    report.sentences_skipped += 1;
                }
            }
        }
        debug!(
            "scan done: {} sentences, {} words, {} skipped",
            self.sentences, self.words, report.sentences_skipped
        );
        report
    }

    /// Field-wise merge of another statistics object into this one
    ///
    /// Counts are associative and commutative over merge order; the
    /// tie-break order of equal-count entries may depend on it. Accepted
    /// nondeterminism.
    pub fn merge(&mut self, other: &Statistics) {
        self.sentences += other.sentences;
        self.words += other.words;
        self.verbs.merge(&other.verbs);
        self.nouns.merge(&other.nouns);
        self.case.merge(&other.case);
        self.number.merge(&other.number);
        self.animacy.merge(&other.animacy);
        self.relation.merge(&other.relation);
        self.prepositions.merge(&other.prepositions);
        self.combinations.merge(&other.combinations);
        self.filtered.merge(&other.filtered);
    }

    /// Merge any number of statistics objects into one
    pub fn merged<'a, I: IntoIterator<Item = &'a Statistics>>(sources: I) -> Statistics {
        let mut total = Statistics::new();
        for stats in sources {
            total.merge(stats);
        }
        total
    }
}
