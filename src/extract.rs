//! Pattern extractors
//!
//! Four pure tree walks over one sentence at a time: verb lemmas with
//! negation marking, noun lemmas with grammatical features, preposition
//! surface forms with `fixed`-expression compounding, and the seven-field
//! verb-preposition-noun combinations. No shared mutable state; each
//! extractor scans the sentence's derived child relation on demand.

use crate::combination::{Combination, NO_PREPOSITION};
use crate::government::{Classification, Government};
use crate::tree::{Sentence, Token};

/// Negation particle form
const NEGATION: &str = "не";

/// Negation prefix attached to verb lemmas
const NEGATION_PREFIX: &str = "не_";

/// Lower-cased verb lemma, prefixed with `не_` when any direct child's
/// surface form is the negation particle. Prefixing is idempotent: several
/// negation children still yield a single prefix.
fn negated_lemma(sentence: &Sentence, verb: &Token) -> String {
    let lemma = verb.lemma.to_lowercase();
    let negated = sentence
        .children(verb.id)
        .any(|child| child.form.to_lowercase() == NEGATION);
    if negated {
        format!("{NEGATION_PREFIX}{lemma}")
    } else {
        lemma
    }
}

/// Extract all verbs (negation-marked lemmas) from a sentence
pub fn verbs(sentence: &Sentence) -> Vec<String> {
    sentence
        .iter()
        .filter(|t| t.upos == "VERB")
        .map(|t| negated_lemma(sentence, t))
        .collect()
}

/// Nouns of a sentence, with parallel feature lists
///
/// `nouns` covers every NOUN/PROPN token. The four feature lists cover only
/// nouns carrying complete Case, Number, and Animacy morphology, so they are
/// parallel to each other but generally shorter than `nouns`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NounExtraction {
    pub nouns: Vec<String>,
    pub case: Vec<String>,
    pub number: Vec<String>,
    pub animacy: Vec<String>,
    pub relation: Vec<String>,
}

/// Extract all nouns with grammatical features from a sentence
pub fn nouns(sentence: &Sentence) -> NounExtraction {
    let mut out = NounExtraction::default();
    for token in sentence.iter() {
        if token.upos == "NOUN" || token.upos == "PROPN" {
            out.nouns.push(token.lemma.to_lowercase());
            if let (Some(case), Some(number), Some(animacy)) = (
                token.feat("Case"),
                token.feat("Number"),
                token.feat("Animacy"),
            ) {
                out.case.push(case.to_string());
                out.number.push(number.to_string());
                out.animacy.push(animacy.to_string());
                out.relation.push(token.deprel.clone());
            }
        }
    }
    out
}

/// Compound a preposition token with its `fixed` children, space-joined
/// in sentence order (e.g. "в" + "течение" → "в течение")
fn compound(sentence: &Sentence, adp: &Token) -> String {
    let mut preposition = adp.form.to_lowercase();
    for child in sentence.children(adp.id) {
        if child.deprel == "fixed" {
            preposition.push(' ');
            preposition.push_str(&child.form.to_lowercase());
        }
    }
    preposition
}

/// Extract all prepositions (compound forms included) from a sentence
pub fn prepositions(sentence: &Sentence) -> Vec<String> {
    sentence
        .iter()
        .filter(|t| t.upos == "ADP" && t.deprel == "case")
        .map(|t| compound(sentence, t))
        .collect()
}

/// The preposition governing a noun: the noun's ADP child with relation
/// `case`, compounded with that child's `fixed` children. When several ADP
/// `case` children occur (not expected in valid input), the last one in
/// sentence order wins; flagged in DESIGN.md, not silently fixed.
fn noun_preposition(sentence: &Sentence, noun: &Token) -> Option<String> {
    let mut preposition = None;
    for child in sentence.children(noun.id) {
        if child.upos == "ADP" && child.deprel == "case" {
            preposition = Some(compound(sentence, child));
        }
    }
    preposition
}

/// Combinations extracted from one sentence, partitioned by the
/// government dictionary, with observable skip counts
#[derive(Debug, Clone, Default)]
pub struct CombinationOutcome {
    /// Keys whose preposition/case pairing is licensed, unknown, or absent
    pub correct: Vec<Combination>,
    /// Keys whose known preposition does not license the noun's case
    pub filtered: Vec<Combination>,
    /// Noun children dropped for incomplete Case/Number/Animacy morphology
    pub skipped_incomplete: usize,
    /// Noun children dropped by the numeral-modifier exclusion
    pub excluded_numeral: usize,
}

/// Extract verb-preposition-noun combinations from a sentence
///
/// For every VERB token and each of its NOUN/PROPN children: skip the noun
/// when it has any NUM child (numerals change case behavior the government
/// model does not represent) or when its morphology is incomplete;
/// otherwise build the seven-field key and classify it against `government`.
/// [`Classification::NotApplicable`] counts as correct.
pub fn combinations(sentence: &Sentence, government: &Government) -> CombinationOutcome {
    let mut out = CombinationOutcome::default();

    for verb in sentence.iter().filter(|t| t.upos == "VERB") {
        let verb_lemma = negated_lemma(sentence, verb);

        for noun in sentence.children(verb.id) {
            if noun.upos != "NOUN" && noun.upos != "PROPN" {
                continue;
            }
            let num_children = sentence
                .children(noun.id)
                .filter(|c| c.upos == "NUM")
                .count();
            if num_children > 0 {
                out.excluded_numeral += 1;
                continue;
            }
            let (Some(case), Some(number), Some(animacy)) = (
                noun.feat("Case"),
                noun.feat("Number"),
                noun.feat("Animacy"),
            ) else {
                out.skipped_incomplete += 1;
                continue;
            };

            let preposition = noun_preposition(sentence, noun);
            let classification = government.classify(preposition.as_deref(), case);

            let combination = Combination {
                verb: verb_lemma.clone(),
                preposition: preposition.unwrap_or_else(|| NO_PREPOSITION.to_string()),
                noun: noun.lemma.to_lowercase(),
                case: case.to_string(),
                number: number.to_string(),
                animacy: animacy.to_string(),
                relation: noun.deprel.clone(),
            };

            match classification {
                Classification::Filtered => out.filtered.push(combination),
                Classification::Correct | Classification::NotApplicable => {
                    out.correct.push(combination)
                }
            }
        }
    }

    out
}

/// Whether a sentence realizes `key` under exactly the extraction rules:
/// some VERB with the key's (negation-marked) lemma has a NOUN/PROPN child
/// matching the key's lemma, features, and relation, with no NUM child and
/// the key's preposition (`NO` requires an absent preposition).
///
/// Used by the example retriever; kept next to the extractors so the two
/// directions cannot drift apart.
pub fn realizes(sentence: &Sentence, key: &Combination) -> bool {
    for verb in sentence.iter().filter(|t| t.upos == "VERB") {
        if negated_lemma(sentence, verb) != key.verb {
            continue;
        }
        for noun in sentence.children(verb.id) {
            if noun.upos != "NOUN" && noun.upos != "PROPN" {
                continue;
            }
            if noun.lemma.to_lowercase() != key.noun
                || noun.feat("Case") != Some(key.case.as_str())
                || noun.feat("Number") != Some(key.number.as_str())
                || noun.feat("Animacy") != Some(key.animacy.as_str())
                || noun.deprel != key.relation
            {
                continue;
            }
            if sentence.children(noun.id).any(|c| c.upos == "NUM") {
                continue;
            }
            let matches = match noun_preposition(sentence, noun) {
                Some(prep) => prep == key.preposition,
                None => key.preposition == NO_PREPOSITION,
            };
            if matches {
                return true;
            }
        }
    }
    false
}
