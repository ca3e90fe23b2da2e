//! Combination keys
//!
//! A combination is the canonical encoding of one verb government pattern:
//! seven ordered fields joined by `__`. The preposition field holds the
//! sentinel `NO` when the noun has no governing preposition. Fields never
//! contain the separator, so a key splits back into exactly seven fields
//! and re-joins to the identical string.

use std::fmt;
use thiserror::Error;

/// Field separator in an encoded combination key
pub const SEPARATOR: &str = "__";

/// Preposition sentinel for "no preposition"
pub const NO_PREPOSITION: &str = "NO";

/// Error for a key that does not split into seven fields
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed combination key `{0}`: expected 7 `__`-separated fields")]
pub struct KeyError(pub String);

/// A verb-preposition-noun pattern with grammatical features
///
/// Verb lemma may carry the `не_` negation prefix; preposition is the
/// space-joined compound form or [`NO_PREPOSITION`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination {
    pub verb: String,
    pub preposition: String,
    pub noun: String,
    pub case: String,
    pub number: String,
    pub animacy: String,
    pub relation: String,
}

impl Combination {
    /// The seven fields in canonical order
    pub fn fields(&self) -> [&str; 7] {
        [
            &self.verb,
            &self.preposition,
            &self.noun,
            &self.case,
            &self.number,
            &self.animacy,
            &self.relation,
        ]
    }

    /// Encode into the canonical `__`-joined key string
    pub fn encode(&self) -> String {
        self.fields().join(SEPARATOR)
    }

    /// Parse a key string back into its seven fields
    pub fn parse(key: &str) -> Result<Self, KeyError> {
        let fields: Vec<&str> = key.split(SEPARATOR).collect();
        match <[&str; 7]>::try_from(fields) {
            Ok([verb, preposition, noun, case, number, animacy, relation]) => Ok(Self {
                verb: verb.to_string(),
                preposition: preposition.to_string(),
                noun: noun.to_string(),
                case: case.to_string(),
                number: number.to_string(),
                animacy: animacy.to_string(),
                relation: relation.to_string(),
            }),
            Err(_) => Err(KeyError(key.to_string())),
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Combination {
        Combination {
            verb: "не_читать".to_string(),
            preposition: NO_PREPOSITION.to_string(),
            noun: "книга".to_string(),
            case: "Acc".to_string(),
            number: "Sing".to_string(),
            animacy: "Inan".to_string(),
            relation: "obj".to_string(),
        }
    }

    #[test]
    fn test_encode() {
        assert_eq!(sample().encode(), "не_читать__NO__книга__Acc__Sing__Inan__obj");
    }

    #[test]
    fn test_roundtrip() {
        let key = sample().encode();
        let parsed = Combination::parse(&key).unwrap();
        assert_eq!(parsed, sample());
        assert_eq!(parsed.encode(), key);
        // The negation prefix's single underscore does not split the field
        assert_eq!(parsed.verb, "не_читать");
    }

    #[test]
    fn test_compound_preposition_field() {
        let key = "выйти__в течение__год__Gen__Sing__Inan__obl";
        let parsed = Combination::parse(key).unwrap();
        assert_eq!(parsed.preposition, "в течение");
        assert_eq!(parsed.encode(), key);
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert!(Combination::parse("только__три__поля").is_err());
        assert!(Combination::parse("a__b__c__d__e__f__g__h").is_err());
    }
}
