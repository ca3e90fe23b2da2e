//! Combination query engine
//!
//! Slices a frequency table of combination keys by any subset of the seven
//! key fields. Each constraint is an exact, case-sensitive string match;
//! active constraints combine by logical AND. One generic predicate covers
//! all arities from zero constraints (identity) to all seven.

use crate::combination::Combination;
use crate::counter::Counter;
use log::debug;

/// Sparse field constraints over combination keys
///
/// ```
/// use verbgov::query::CombinationFilter;
///
/// let filter = CombinationFilter::new().verb("войти").case("Acc");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinationFilter {
    pub verb: Option<String>,
    pub preposition: Option<String>,
    pub noun: Option<String>,
    pub case: Option<String>,
    pub number: Option<String>,
    pub animacy: Option<String>,
    pub relation: Option<String>,
}

impl CombinationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verb(mut self, value: &str) -> Self {
        self.verb = Some(value.to_string());
        self
    }

    pub fn preposition(mut self, value: &str) -> Self {
        self.preposition = Some(value.to_string());
        self
    }

    pub fn noun(mut self, value: &str) -> Self {
        self.noun = Some(value.to_string());
        self
    }

    pub fn case(mut self, value: &str) -> Self {
        self.case = Some(value.to_string());
        self
    }

    pub fn number(mut self, value: &str) -> Self {
        self.number = Some(value.to_string());
        self
    }

    pub fn animacy(mut self, value: &str) -> Self {
        self.animacy = Some(value.to_string());
        self
    }

    pub fn relation(mut self, value: &str) -> Self {
        self.relation = Some(value.to_string());
        self
    }

    /// Constraints in field order, `None` meaning unconstrained
    fn constraints(&self) -> [Option<&str>; 7] {
        [
            self.verb.as_deref(),
            self.preposition.as_deref(),
            self.noun.as_deref(),
            self.case.as_deref(),
            self.number.as_deref(),
            self.animacy.as_deref(),
            self.relation.as_deref(),
        ]
    }

    /// True when no field is constrained
    pub fn is_unconstrained(&self) -> bool {
        self.constraints().iter().all(Option::is_none)
    }

    /// Whether a combination satisfies every active constraint
    pub fn matches(&self, combination: &Combination) -> bool {
        self.constraints()
            .iter()
            .zip(combination.fields())
            .all(|(constraint, field)| constraint.is_none_or(|want| want == field))
    }

    /// Filter a frequency table of encoded keys, keeping counts and order
    ///
    /// Keys that do not parse as combinations are dropped (and logged);
    /// with zero constraints the output equals the input.
    pub fn filter(&self, table: &Counter) -> Counter {
        let mut out = Counter::new();
        for key in table.keys() {
            match Combination::parse(key) {
                Ok(combination) => {
                    if self.matches(&combination) {
                        out.add_count(key, table.get(key));
                    }
                }
                Err(e) => debug!("dropping unparsable key: {e}"),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Counter {
        let mut c = Counter::new();
        c.add_count("войти__в__дом__Acc__Sing__Inan__obl", 5);
        c.add_count("не_читать__NO__книга__Acc__Sing__Inan__obj", 3);
        c.add_count("выйти__в течение__год__Gen__Sing__Inan__obl", 2);
        c.add_count("войти__в__комната__Acc__Sing__Inan__obl", 1);
        c
    }

    #[test]
    fn test_zero_constraints_is_identity() {
        let filter = CombinationFilter::new();
        assert!(filter.is_unconstrained());
        let out = filter.filter(&table());
        assert_eq!(out, table());
    }

    #[test]
    fn test_single_constraint() {
        let out = CombinationFilter::new().verb("войти").filter(&table());
        assert_eq!(out.len(), 2);
        assert_eq!(out.get("войти__в__дом__Acc__Sing__Inan__obl"), 5);
        assert_eq!(out.get("войти__в__комната__Acc__Sing__Inan__obl"), 1);
    }

    #[test]
    fn test_conjunction_of_constraints() {
        let out = CombinationFilter::new()
            .verb("войти")
            .noun("дом")
            .filter(&table());
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("войти__в__дом__Acc__Sing__Inan__obl"), 5);
    }

    #[test]
    fn test_compound_preposition_constraint() {
        let out = CombinationFilter::new()
            .preposition("в течение")
            .filter(&table());
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("выйти__в течение__год__Gen__Sing__Inan__obl"), 2);
    }

    #[test]
    fn test_all_seven_constraints() {
        let filter = CombinationFilter::new()
            .verb("не_читать")
            .preposition("NO")
            .noun("книга")
            .case("Acc")
            .number("Sing")
            .animacy("Inan")
            .relation("obj");
        let out = filter.filter(&table());
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("не_читать__NO__книга__Acc__Sing__Inan__obj"), 3);
    }

    #[test]
    fn test_matching_is_exact_and_case_sensitive() {
        let out = CombinationFilter::new().case("acc").filter(&table());
        assert!(out.is_empty());
        // No substring matching either
        let out = CombinationFilter::new().verb("чита").filter(&table());
        assert!(out.is_empty());
    }

    #[test]
    fn test_unparsable_keys_dropped() {
        let mut t = table();
        t.add_count("не__семь__полей", 9);
        let out = CombinationFilter::new().filter(&t);
        assert_eq!(out.len(), 4);
        assert_eq!(out.get("не__семь__полей"), 0);
    }

    #[test]
    fn test_failed_constraint_rejects() {
        let filter = CombinationFilter::new().verb("войти").case("Gen");
        assert!(filter.filter(&table()).is_empty());
    }
}
