use crate::service::similarity::{string_similarity, word_overlap};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Per-name count of matched receipt lines, in first-match order.
pub type Tally = IndexMap<String, u32>;

/// Scoring knobs for the fuzzy pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// A fuzzy match is accepted only when its combined score is strictly above this.
    pub acceptance_threshold: f64,
    pub overlap_weight: f64,
    pub similarity_weight: f64,
    /// Unresolved lines with more words than this are treated as junk and dropped.
    pub max_unmatched_words: usize,
    /// Upper bound on line x entry comparisons in the fuzzy pass. `None` means unbounded.
    pub max_comparisons: Option<usize>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.6,
            overlap_weight: 0.7,
            similarity_weight: 0.3,
            max_unmatched_words: 3,
            max_comparisons: None,
        }
    }
}

/// Known item names indexed by their cleaned form, deduplicated in caller order.
///
/// Receipt lines are compared against the cleaned form (letters and spaces only),
/// while matches report the canonical name (lower-cased, whitespace collapsed).
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    names: IndexMap<String, String>,
}

impl Vocabulary {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = IndexMap::new();
        for name in names {
            let canonical = normalize_name(name.as_ref());
            let cleaned = clean_line(&canonical);
            if cleaned.is_empty() {
                continue;
            }
            index.entry(cleaned).or_insert(canonical);
        }
        Self { names: index }
    }

    /// Canonical name whose cleaned form equals `cleaned`.
    pub fn canonical(&self, cleaned: &str) -> Option<&str> {
        self.names.get(cleaned).map(String::as_str)
    }

    pub fn contains(&self, cleaned: &str) -> bool {
        self.names.contains_key(cleaned)
    }

    /// Canonical names in caller order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.values().map(String::as_str)
    }

    fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Result of matching one receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub matched: Tally,
    pub unmatched: Vec<String>,
    /// Set when the comparison budget ran out before every line was scored.
    pub truncated: bool,
}

impl MatchOutcome {
    pub fn total_matched_lines(&self) -> u32 {
        self.matched.values().sum()
    }
}

/// Keeps letters and whitespace only, lower-cased, whitespace collapsed.
pub fn clean_line(line: &str) -> String {
    let kept: String = line
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lower-cases and collapses whitespace; the form inventory names are compared in.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Matches free-text receipt lines against a vocabulary of known item names.
///
/// Stateless apart from its configuration; one instance can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ReceiptMatcher {
    config: MatcherConfig,
}

impl ReceiptMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Weighted word-overlap plus string-similarity score of `line` against `entry`.
    pub fn combined_score(&self, line: &str, entry: &str) -> f64 {
        self.config.overlap_weight * word_overlap(line, entry)
            + self.config.similarity_weight * string_similarity(line, entry)
    }

    pub fn match_receipt(&self, receipt_text: &str, vocabulary: &Vocabulary) -> MatchOutcome {
        let mut outcome = MatchOutcome::default();
        let mut unmatched: IndexSet<String> = IndexSet::new();

        // 1. Split and clean, dropping lines with nothing left
        let lines = receipt_text
            .lines()
            .map(clean_line)
            .filter(|l| !l.is_empty());

        // 2. Exact pass
        let mut pending = Vec::new();
        for line in lines {
            if let Some(name) = vocabulary.canonical(&line) {
                *outcome.matched.entry(name.to_string()).or_insert(0) += 1;
            } else {
                pending.push(line);
            }
        }

        // 3. Fuzzy pass over the leftovers
        let mut comparisons = 0usize;
        let mut remaining = pending.into_iter();
        while let Some(line) = remaining.next() {
            if let Some(budget) = self.config.max_comparisons {
                if comparisons + vocabulary.len() > budget {
                    tracing::warn!(
                        "Comparison budget {} exhausted after {} comparisons, folding remaining lines into unmatched",
                        budget, comparisons
                    );
                    outcome.truncated = true;
                    unmatched.insert(line);
                    unmatched.extend(remaining);
                    break;
                }
            }
            comparisons += vocabulary.len();

            match self.best_match(&line, vocabulary) {
                Some((name, score)) => {
                    tracing::debug!("'{}' -> '{}' (score {:.3})", line, name, score);
                    *outcome.matched.entry(name.to_string()).or_insert(0) += 1;
                }
                // 4. Residual classification
                None if line.split_whitespace().count() <= self.config.max_unmatched_words => {
                    unmatched.insert(line);
                }
                None => {
                    tracing::debug!("Dropping long unmatched line '{}'", line);
                }
            }
        }

        outcome.unmatched = unmatched.into_iter().collect();
        outcome
    }

    /// Highest-scoring entry above the threshold; ties keep the earlier entry.
    fn best_match<'v>(&self, line: &str, vocabulary: &'v Vocabulary) -> Option<(&'v str, f64)> {
        let mut best: Option<(&'v str, f64)> = None;

        for (cleaned, canonical) in vocabulary.entries() {
            let score = self.combined_score(line, cleaned);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((canonical, score));
            }
        }

        best.filter(|&(_, score)| score > self.config.acceptance_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vocab(names: &[&str]) -> Vocabulary {
        Vocabulary::new(names.iter().copied())
    }

    #[test]
    fn test_clean_line() {
        assert_eq!(clean_line("2 MILK $3.99"), "milk");
        assert_eq!(clean_line("  Whole\tMilk  1gal "), "whole milk gal");
        assert_eq!(clean_line("$4.50 @ 2"), "");
        assert_eq!(clean_line(""), "");
    }

    #[test]
    fn test_vocabulary_normalizes_and_dedupes() {
        let v = vocab(&["Milk", "  whole   MILK ", "milk", "", "100%"]);
        assert_eq!(v.len(), 2);
        assert!(v.contains("milk"));
        assert!(v.contains("whole milk"));
        assert_eq!(v.iter().collect::<Vec<_>>(), vec!["milk", "whole milk"]);
    }

    #[test]
    fn test_names_with_digits_and_punctuation_match() {
        let matcher = ReceiptMatcher::default();
        let v = vocab(&["Half-and-Half", "2% Milk"]);

        let outcome = matcher.match_receipt("HALF-AND-HALF\n2% MILK\n2% milk $3.49", &v);

        let expected: Tally = [("half-and-half".to_string(), 1), ("2% milk".to_string(), 2)]
            .into_iter()
            .collect();
        assert_eq!(outcome.matched, expected);
        assert!(outcome.unmatched.is_empty());
    }

    #[test]
    fn test_fuzzy_match_reports_canonical_name() {
        let matcher = ReceiptMatcher::default();
        let v = vocab(&["Half-and-Half Cream"]);

        // cleaned entry "halfandhalf cream": overlap 0.5, similarity 15/17
        let outcome = matcher.match_receipt("HALF-AND-HALF CREME", &v);
        assert_eq!(outcome.matched.get("half-and-half cream"), Some(&1));
    }

    #[test]
    fn test_mixed_receipt() {
        let matcher = ReceiptMatcher::default();
        let v = vocab(&["milk", "eggs", "bread"]);
        let text = "2 MILK $3.99\nEGGS\nrandom unrelated junk text here\nkombucha tea";

        let outcome = matcher.match_receipt(text, &v);

        let expected: Tally = [("milk".to_string(), 1), ("eggs".to_string(), 1)]
            .into_iter()
            .collect();
        assert_eq!(outcome.matched, expected);
        assert_eq!(outcome.unmatched, vec!["kombucha tea"]);
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_misspelling_without_shared_words_stays_unmatched() {
        let matcher = ReceiptMatcher::default();
        let v = vocab(&["chicken breast"]);

        // overlap 0.0, similarity 12/14 -> 0.257
        let score = matcher.combined_score("chiken brest", "chicken breast");
        assert!(score < 0.6);

        let outcome = matcher.match_receipt("chiken brest", &v);
        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched, vec!["chiken brest"]);
    }

    #[test]
    fn test_fuzzy_match_above_threshold() {
        let matcher = ReceiptMatcher::default();
        let v = vocab(&["whole milk", "bread"]);

        // overlap 0.5, similarity 10/11 -> 0.35 + 0.273 = 0.623
        let score = matcher.combined_score("whole milks", "whole milk");
        assert!((score - (0.35 + 0.3 * 10.0 / 11.0)).abs() < 1e-9);
        assert!(score > 0.6);

        let outcome = matcher.match_receipt("WHOLE MILKS 4.29", &v);
        assert_eq!(outcome.matched.get("whole milk"), Some(&1));
        assert!(outcome.unmatched.is_empty());
    }

    #[test]
    fn test_fuzzy_match_below_threshold() {
        let matcher = ReceiptMatcher::default();
        let v = vocab(&["whole milk"]);

        // overlap 0.5, similarity 6/11 -> 0.514
        let outcome = matcher.match_receipt("whole wheat", &v);
        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched, vec!["whole wheat"]);
    }

    #[test]
    fn test_empty_text() {
        let matcher = ReceiptMatcher::default();
        let outcome = matcher.match_receipt("", &vocab(&["milk"]));
        assert_eq!(outcome, MatchOutcome::default());

        let outcome = matcher.match_receipt("\n  \n$1.99\n", &vocab(&["milk"]));
        assert_eq!(outcome, MatchOutcome::default());
    }

    #[test]
    fn test_empty_vocabulary() {
        let matcher = ReceiptMatcher::default();
        let outcome = matcher.match_receipt("milk\neggs 2\nsour dough bread", &Vocabulary::default());

        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched, vec!["milk", "eggs", "sour dough bread"]);
    }

    #[test]
    fn test_tally_counts_repeats() {
        let matcher = ReceiptMatcher::default();
        let v = vocab(&["eggs", "milk"]);

        let outcome = matcher.match_receipt("EGGS\neggs $2.49\nEggs\nmilk", &v);
        assert_eq!(outcome.matched.get("eggs"), Some(&3));
        assert_eq!(outcome.matched.get("milk"), Some(&1));
        assert_eq!(outcome.total_matched_lines(), 4);
    }

    #[test]
    fn test_tie_keeps_first_entry() {
        let config = MatcherConfig {
            acceptance_threshold: 0.2,
            ..MatcherConfig::default()
        };
        let matcher = ReceiptMatcher::new(config);

        // both entries score 0.3 * 0.75
        let outcome = matcher.match_receipt("bilk", &vocab(&["milk", "silk"]));
        assert_eq!(outcome.matched.keys().collect::<Vec<_>>(), vec!["milk"]);

        let outcome = matcher.match_receipt("bilk", &vocab(&["silk", "milk"]));
        assert_eq!(outcome.matched.keys().collect::<Vec<_>>(), vec!["silk"]);
    }

    #[test]
    fn test_word_cutoff_is_configurable() {
        let text = "random unrelated junk text here";

        let outcome = ReceiptMatcher::default().match_receipt(text, &vocab(&["milk"]));
        assert!(outcome.unmatched.is_empty());

        let config = MatcherConfig {
            max_unmatched_words: 5,
            ..MatcherConfig::default()
        };
        let outcome = ReceiptMatcher::new(config).match_receipt(text, &vocab(&["milk"]));
        assert_eq!(outcome.unmatched, vec![text]);
    }

    #[test]
    fn test_unmatched_lines_reported_once() {
        let outcome = ReceiptMatcher::default().match_receipt("kombucha\nKOMBUCHA 3.50\nmilk", &vocab(&["milk"]));
        assert_eq!(outcome.unmatched, vec!["kombucha"]);
    }

    #[test]
    fn test_comparison_budget_folds_remaining_lines() {
        let config = MatcherConfig {
            max_comparisons: Some(2),
            ..MatcherConfig::default()
        };
        let matcher = ReceiptMatcher::new(config);
        let v = vocab(&["milk", "eggs"]);

        let outcome = matcher.match_receipt("xyz\nMILK\nabc def ghi jkl\nqqq", &v);

        assert!(outcome.truncated);
        assert_eq!(outcome.matched.get("milk"), Some(&1));
        assert_eq!(outcome.unmatched, vec!["xyz", "abc def ghi jkl", "qqq"]);
    }

    proptest! {
        #[test]
        fn cleaning_is_idempotent(line in "[a-zA-Z0-9 $.,@\t-]{0,40}") {
            let once = clean_line(&line);
            prop_assert_eq!(clean_line(&once), once);
        }

        #[test]
        fn exact_lines_are_always_matched(
            name in "[a-z]{1,8}( [a-z]{1,8}){0,2}",
            copies in 1u32..5,
        ) {
            let v = Vocabulary::new([name.as_str(), "placeholder"]);
            let line = format!("2 {} $3.99", name.to_uppercase());
            let text = vec![line; copies as usize].join("\n");

            let outcome = ReceiptMatcher::default().match_receipt(&text, &v);

            prop_assert_eq!(outcome.matched.get(&name), Some(&copies));
            prop_assert!(outcome.unmatched.is_empty());
        }
    }
}
