//! Fuzzy String Matching
//!
//! Stateless similarity scoring over normalized strings. Domain-independent:
//! the same matcher drives symptom vocabulary resolution and greeting
//! detection, each with its own acceptance threshold in the resolver.
//!
//! Scores are integers in [0, 100]. 100 is produced only when the two
//! strings are equal after normalization.

use strsim::normalized_levenshtein;

/// Normalize a raw token: trim surrounding whitespace and lowercase.
///
/// This is the single normalization rule applied everywhere in the system
/// (catalog construction, vocabulary building, query handling).
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Stateless fuzzy matcher
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatcher;

impl FuzzyMatcher {
    /// Similarity between two strings after normalization, in [0, 100].
    ///
    /// Symmetric and insensitive to case and surrounding whitespace.
    pub fn similarity(&self, a: &str, b: &str) -> u8 {
        let a = normalize(a);
        self.scored(&a, b)
    }

    /// Best-scoring candidate for `query`, with its score.
    ///
    /// Ties go to the first candidate in iteration order, so callers must
    /// present candidates in a stable order (the catalog keeps its symptom
    /// sequences sorted for exactly this reason).
    ///
    /// # Panics
    /// Panics if `candidates` is empty. An empty candidate set is a
    /// contract violation: the catalog index guarantees a non-empty
    /// vocabulary and non-empty per-record symptom sets.
    pub fn best_match<'a>(&self, query: &str, candidates: &'a [String]) -> (&'a str, u8) {
        assert!(
            !candidates.is_empty(),
            "best_match requires a non-empty candidate set"
        );

        let query = normalize(query);
        let mut best_value = candidates[0].as_str();
        let mut best_score = self.scored(&query, best_value);

        for candidate in &candidates[1..] {
            let score = self.scored(&query, candidate);
            if score > best_score {
                best_score = score;
                best_value = candidate;
            }
        }

        (best_value, best_score)
    }

    /// Score a pre-normalized query against a raw candidate.
    ///
    /// Uses floor scaling so that only equal normalized strings reach 100;
    /// rounding could otherwise promote a near-miss on long strings.
    fn scored(&self, normalized_query: &str, candidate: &str) -> u8 {
        let candidate = normalize(candidate);
        if normalized_query == candidate {
            return 100;
        }
        (normalized_levenshtein(normalized_query, &candidate) * 100.0).floor() as u8
    }
}
