//! Disease Resolver
//!
//! Orchestrates the catalog index and fuzzy matcher: raw symptom phrases
//! in, best-matching disease record out. Two passes:
//!
//! 1. Vocabulary resolution: each normalized input token is mapped onto
//!    the closest known symptom token; tokens that resemble nothing in the
//!    vocabulary are dropped.
//! 2. Per-record scoring: every resolved token is matched independently
//!    against each record's own symptom set and the per-record average
//!    decides the winner. Records are scored in parallel with Rayon;
//!    selection is a sequential scan so ties stay deterministic.
//!
//! Absence (`None`) is a normal outcome here, never an error: it covers
//! both "no valid symptoms provided" (nothing survives normalization or
//! vocabulary resolution) and "no confident match" (no record scored
//! above zero).

use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::{CatalogIndex, DiseaseRecord};
use crate::greetings::GreetingTable;
use crate::matcher::{normalize, FuzzyMatcher};

/// Minimum score (exclusive) for an input token to count as resolved
/// against the symptom vocabulary
pub const SYMPTOM_ACCEPT_THRESHOLD: u8 = 60;

/// Minimum score (exclusive) for a phrase to count as a greeting
pub const GREETING_ACCEPT_THRESHOLD: u8 = 80;

/// The winning record's fields plus the score that selected it
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub disease: String,
    pub description: String,
    pub medications: Vec<String>,
    pub procedures: Vec<String>,
    pub precautions: Vec<String>,
    pub specialist: String,

    /// Average per-token score used for selection, exposed for testability
    #[serde(skip)]
    pub score: f64,
}

impl MatchResult {
    fn from_record(record: &DiseaseRecord, score: f64) -> Self {
        Self {
            disease: record.disease.clone(),
            description: record.description.clone(),
            medications: record.medications.clone(),
            procedures: record.procedures.clone(),
            precautions: record.precautions.clone(),
            specialist: record.specialist.clone(),
            score,
        }
    }
}

/// Resolve raw symptom phrases to the best-matching disease record.
///
/// Returns `None` when no valid symptom survives normalization, when no
/// token resolves against the vocabulary, or when no record scores above
/// zero. The first record (source order) reaching the strictly greatest
/// score wins; a later record with an equal score is never promoted.
pub fn resolve_symptoms(
    raw_symptoms: &[String],
    index: &CatalogIndex,
    matcher: &FuzzyMatcher,
) -> Option<MatchResult> {
    let cleaned: Vec<String> = raw_symptoms
        .iter()
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    // Map noisy phrasing onto the canonical vocabulary; unrecognizable
    // tokens contribute nothing further.
    let resolved: Vec<String> = cleaned
        .iter()
        .filter_map(|token| {
            let (matched, score) = matcher.best_match(token, index.vocabulary());
            (score > SYMPTOM_ACCEPT_THRESHOLD).then(|| matched.to_string())
        })
        .collect();
    if resolved.is_empty() {
        return None;
    }

    // Scores collected in source order, so the sequential scan below keeps
    // the first-record-wins tie-break.
    let scores: Vec<f64> = index
        .records()
        .par_iter()
        .map(|record| record_score(record, &resolved, matcher))
        .collect();

    let mut best_score = 0.0;
    let mut best: Option<&DiseaseRecord> = None;
    for (record, &score) in index.records().iter().zip(&scores) {
        if score > best_score {
            best_score = score;
            best = Some(record);
        }
    }

    best.map(|record| MatchResult::from_record(record, best_score))
}

/// Average best-match score of the resolved tokens against one record's
/// symptom set. Each token matches independently; the divisor is the
/// resolved-token count, not the raw input count, so dropped garbage
/// tokens do not dilute the average.
fn record_score(record: &DiseaseRecord, resolved: &[String], matcher: &FuzzyMatcher) -> f64 {
    let total: u32 = resolved
        .iter()
        .map(|token| u32::from(matcher.best_match(token, &record.symptoms).1))
        .sum();
    total as f64 / resolved.len() as f64
}

/// Detect whether a whole input phrase is a greeting.
///
/// The phrase is matched as a unit, not token-split. Callers run this
/// before symptom resolution, so a phrase resembling both a greeting and
/// a symptom list is treated as a greeting.
pub fn detect_greeting(
    phrase: &str,
    table: &GreetingTable,
    matcher: &FuzzyMatcher,
) -> Option<String> {
    if table.phrases().is_empty() {
        return None;
    }

    let (matched, score) = matcher.best_match(phrase, table.phrases());
    if score > GREETING_ACCEPT_THRESHOLD {
        table.response_for(matched).map(str::to_string)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRow;
    use approx::assert_relative_eq;

    fn row(disease: &str, symptoms: &str) -> CatalogRow {
        CatalogRow {
            disease: disease.to_string(),
            symptoms: symptoms.to_string(),
            ..CatalogRow::default()
        }
    }

    fn index(rows: Vec<CatalogRow>) -> CatalogIndex {
        CatalogIndex::from_rows(rows).unwrap()
    }

    fn symptoms(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_symptoms_score_100() {
        let index = index(vec![row("influenza", "fever, cough")]);
        let matcher = FuzzyMatcher;

        let result = resolve_symptoms(&symptoms(&["fever", "cough"]), &index, &matcher).unwrap();
        assert_eq!(result.disease, "influenza");
        assert_relative_eq!(result.score, 100.0);
    }

    #[test]
    fn test_empty_input_returns_none() {
        let index = index(vec![row("influenza", "fever, cough")]);
        let matcher = FuzzyMatcher;

        assert!(resolve_symptoms(&[], &index, &matcher).is_none());
        assert!(resolve_symptoms(&symptoms(&["   ", ","]), &index, &matcher).is_none());
    }

    #[test]
    fn test_unrecognizable_tokens_return_none() {
        let index = index(vec![row("influenza", "fever, cough")]);
        let matcher = FuzzyMatcher;

        let result = resolve_symptoms(&symptoms(&["qwxzj", "plmkv"]), &index, &matcher);
        assert!(result.is_none());
    }

    #[test]
    fn test_noisy_tokens_resolve_through_vocabulary() {
        let index = index(vec![
            row("influenza", "fever, cough, sore throat"),
            row("migraine", "headache, nausea"),
        ]);
        let matcher = FuzzyMatcher;

        let result = resolve_symptoms(&symptoms(&["FEVERR", " caugh "]), &index, &matcher).unwrap();
        assert_eq!(result.disease, "influenza");
    }

    #[test]
    fn test_record_matching_more_tokens_wins() {
        let index = index(vec![
            row("migraine", "headache, nausea"),
            row("influenza", "fever, cough, sore throat"),
        ]);
        let matcher = FuzzyMatcher;

        let result =
            resolve_symptoms(&symptoms(&["fever", "cough", "sore throat"]), &index, &matcher)
                .unwrap();
        assert_eq!(result.disease, "influenza");
    }

    #[test]
    fn test_tie_break_keeps_earliest_record() {
        // Identical symptom sets produce identical scores; the first
        // record in catalog order must win.
        let index = index(vec![
            row("first disease", "fever, cough"),
            row("second disease", "fever, cough"),
        ]);
        let matcher = FuzzyMatcher;

        let result = resolve_symptoms(&symptoms(&["fever"]), &index, &matcher).unwrap();
        assert_eq!(result.disease, "first disease");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let index = index(vec![
            row("influenza", "fever, cough, sore throat"),
            row("migraine", "headache, nausea"),
            row("dengue", "fever, rash, joint pain"),
        ]);
        let matcher = FuzzyMatcher;
        let input = symptoms(&["feverr", "joint pan", "rash"]);

        let first = resolve_symptoms(&input, &index, &matcher).unwrap();
        let second = resolve_symptoms(&input, &index, &matcher).unwrap();

        assert_eq!(first.disease, second.disease);
        assert_relative_eq!(first.score, second.score);
    }

    #[test]
    fn test_score_divides_by_resolved_token_count() {
        // One recognizable token plus garbage scores like a single precise
        // symptom: the garbage is dropped before averaging.
        let index = index(vec![row("influenza", "fever, cough")]);
        let matcher = FuzzyMatcher;

        let precise = resolve_symptoms(&symptoms(&["fever"]), &index, &matcher).unwrap();
        let noisy = resolve_symptoms(
            &symptoms(&["fever", "qwxzj", "plmkv", "zzzzz"]),
            &index,
            &matcher,
        )
        .unwrap();

        assert_relative_eq!(precise.score, noisy.score);
    }

    #[test]
    fn test_match_result_carries_record_metadata() {
        let index = index(vec![CatalogRow {
            disease: "influenza".to_string(),
            symptoms: "fever, cough".to_string(),
            description: "A contagious respiratory illness.".to_string(),
            medications: "oseltamivir|paracetamol".to_string(),
            procedures: "rest|fluids".to_string(),
            precautions: "stay home".to_string(),
            specialist: "General physician".to_string(),
        }]);
        let matcher = FuzzyMatcher;

        let result = resolve_symptoms(&symptoms(&["fever"]), &index, &matcher).unwrap();
        assert_eq!(result.description, "A contagious respiratory illness.");
        assert_eq!(result.medications, &["oseltamivir", "paracetamol"]);
        assert_eq!(result.procedures, &["rest", "fluids"]);
        assert_eq!(result.precautions, &["stay home"]);
        assert_eq!(result.specialist, "General physician");
    }

    #[test]
    fn test_detect_greeting_hits_and_misses() {
        let table = GreetingTable::from_pairs(vec![("hello".to_string(), "Hi!".to_string())]);
        let matcher = FuzzyMatcher;

        assert_eq!(
            detect_greeting("hello", &table, &matcher),
            Some("Hi!".to_string())
        );
        assert_eq!(
            detect_greeting("  HELLO ", &table, &matcher),
            Some("Hi!".to_string())
        );
        assert!(detect_greeting("xyzzy", &table, &matcher).is_none());
    }

    #[test]
    fn test_detect_greeting_on_empty_table_is_none() {
        let table = GreetingTable::from_pairs(Vec::new());
        let matcher = FuzzyMatcher;

        assert!(detect_greeting("hello", &table, &matcher).is_none());
    }
}
