//! Decision engine
//!
//! Turns raw provider output into a [`ClassificationResult`], maps results to
//! a [`Bucket`] through a fixed threshold, and derives the readiness
//! predicate gating the analyze action. Everything here is pure.

use crate::error::{Error, Result};
use crate::types::{Bucket, ClassificationResult, RawOutput};
use serde_json::Value;

/// Scores must be strictly greater than this to leave the neutral bucket
pub const DECISION_THRESHOLD: f64 = 0.5;

const POSITIVE: &str = "POSITIVE";
const NEGATIVE: &str = "NEGATIVE";

/// Normalize raw provider output into a classification result.
///
/// Only the first entry is read. Providers rank their entries best-first,
/// so ties and later entries are ignored without re-sorting.
pub fn normalize(raw: &RawOutput) -> Result<ClassificationResult> {
    let entries = match raw.as_value() {
        Value::Array(entries) => entries,
        other => {
            return Err(Error::malformed(format!(
                "expected a list of label/score pairs, got {}",
                type_name(other)
            )))
        }
    };

    let top = entries
        .first()
        .ok_or_else(|| Error::malformed("output list is empty"))?;

    let label = top
        .get("label")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::malformed("top entry is missing a string label"))?;

    let score = top
        .get("score")
        .and_then(Value::as_f64)
        .ok_or_else(|| Error::malformed("top entry is missing a numeric score"))?;

    if !(0.0..=1.0).contains(&score) {
        return Err(Error::malformed(format!(
            "score {score} is outside the [0, 1] range"
        )));
    }

    Ok(ClassificationResult::new(label.to_uppercase(), score))
}

/// Map a classification result onto one of the three sentiment buckets.
///
/// The boundary is exclusive: a score of exactly `0.5` is neutral.
pub fn bucketize(result: &ClassificationResult) -> Bucket {
    if result.score > DECISION_THRESHOLD {
        if result.label.eq_ignore_ascii_case(POSITIVE) {
            return Bucket::Positive;
        }
        if result.label.eq_ignore_ascii_case(NEGATIVE) {
            return Bucket::Negative;
        }
    }
    Bucket::Neutral
}

/// Readiness predicate for the analyze action
pub fn compute_readiness(corpus_loaded: bool, classifier_loaded: bool, corpus_size: usize) -> bool {
    corpus_loaded && classifier_loaded && corpus_size > 0
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
