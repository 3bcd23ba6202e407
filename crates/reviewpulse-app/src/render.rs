//! Plain-text rendering of session status and analysis outcomes

use crate::session::{Analysis, AnalyzeOutcome};
use reviewpulse_core::{Bucket, SessionState};

/// Longest review excerpt printed to the terminal, in characters
const DISPLAY_CHARS: usize = 400;

/// Status line with a marker for error states
pub fn status_line(state: &SessionState) -> String {
    let status = state.status();
    let marker = if status.is_error() {
        "✗"
    } else if state.is_ready() {
        "✓"
    } else {
        "…"
    };
    format!("{} {}", marker, status.message(state))
}

pub fn bucket_title(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Positive => "Positive",
        Bucket::Negative => "Negative",
        Bucket::Neutral => "Neutral",
    }
}

fn bucket_icon(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Positive => "👍",
        Bucket::Negative => "👎",
        Bucket::Neutral => "❓",
    }
}

/// `Positive (97.3% confidence)`
pub fn verdict(analysis: &Analysis) -> String {
    format!(
        "{} ({:.1}% confidence)",
        bucket_title(analysis.bucket),
        analysis.result.percent()
    )
}

fn excerpt(review: &str) -> String {
    let mut chars = review.chars();
    let head: String = chars.by_ref().take(DISPLAY_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

/// Multi-line report for one analyze action
pub fn outcome(outcome: &AnalyzeOutcome) -> String {
    match outcome {
        AnalyzeOutcome::Completed(analysis) => format!(
            "Review #{}:\n  {}\n{} {}  [{}, {} ms]",
            analysis.index + 1,
            excerpt(&analysis.review),
            bucket_icon(analysis.bucket),
            verdict(analysis),
            analysis.result.label,
            analysis.latency.as_millis()
        ),
        AnalyzeOutcome::Busy => "An analysis is already running.".to_string(),
        AnalyzeOutcome::Blocked(reason) => format!("✗ {}", reason),
        AnalyzeOutcome::Failed { review, error } => format!(
            "Review:\n  {}\n✗ Analysis failed. Please try again. Details: {}",
            excerpt(review),
            error
        ),
    }
}
