//! Lightweight lexicon sentiment model
//!
//! Counts positive and negative keywords and reports the positive share as
//! the score. Used when no neural model is configured, and in tests.

use crate::provider::{ProviderLoader, SentimentProvider};
use aho_corasick::{AhoCorasick, MatchKind};
use async_trait::async_trait;
use reviewpulse_core::{Error, RawOutput, Result};
use std::sync::Arc;

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "love",
    "loved",
    "amazing",
    "wonderful",
    "happy",
    "fantastic",
    "awesome",
    "best",
    "perfect",
    "recommend",
    "nice",
    "works",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "hate",
    "horrible",
    "worst",
    "sad",
    "angry",
    "disappointed",
    "poor",
    "broken",
    "waste",
    "refund",
    "useless",
    "returned",
];

pub struct LexiconProvider {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconProvider {
    pub fn new() -> Result<Self> {
        Self::with_name("sentiment-lexicon")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let positive = build_matcher(POSITIVE_WORDS)?;
        let negative = build_matcher(NEGATIVE_WORDS)?;

        Ok(Self {
            name: name.into(),
            positive,
            negative,
        })
    }

    /// Positive share of keyword hits; 0.5 when nothing matched
    pub fn positive_share(&self, text: &str) -> f64 {
        let positive_hits = count_words(&self.positive, text) as f64;
        let negative_hits = count_words(&self.negative, text) as f64;
        let total = positive_hits + negative_hits;

        if total == 0.0 {
            0.5
        } else {
            positive_hits / total
        }
    }
}

#[async_trait]
impl SentimentProvider for LexiconProvider {
    async fn predict(&self, text: &str) -> Result<RawOutput> {
        let score = self.positive_share(text);

        let ranked = if score >= 0.5 {
            [("POSITIVE", score), ("NEGATIVE", 1.0 - score)]
        } else {
            [("NEGATIVE", 1.0 - score), ("POSITIVE", score)]
        };

        Ok(RawOutput::ranked(ranked))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Loads a [`LexiconProvider`]; never touches the network
#[derive(Debug, Clone, Default)]
pub struct LexiconLoader;

#[async_trait]
impl ProviderLoader for LexiconLoader {
    async fn load(&self) -> Result<Arc<dyn SentimentProvider>> {
        Ok(Arc::new(LexiconProvider::new()?))
    }

    fn describe(&self) -> String {
        "sentiment-lexicon".to_string()
    }
}

fn build_matcher(words: &[&str]) -> Result<AhoCorasick> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(words)
        .map_err(|e| Error::model_load(format!("failed to build sentiment matcher: {e}")))
}

/// Count matches that stand as whole words
fn count_words(matcher: &AhoCorasick, text: &str) -> usize {
    let bytes = text.as_bytes();
    matcher
        .find_iter(text)
        .filter(|m| {
            let before = m.start().checked_sub(1).map(|i| bytes[i]);
            let after = bytes.get(m.end()).copied();
            !before.is_some_and(is_word_byte) && !after.is_some_and(is_word_byte)
        })
        .count()
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewpulse_core::{bucketize, normalize, Bucket};

    async fn bucket_for(text: &str) -> Bucket {
        let provider = LexiconProvider::new().unwrap();
        let raw = provider.predict(text).await.unwrap();
        bucketize(&normalize(&raw).unwrap())
    }

    #[tokio::test]
    async fn test_positive_review() {
        assert_eq!(bucket_for("Great product, I love it!").await, Bucket::Positive);
    }

    #[tokio::test]
    async fn test_negative_review() {
        assert_eq!(bucket_for("Terrible. Broken on arrival.").await, Bucket::Negative);
    }

    #[tokio::test]
    async fn test_no_keywords_is_neutral() {
        assert_eq!(bucket_for("It arrived on Tuesday.").await, Bucket::Neutral);
    }

    #[tokio::test]
    async fn test_output_is_ranked_best_first() {
        let provider = LexiconProvider::new().unwrap();
        let raw = provider.predict("bad bad good").await.unwrap();
        let entries = raw.as_value().as_array().unwrap();
        assert_eq!(entries[0]["label"], "NEGATIVE");
        assert!(entries[0]["score"].as_f64().unwrap() > entries[1]["score"].as_f64().unwrap());
    }

    #[test]
    fn test_keywords_match_whole_words_only() {
        let provider = LexiconProvider::new().unwrap();
        assert_eq!(provider.positive_share("goodbye badge"), 0.5);
        assert_eq!(provider.positive_share("GOOD"), 1.0);
    }
}
