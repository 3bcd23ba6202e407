//! Corpus loader with replace-or-clear reload semantics

use crate::corpus::Corpus;
use crate::parser::parse_tsv;
use crate::source::{CorpusSource, SourceFetcher};
use parking_lot::RwLock;
use reviewpulse_core::{ComponentState, Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Column read from the tabular source unless configured otherwise
pub const DEFAULT_TEXT_COLUMN: &str = "text";

/// Owns the review corpus and its load lifecycle.
///
/// The corpus is only ever replaced as a whole. Starting a load clears it,
/// a successful load installs the new corpus and a failed one leaves it
/// cleared. Readers get `Arc` snapshots and never hold the lock.
pub struct CorpusLoader {
    source: CorpusSource,
    column: String,
    fetcher: SourceFetcher,
    inner: RwLock<LoaderInner>,
}

#[derive(Default)]
struct LoaderInner {
    state: ComponentState,
    corpus: Option<Arc<Corpus>>,
    attempt: u64,
}

impl CorpusLoader {
    /// Create a loader reading the default `text` column
    pub fn new(source: CorpusSource) -> Self {
        Self {
            source,
            column: DEFAULT_TEXT_COLUMN.to_string(),
            fetcher: SourceFetcher::new(),
            inner: RwLock::new(LoaderInner::default()),
        }
    }

    /// Read a different column
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Use a custom fetcher (timeouts, HTTP client)
    pub fn with_fetcher(mut self, fetcher: SourceFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn source(&self) -> &CorpusSource {
        &self.source
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Current lifecycle state
    pub fn state(&self) -> ComponentState {
        self.inner.read().state
    }

    /// Current corpus, present only while the loader is ready
    pub fn snapshot(&self) -> Option<Arc<Corpus>> {
        self.inner.read().corpus.clone()
    }

    /// Size of the current corpus, zero when none is loaded
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .corpus
            .as_ref()
            .map(|corpus| corpus.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch, parse and install a fresh corpus.
    ///
    /// If another load starts before this one settles, this attempt's outcome
    /// is returned to the caller but not installed.
    pub async fn load(&self) -> Result<Arc<Corpus>> {
        let attempt = {
            let mut inner = self.inner.write();
            inner.attempt += 1;
            inner.state = ComponentState::Pending;
            inner.corpus = None;
            inner.attempt
        };

        info!(source = %self.source, column = %self.column, "Loading review corpus");

        let outcome = self.fetch_corpus().await.map(Arc::new);

        let mut inner = self.inner.write();
        if inner.attempt != attempt {
            debug!(attempt, current = inner.attempt, "Corpus load superseded by a newer attempt");
            return outcome;
        }

        match &outcome {
            Ok(corpus) => {
                inner.corpus = Some(Arc::clone(corpus));
                inner.state = ComponentState::Ready;
                info!(reviews = corpus.len(), "Review corpus ready");
            }
            Err(e) => {
                inner.corpus = None;
                inner.state = ComponentState::Failed;
                warn!(error = %e, kind = e.kind(), "Review corpus failed to load");
            }
        }

        outcome
    }

    async fn fetch_corpus(&self) -> Result<Corpus> {
        let text = self.fetcher.fetch(&self.source).await?;
        let values = parse_tsv(&text, &self.column)?;
        Corpus::from_items(values).ok_or_else(|| Error::empty_corpus(&self.column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_state_is_idle_and_empty() {
        let loader = CorpusLoader::new(CorpusSource::inline("text\nhello\n"));
        assert_eq!(loader.state(), ComponentState::Idle);
        assert!(loader.snapshot().is_none());
        assert!(loader.is_empty());
    }

    #[tokio::test]
    async fn test_custom_column() {
        let loader = CorpusLoader::new(CorpusSource::inline("id\treview\n1\tsolid\n"))
            .with_column("review");
        let corpus = loader.load().await.unwrap();
        assert_eq!(corpus.get(0), Some("solid"));
        assert_eq!(loader.column(), "review");
    }
}
