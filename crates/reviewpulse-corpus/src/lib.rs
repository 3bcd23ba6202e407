//! reviewpulse Corpus
//!
//! Loads the review corpus the analyze action samples from.
//!
//! A load fetches a tab-separated resource, parses it with the header row as
//! field names, extracts one designated column (`text` by default), trims
//! values and drops empties. The resulting [`Corpus`] is immutable and always
//! holds at least one item; a load that yields nothing fails with
//! `EmptyCorpus`. The [`CorpusLoader`] replaces its corpus wholesale on success
//! and clears it on failure, so callers never observe a partial corpus.

pub mod corpus;
pub mod loader;
pub mod parser;
pub mod source;

pub use corpus::Corpus;
pub use loader::{CorpusLoader, DEFAULT_TEXT_COLUMN};
pub use parser::parse_tsv;
pub use source::{CorpusSource, SourceFetcher};
