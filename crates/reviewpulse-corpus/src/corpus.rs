//! Immutable review corpus

use rand::Rng;

/// Ordered, immutable list of non-empty, trimmed review texts.
///
/// A corpus always holds at least one item; there is no empty corpus value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    items: Vec<String>,
}

impl Corpus {
    /// Build a corpus from raw values in source order.
    ///
    /// Values are trimmed and empties dropped. Returns `None` when nothing
    /// survives.
    pub fn from_items<I, S>(items: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items: Vec<String> = items
            .into_iter()
            .map(|item| item.as_ref().trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();

        if items.is_empty() {
            None
        } else {
            Some(Self { items })
        }
    }

    /// Number of reviews (always at least one)
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with collections
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Review at the given position
    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    /// Iterate reviews in source order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Pick one review uniformly at random, returning its index and text
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, &str) {
        let index = rng.gen_range(0..self.items.len());
        (index, &self.items[index])
    }
}
