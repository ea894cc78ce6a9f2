//! Reading progress map
//!
//! Maps book names to the set of completed chapter numbers. Persisted as an
//! ordered array per book so the serialized form is stable across runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog;

/// Completed chapters per book
///
/// Set semantics with a sorted-vec representation: duplicates collapse,
/// chapters are stored ascending. The serialized shape is a JSON object of
/// `book -> [chapter, ...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap {
    books: BTreeMap<String, Vec<u32>>,
}

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a chapter is marked read
    pub fn is_read(&self, book: &str, chapter: u32) -> bool {
        self.books
            .get(book)
            .is_some_and(|chapters| chapters.binary_search(&chapter).is_ok())
    }

    /// Mark a chapter read (idempotent)
    pub fn insert(&mut self, book: &str, chapter: u32) {
        let chapters = self.books.entry(book.to_string()).or_default();
        if let Err(pos) = chapters.binary_search(&chapter) {
            chapters.insert(pos, chapter);
        }
    }

    /// Flip membership of a chapter: its own inverse
    pub fn toggle(&mut self, book: &str, chapter: u32) {
        let chapters = self.books.entry(book.to_string()).or_default();
        match chapters.binary_search(&chapter) {
            Ok(pos) => {
                chapters.remove(pos);
            }
            Err(pos) => chapters.insert(pos, chapter),
        }
    }

    /// Completed chapters for one book
    pub fn book_completed(&self, book: &str) -> u32 {
        self.books.get(book).map_or(0, |c| c.len() as u32)
    }

    /// Total completed chapters across all books
    pub fn completed_count(&self) -> u32 {
        self.books.values().map(|c| c.len() as u32).sum()
    }

    /// Percent of the catalog complete, rounded to the nearest integer
    pub fn percent_complete(&self) -> u32 {
        let total = catalog::total_chapters();
        if total == 0 {
            return 0;
        }
        ((self.completed_count() as f64 / total as f64) * 100.0).round() as u32
    }

    /// Drop entries that do not exist in the catalog: unknown books,
    /// out-of-range chapter numbers, duplicates. Applied when loading
    /// persisted data of unknown provenance.
    pub fn sanitize(&mut self) {
        self.books.retain(|name, chapters| {
            let Some(book) = catalog::book(name) else {
                return false;
            };
            chapters.retain(|&c| c >= 1 && c <= book.chapters);
            chapters.sort_unstable();
            chapters.dedup();
            !chapters.is_empty()
        });
    }
}
