//! Book catalog and canonical chapter order
//!
//! Static table of the 66 books with chapter counts and testament tags.
//! All "next unread" computation linearizes over the canonical order
//! defined here: books in canon order, chapters 1..=N within each book.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Testament a book belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Testament {
    #[serde(rename = "OT")]
    Old,
    #[serde(rename = "NT")]
    New,
}

/// One book of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Canonical book name (unique)
    pub name: &'static str,
    /// Number of chapters (chapters are addressed 1..=chapters)
    pub chapters: u32,
    /// Testament tag
    pub testament: Testament,
}

use Testament::{New, Old};

/// The 66 books in canon order
pub const BOOKS: [Book; 66] = [
    Book { name: "Genesis", chapters: 50, testament: Old },
    Book { name: "Exodus", chapters: 40, testament: Old },
    Book { name: "Leviticus", chapters: 27, testament: Old },
    Book { name: "Numbers", chapters: 36, testament: Old },
    Book { name: "Deuteronomy", chapters: 34, testament: Old },
    Book { name: "Joshua", chapters: 24, testament: Old },
    Book { name: "Judges", chapters: 21, testament: Old },
    Book { name: "Ruth", chapters: 4, testament: Old },
    Book { name: "1 Samuel", chapters: 31, testament: Old },
    Book { name: "2 Samuel", chapters: 24, testament: Old },
    Book { name: "1 Kings", chapters: 22, testament: Old },
    Book { name: "2 Kings", chapters: 25, testament: Old },
    Book { name: "1 Chronicles", chapters: 29, testament: Old },
    Book { name: "2 Chronicles", chapters: 36, testament: Old },
    Book { name: "Ezra", chapters: 10, testament: Old },
    Book { name: "Nehemiah", chapters: 13, testament: Old },
    Book { name: "Esther", chapters: 10, testament: Old },
    Book { name: "Job", chapters: 42, testament: Old },
    Book { name: "Psalms", chapters: 150, testament: Old },
    Book { name: "Proverbs", chapters: 31, testament: Old },
    Book { name: "Ecclesiastes", chapters: 12, testament: Old },
    Book { name: "Song of Solomon", chapters: 8, testament: Old },
    Book { name: "Isaiah", chapters: 66, testament: Old },
    Book { name: "Jeremiah", chapters: 52, testament: Old },
    Book { name: "Lamentations", chapters: 5, testament: Old },
    Book { name: "Ezekiel", chapters: 48, testament: Old },
    Book { name: "Daniel", chapters: 12, testament: Old },
    Book { name: "Hosea", chapters: 14, testament: Old },
    Book { name: "Joel", chapters: 3, testament: Old },
    Book { name: "Amos", chapters: 9, testament: Old },
    Book { name: "Obadiah", chapters: 1, testament: Old },
    Book { name: "Jonah", chapters: 4, testament: Old },
    Book { name: "Micah", chapters: 7, testament: Old },
    Book { name: "Nahum", chapters: 3, testament: Old },
    Book { name: "Habakkuk", chapters: 3, testament: Old },
    Book { name: "Zephaniah", chapters: 3, testament: Old },
    Book { name: "Haggai", chapters: 2, testament: Old },
    Book { name: "Zechariah", chapters: 14, testament: Old },
    Book { name: "Malachi", chapters: 4, testament: Old },
    Book { name: "Matthew", chapters: 28, testament: New },
    Book { name: "Mark", chapters: 16, testament: New },
    Book { name: "Luke", chapters: 24, testament: New },
    Book { name: "John", chapters: 21, testament: New },
    Book { name: "Acts", chapters: 28, testament: New },
    Book { name: "Romans", chapters: 16, testament: New },
    Book { name: "1 Corinthians", chapters: 16, testament: New },
    Book { name: "2 Corinthians", chapters: 13, testament: New },
    Book { name: "Galatians", chapters: 6, testament: New },
    Book { name: "Ephesians", chapters: 6, testament: New },
    Book { name: "Philippians", chapters: 4, testament: New },
    Book { name: "Colossians", chapters: 4, testament: New },
    Book { name: "1 Thessalonians", chapters: 5, testament: New },
    Book { name: "2 Thessalonians", chapters: 3, testament: New },
    Book { name: "1 Timothy", chapters: 6, testament: New },
    Book { name: "2 Timothy", chapters: 4, testament: New },
    Book { name: "Titus", chapters: 3, testament: New },
    Book { name: "Philemon", chapters: 1, testament: New },
    Book { name: "Hebrews", chapters: 13, testament: New },
    Book { name: "James", chapters: 5, testament: New },
    Book { name: "1 Peter", chapters: 5, testament: New },
    Book { name: "2 Peter", chapters: 3, testament: New },
    Book { name: "1 John", chapters: 5, testament: New },
    Book { name: "2 John", chapters: 1, testament: New },
    Book { name: "3 John", chapters: 1, testament: New },
    Book { name: "Jude", chapters: 1, testament: New },
    Book { name: "Revelation", chapters: 22, testament: New },
];

/// All `(book name, chapter)` pairs in canonical order
static CANONICAL_ORDER: Lazy<Vec<(&'static str, u32)>> = Lazy::new(|| {
    let mut order = Vec::with_capacity(total_chapters() as usize);
    for book in &BOOKS {
        for chapter in 1..=book.chapters {
            order.push((book.name, chapter));
        }
    }
    order
});

/// All books in canon order
pub fn books() -> &'static [Book] {
    &BOOKS
}

/// Look up a book by exact name
pub fn book(name: &str) -> Option<&'static Book> {
    BOOKS.iter().find(|b| b.name == name)
}

/// Total chapter count across the catalog (1189)
pub fn total_chapters() -> u32 {
    BOOKS.iter().map(|b| b.chapters).sum()
}

/// Canonical `(book name, chapter)` order used to linearize plan derivation
pub fn canonical_order() -> &'static [(&'static str, u32)] {
    &CANONICAL_ORDER
}

/// Validate a chapter reference against the catalog
pub fn is_valid_chapter(book_name: &str, chapter: u32) -> bool {
    book(book_name).is_some_and(|b| chapter >= 1 && chapter <= b.chapters)
}

/// Books of one testament, in canon order
pub fn testament_books(testament: Testament) -> impl Iterator<Item = &'static Book> {
    BOOKS.iter().filter(move |b| b.testament == testament)
}

/// Case-insensitive substring search over book names
///
/// An empty or whitespace-only query matches every book.
pub fn search_books(query: &str) -> Vec<&'static Book> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return BOOKS.iter().collect();
    }
    BOOKS
        .iter()
        .filter(|b| b.name.to_lowercase().contains(&needle))
        .collect()
}
