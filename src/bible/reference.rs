//! The normalized reference record.

use serde::{Deserialize, Serialize};

use crate::bible::books::Book;

/// A normalized scripture reference.
///
/// `None` on the start side means "from the first chapter/verse", on the end
/// side "through the last chapter/verse". `end_book` is always populated and
/// equals `book` for single-book references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptureRef {
    /// First book of the span.
    pub book: Book,
    /// First chapter, or `None` for the start of the book.
    pub start_chapter: Option<u32>,
    /// First verse, or `None` for the start of the chapter.
    pub start_verse: Option<u32>,
    /// Last chapter, or `None` for the end of `end_book`.
    pub end_chapter: Option<u32>,
    /// Last verse, or `None` for the end of the chapter.
    pub end_verse: Option<u32>,
    /// Last book of the span.
    pub end_book: Book,
}

impl ScriptureRef {
    /// A whole book.
    pub const fn book(book: Book) -> Self {
        Self::books(book, book)
    }

    /// Every verse from the start of `book` through the end of `end_book`.
    pub const fn books(book: Book, end_book: Book) -> Self {
        Self { book, start_chapter: None, start_verse: None, end_chapter: None, end_verse: None, end_book }
    }

    /// A range of whole chapters.
    pub const fn chapters(book: Book, start: u32, end: u32) -> Self {
        Self { book, start_chapter: Some(start), start_verse: None, end_chapter: Some(end), end_verse: None, end_book: book }
    }

    /// A single verse.
    pub const fn single(book: Book, chapter: u32, verse: u32) -> Self {
        Self::range(book, chapter, verse, verse)
    }

    /// A verse range within one chapter.
    pub const fn range(book: Book, chapter: u32, start: u32, end: u32) -> Self {
        Self::span(book, chapter, start, chapter, end)
    }

    /// A verse range that may cross chapters of one book.
    pub const fn span(book: Book, start_chapter: u32, start_verse: u32, end_chapter: u32, end_verse: u32) -> Self {
        Self {
            book,
            start_chapter: Some(start_chapter),
            start_verse: Some(start_verse),
            end_chapter: Some(end_chapter),
            end_verse: Some(end_verse),
            end_book: book,
        }
    }

    /// Whether the span crosses into another book.
    pub fn is_cross_book(&self) -> bool {
        self.book != self.end_book
    }
}
