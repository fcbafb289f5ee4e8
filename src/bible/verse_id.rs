//! Verse identifier codec.
//!
//! A verse id packs `(book, chapter, verse)` into one ordered integer:
//! `book * 1_000_000 + chapter * 1_000 + verse`. Ordering by id is canonical
//! reading order, which the converter relies on.

use crate::bible::books::Book;
use crate::bible::metadata::{max_verse, number_of_chapters};
use crate::constants::verse_id::{BOOK_FACTOR, CHAPTER_FACTOR, MAX_COMPONENT};
use crate::error::{Error, Result};
use crate::types::VerseId;

/// Encode a triple without checking it against the verse table.
pub const fn encode(book: Book, chapter: u32, verse: u32) -> VerseId {
    book.index() as VerseId * BOOK_FACTOR + chapter as VerseId * CHAPTER_FACTOR + verse as VerseId
}

/// Encode a triple, rejecting chapters or verses the book does not have.
pub fn verse_id(book: Book, chapter: u32, verse: u32) -> Result<VerseId> {
    if is_valid_verse(book, chapter, verse) {
        Ok(encode(book, chapter, verse))
    } else {
        Err(Error::invalid_verse(book, chapter, verse))
    }
}

/// Split an id back into its triple. Only the book index is checked.
pub fn decode(id: VerseId) -> Result<(Book, u32, u32)> {
    if id <= 0 {
        return Err(Error::invalid_verse_id(id, None));
    }
    let component = |value: VerseId| u32::try_from(value).map_err(|_| Error::invalid_verse_id(id, None));

    let book = component(id / BOOK_FACTOR)
        .ok()
        .and_then(Book::from_index)
        .ok_or_else(|| Error::invalid_verse_id(id, None))?;
    let chapter = component((id % BOOK_FACTOR) / CHAPTER_FACTOR)?;
    let verse = component(id % CHAPTER_FACTOR)?;
    Ok((book, chapter, verse))
}

/// Decode an id and check the triple against the verse table.
pub fn validate(id: VerseId) -> Result<(Book, u32, u32)> {
    let (book, chapter, verse) = decode(id)?;
    if is_valid_verse(book, chapter, verse) {
        Ok((book, chapter, verse))
    } else {
        Err(Error::invalid_verse_id(id, Some((book, chapter, verse))))
    }
}

/// Whether `id` names a verse that exists.
pub fn is_valid_verse_id(id: VerseId) -> bool {
    validate(id).is_ok()
}

/// Whether `chapter` exists in `book`.
pub fn is_valid_chapter(book: Book, chapter: u32) -> bool {
    (1..=number_of_chapters(book)).contains(&chapter)
}

/// Whether `book chapter:verse` exists.
pub fn is_valid_verse(book: Book, chapter: u32, verse: u32) -> bool {
    verse >= 1 && verse <= MAX_COMPONENT && max_verse(book, chapter).is_some_and(|max| verse <= max)
}

/// Book component of an id.
pub fn book_of(id: VerseId) -> Result<Book> {
    decode(id).map(|(book, _, _)| book)
}

/// Chapter component of an id.
pub fn chapter_of(id: VerseId) -> Result<u32> {
    decode(id).map(|(_, chapter, _)| chapter)
}

/// Verse component of an id.
pub fn verse_of(id: VerseId) -> Result<u32> {
    decode(id).map(|(_, _, verse)| verse)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(Book::Genesis, 1, 1), 1_001_001);
        assert_eq!(encode(Book::Matthew, 18, 12), 40_018_012);
        assert_eq!(encode(Book::Revelation, 22, 21), 66_022_021);
    }

    #[test]
    fn test_decode_reproduces_triple() {
        assert_eq!(decode(42_015_003).unwrap(), (Book::Luke, 15, 3));
        assert_eq!(decode(encode(Book::Psalms, 119, 176)).unwrap(), (Book::Psalms, 119, 176));
    }

    #[test]
    fn test_decode_rejects_unknown_book() {
        assert!(decode(0).is_err());
        assert!(decode(-1_001_001).is_err());
        assert!(decode(67_001_001).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(is_valid_verse_id(1_001_031));
        assert!(!is_valid_verse_id(1_001_032));
        assert!(!is_valid_verse_id(1_051_001));
        assert!(!is_valid_verse_id(1_001_000));

        let err = validate(1_001_032).unwrap_err();
        assert_eq!(err.to_string(), "1001032 is not a valid verse. (Genesis 1:32)");
    }

    #[test]
    fn test_verse_id_checks_table() {
        assert_eq!(verse_id(Book::Jude, 1, 25).unwrap(), 65_001_025);
        let err = verse_id(Book::Jude, 1, 26).unwrap_err();
        assert_eq!(err.to_string(), "Jude 1:26 is not a valid verse.");
        assert!(is_valid_chapter(Book::Jude, 1));
        assert!(!is_valid_chapter(Book::Jude, 2));
    }

    #[test]
    fn test_components() {
        assert_eq!(book_of(43_003_016).unwrap(), Book::John);
        assert_eq!(chapter_of(43_003_016).unwrap(), 3);
        assert_eq!(verse_of(43_003_016).unwrap(), 16);
    }
}
