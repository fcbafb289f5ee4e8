//! Verse-ID converter: expands references to verse ids and contracts verse ids
//! back into references.

use crate::bible::books::Book;
use crate::bible::metadata::{chapters_in, verses_in, CanonMetadata, VerseMetadata};
use crate::bible::reference::ScriptureRef;
use crate::bible::verse_id::{decode, encode};
use crate::error::{Error, Result};
use crate::types::VerseId;

/// A concrete verse position.
pub(crate) type Position = (Book, u32, u32);

/// Resolve a reference's omitted fields into explicit start and end positions.
///
/// Start defaults to chapter 1, verse 1; end defaults to the last chapter of
/// `end_book` and the last verse of that chapter. Both ends must exist.
pub(crate) fn resolve(source: &dyn VerseMetadata, reference: &ScriptureRef) -> Result<(Position, Position)> {
    let start_chapter = reference.start_chapter.unwrap_or(1);
    let start_verse = reference.start_verse.unwrap_or(1);
    let end_chapter = reference.end_chapter.unwrap_or_else(|| chapters_in(source, reference.end_book));
    let end_verse = match reference.end_verse {
        Some(verse) => verse,
        None => verses_in(source, reference.end_book, end_chapter)
            .ok_or_else(|| Error::invalid_verse(reference.end_book, end_chapter, 1))?,
    };

    let start = (reference.book, start_chapter, start_verse);
    let end = (reference.end_book, end_chapter, end_verse);
    for (book, chapter, verse) in [start, end] {
        if !exists(source, book, chapter, verse) {
            return Err(Error::invalid_verse(book, chapter, verse));
        }
    }
    if encode(end.0, end.1, end.2) < encode(start.0, start.1, start.2) {
        return Err(Error::invalid_reference(format!(
            "{} {start_chapter}:{start_verse} comes after {} {end_chapter}:{end_verse}",
            reference.book, reference.end_book
        )));
    }
    Ok((start, end))
}

fn exists(source: &dyn VerseMetadata, book: Book, chapter: u32, verse: u32) -> bool {
    verse >= 1 && verses_in(source, book, chapter).is_some_and(|max| verse <= max)
}

/// The next verse in canonical order according to `source`.
pub(crate) fn successor(source: &dyn VerseMetadata, (book, chapter, verse): Position) -> Option<Position> {
    let last = verses_in(source, book, chapter)?;
    if verse < last {
        Some((book, chapter, verse + 1))
    } else if chapter < chapters_in(source, book) {
        Some((book, chapter + 1, 1))
    } else {
        book.next().map(|next| (next, 1, 1))
    }
}

/// Expand references to verse ids using the canon table.
///
/// Output follows input order; overlapping references yield repeated ids.
pub fn references_to_verse_ids(references: &[ScriptureRef]) -> Result<Vec<VerseId>> {
    references_to_verse_ids_in(&CanonMetadata, references)
}

/// [`references_to_verse_ids`] against a specific metadata source.
pub fn references_to_verse_ids_in(source: &dyn VerseMetadata, references: &[ScriptureRef]) -> Result<Vec<VerseId>> {
    let mut ids = Vec::new();
    for reference in references {
        let (start, end) = resolve(source, reference)?;
        let mut current = start;
        loop {
            ids.push(encode(current.0, current.1, current.2));
            if current == end {
                break;
            }
            // gaps in the source's chapter table surface as InvalidVerse
            current = match successor(source, current) {
                Some(next) if exists(source, next.0, next.1, next.2) => next,
                Some((book, chapter, verse)) => return Err(Error::invalid_verse(book, chapter, verse)),
                None => return Err(Error::invalid_verse(current.0, current.1, current.2 + 1)),
            };
        }
    }
    Ok(ids)
}

/// Contract verse ids into the fewest references that cover exactly them.
///
/// Ids are sorted and deduplicated first. Every reference carries explicit
/// chapter and verse numbers on both ends.
pub fn verse_ids_to_references(verse_ids: &[VerseId]) -> Result<Vec<ScriptureRef>> {
    verse_ids_to_references_in(&CanonMetadata, verse_ids)
}

/// [`verse_ids_to_references`] against a specific metadata source.
pub fn verse_ids_to_references_in(source: &dyn VerseMetadata, verse_ids: &[VerseId]) -> Result<Vec<ScriptureRef>> {
    let mut sorted = verse_ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut references = Vec::new();
    let mut run: Option<(Position, Position)> = None;
    for id in sorted {
        let position = decode(id)?;
        let (book, chapter, verse) = position;
        if !exists(source, book, chapter, verse) {
            return Err(Error::invalid_verse_id(id, Some(position)));
        }
        run = match run {
            Some((start, end)) if successor(source, end) == Some(position) => Some((start, position)),
            Some(finished) => {
                references.push(to_reference(finished));
                Some((position, position))
            }
            None => Some((position, position)),
        };
    }
    if let Some(finished) = run {
        references.push(to_reference(finished));
    }
    Ok(references)
}

const fn to_reference(((book, start_chapter, start_verse), (end_book, end_chapter, end_verse)): (Position, Position)) -> ScriptureRef {
    ScriptureRef {
        book,
        start_chapter: Some(start_chapter),
        start_verse: Some(start_verse),
        end_chapter: Some(end_chapter),
        end_verse: Some(end_verse),
        end_book,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::bible::metadata::{number_of_verses_in_book, MaxVerses};
    use std::collections::BTreeMap;
    use pretty_assertions::assert_eq;

    /// A source whose table skips chapters.
    struct Gapped(MaxVerses);

    impl VerseMetadata for Gapped {
        fn fetch_max_verses(&self) -> Result<&MaxVerses> {
            Ok(&self.0)
        }
    }

    #[test]
    fn test_successor_crosses_boundaries() {
        let canon = &CanonMetadata;
        assert_eq!(successor(canon, (Book::Genesis, 1, 30)), Some((Book::Genesis, 1, 31)));
        assert_eq!(successor(canon, (Book::Genesis, 1, 31)), Some((Book::Genesis, 2, 1)));
        assert_eq!(successor(canon, (Book::Genesis, 50, 26)), Some((Book::Exodus, 1, 1)));
        assert_eq!(successor(canon, (Book::Revelation, 22, 21)), None);
    }

    #[test]
    fn test_gapped_table_is_an_error() {
        let source = Gapped(MaxVerses::from([(Book::Genesis, BTreeMap::from([(1, 3), (3, 2)]))]));
        let err = references_to_verse_ids_in(&source, &[ScriptureRef::span(Book::Genesis, 1, 1, 3, 2)]).unwrap_err();
        assert!(matches!(err, Error::InvalidVerse { .. }));
        assert_eq!(err.to_string(), "Genesis 2:1 is not a valid verse.");

        let ids = references_to_verse_ids_in(&source, &[ScriptureRef::chapters(Book::Genesis, 3, 3)]).unwrap();
        assert_eq!(ids, vec![1_003_001, 1_003_002]);
    }

    #[test]
    fn test_single_verse() {
        let ids = references_to_verse_ids(&[ScriptureRef::single(Book::John, 3, 16)]).unwrap();
        assert_eq!(ids, vec![43_003_016]);
    }

    #[test]
    fn test_chapter_crossing_range() {
        let ids = references_to_verse_ids(&[ScriptureRef::span(Book::Genesis, 1, 30, 2, 2)]).unwrap();
        assert_eq!(ids, vec![1_001_030, 1_001_031, 1_002_001, 1_002_002]);
    }

    #[test]
    fn test_whole_book_and_whole_chapter() {
        let ids = references_to_verse_ids(&[ScriptureRef::book(Book::Jude)]).unwrap();
        assert_eq!(ids.len(), 25);
        assert_eq!(ids.first(), Some(&65_001_001));
        assert_eq!(ids.last(), Some(&65_001_025));

        let ids = references_to_verse_ids(&[ScriptureRef::chapters(Book::Psalms, 119, 119)]).unwrap();
        assert_eq!(ids.len(), 176);
    }

    #[test]
    fn test_cross_book_span() {
        let ids = references_to_verse_ids(&[ScriptureRef::books(Book::Genesis, Book::Deuteronomy)]).unwrap();
        let expected: u32 = [Book::Genesis, Book::Exodus, Book::Leviticus, Book::Numbers, Book::Deuteronomy]
            .into_iter()
            .map(number_of_verses_in_book)
            .sum();
        assert_eq!(ids.len(), expected as usize);
        assert_eq!(ids.len(), 5852);
        assert_eq!(ids.first(), Some(&1_001_001));
        assert_eq!(ids.last(), Some(&5_034_012));
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_duplicates_are_kept_in_input_order() {
        let ids = references_to_verse_ids(&[
            ScriptureRef::single(Book::Luke, 1, 2),
            ScriptureRef::single(Book::Genesis, 1, 1),
            ScriptureRef::single(Book::Luke, 1, 2),
        ])
        .unwrap();
        assert_eq!(ids, vec![42_001_002, 1_001_001, 42_001_002]);
    }

    #[test]
    fn test_invalid_bounds_are_reported() {
        let err = references_to_verse_ids(&[ScriptureRef::single(Book::Genesis, 1, 32)]).unwrap_err();
        assert_eq!(err.to_string(), "Genesis 1:32 is not a valid verse.");
        assert!(references_to_verse_ids(&[ScriptureRef::chapters(Book::Genesis, 51, 51)]).is_err());
        assert!(references_to_verse_ids(&[ScriptureRef::chapters(Book::Genesis, 5, 3)]).is_err());
    }

    #[test]
    fn test_contraction_does_not_merge_across_gaps() {
        let refs = verse_ids_to_references(&[
            40_018_012, 40_018_013, 40_018_014, 42_015_003, 42_015_004, 42_015_005, 42_015_006, 42_015_007,
        ])
        .unwrap();
        assert_eq!(
            refs,
            vec![ScriptureRef::range(Book::Matthew, 18, 12, 14), ScriptureRef::range(Book::Luke, 15, 3, 7)]
        );
    }

    #[test]
    fn test_contraction_crosses_chapters_and_books() {
        let refs = verse_ids_to_references(&[50_004_023, 51_001_001, 1_050_026, 2_001_001, 1_050_025]).unwrap();
        assert_eq!(
            refs,
            vec![
                ScriptureRef {
                    book: Book::Genesis,
                    start_chapter: Some(50),
                    start_verse: Some(25),
                    end_chapter: Some(1),
                    end_verse: Some(1),
                    end_book: Book::Exodus,
                },
                ScriptureRef {
                    book: Book::Philippians,
                    start_chapter: Some(4),
                    start_verse: Some(23),
                    end_chapter: Some(1),
                    end_verse: Some(1),
                    end_book: Book::Colossians,
                },
            ]
        );
    }

    #[test]
    fn test_contraction_sorts_and_dedups() {
        let refs = verse_ids_to_references(&[43_003_017, 43_003_016, 43_003_016]).unwrap();
        assert_eq!(refs, vec![ScriptureRef::range(Book::John, 3, 16, 17)]);
        assert!(verse_ids_to_references(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_contraction_rejects_invalid_ids() {
        let err = verse_ids_to_references(&[1_001_001, 1_001_032]).unwrap_err();
        assert_eq!(err.to_string(), "1001032 is not a valid verse. (Genesis 1:32)");
        let err = verse_ids_to_references(&[99_001_001]).unwrap_err();
        assert_eq!(err.to_string(), "99001001 is not a valid verse.");
    }

    #[test]
    fn test_round_trip_covers_same_verses() {
        let original = [
            ScriptureRef::chapters(Book::Genesis, 1, 3),
            ScriptureRef::books(Book::Hosea, Book::Malachi),
            ScriptureRef::span(Book::Romans, 8, 28, 9, 5),
        ];
        let ids = references_to_verse_ids(&original).unwrap();
        let contracted = verse_ids_to_references(&ids).unwrap();
        assert_eq!(contracted.len(), 3);
        assert_eq!(references_to_verse_ids(&contracted).unwrap(), ids);
    }
}
