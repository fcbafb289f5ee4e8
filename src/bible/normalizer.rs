//! Reference normalizer and book groups.
//!
//! Turns parser output into [`ScriptureRef`]s: omitted end points are filled in
//! from the start point, and named book groups ("Old Testament", "Gospels")
//! expand to whole-book spans.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::bible::books::Book;
use crate::bible::parser::{CitationParser, RawMatch};
use crate::bible::reference::ScriptureRef;
use crate::error::{Error, Result};

#[allow(clippy::expect_used)]
static DEFAULT_GROUPS: LazyLock<Vec<BookGroup>> = LazyLock::new(|| {
    let span = |first: Book, last: Book| -> Vec<Book> {
        Book::all().iter().copied().filter(|b| *b >= first && *b <= last).collect()
    };
    [
        ("Old Testament", r"Old\s+Testament", span(Book::Genesis, Book::Malachi)),
        ("New Testament", r"New\s+Testament", span(Book::Matthew, Book::Revelation)),
        ("Law", r"Pentateuch|Torah|Books\s+of\s+Moses", span(Book::Genesis, Book::Deuteronomy)),
        ("History", r"Historical\s+Books|Books\s+of\s+History", span(Book::Joshua, Book::Esther)),
        (
            "Wisdom",
            r"Wisdom\s+(?:Literature|Books)|Poetical\s+Books|Books\s+of\s+Poetry",
            span(Book::Job, Book::SongOfSongs),
        ),
        ("Major Prophets", r"Major\s+Prophets", span(Book::Isaiah, Book::Daniel)),
        ("Minor Prophets", r"Minor\s+Prophets", span(Book::Hosea, Book::Malachi)),
        ("Gospels", r"Gospels", span(Book::Matthew, Book::John)),
        (
            "Pauline Epistles",
            r"Pauline\s+(?:Epistles|Letters)|Letters\s+of\s+Paul",
            span(Book::Romans, Book::Philemon),
        ),
        ("General Epistles", r"General\s+Epistles|Catholic\s+Epistles", span(Book::Hebrews, Book::Jude)),
    ]
    .into_iter()
    .map(|(name, pattern, books)| BookGroup::new(name, pattern, books).expect("valid default book group"))
    .collect()
});

/// A named collection of books that text can mention as a unit.
#[derive(Debug, Clone)]
pub struct BookGroup {
    name: String,
    pattern: Regex,
    books: Vec<Book>,
}

impl BookGroup {
    /// Create a group matched by a case-insensitive regex.
    pub fn new(name: impl Into<String>, pattern: &str, books: Vec<Book>) -> Result<Self> {
        let name = name.into();
        if books.is_empty() {
            return Err(Error::grammar(format!("book group '{name}' has no books")));
        }
        let whole = Regex::new(&format!("(?i)^(?:{pattern})$"))
            .map_err(|e| Error::grammar(format!("book group '{name}' pattern is invalid: {e}")))?;
        if pattern.trim().is_empty() || whole.is_match("") {
            return Err(Error::grammar(format!("book group '{name}' pattern matches empty text")));
        }
        let pattern = Regex::new(&format!(r"(?i)\b(?:{pattern})\b"))?;
        Ok(Self { name, pattern, books })
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Books in the group, in the order given.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Whole-book spans covering the group, one per run of consecutive books.
    pub fn references(&self) -> Vec<ScriptureRef> {
        let mut references = Vec::new();
        let mut books = self.books.iter().copied();
        let Some(mut first) = books.next() else {
            return references;
        };
        let mut last = first;
        for book in books {
            if last.next() == Some(book) {
                last = book;
            } else {
                references.push(ScriptureRef::books(first, last));
                first = book;
                last = book;
            }
        }
        references.push(ScriptureRef::books(first, last));
        references
    }

    fn find_iter<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Range<usize>> + 'a {
        self.pattern.find_iter(text).map(|m| m.range())
    }
}

/// The built-in groups: testaments, Law, History, Wisdom, the Prophets,
/// Gospels and Epistles.
pub fn default_book_groups() -> &'static [BookGroup] {
    &DEFAULT_GROUPS
}

/// Normalize one parser match.
///
/// A missing end point means the reference ends where it starts: "Genesis 1"
/// is chapter 1 through chapter 1, "Obadiah 1" is verse 1:1 through 1:1.
/// Cross-book matches keep their absent fields, which mean "whole book" on
/// either side.
pub fn normalize(raw: &RawMatch) -> Result<ScriptureRef> {
    let end_book = raw.end_book.unwrap_or(raw.book);
    if raw.book > end_book {
        return Err(Error::invalid_reference(format!("{} comes after {}", raw.book, end_book)));
    }

    if end_book != raw.book {
        return Ok(ScriptureRef {
            book: raw.book,
            start_chapter: raw.start_chapter,
            start_verse: raw.start_verse,
            end_chapter: raw.end_chapter,
            end_verse: raw.end_verse,
            end_book,
        });
    }

    let end_verse = match (raw.end_chapter, raw.end_verse) {
        (None, None) => raw.start_verse,
        (_, end_verse) => end_verse,
    };
    let end_chapter = raw.end_chapter.or(raw.start_chapter);

    if let (Some(start), Some(end)) = (raw.start_chapter, end_chapter) {
        let reversed = end < start
            || (end == start && matches!((raw.start_verse, end_verse), (Some(sv), Some(ev)) if ev < sv));
        if reversed {
            return Err(Error::invalid_reference(format!("{} range ends before it starts", raw.book)));
        }
    }

    Ok(ScriptureRef {
        book: raw.book,
        start_chapter: raw.start_chapter,
        start_verse: raw.start_verse,
        end_chapter,
        end_verse,
        end_book,
    })
}

/// Find every reference in `text` with the default parser.
///
/// Group mentions expand in place; citations inside a group mention are
/// ignored; malformed citations are skipped.
pub fn get_references(text: &str, book_groups: &[BookGroup]) -> Vec<ScriptureRef> {
    get_references_with(CitationParser::standard(), text, book_groups)
}

/// [`get_references`] with a caller-supplied parser.
pub fn get_references_with(parser: &CitationParser, text: &str, book_groups: &[BookGroup]) -> Vec<ScriptureRef> {
    let mut hits: Vec<(Range<usize>, &BookGroup)> = book_groups
        .iter()
        .flat_map(|group| group.find_iter(text).map(move |span| (span, group)))
        .collect();
    hits.sort_by(|a, b| a.0.start.cmp(&b.0.start).then(b.0.end.cmp(&a.0.end)));
    // overlapping group mentions: the earliest (then longest) wins
    let mut covered = 0;
    hits.retain(|(span, _)| {
        let keep = span.start >= covered;
        if keep {
            covered = span.end;
        }
        keep
    });

    let mut references = Vec::new();
    let mut pending = hits.iter().peekable();
    for raw in parser.matches(text) {
        while let Some((_, group)) = pending.next_if(|(span, _)| span.start <= raw.span.start) {
            references.extend(group.references());
        }
        if hits.iter().any(|(span, _)| span.start < raw.span.end && raw.span.start < span.end) {
            continue;
        }
        match normalize(&raw) {
            Ok(reference) => references.push(reference),
            Err(e) => {
                let cited = text.get(raw.span.clone()).unwrap_or_default();
                tracing::warn!("Skipping malformed reference '{cited}': {e}");
            }
        }
    }
    for (_, group) in pending {
        references.extend(group.references());
    }
    references
}
