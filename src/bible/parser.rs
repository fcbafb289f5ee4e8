//! Citation parser.
//!
//! Scans free text for book names from a [`BookVocabulary`] and reads the
//! chapter/verse numbers that follow. Each hit becomes a [`RawMatch`];
//! unrecognized text is skipped, never reported.
//!
//! Supported shapes:
//! - `Book`, `Book C`, `Book C:V`, `Book C-D`, `Book C:V-W`, `Book C:V-D:W`
//! - `Book - Book`, `Book C:V - Book D:W` (cross-book spans)
//! - continuations in the same book: `Book C:V, W; D:X-Y`
//!
//! Bare numbers after a single-chapter book (`Jude 3-5`) are verses of chapter 1.

use std::collections::VecDeque;
use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::bible::books::Book;
use crate::bible::metadata::is_single_chapter_book;
use crate::constants::parser::{DEFAULT_REFERENCE_DELIMITERS, DEFAULT_VERSE_DELIMITERS};
use crate::error::{Error, Result};

/// Chapter or chapter:verse right after a book name ("3", ". 3:16", "3.16", "3v16").
#[allow(clippy::expect_used)]
static RE_AFTER_BOOK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\.?\s*(\d{1,3})(?:(?:\s*:\s*|\.|v)(\d{1,3}))?\b").expect("valid regex: RE_AFTER_BOOK")
});

/// Chapter or chapter:verse after a dash or delimiter.
#[allow(clippy::expect_used)]
static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3})(?:(?:\s*:\s*|\.|v)(\d{1,3}))?\b").expect("valid regex: RE_NUMBER")
});

/// Range dash (hyphen, en dash or em dash).
#[allow(clippy::expect_used)]
static RE_DASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-–—]\s*").expect("valid regex: RE_DASH")
});

/// Parser built from the default vocabulary and delimiters.
#[allow(clippy::expect_used)]
static STANDARD: LazyLock<CitationParser> = LazyLock::new(|| {
    CitationParser::new(&BookVocabulary::default(), &ParserConfig::default())
        .expect("valid default citation grammar")
});

/// Prefix for the per-book capture group names.
const GROUP_PREFIX: &str = "book_";

/// Text a book fragment is tried against to catch zero-width matches.
const EMPTY_MATCH_SAMPLES: &[&str] = &["", "a b", " 1", "x. 2:3", "Genesis 1:1"];

/// Book names the parser recognizes, as case-insensitive regex fragments.
#[derive(Debug, Clone)]
pub struct BookVocabulary {
    entries: Vec<(Book, Vec<String>)>,
}

impl BookVocabulary {
    /// An empty vocabulary.
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Add a regex fragment for `book`.
    pub fn insert(&mut self, book: Book, pattern: impl Into<String>) {
        let pattern = pattern.into();
        match self.entries.iter_mut().find(|(b, _)| *b == book) {
            Some((_, patterns)) => patterns.push(pattern),
            None => self.entries.push((book, vec![pattern])),
        }
    }

    /// Add a literal name for `book`; internal spaces match any whitespace.
    pub fn insert_name(&mut self, book: Book, name: &str) {
        let pattern = name
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        self.insert(book, pattern);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, book: Book, pattern: impl Into<String>) -> Self {
        self.insert(book, pattern);
        self
    }

    /// Books with at least one pattern, in insertion order.
    pub fn books(&self) -> impl Iterator<Item = Book> + '_ {
        self.entries.iter().map(|(book, _)| *book)
    }

    fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(Error::grammar("book vocabulary is empty"));
        }
        for (book, patterns) in &self.entries {
            for pattern in patterns {
                let re = Regex::new(&format!("(?i)(?:{pattern})"))
                    .map_err(|e| Error::grammar(format!("pattern '{pattern}' for {book} is invalid: {e}")))?;
                let zero_width = EMPTY_MATCH_SAMPLES
                    .iter()
                    .any(|sample| re.find_iter(sample).any(|m| m.is_empty()));
                if pattern.trim().is_empty() || zero_width {
                    return Err(Error::grammar(format!("pattern '{pattern}' for {book} matches empty text")));
                }
            }
        }
        Ok(())
    }

    /// One alternation with a named group per book.
    fn alternation(&self) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, (_, patterns))| format!("(?P<{GROUP_PREFIX}{i}>{})", patterns.join("|")))
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl Default for BookVocabulary {
    fn default() -> Self {
        let mut vocabulary = Self::new();
        for &book in Book::all() {
            vocabulary.insert(book, book.default_pattern());
        }
        vocabulary
    }
}

/// Delimiters that separate several references to the same book.
///
/// A reference delimiter (`;`) starts a new chapter-level reference: "Gen 1:1;
/// 3" is Genesis 1:1 and Genesis 3. A verse delimiter (`,`) continues the verse
/// list of the previous chapter: "Gen 1:1, 3" is Genesis 1:1 and 1:3. After a
/// chapter-only reference both kinds list chapters.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiters that start a new chapter-level reference.
    pub reference_delimiters: Vec<String>,
    /// Delimiters that continue a verse list.
    pub verse_delimiters: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            reference_delimiters: DEFAULT_REFERENCE_DELIMITERS.iter().map(ToString::to_string).collect(),
            verse_delimiters: DEFAULT_VERSE_DELIMITERS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ParserConfig {
    fn compile(&self) -> Result<Option<Regex>> {
        let all = self.reference_delimiters.iter().chain(&self.verse_delimiters);
        for delimiter in all {
            let trimmed = delimiter.trim();
            if trimmed.is_empty() {
                return Err(Error::grammar("empty delimiter"));
            }
            if trimmed.chars().any(|c| c.is_ascii_digit() || c == ':' || c == '-') {
                return Err(Error::grammar(format!("delimiter '{trimmed}' collides with chapter/verse syntax")));
            }
        }
        if let Some(dup) = self
            .reference_delimiters
            .iter()
            .find(|d| self.verse_delimiters.iter().any(|v| v.trim().eq_ignore_ascii_case(d.trim())))
        {
            return Err(Error::grammar(format!("delimiter '{}' is both a reference and a verse delimiter", dup.trim())));
        }

        let mut groups = Vec::new();
        if !self.reference_delimiters.is_empty() {
            groups.push(format!("(?P<reference>{})", delimiter_alternation(&self.reference_delimiters)));
        }
        if !self.verse_delimiters.is_empty() {
            groups.push(format!("(?P<verse>{})", delimiter_alternation(&self.verse_delimiters)));
        }
        if groups.is_empty() {
            return Ok(None);
        }
        Ok(Some(Regex::new(&format!(r"(?i)^\s*(?:{})\s*", groups.join("|")))?))
    }
}

fn delimiter_alternation(delimiters: &[String]) -> String {
    delimiters
        .iter()
        .map(|d| {
            let d = d.trim();
            if d.chars().all(char::is_alphanumeric) {
                format!(r"\b{}\b", regex::escape(d))
            } else {
                regex::escape(d)
            }
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// A citation found in text, before normalization.
///
/// Number fields hold what the text said after single-chapter books have
/// been resolved; omitted parts stay `None` for the normalizer to fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    /// Book named at the start of the citation.
    pub book: Book,
    /// Starting chapter.
    pub start_chapter: Option<u32>,
    /// Starting verse.
    pub start_verse: Option<u32>,
    /// Ending chapter.
    pub end_chapter: Option<u32>,
    /// Ending verse.
    pub end_verse: Option<u32>,
    /// Book named after a range dash, for cross-book spans.
    pub end_book: Option<Book>,
    /// Byte range of the citation in the input.
    pub span: Range<usize>,
}

/// `C` or `C:V` as written.
#[derive(Debug, Clone, Copy)]
struct NumRef {
    chapter: u32,
    verse: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Numbers {
    start_chapter: Option<u32>,
    start_verse: Option<u32>,
    end_chapter: Option<u32>,
    end_verse: Option<u32>,
}

impl Numbers {
    /// Chapter later bare verse numbers belong to, when this reference is verse-level.
    fn verse_chapter(self) -> Option<u32> {
        (self.start_verse.is_some() || self.end_verse.is_some())
            .then(|| self.end_chapter.or(self.start_chapter).unwrap_or(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Reference,
    Verse,
}

/// Start side: `C:V`, or a bare number read as a verse when a chapter is implied.
fn start_side(start: NumRef, verse_chapter: Option<u32>) -> (Option<u32>, Option<u32>) {
    match (start.verse, verse_chapter) {
        (Some(verse), _) => (Some(start.chapter), Some(verse)),
        (None, Some(chapter)) => (Some(chapter), Some(start.chapter)),
        (None, None) => (Some(start.chapter), None),
    }
}

/// Numbers of a single-book citation.
fn interpret(start: NumRef, end: Option<NumRef>, verse_chapter: Option<u32>) -> Numbers {
    let (start_chapter, start_verse) = start_side(start, verse_chapter);
    let (end_chapter, end_verse) = match end {
        None => (None, None),
        Some(NumRef { chapter, verse: Some(verse) }) => (Some(chapter), Some(verse)),
        // "C:V-W" ranges verses; "C-D" ranges chapters
        Some(NumRef { chapter, verse: None }) if start_verse.is_some() => (None, Some(chapter)),
        Some(NumRef { chapter, verse: None }) => (Some(chapter), None),
    };
    Numbers { start_chapter, start_verse, end_chapter, end_verse }
}

/// End side of a cross-book span.
fn end_side(end: NumRef, end_book: Book) -> (Option<u32>, Option<u32>) {
    match end.verse {
        Some(verse) => (Some(end.chapter), Some(verse)),
        None if is_single_chapter_book(end_book) => (Some(1), Some(end.chapter)),
        None => (Some(end.chapter), None),
    }
}

fn num_ref(caps: &Captures<'_>) -> Option<NumRef> {
    let chapter = caps.get(1)?.as_str().parse().ok()?;
    let verse = match caps.get(2) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };
    Some(NumRef { chapter, verse })
}

/// Compiled citation grammar.
#[derive(Debug, Clone)]
pub struct CitationParser {
    scan: Regex,
    anchored: Regex,
    /// (capture group slot, book) for each vocabulary entry.
    slots: Vec<(usize, Book)>,
    delimiter: Option<Regex>,
}

impl CitationParser {
    /// Compile a vocabulary and delimiter configuration.
    pub fn new(vocabulary: &BookVocabulary, config: &ParserConfig) -> Result<Self> {
        vocabulary.validate()?;
        let alternation = vocabulary.alternation();
        let scan = Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?;
        let anchored = Regex::new(&format!(r"(?i)^(?:{alternation})\b"))?;

        let books: Vec<Book> = vocabulary.books().collect();
        let slots = scan
            .capture_names()
            .enumerate()
            .filter_map(|(slot, name)| {
                let index: usize = name?.strip_prefix(GROUP_PREFIX)?.parse().ok()?;
                Some((slot, *books.get(index)?))
            })
            .collect();

        Ok(Self { scan, anchored, slots, delimiter: config.compile()? })
    }

    /// Parser for the default vocabulary and delimiters.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Lazily scan `text` left to right.
    pub const fn matches<'p, 't>(&'p self, text: &'t str) -> RawMatches<'p, 't> {
        RawMatches { parser: self, text, pos: 0, pending: VecDeque::new() }
    }

    /// Collect every match in `text`.
    pub fn parse(&self, text: &str) -> Vec<RawMatch> {
        self.matches(text).collect()
    }

    fn book_of(&self, caps: &Captures<'_>) -> Option<Book> {
        self.slots.iter().find(|(slot, _)| caps.get(*slot).is_some()).map(|(_, book)| *book)
    }

    /// Book name starting exactly at `at`, with the offset after it.
    fn book_at(&self, text: &str, at: usize) -> Option<(Book, usize)> {
        let caps = self.anchored.captures(text.get(at..)?)?;
        Some((self.book_of(&caps)?, at + caps.get(0)?.end()))
    }

    /// Delimiter run starting at `at`, with the offset after it.
    fn delimiter_at(&self, text: &str, at: usize) -> Option<(Delimiter, usize)> {
        let re = self.delimiter.as_ref()?;
        let mut cursor = at;
        let mut kind = None;
        while let Some(caps) = text.get(cursor..).and_then(|rest| re.captures(rest)) {
            let found = if caps.name("reference").is_some() { Delimiter::Reference } else { Delimiter::Verse };
            kind = Some(match kind {
                Some(Delimiter::Reference) => Delimiter::Reference,
                _ => found,
            });
            cursor += caps.get(0)?.end();
        }
        kind.map(|k| (k, cursor))
    }
}

fn number_at(re: &Regex, text: &str, at: usize) -> Option<(NumRef, usize)> {
    let caps = re.captures(text.get(at..)?)?;
    Some((num_ref(&caps)?, at + caps.get(0)?.end()))
}

fn dash_at(text: &str, at: usize) -> Option<usize> {
    RE_DASH.find(text.get(at..)?).map(|m| at + m.end())
}

/// Lazy, left-to-right iterator over the citations in a text.
#[derive(Debug)]
pub struct RawMatches<'p, 't> {
    parser: &'p CitationParser,
    text: &'t str,
    pos: usize,
    pending: VecDeque<RawMatch>,
}

impl RawMatches<'_, '_> {
    /// Read one citation starting at a book name and queue it with its continuations.
    fn read_citation(&mut self, start: usize, book: Book, book_end: usize) {
        let text = self.text;
        let parser = self.parser;
        let implied_chapter = is_single_chapter_book(book).then_some(1);

        let mut cursor = book_end;
        let start_num = number_at(&RE_AFTER_BOOK, text, cursor);
        if let Some((_, end)) = start_num {
            cursor = end;
        }

        let mut end_book = None;
        let mut end_num = None;
        if let Some(after_dash) = dash_at(text, cursor) {
            if let Some((other, other_end)) = parser.book_at(text, after_dash) {
                end_book = Some(other);
                cursor = other_end;
                if let Some((num, end)) = number_at(&RE_AFTER_BOOK, text, cursor) {
                    end_num = Some(num);
                    cursor = end;
                }
            } else if start_num.is_some() {
                if let Some((num, end)) = number_at(&RE_NUMBER, text, after_dash) {
                    end_num = Some(num);
                    cursor = end;
                }
            }
        }

        let numbers = match (start_num, end_book) {
            (None, None) => Numbers::default(),
            (Some((start, _)), None) => interpret(start, end_num, implied_chapter),
            (start, Some(other)) => {
                let (start_chapter, start_verse) =
                    start.map_or((None, None), |(num, _)| start_side(num, implied_chapter));
                let (end_chapter, end_verse) = end_num.map_or((None, None), |num| end_side(num, other));
                Numbers { start_chapter, start_verse, end_chapter, end_verse }
            }
        };
        self.pending.push_back(raw_match(book, numbers, end_book, start..cursor));

        if start_num.is_some() && end_book.is_none() {
            cursor = self.read_continuations(book, numbers, cursor);
        }
        self.pos = cursor;
    }

    /// Same-book references after a delimiter ("Gen 1:1, 3; 2:4"). Returns the new cursor.
    fn read_continuations(&mut self, book: Book, mut previous: Numbers, mut cursor: usize) -> usize {
        let text = self.text;
        let parser = self.parser;
        let implied_chapter = is_single_chapter_book(book).then_some(1);

        while let Some((kind, after)) = parser.delimiter_at(text, cursor) {
            // "1:1, 2 Kings 3" hands over to the next book
            if parser.book_at(text, after).is_some() {
                break;
            }
            let Some((start, mut end)) = number_at(&RE_NUMBER, text, after) else {
                break;
            };
            let mut range_end = None;
            if let Some(after_dash) = dash_at(text, end) {
                if parser.book_at(text, after_dash).is_none() {
                    if let Some((num, num_end)) = number_at(&RE_NUMBER, text, after_dash) {
                        range_end = Some(num);
                        end = num_end;
                    }
                }
            }

            let verse_chapter = match kind {
                Delimiter::Verse => previous.verse_chapter().or(implied_chapter),
                Delimiter::Reference => implied_chapter,
            };
            let numbers = interpret(start, range_end, verse_chapter);
            self.pending.push_back(raw_match(book, numbers, None, after..end));
            previous = numbers;
            cursor = end;
        }
        cursor
    }
}

const fn raw_match(book: Book, numbers: Numbers, end_book: Option<Book>, span: Range<usize>) -> RawMatch {
    RawMatch {
        book,
        start_chapter: numbers.start_chapter,
        start_verse: numbers.start_verse,
        end_chapter: numbers.end_chapter,
        end_verse: numbers.end_verse,
        end_book,
        span,
    }
}

/// Byte offset of the character after `pos`, or one past the end.
fn next_boundary(text: &str, pos: usize) -> usize {
    text.get(pos..)
        .and_then(|rest| rest.chars().next())
        .map_or(pos + 1, |c| pos + c.len_utf8())
}

impl Iterator for RawMatches<'_, '_> {
    type Item = RawMatch;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(found) = self.pending.pop_front() {
                return Some(found);
            }
            if self.pos > self.text.len() {
                return None;
            }
            let caps = self.parser.scan.captures_at(self.text, self.pos)?;
            let whole = caps.get(0)?;
            match self.parser.book_of(&caps) {
                Some(book) => self.read_citation(whole.start(), book, whole.end()),
                None => self.pos = whole.end(),
            }
            // an empty citation must still move the scan forward
            let step = next_boundary(self.text, whole.start());
            self.pos = self.pos.max(step);
        }
    }
}
