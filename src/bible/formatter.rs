//! Scripture formatter: display strings for references and verse text.
//!
//! References are sorted into canonical order, merged where they overlap or
//! touch, then rendered:
//!
//! | Span | Rendering |
//! |---|---|
//! | whole book(s) | `Genesis`, `Genesis - Deuteronomy` |
//! | whole chapters | `Genesis 1`, `Genesis 3-6` |
//! | verses | `John 3:16`, `John 3:16-18`, `Genesis 1:3-2:4` |
//! | single-chapter book | `Jude 3`, `Jude 2-8` (`Jude 1:2-8` when chapters are forced) |
//! | across books | `Hebrews 13:20 - Jude 3` |

use crate::bible::books::Book;
use crate::bible::converter::{resolve, successor, Position};
use crate::bible::metadata::{chapters_in, single_chapter_in, title_in, verses_in, CanonMetadata, VerseMetadata};
use crate::bible::reference::ScriptureRef;
use crate::bible::store::Translation;
use crate::bible::verse_id::{decode, encode};
use crate::constants::formatter::{CROSS_BOOK_SEPARATOR, REFERENCE_SEPARATOR};
use crate::constants::verse_id::MAX_COMPONENT;
use crate::error::Result;
use crate::types::VerseId;

/// Superscript digit mapping
const SUPERSCRIPT_DIGITS: &[char] = &['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// Convert a number to superscript Unicode characters
pub fn to_superscript(n: u32) -> String {
    n.to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .filter_map(|d| SUPERSCRIPT_DIGITS.get(d as usize).copied())
        .collect()
}

/// A reference with every bound spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: Position,
    end: Position,
}

impl Span {
    fn key(position: Position) -> VerseId {
        encode(position.0, position.1, position.2)
    }
}

/// Renders references for display.
pub struct ReferenceFormatter<'a> {
    source: &'a dyn VerseMetadata,
    always_include_chapter_numbers: bool,
    full_title: bool,
}

impl<'a> ReferenceFormatter<'a> {
    /// Formatter using `source` for titles and chapter/verse counts.
    pub fn new(source: &'a dyn VerseMetadata) -> Self {
        Self { source, always_include_chapter_numbers: false, full_title: false }
    }

    /// Always write chapter numbers, even for single-chapter books and whole-book spans.
    #[must_use]
    pub const fn always_include_chapter_numbers(mut self, include: bool) -> Self {
        self.always_include_chapter_numbers = include;
        self
    }

    /// Use long book titles.
    #[must_use]
    pub const fn full_title(mut self, full: bool) -> Self {
        self.full_title = full;
        self
    }

    /// Sort, merge and render `references`, joined with `;`.
    pub fn format(&self, references: &[ScriptureRef]) -> String {
        let mut spans: Vec<Span> = references.iter().map(|r| self.span(r)).collect();
        spans.sort_by_key(|s| (s.start.0, s.start.1, s.start.2, Span::key(s.end)));

        let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(current) if self.touches(current, &span) => {
                    if Span::key(span.end) > Span::key(current.end) {
                        current.end = span.end;
                    }
                }
                _ => merged.push(span),
            }
        }

        merged.iter().map(|span| self.render(span)).collect::<Vec<_>>().join(REFERENCE_SEPARATOR)
    }

    /// Render one reference without sorting or merging.
    pub fn format_single(&self, reference: &ScriptureRef) -> String {
        self.render(&self.span(reference))
    }

    /// Explicit bounds for a reference. Unknown counts degrade to open-ended
    /// bounds instead of failing.
    fn span(&self, reference: &ScriptureRef) -> Span {
        if let Ok((start, end)) = resolve(self.source, reference) {
            return Span { start, end };
        }
        let end_chapter = reference.end_chapter.unwrap_or_else(|| chapters_in(self.source, reference.end_book));
        let end_verse = reference
            .end_verse
            .or_else(|| verses_in(self.source, reference.end_book, end_chapter))
            .unwrap_or(MAX_COMPONENT);
        Span {
            start: (reference.book, reference.start_chapter.unwrap_or(1), reference.start_verse.unwrap_or(1)),
            end: (reference.end_book, end_chapter, end_verse),
        }
    }

    /// Same book pair, and `next` starts no later than the verse after `current`.
    fn touches(&self, current: &Span, next: &Span) -> bool {
        if current.start.0 != next.start.0 || current.end.0 != next.end.0 {
            return false;
        }
        successor(self.source, current.end)
            .is_none_or(|after| Span::key(next.start) <= Span::key(after))
    }

    fn last_verse(&self, book: Book, chapter: u32) -> u32 {
        verses_in(self.source, book, chapter).unwrap_or(MAX_COMPONENT)
    }

    fn starts_book(position: Position) -> bool {
        position.1 == 1 && position.2 == 1
    }

    fn ends_book(&self, (book, chapter, verse): Position) -> bool {
        chapter >= chapters_in(self.source, book) && verse >= self.last_verse(book, chapter)
    }

    fn title(&self, book: Book) -> &str {
        title_in(self.source, book, self.full_title)
    }

    /// "c:v", or "v" for a single-chapter book unless chapters are forced.
    fn position(&self, (book, chapter, verse): Position) -> String {
        if single_chapter_in(self.source, book) && !self.always_include_chapter_numbers {
            verse.to_string()
        } else {
            format!("{chapter}:{verse}")
        }
    }

    fn render(&self, span: &Span) -> String {
        let Span { start, end } = *span;
        let (book, start_chapter, start_verse) = start;
        let (end_book, end_chapter, end_verse) = end;
        let whole = Self::starts_book(start) && self.ends_book(end);

        if book != end_book {
            if whole && !self.always_include_chapter_numbers {
                return format!("{}{CROSS_BOOK_SEPARATOR}{}", self.title(book), self.title(end_book));
            }
            return format!(
                "{} {}{CROSS_BOOK_SEPARATOR}{} {}",
                self.title(book),
                self.position(start),
                self.title(end_book),
                self.position(end)
            );
        }

        let title = self.title(book);
        if whole && !self.always_include_chapter_numbers {
            return title.to_string();
        }

        if single_chapter_in(self.source, book) {
            let prefix = if self.always_include_chapter_numbers { "1:" } else { "" };
            return if start_verse == end_verse {
                format!("{title} {prefix}{start_verse}")
            } else {
                format!("{title} {prefix}{start_verse}-{end_verse}")
            };
        }

        let whole_chapters = start_verse == 1 && end_verse >= self.last_verse(book, end_chapter);
        match (whole_chapters, start_chapter == end_chapter) {
            (true, true) => format!("{title} {start_chapter}"),
            (true, false) => format!("{title} {start_chapter}-{end_chapter}"),
            (false, true) if start_verse == end_verse => format!("{title} {start_chapter}:{start_verse}"),
            (false, true) => format!("{title} {start_chapter}:{start_verse}-{end_verse}"),
            (false, false) => format!("{title} {start_chapter}:{start_verse}-{end_chapter}:{end_verse}"),
        }
    }
}

/// Format references with canon titles and counts.
pub fn format_scripture_references(references: &[ScriptureRef], always_include_chapter_numbers: bool) -> String {
    ReferenceFormatter::new(&CanonMetadata)
        .always_include_chapter_numbers(always_include_chapter_numbers)
        .format(references)
}

/// Layout options for [`format_scripture_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOptions {
    /// Start a new paragraph for every verse.
    pub one_verse_per_paragraph: bool,
    /// Prefix each verse with its superscript number.
    pub include_verse_numbers: bool,
    /// Use long book titles in headings.
    pub full_title: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self { one_verse_per_paragraph: false, include_verse_numbers: true, full_title: false }
    }
}

/// Render verse text with book and chapter headings.
///
/// Each book gets a title heading; multi-chapter books get a `Chapter N`
/// heading per chapter. Paragraphs are separated by blank lines.
pub fn format_scripture_text(verse_ids: &[VerseId], translation: &Translation, options: &TextOptions) -> Result<String> {
    let mut sorted = verse_ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut blocks: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut current: Option<(Book, u32)> = None;

    for id in sorted {
        let (book, chapter, verse) = decode(id)?;
        let text = translation.verse_text(id)?;

        if current.map(|(b, _)| b) != Some(book) {
            flush(&mut blocks, &mut paragraph);
            blocks.push(title_in(translation, book, options.full_title).to_string());
            current = None;
        }
        if current.map(|(_, c)| c) != Some(chapter) {
            flush(&mut blocks, &mut paragraph);
            if !single_chapter_in(translation, book) {
                blocks.push(format!("Chapter {chapter}"));
            }
        }
        current = Some((book, chapter));

        if !paragraph.is_empty() {
            paragraph.push(' ');
        }
        if options.include_verse_numbers {
            paragraph.push_str(&to_superscript(verse));
        }
        paragraph.push_str(&text);
        if options.one_verse_per_paragraph {
            flush(&mut blocks, &mut paragraph);
        }
    }
    flush(&mut blocks, &mut paragraph);

    Ok(blocks.join("\n\n"))
}

fn flush(blocks: &mut Vec<String>, paragraph: &mut String) {
    if !paragraph.is_empty() {
        blocks.push(std::mem::take(paragraph));
    }
}
