//! Indexed text store: one translation's content and verse offsets.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use regex::Regex;

use crate::bible::books::Book;
use crate::bible::metadata::{MaxVerses, VerseMetadata};
use crate::bible::verse_id::decode;
use crate::error::{Error, Result};
use crate::types::{VerseId, Version};

/// Superscript blocks (verse numbers, footnote callers) in markup content.
#[allow(clippy::expect_used)]
static RE_SUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<sup\b[^>]*>.*?</sup>").expect("valid regex: RE_SUP"));

/// Footnote anchors such as `<a class="footnote" href="#fn1">a</a>`.
#[allow(clippy::expect_used)]
static RE_FOOTNOTE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"(?is)<a\b[^>]*(?:class="[^"]*(?:footnote|crossref)[^"]*"|href="#f[^"]*")[^>]*>.*?</a>"##)
        .expect("valid regex: RE_FOOTNOTE_ANCHOR")
});

/// Bracketed footnote markers: `[1]`, `[a]`.
#[allow(clippy::expect_used)]
static RE_FOOTNOTE_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(?:\d+|[a-z])\]").expect("valid regex: RE_FOOTNOTE_MARK"));

/// Any remaining tag.
#[allow(clippy::expect_used)]
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex: RE_TAG"));

/// Collapse runs of whitespace and trim.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip footnotes, superscripts and tags, decode entities, then collapse whitespace.
pub fn clean_markup(text: &str) -> String {
    let text = RE_SUP.replace_all(text, " ");
    let text = RE_FOOTNOTE_ANCHOR.replace_all(&text, "");
    let text = RE_TAG.replace_all(&text, " ");
    let text = RE_FOOTNOTE_MARK.replace_all(&text, "");
    let text = html_escape::decode_html_entities(&text);
    collapse_whitespace(&text)
}

/// One translation, immutable once built.
///
/// `verse_start` and `verse_end` map a verse id to byte offsets into
/// `content`. Cleaned slices are cached per `(start, end, markup)` for the
/// lifetime of the translation.
#[derive(Debug)]
pub struct Translation {
    version: Version,
    content: String,
    verse_start: HashMap<VerseId, usize>,
    verse_end: HashMap<VerseId, usize>,
    max_verses: Option<MaxVerses>,
    short_titles: HashMap<Book, String>,
    long_titles: HashMap<Book, String>,
    is_markup: bool,
    cleaned: Mutex<HashMap<(usize, usize, bool), String>>,
}

impl Translation {
    /// Build a plain-text translation from content and verse offsets.
    pub fn new(
        version: Version,
        content: impl Into<String>,
        verse_start: HashMap<VerseId, usize>,
        verse_end: HashMap<VerseId, usize>,
    ) -> Self {
        Self {
            version,
            content: content.into(),
            verse_start,
            verse_end,
            max_verses: None,
            short_titles: HashMap::new(),
            long_titles: HashMap::new(),
            is_markup: false,
            cleaned: Mutex::new(HashMap::new()),
        }
    }

    /// Attach this translation's own versification.
    #[must_use]
    pub fn with_max_verses(mut self, max_verses: MaxVerses) -> Self {
        self.max_verses = Some(max_verses);
        self
    }

    /// Attach book titles.
    #[must_use]
    pub fn with_titles(mut self, short_titles: HashMap<Book, String>, long_titles: HashMap<Book, String>) -> Self {
        self.short_titles = short_titles;
        self.long_titles = long_titles;
        self
    }

    /// Mark the content as HTML.
    #[must_use]
    pub const fn with_markup(mut self, is_markup: bool) -> Self {
        self.is_markup = is_markup;
        self
    }

    /// Translation version.
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Whether content carries markup.
    pub const fn is_markup(&self) -> bool {
        self.is_markup
    }

    /// Number of verses with a start offset.
    pub fn verse_count(&self) -> usize {
        self.verse_start.len()
    }

    /// Whether the translation has text for `verse_id`.
    pub fn contains(&self, verse_id: VerseId) -> bool {
        self.verse_start.contains_key(&verse_id) && self.verse_end.contains_key(&verse_id)
    }

    /// Cleaned text from the start of `start` through the end of `end` (or `start`).
    pub fn get_scripture(&self, start: VerseId, end: Option<VerseId>) -> Result<String> {
        let end = end.unwrap_or(start);
        let from = *self.verse_start.get(&start).ok_or_else(|| invalid(start))?;
        let to = *self.verse_end.get(&end).ok_or_else(|| invalid(end))?;
        if to < from {
            return Err(invalid(end));
        }
        let slice = self.content.get(from..to).ok_or_else(|| invalid(start))?;
        Ok(self.clean(from, to, slice))
    }

    /// Cleaned text of one verse.
    pub fn verse_text(&self, verse_id: VerseId) -> Result<String> {
        self.get_scripture(verse_id, None)
    }

    fn clean(&self, from: usize, to: usize, slice: &str) -> String {
        let key = (from, to, self.is_markup);
        let mut cache = self.cleaned.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(key)
            .or_insert_with(|| if self.is_markup { clean_markup(slice) } else { collapse_whitespace(slice) })
            .clone()
    }
}

fn invalid(verse_id: VerseId) -> Error {
    Error::invalid_verse_id(verse_id, decode(verse_id).ok())
}

impl VerseMetadata for Translation {
    fn fetch_max_verses(&self) -> Result<&MaxVerses> {
        self.max_verses
            .as_ref()
            .ok_or(Error::MissingBookMetadata { version: self.version, book: None })
    }

    fn title(&self, book: Book, full: bool) -> Option<&str> {
        let titles = if full { &self.long_titles } else { &self.short_titles };
        titles.get(&book).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::bible::metadata::{chapters_in, title_in, verses_in};
    use std::collections::BTreeMap;

    /// Build a translation from `(id, text)` pairs separated by `sep`.
    fn build(verses: &[(VerseId, &str)], sep: &str) -> Translation {
        let mut content = String::new();
        let mut starts = HashMap::new();
        let mut ends = HashMap::new();
        for (id, text) in verses {
            starts.insert(*id, content.len());
            content.push_str(text);
            ends.insert(*id, content.len());
            content.push_str(sep);
        }
        Translation::new(Version::WorldEnglish, content, starts, ends)
    }

    #[test]
    fn test_single_verse_and_range() {
        let t = build(
            &[
                (43_003_016, "For God so loved the world,"),
                (43_003_017, "For God didn't send his Son\n into the world"),
            ],
            "\n",
        );
        assert_eq!(t.verse_text(43_003_016).unwrap(), "For God so loved the world,");
        assert_eq!(
            t.get_scripture(43_003_016, Some(43_003_017)).unwrap(),
            "For God so loved the world, For God didn't send his Son into the world"
        );
        assert_eq!(t.verse_count(), 2);
        assert!(t.contains(43_003_017));
    }

    #[test]
    fn test_missing_offsets() {
        let t = build(&[(43_003_016, "For God so loved the world,")], " ");
        let err = t.verse_text(43_003_018).unwrap_err();
        assert_eq!(err.to_string(), "43003018 is not a valid verse. (John 3:18)");
        assert!(t.get_scripture(43_003_016, Some(43_003_018)).is_err());
    }

    #[test]
    fn test_markup_cleaning() {
        let html = r##"<p><sup class="v">1</sup>In the beginning<a class="footnote" href="#fn1">a</a> God[1] created&nbsp;the heavens &amp; the earth.</p>"##;
        assert_eq!(clean_markup(html), "In the beginning God created the heavens & the earth.");

        let t = build(&[(1_001_001, html)], "").with_markup(true);
        assert!(t.is_markup());
        assert_eq!(t.verse_text(1_001_001).unwrap(), "In the beginning God created the heavens & the earth.");
        // second lookup is served from the cache
        assert_eq!(t.verse_text(1_001_001).unwrap(), "In the beginning God created the heavens & the earth.");
    }

    #[test]
    fn test_plain_text_keeps_brackets() {
        let t = build(&[(1_001_001, "In the beginning [God]")], "");
        assert_eq!(t.verse_text(1_001_001).unwrap(), "In the beginning [God]");
    }

    #[test]
    fn test_metadata_without_table() {
        let t = build(&[(1_001_001, "In the beginning")], "");
        match t.fetch_max_verses() {
            Err(Error::MissingBookMetadata { version: Version::WorldEnglish, .. }) => {}
            other => panic!("Expected missing metadata, got {other:?}"),
        }
        assert_eq!(chapters_in(&t, Book::Genesis), 50);
        assert_eq!(title_in(&t, Book::Genesis, false), "Genesis");
    }

    #[test]
    fn test_metadata_with_table_and_titles() {
        let mut table = MaxVerses::new();
        table.insert(Book::Malachi, BTreeMap::from([(1, 14), (2, 17), (3, 24)]));
        let t = build(&[(39_001_001, "The burden")], "")
            .with_max_verses(table)
            .with_titles(
                HashMap::from([(Book::Malachi, "Mal".to_string())]),
                HashMap::from([(Book::Malachi, "The Book of Malachi".to_string())]),
            );
        assert_eq!(chapters_in(&t, Book::Malachi), 3);
        assert_eq!(verses_in(&t, Book::Malachi, 3), Some(24));
        assert_eq!(chapters_in(&t, Book::Genesis), 50);
        assert_eq!(title_in(&t, Book::Malachi, false), "Mal");
        assert_eq!(title_in(&t, Book::Malachi, true), "The Book of Malachi");
    }
}
