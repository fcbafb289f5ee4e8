//! Scripture lookup service.
//!
//! Wires configuration, the citation parser, book groups and a translation
//! registry behind one handle.

use std::sync::Arc;

use crate::bible::converter::{references_to_verse_ids_in, verse_ids_to_references_in};
use crate::bible::formatter::ReferenceFormatter;
use crate::bible::metadata::CanonMetadata;
use crate::bible::normalizer::{default_book_groups, get_references_with, BookGroup};
use crate::bible::parser::CitationParser;
use crate::bible::reference::ScriptureRef;
use crate::bible::registry::{JsonTranslationLoader, TranslationRegistry};
use crate::bible::verse_id::encode;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{TextFormat, VerseId, Version};

/// A looked-up passage with its display reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    /// The passage as a reference.
    pub reference: ScriptureRef,
    /// Rendered reference (e.g. "Isaiah 32:15-17").
    pub label: String,
    /// Cleaned verse text.
    pub text: String,
    /// Translation the text came from.
    pub version: Version,
}

impl Passage {
    /// Format for display (e.g., "Isaiah 32:15-17 NRSVue")
    pub fn display(&self) -> String {
        format!("{} {}", self.label, self.version)
    }

    /// Format for filename (colon → v)
    pub fn file_name(&self) -> String {
        format!("{} ({})", self.label.replace(':', "v"), self.version)
    }
}

/// Scripture lookups against a translation registry.
#[derive(Debug)]
pub struct ScriptureService {
    registry: Arc<TranslationRegistry>,
    parser: CitationParser,
    book_groups: Vec<BookGroup>,
    default_version: Version,
    default_format: TextFormat,
    always_include_chapter_numbers: bool,
}

impl ScriptureService {
    /// Service reading translation files from `config.data_path`, or with an
    /// empty registry when no data path is configured.
    pub fn new(config: &Config) -> Self {
        let registry = config.data_path.as_ref().map_or_else(TranslationRegistry::empty, |path| {
            TranslationRegistry::new(JsonTranslationLoader::new(path.clone()))
        });
        Self::with_registry(config, Arc::new(registry))
    }

    /// Service using an existing registry.
    pub fn with_registry(config: &Config, registry: Arc<TranslationRegistry>) -> Self {
        Self {
            registry,
            parser: CitationParser::standard().clone(),
            book_groups: default_book_groups().to_vec(),
            default_version: config.default_version,
            default_format: config.default_format,
            always_include_chapter_numbers: config.always_include_chapter_numbers,
        }
    }

    /// Replace the book groups recognized in text.
    #[must_use]
    pub fn with_book_groups(mut self, book_groups: Vec<BookGroup>) -> Self {
        self.book_groups = book_groups;
        self
    }

    /// Replace the citation parser.
    #[must_use]
    pub fn with_parser(mut self, parser: CitationParser) -> Self {
        self.parser = parser;
        self
    }

    /// The registry backing this service.
    pub const fn registry(&self) -> &Arc<TranslationRegistry> {
        &self.registry
    }

    /// References cited in `text`, in source order.
    pub fn find_references(&self, text: &str) -> Vec<ScriptureRef> {
        get_references_with(&self.parser, text, &self.book_groups)
    }

    /// Expand references to verse ids.
    pub fn verse_ids(&self, references: &[ScriptureRef]) -> Result<Vec<VerseId>> {
        references_to_verse_ids_in(&CanonMetadata, references)
    }

    /// Contract verse ids to references.
    pub fn references(&self, verse_ids: &[VerseId]) -> Result<Vec<ScriptureRef>> {
        verse_ids_to_references_in(&CanonMetadata, verse_ids)
    }

    /// Sort, merge and render references using the configured chapter rule.
    pub fn format(&self, references: &[ScriptureRef]) -> String {
        ReferenceFormatter::new(&CanonMetadata)
            .always_include_chapter_numbers(self.always_include_chapter_numbers)
            .format(references)
    }

    /// Text from `start` through `end` (or just `start`) in a translation.
    pub fn get_scripture(
        &self,
        start: VerseId,
        end: Option<VerseId>,
        version: Version,
        format: TextFormat,
    ) -> Result<String> {
        self.registry.get_translation(version, format)?.get_scripture(start, end)
    }

    /// One verse in the default format.
    pub fn get_verse_text(&self, verse_id: VerseId, version: Version) -> Result<String> {
        self.get_scripture(verse_id, None, version, self.default_format)
    }

    /// Find the references in `text` and fetch their text.
    ///
    /// A version code in the text ("(KJV)") selects the translation; otherwise
    /// the configured default is used. Overlapping references are merged.
    pub fn lookup(&self, text: &str) -> Result<Vec<Passage>> {
        let version = Version::from_text(text).unwrap_or(self.default_version);
        let translation = self.registry.get_translation(version, self.default_format)?;

        let references = self.find_references(text);
        let verse_ids = references_to_verse_ids_in(translation.as_ref(), &references)?;
        let merged = verse_ids_to_references_in(translation.as_ref(), &verse_ids)?;

        let formatter = ReferenceFormatter::new(translation.as_ref())
            .always_include_chapter_numbers(self.always_include_chapter_numbers);
        merged
            .into_iter()
            .map(|reference| {
                let (start, end) = match reference {
                    ScriptureRef {
                        book,
                        start_chapter: Some(sc),
                        start_verse: Some(sv),
                        end_chapter: Some(ec),
                        end_verse: Some(ev),
                        end_book,
                    } => (encode(book, sc, sv), encode(end_book, ec, ev)),
                    _ => return Err(Error::invalid_reference("contracted reference without explicit bounds")),
                };
                Ok(Passage {
                    reference,
                    label: formatter.format_single(&reference),
                    text: translation.get_scripture(start, Some(end))?,
                    version,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::bible::books::Book;
    use crate::bible::store::Translation;
    use std::collections::HashMap;

    fn service_with(verses: &[(VerseId, &str)], version: Version) -> ScriptureService {
        let mut content = String::new();
        let mut starts = HashMap::new();
        let mut ends = HashMap::new();
        for (id, text) in verses {
            starts.insert(*id, content.len());
            content.push_str(text);
            ends.insert(*id, content.len());
            content.push(' ');
        }
        let registry = TranslationRegistry::empty();
        registry.register_translation(version, TextFormat::PlainText, Translation::new(version, content, starts, ends));
        ScriptureService::with_registry(&Config::default(), Arc::new(registry))
    }

    #[test]
    fn test_passage_display_and_file_name() {
        let passage = Passage {
            reference: ScriptureRef::range(Book::Isaiah, 32, 15, 17),
            label: "Isaiah 32:15-17".to_string(),
            text: String::new(),
            version: Version::NrsvUe,
        };
        assert_eq!(passage.display(), "Isaiah 32:15-17 NRSVue");
        assert_eq!(passage.file_name(), "Isaiah 32v15-17 (NRSVue)");
    }

    #[test]
    fn test_lookup_merges_and_uses_default_version() {
        let service = service_with(
            &[(43_003_016, "For God so loved the world,"), (43_003_017, "For God sent not his Son")],
            Version::AmericanStandard,
        );
        let passages = service.lookup("John 3:17 and John 3:16").unwrap();
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].label, "John 3:16-17");
        assert_eq!(passages[0].text, "For God so loved the world, For God sent not his Son");
        assert_eq!(passages[0].version, Version::AmericanStandard);
    }

    #[test]
    fn test_lookup_honours_version_tag() {
        let service = service_with(&[(65_001_003, "Beloved,")], Version::KingJames);
        let passages = service.lookup("Jude 3 (KJV)").unwrap();
        assert_eq!(passages[0].display(), "Jude 3 KJV");
        assert!(matches!(service.lookup("Jude 3"), Err(Error::MissingTranslation { .. })));
    }

    #[test]
    fn test_lookup_ignores_ordinary_words() {
        let service = service_with(&[(65_001_003, "Beloved,")], Version::AmericanStandard);
        let passages = service.lookup("Read Jude 3 on the web").unwrap();
        assert_eq!(passages[0].version, Version::AmericanStandard);
    }

    #[test]
    fn test_format_uses_config() {
        let mut config = Config::default();
        config.always_include_chapter_numbers = true;
        let service = ScriptureService::with_registry(&config, Arc::new(TranslationRegistry::empty()));
        let refs = service.find_references("Jude 2-8");
        assert_eq!(service.format(&refs), "Jude 1:2-8");
        let ids = service.verse_ids(&refs).unwrap();
        assert_eq!(ids.len(), 7);
        assert_eq!(service.references(&ids).unwrap(), refs);
    }

    #[test]
    fn test_get_verse_text() {
        let service = service_with(&[(1_001_001, "In the beginning")], Version::AmericanStandard);
        assert_eq!(service.get_verse_text(1_001_001, Version::AmericanStandard).unwrap(), "In the beginning");
        assert!(service.get_verse_text(1_001_002, Version::AmericanStandard).is_err());
    }
}
