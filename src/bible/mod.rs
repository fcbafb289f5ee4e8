//! Scripture reference parsing, normalization, conversion and verse text.
//!
//! ```text
//! text -> parser -> RawMatch -> normalizer -> ScriptureRef
//!                                              |-> formatter -> "John 3:16"
//!                                              |-> converter -> VerseId -> Translation -> text
//! ```

pub mod books;
pub mod converter;
pub mod formatter;
pub mod metadata;
pub mod normalizer;
pub mod parser;
pub mod reference;
pub mod registry;
pub mod store;
pub mod verse_id;

pub use books::Book;
pub use converter::{references_to_verse_ids, verse_ids_to_references};
pub use formatter::{format_scripture_references, format_scripture_text, ReferenceFormatter, TextOptions};
pub use metadata::{CanonMetadata, MaxVerses, VerseMetadata};
pub use normalizer::{default_book_groups, get_references, normalize, BookGroup};
pub use parser::{BookVocabulary, CitationParser, ParserConfig, RawMatch};
pub use reference::ScriptureRef;
pub use registry::{JsonTranslationLoader, TranslationLoader, TranslationRegistry};
pub use store::Translation;

/// References in `text`, with the default book groups expanded.
pub fn find_references(text: &str) -> Vec<ScriptureRef> {
    get_references(text, default_book_groups())
}

/// Parse `text` and return every verse id it cites, in citation order.
pub fn find_verse_ids(text: &str) -> crate::error::Result<Vec<crate::types::VerseId>> {
    references_to_verse_ids(&find_references(text))
}
