//! Crate constants.
//!
//! Encoding factors, default delimiters and data file layout.

/// Verse id encoding constants.
pub mod verse_id {
    use crate::types::VerseId;

    /// Multiplier for the book component.
    pub const BOOK_FACTOR: VerseId = 1_000_000;

    /// Multiplier for the chapter component.
    pub const CHAPTER_FACTOR: VerseId = 1_000;

    /// Largest chapter or verse number the encoding can hold.
    pub const MAX_COMPONENT: u32 = 999;
}

/// Citation parser defaults.
pub mod parser {
    /// Delimiters that start a new chapter-level reference in the same book ("Gen 1:1; 3:4").
    pub const DEFAULT_REFERENCE_DELIMITERS: &[&str] = &[";"];

    /// Delimiters that continue a verse list in the same chapter ("Gen 1:1, 3 and 5").
    pub const DEFAULT_VERSE_DELIMITERS: &[&str] = &[",", "and", "&"];
}

/// Reference formatting constants.
pub mod formatter {
    /// Separator between rendered references.
    pub const REFERENCE_SEPARATOR: &str = ";";

    /// Separator between the two ends of a cross-book reference.
    pub const CROSS_BOOK_SEPARATOR: &str = " - ";
}

/// Translation data location constants.
pub mod data {
    /// Application directory under the platform data dir.
    pub const APP_DIR: &str = "scripture-refs";

    /// Subdirectory holding one directory per version.
    pub const TRANSLATIONS_DIR: &str = "translations";

    /// Extension of translation data files.
    pub const FILE_EXTENSION: &str = "json";
}
