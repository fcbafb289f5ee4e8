//! Crate error types.
//!
//! Provides unified error handling with enough context to tell a caller bug
//! (bad vocabulary, malformed reference) from bad data (unknown verse, missing
//! translation).

use std::path::PathBuf;

use thiserror::Error;

use crate::bible::books::Book;
use crate::types::{TextFormat, VerseId, Version};

/// Crate result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Crate error types
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed citation grammar: vocabulary, delimiters or book groups.
    #[error("Malformed citation grammar: {message}")]
    Grammar {
        /// What was wrong with the supplied configuration.
        message: String,
    },

    /// A reference that cannot describe any span, e.g. its start book follows its end book.
    #[error("Invalid reference: {message}")]
    InvalidReference {
        /// Description of the malformed reference.
        message: String,
    },

    /// A verse id or book/chapter/verse triple that is not in the metadata table.
    #[error("{}", invalid_verse_message(.verse_id, .book, .chapter, .verse))]
    InvalidVerse {
        /// The offending verse id, if known.
        verse_id: Option<VerseId>,
        /// Book, if known.
        book: Option<Book>,
        /// Chapter, if known.
        chapter: Option<u32>,
        /// Verse, if known.
        verse: Option<u32>,
    },

    /// No translation was registered or loadable for a version and format.
    #[error("No {format} translation available for {version}")]
    MissingTranslation {
        /// Requested version.
        version: Version,
        /// Requested format.
        format: TextFormat,
    },

    /// A metadata source could not supply chapter/verse counts.
    #[error("Book metadata unavailable for {}", missing_metadata_message(.version, .book))]
    MissingBookMetadata {
        /// Version whose metadata was requested.
        version: Version,
        /// Book being looked up, if any.
        book: Option<Book>,
    },

    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<PathBuf>,
    },

    /// Translation data parsing error
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

// thiserror hands format arguments over by reference.
#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn invalid_verse_message(
    verse_id: &Option<VerseId>,
    book: &Option<Book>,
    chapter: &Option<u32>,
    verse: &Option<u32>,
) -> String {
    let triple = match (*book, *chapter, *verse) {
        (Some(b), Some(c), Some(v)) => Some(format!("{} {c}:{v}", b.title())),
        _ => None,
    };
    match (*verse_id, triple) {
        (Some(id), Some(triple)) => format!("{id} is not a valid verse. ({triple})"),
        (Some(id), None) => format!("{id} is not a valid verse."),
        (None, Some(triple)) => format!("{triple} is not a valid verse."),
        (None, None) => "Not a valid verse.".to_string(),
    }
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn missing_metadata_message(version: &Version, book: &Option<Book>) -> String {
    match book {
        Some(book) => format!("{version} ({})", book.title()),
        None => version.to_string(),
    }
}

impl Error {
    /// Create a grammar error for a malformed vocabulary or book group
    pub fn grammar(message: impl Into<String>) -> Self {
        Self::Grammar { message: message.into() }
    }

    /// Create an invalid reference error
    pub fn invalid_reference(message: impl Into<String>) -> Self {
        Self::InvalidReference { message: message.into() }
    }

    /// Invalid verse id, optionally with the decoded triple
    pub const fn invalid_verse_id(verse_id: VerseId, decoded: Option<(Book, u32, u32)>) -> Self {
        match decoded {
            Some((book, chapter, verse)) => Self::InvalidVerse {
                verse_id: Some(verse_id),
                book: Some(book),
                chapter: Some(chapter),
                verse: Some(verse),
            },
            None => Self::InvalidVerse { verse_id: Some(verse_id), book: None, chapter: None, verse: None },
        }
    }

    /// Invalid book/chapter/verse triple
    pub const fn invalid_verse(book: Book, chapter: u32, verse: u32) -> Self {
        Self::InvalidVerse { verse_id: None, book: Some(book), chapter: Some(chapter), verse: Some(verse) }
    }

    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Self::grammar(e.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}
