//! Translation registry and loaders.
//!
//! The registry is an injectable cache from `(Version, TextFormat)` to a
//! loaded [`Translation`]. A key is loaded at most once; callers can also
//! register their own translations (licensed or user-supplied content).

use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;

use crate::bible::books::Book;
use crate::bible::metadata::MaxVerses;
use crate::bible::store::Translation;
use crate::constants::data::FILE_EXTENSION;
use crate::error::{Error, Result};
use crate::types::{TextFormat, VerseId, Version};

/// Produces a translation for a version and format.
pub trait TranslationLoader: Send + Sync {
    /// Load the translation, or fail with [`Error::MissingTranslation`] when
    /// this loader has none.
    fn load(&self, version: Version, format: TextFormat) -> Result<Translation>;
}

impl<F> TranslationLoader for F
where
    F: Fn(Version, TextFormat) -> Result<Translation> + Send + Sync,
{
    fn load(&self, version: Version, format: TextFormat) -> Result<Translation> {
        self(version, format)
    }
}

/// On-disk translation file.
#[derive(Debug, Deserialize)]
struct TranslationFile {
    content: String,
    verse_start_offsets: HashMap<VerseId, usize>,
    verse_end_offsets: HashMap<VerseId, usize>,
    #[serde(default)]
    max_verses: Option<MaxVerses>,
    #[serde(default)]
    short_titles: HashMap<Book, String>,
    #[serde(default)]
    long_titles: HashMap<Book, String>,
}

/// Loads `<data_path>/<version>/<format>.json`.
///
/// ```text
/// translations/
///   asv/plain_text.json
///   asv/html.json
///   kjv/plain_text.json
/// ```
#[derive(Debug, Clone)]
pub struct JsonTranslationLoader {
    data_path: PathBuf,
}

impl JsonTranslationLoader {
    /// Loader rooted at `data_path`.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self { data_path: data_path.into() }
    }

    /// Root directory for translation files.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Path of the file for a version and format.
    pub fn file_path(&self, version: Version, format: TextFormat) -> PathBuf {
        self.data_path
            .join(version.dir_name())
            .join(format!("{}.{FILE_EXTENSION}", format.name()))
    }
}

impl TranslationLoader for JsonTranslationLoader {
    fn load(&self, version: Version, format: TextFormat) -> Result<Translation> {
        let path = self.file_path(version, format);
        let raw = match fs_err::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::MissingTranslation { version, format });
            }
            Err(e) => return Err(Error::io(e, path)),
        };
        let file: TranslationFile =
            serde_json::from_str(&raw).map_err(|e| Error::parse(e.to_string(), path.clone()))?;

        let mut translation = Translation::new(version, file.content, file.verse_start_offsets, file.verse_end_offsets)
            .with_titles(file.short_titles, file.long_titles)
            .with_markup(format.is_markup());
        if let Some(max_verses) = file.max_verses {
            translation = translation.with_max_verses(max_verses);
        }
        tracing::debug!("Read {} verses from {}", translation.verse_count(), path.display());
        Ok(translation)
    }
}

type CacheKey = (Version, TextFormat);

/// Lazily populated translation cache.
pub struct TranslationRegistry {
    loader: Option<Box<dyn TranslationLoader>>,
    cache: Mutex<HashMap<CacheKey, Arc<Translation>>>,
}

impl fmt::Debug for TranslationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationRegistry")
            .field("has_loader", &self.loader.is_some())
            .finish_non_exhaustive()
    }
}

impl TranslationRegistry {
    /// Registry that loads through `loader` on first use.
    pub fn new(loader: impl TranslationLoader + 'static) -> Self {
        Self { loader: Some(Box::new(loader)), cache: Mutex::new(HashMap::new()) }
    }

    /// Registry loading through a closure.
    pub fn from_fn<F>(load: F) -> Self
    where
        F: Fn(Version, TextFormat) -> Result<Translation> + Send + Sync + 'static,
    {
        Self::new(load)
    }

    /// Registry with no loader; only registered translations are available.
    pub fn empty() -> Self {
        Self { loader: None, cache: Mutex::new(HashMap::new()) }
    }

    /// The translation for `version` and `format`, loading it on first use.
    ///
    /// The cache lock is held across the load, so concurrent first calls for
    /// the same key invoke the loader once.
    pub fn get_translation(&self, version: Version, format: TextFormat) -> Result<Arc<Translation>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(translation) = cache.get(&(version, format)) {
            tracing::debug!("Translation cache hit: {version} {format}");
            return Ok(Arc::clone(translation));
        }

        let loader = self.loader.as_ref().ok_or(Error::MissingTranslation { version, format })?;
        let translation = match loader.load(version, format) {
            Ok(translation) => Arc::new(translation),
            Err(e) => {
                if !matches!(e, Error::MissingTranslation { .. }) {
                    tracing::warn!("Failed to load {version} {format}: {e}");
                }
                return Err(e);
            }
        };
        tracing::info!("Loaded {version} ({format}), {} verses", translation.verse_count());
        cache.insert((version, format), Arc::clone(&translation));
        Ok(translation)
    }

    /// Insert or replace a translation without going through the loader.
    pub fn register_translation(&self, version: Version, format: TextFormat, translation: Translation) -> Arc<Translation> {
        let translation = Arc::new(translation);
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.insert((version, format), Arc::clone(&translation)).is_some() {
            tracing::info!("Replaced registered translation {version} ({format})");
        } else {
            tracing::info!("Registered translation {version} ({format})");
        }
        translation
    }

    /// Whether a translation is already cached.
    pub fn is_loaded(&self, version: Version, format: TextFormat) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&(version, format))
    }
}

impl Default for TranslationRegistry {
    fn default() -> Self {
        Self::empty()
    }
}
