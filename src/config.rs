//! Library configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::constants::data::{APP_DIR, TRANSLATIONS_DIR};
use crate::error::Result;
use crate::types::{TextFormat, Version};

/// Configuration for scripture lookups.
#[derive(Debug, Clone)]
pub struct Config {
    /// The library name
    app_name: String,
    /// The library version
    app_version: String,
    /// Directory holding `<version>/<format>.json` translation files
    pub data_path: Option<PathBuf>,
    /// Version used when text does not name one
    pub default_version: Version,
    /// Format used for verse text lookups
    pub default_format: TextFormat,
    /// Write chapter numbers for single-chapter books
    pub always_include_chapter_numbers: bool,
}

impl Config {
    /// Get the library name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the library version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            data_path: None,
            default_version: Version::default(),
            default_format: TextFormat::default(),
            always_include_chapter_numbers: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    #[allow(clippy::unnecessary_wraps)]
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Build configuration from any variable source. Unparseable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Data path: env var override, or the per-user data directory when it exists
        config.data_path = lookup("BIBLE_DATA_PATH").map_or_else(default_data_path, |path| {
            let p = PathBuf::from(shellexpand::tilde(&path).to_string());
            p.is_dir().then_some(p)
        });

        if let Some(version) = lookup("BIBLE_VERSION") {
            match version.parse() {
                Ok(version) => config.default_version = version,
                Err(e) => tracing::warn!("Ignoring BIBLE_VERSION: {e}"),
            }
        }

        if let Some(format) = lookup("BIBLE_FORMAT") {
            match format.parse() {
                Ok(format) => config.default_format = format,
                Err(e) => tracing::warn!("Ignoring BIBLE_FORMAT: {e}"),
            }
        }

        if let Some(flag) = lookup("ALWAYS_INCLUDE_CHAPTER_NUMBERS") {
            if let Some(flag) = parse_flag(&flag) {
                config.always_include_chapter_numbers = flag;
            }
        }

        config
    }

    /// Check if translation files can be loaded from disk
    pub const fn has_data_path(&self) -> bool {
        self.data_path.is_some()
    }
}

/// `<data dir>/scripture-refs/translations`, if present
fn default_data_path() -> Option<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR).join(TRANSLATIONS_DIR))
        .filter(|p| p.is_dir())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.app_name(), "scripture-refs");
        assert_eq!(config.default_version, Version::AmericanStandard);
        assert_eq!(config.default_format, TextFormat::PlainText);
        assert!(!config.always_include_chapter_numbers);
        assert!(!config.has_data_path());
    }

    #[test]
    fn test_values_from_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_from(&[
            ("BIBLE_DATA_PATH", dir.path().to_str().unwrap()),
            ("BIBLE_VERSION", "kjv"),
            ("BIBLE_FORMAT", "html"),
            ("ALWAYS_INCLUDE_CHAPTER_NUMBERS", "yes"),
        ]);
        assert_eq!(config.data_path.as_deref(), Some(dir.path()));
        assert_eq!(config.default_version, Version::KingJames);
        assert_eq!(config.default_format, TextFormat::Html);
        assert!(config.always_include_chapter_numbers);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = config_from(&[
            ("BIBLE_DATA_PATH", "/definitely/not/a/dir"),
            ("BIBLE_VERSION", "Vulgate"),
            ("BIBLE_FORMAT", "pdf"),
            ("ALWAYS_INCLUDE_CHAPTER_NUMBERS", "maybe"),
        ]);
        assert!(config.data_path.is_none());
        assert_eq!(config.default_version, Version::AmericanStandard);
        assert_eq!(config.default_format, TextFormat::PlainText);
        assert!(!config.always_include_chapter_numbers);
    }
}
