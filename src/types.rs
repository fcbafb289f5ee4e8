//! Core type definitions shared across the crate.
//!
//! Verse identifiers are plain integers so they can be stored or sent over the
//! wire as-is; versions and formats are closed enums so a registry key can
//! never be misspelled.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::Error;

/// A parenthesized word such as "(KJV)" or "(nrsv)".
#[allow(clippy::expect_used)]
static RE_VERSION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*([A-Za-z]+)\s*\)").expect("valid regex: RE_VERSION_TAG"));

/// Integer encoding of a single verse: `book * 1_000_000 + chapter * 1_000 + verse`.
pub type VerseId = i64;

/// A Bible translation.
///
/// The public-domain versions can ship with data files; the licensed ones are
/// slots for bring-your-own content registered at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Version {
    /// American Standard Version (1901).
    #[default]
    AmericanStandard,
    /// King James Version.
    KingJames,
    /// Bible in Basic English.
    BasicEnglish,
    /// World English Bible.
    WorldEnglish,
    /// Young's Literal Translation.
    YoungsLiteral,
    /// New Revised Standard Version.
    Nrsv,
    /// New Revised Standard Version, Updated Edition.
    NrsvUe,
    /// New International Version.
    Niv,
    /// English Standard Version.
    Esv,
    /// The Message.
    Message,
}

impl Version {
    /// All known versions.
    pub const fn all() -> &'static [Self] {
        &[
            Self::AmericanStandard,
            Self::KingJames,
            Self::BasicEnglish,
            Self::WorldEnglish,
            Self::YoungsLiteral,
            Self::Nrsv,
            Self::NrsvUe,
            Self::Niv,
            Self::Esv,
            Self::Message,
        ]
    }

    /// Short code (e.g. "KJV").
    pub const fn code(self) -> &'static str {
        match self {
            Self::AmericanStandard => "ASV",
            Self::KingJames => "KJV",
            Self::BasicEnglish => "BBE",
            Self::WorldEnglish => "WEB",
            Self::YoungsLiteral => "YLT",
            Self::Nrsv => "NRSV",
            Self::NrsvUe => "NRSVue",
            Self::Niv => "NIV",
            Self::Esv => "ESV",
            Self::Message => "MSG",
        }
    }

    /// Full display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AmericanStandard => "American Standard Version",
            Self::KingJames => "King James Version",
            Self::BasicEnglish => "Bible in Basic English",
            Self::WorldEnglish => "World English Bible",
            Self::YoungsLiteral => "Young's Literal Translation",
            Self::Nrsv => "New Revised Standard Version",
            Self::NrsvUe => "New Revised Standard Version, Updated Edition",
            Self::Niv => "New International Version",
            Self::Esv => "English Standard Version",
            Self::Message => "The Message",
        }
    }

    /// Directory holding this version's data files.
    pub fn dir_name(self) -> String {
        self.code().to_lowercase()
    }

    /// Try to detect a version tag in text like "(NRSV)" or "Luke 1:76 NRSVue".
    ///
    /// A parenthesized code matches in any case. A bare word only matches when
    /// it is spelled exactly like the code, so "on the web" names no version.
    pub fn from_text(text: &str) -> Option<Self> {
        RE_VERSION_TAG
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|tag| Self::from_code(tag.as_str(), false))
            .or_else(|| {
                text.split(|c: char| !c.is_ascii_alphanumeric())
                    .filter(|token| !token.is_empty())
                    .find_map(|token| Self::from_code(token, true))
            })
    }

    fn from_code(token: &str, exact: bool) -> Option<Self> {
        Self::all().iter().copied().find(|v| {
            if exact {
                v.code() == token
            } else {
                v.code().eq_ignore_ascii_case(token)
            }
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|v| v.code().eq_ignore_ascii_case(wanted) || v.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::config(format!("unknown Bible version '{wanted}'"), "Use a code such as ASV, KJV or WEB"))
    }
}

/// The shape of a translation's stored content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    /// Plain text with verse boundaries only.
    #[default]
    PlainText,
    /// HTML carrying paragraphs, footnotes and other markup.
    Html,
}

impl TextFormat {
    /// Name used for data files and configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PlainText => "plain_text",
            Self::Html => "html",
        }
    }

    /// Whether content in this format needs markup cleaning.
    pub const fn is_markup(self) -> bool {
        matches!(self, Self::Html)
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "plain_text" | "plain" | "text" => Ok(Self::PlainText),
            "html" => Ok(Self::Html),
            other => Err(Error::config(format!("unknown text format '{other}'"), "Use plain_text or html")),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_version_detection() {
        assert_eq!(Version::from_text("(NRSV)"), Some(Version::Nrsv));
        assert_eq!(Version::from_text("Luke 1:76-79 NRSVue"), Some(Version::NrsvUe));
        assert_eq!(Version::from_text("KJV"), Some(Version::KingJames));
        assert_eq!(Version::from_text("website"), None);
        assert_eq!(Version::from_text("Genesis 1:1"), None);
    }

    #[test]
    fn test_ordinary_words_are_not_versions() {
        assert_eq!(Version::from_text("Read John 3:16 on the web"), None);
        assert_eq!(Version::from_text("a msg about Esv and niv"), None);
        assert_eq!(Version::from_text("John 3:16 (web)"), Some(Version::WorldEnglish));
        assert_eq!(Version::from_text("on the web (KJV)"), Some(Version::KingJames));
    }

    #[test]
    fn test_version_from_str() {
        assert_eq!("asv".parse::<Version>().unwrap(), Version::AmericanStandard);
        assert_eq!("King James Version".parse::<Version>().unwrap(), Version::KingJames);
        assert!("XYZ".parse::<Version>().is_err());
        assert_eq!(Version::WorldEnglish.dir_name(), "web");
    }

    #[test]
    fn test_text_format_from_str() {
        assert_eq!("plain-text".parse::<TextFormat>().unwrap(), TextFormat::PlainText);
        assert_eq!("HTML".parse::<TextFormat>().unwrap(), TextFormat::Html);
        assert!(TextFormat::Html.is_markup());
        assert!(!TextFormat::PlainText.is_markup());
    }
}
