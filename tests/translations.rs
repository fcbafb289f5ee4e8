//! Integration tests for translation loading, registration and lookup.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use scripture_refs::bible::metadata::{chapters_in, title_in, VerseMetadata};
use scripture_refs::bible::{
    format_scripture_text, find_verse_ids, Book, JsonTranslationLoader, TextOptions, Translation, TranslationLoader,
    TranslationRegistry,
};
use scripture_refs::config::Config;
use scripture_refs::error::Error;
use scripture_refs::services::scripture::ScriptureService;
use scripture_refs::types::{TextFormat, VerseId, Version};
use serde_json::json;

const VERSES: &[(VerseId, &str)] = &[
    (43_003_016, "For God so loved the world, that he gave his only begotten Son,"),
    (43_003_017, "For God sent not the Son into the world to judge the world;"),
    (65_001_003, "Beloved, while I was giving all diligence to write unto you"),
];

/// Write `<dir>/<version>/<format>.json` for the sample verses.
fn write_translation(dir: &Path, version: Version, format: TextFormat, extra: serde_json::Value) {
    let mut content = String::new();
    let mut starts = serde_json::Map::new();
    let mut ends = serde_json::Map::new();
    for (id, text) in VERSES {
        let text = if format.is_markup() { format!("<p><sup>{}</sup>{text}</p>", id % 1000) } else { (*text).to_string() };
        starts.insert(id.to_string(), json!(content.len()));
        content.push_str(&text);
        ends.insert(id.to_string(), json!(content.len()));
        content.push('\n');
    }
    let mut file = json!({
        "content": content,
        "verse_start_offsets": starts,
        "verse_end_offsets": ends,
    });
    if let (Some(file), Some(extra)) = (file.as_object_mut(), extra.as_object()) {
        file.extend(extra.clone());
    }

    let version_dir = dir.join(version.dir_name());
    std::fs::create_dir_all(&version_dir).unwrap();
    std::fs::write(version_dir.join(format!("{}.json", format.name())), file.to_string()).unwrap();
}

#[test]
fn json_loader_reads_plain_and_markup() {
    let dir = tempfile::tempdir().unwrap();
    write_translation(dir.path(), Version::AmericanStandard, TextFormat::PlainText, json!({}));
    write_translation(dir.path(), Version::AmericanStandard, TextFormat::Html, json!({}));
    let loader = JsonTranslationLoader::new(dir.path());

    let plain = loader.load(Version::AmericanStandard, TextFormat::PlainText).unwrap();
    assert!(!plain.is_markup());
    assert_eq!(plain.verse_count(), 3);
    assert_eq!(plain.verse_text(65_001_003).unwrap(), VERSES[2].1);

    let html = loader.load(Version::AmericanStandard, TextFormat::Html).unwrap();
    assert!(html.is_markup());
    assert_eq!(
        html.get_scripture(43_003_016, Some(43_003_017)).unwrap(),
        format!("{} {}", VERSES[0].1, VERSES[1].1)
    );
}

#[test]
fn json_loader_reads_optional_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_translation(
        dir.path(),
        Version::WorldEnglish,
        TextFormat::PlainText,
        json!({
            "max_verses": { "Jude": { "1": 25 } },
            "short_titles": { "John": "Jn" },
            "long_titles": { "John": "The Good News According to John" },
        }),
    );
    let translation = JsonTranslationLoader::new(dir.path())
        .load(Version::WorldEnglish, TextFormat::PlainText)
        .unwrap();
    assert_eq!(translation.fetch_max_verses().unwrap().len(), 1);
    assert_eq!(chapters_in(&translation, Book::Jude), 1);
    assert_eq!(title_in(&translation, Book::John, false), "Jn");
    assert_eq!(title_in(&translation, Book::John, true), "The Good News According to John");
}

#[test]
fn json_loader_errors() {
    let dir = tempfile::tempdir().unwrap();
    let loader = JsonTranslationLoader::new(dir.path());
    assert!(matches!(
        loader.load(Version::KingJames, TextFormat::PlainText),
        Err(Error::MissingTranslation { version: Version::KingJames, format: TextFormat::PlainText })
    ));

    let path = loader.file_path(Version::KingJames, TextFormat::PlainText);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(loader.load(Version::KingJames, TextFormat::PlainText), Err(Error::Parse { .. })));
}

#[test]
fn registry_caches_loaded_translations() {
    let dir = tempfile::tempdir().unwrap();
    write_translation(dir.path(), Version::KingJames, TextFormat::PlainText, json!({}));
    let registry = TranslationRegistry::new(JsonTranslationLoader::new(dir.path()));

    let first = registry.get_translation(Version::KingJames, TextFormat::PlainText).unwrap();
    std::fs::remove_dir_all(dir.path().join("kjv")).unwrap();
    let second = registry.get_translation(Version::KingJames, TextFormat::PlainText).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(registry.get_translation(Version::KingJames, TextFormat::Html).is_err());
}

#[test]
fn bring_your_own_translation() {
    let registry = Arc::new(TranslationRegistry::empty());
    let content = "Then the LORD answered Job out of the whirlwind.";
    registry.register_translation(
        Version::Nrsv,
        TextFormat::PlainText,
        Translation::new(
            Version::Nrsv,
            content,
            HashMap::from([(18_038_001, 0)]),
            HashMap::from([(18_038_001, content.len())]),
        ),
    );

    let service = ScriptureService::with_registry(&Config::default(), Arc::clone(&registry));
    assert_eq!(
        service.get_scripture(18_038_001, None, Version::Nrsv, TextFormat::PlainText).unwrap(),
        content
    );
    let passages = service.lookup("Job 38:1 (NRSV)").unwrap();
    assert_eq!(passages.len(), 1);
    assert_eq!(passages[0].display(), "Job 38:1 NRSV");
    assert_eq!(passages[0].file_name(), "Job 38v1 (NRSV)");
    assert!(matches!(
        service.get_scripture(18_038_001, None, Version::Esv, TextFormat::PlainText),
        Err(Error::MissingTranslation { .. })
    ));
}

#[test]
fn service_reads_configured_data_path() {
    let dir = tempfile::tempdir().unwrap();
    write_translation(dir.path(), Version::AmericanStandard, TextFormat::PlainText, json!({}));
    let mut config = Config::default();
    config.data_path = Some(dir.path().to_path_buf());

    let service = ScriptureService::new(&config);
    let passages = service.lookup("John 3:16-17; Jude 3").unwrap();
    let labels: Vec<&str> = passages.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["John 3:16-17", "Jude 3"]);
    assert_eq!(passages[1].text, VERSES[2].1);
    assert!(service.registry().is_loaded(Version::AmericanStandard, TextFormat::PlainText));
}

#[test]
fn scripture_text_with_headings() {
    let registry = TranslationRegistry::empty();
    let mut content = String::new();
    let mut starts = HashMap::new();
    let mut ends = HashMap::new();
    for (id, text) in VERSES {
        starts.insert(*id, content.len());
        content.push_str(text);
        ends.insert(*id, content.len());
        content.push(' ');
    }
    let translation = registry.register_translation(
        Version::AmericanStandard,
        TextFormat::PlainText,
        Translation::new(Version::AmericanStandard, content, starts, ends),
    );

    let ids = find_verse_ids("John 3:16-17 and Jude 3").unwrap();
    let options = TextOptions { one_verse_per_paragraph: true, ..TextOptions::default() };
    let text = format_scripture_text(&ids, &translation, &options).unwrap();
    assert_eq!(
        text,
        format!(
            "John\n\nChapter 3\n\n¹⁶{}\n\n¹⁷{}\n\nJude\n\n³{}",
            VERSES[0].1, VERSES[1].1, VERSES[2].1
        )
    );
}
