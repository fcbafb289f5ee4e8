//! `scripture-refs` - find, normalize and render Bible citations.
//!
//! This crate locates citations such as "Matthew 18:12-14" or "Genesis -
//! Deuteronomy" in free text, normalizes them into [`bible::ScriptureRef`]s,
//! converts them to and from integer verse ids, renders them back to display
//! strings, and fetches verse text from indexed translations.

pub mod bible;
pub mod config;
pub mod constants;
pub mod error;
pub mod services;
pub mod types;
