//! Service modules.
//!
//! Facades that combine the parsing, conversion and translation layers for
//! callers that just want text for a citation.

pub mod scripture;
