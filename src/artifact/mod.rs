//! Persisted artifact loading and post-run synchronization.
//!
//! A slideshow directory holds up to two copies of the same document: the
//! canonical `slideshow_data.json` and a serialization embedded in
//! `index.html` under a `let slideshowData = {...};` assignment. After an
//! audio run both copies must agree, so this module rewrites the JSON and
//! splices the embedded copy in place, touching nothing else in the HTML.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{SecondsFormat, Utc};
use regex::Regex;

use crate::error::{Result, SlidevoxError};
use crate::types::SlideshowDocument;

/// Canonical document file inside a slideshow directory.
pub const DATA_FILE: &str = "slideshow_data.json";

/// Optional HTML host document.
pub const HTML_FILE: &str = "index.html";

static EMBEDDED_DATA: OnceLock<Regex> = OnceLock::new();

// Lazy up to the first `};`, like the serialization the scaffolder writes:
// pretty-printed JSON never contains `};` before the closing brace.
fn embedded_data_pattern() -> &'static Regex {
    EMBEDDED_DATA.get_or_init(|| {
        Regex::new(r"(?s)let slideshowData = (\{.*?\});").expect("valid embedded-data pattern")
    })
}

/// Load the slideshow document for a directory.
///
/// Prefers `slideshow_data.json`; falls back to the copy embedded in
/// `index.html` (it is itself valid JSON). Missing or malformed input is a
/// fatal Data error.
pub fn load_document(dir: &Path) -> Result<SlideshowDocument> {
    let json_path = dir.join(DATA_FILE);
    if json_path.exists() {
        let content = fs::read_to_string(&json_path)?;
        return serde_json::from_str(&content).map_err(|e| {
            SlidevoxError::Data(format!("{} is malformed: {e}", json_path.display()))
        });
    }

    let html_path = dir.join(HTML_FILE);
    if html_path.exists() {
        let html = fs::read_to_string(&html_path)?;
        let embedded = embedded_data_pattern()
            .captures(&html)
            .ok_or_else(|| {
                SlidevoxError::Data(format!(
                    "could not find slideshowData in {}",
                    html_path.display()
                ))
            })?
            .get(1)
            .expect("pattern has one capture group")
            .as_str();
        tracing::debug!(path = %html_path.display(), "loading document from embedded HTML copy");
        return serde_json::from_str(embedded).map_err(|e| {
            SlidevoxError::Data(format!(
                "embedded slideshowData in {} is malformed: {e}",
                html_path.display()
            ))
        });
    }

    Err(SlidevoxError::Data(format!(
        "no {DATA_FILE} found in {}; run from the slideshow directory",
        dir.display()
    )))
}

/// Mark the document audio-complete and persist it to `slideshow_data.json`.
pub fn mark_audio_generated(document: &mut SlideshowDocument, dir: &Path) -> Result<()> {
    document.metadata.has_audio = true;
    document.metadata.audio_generated_at =
        Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    let path = dir.join(DATA_FILE);
    fs::write(&path, serde_json::to_string_pretty(document)?)?;
    tracing::debug!(path = %path.display(), "document persisted with hasAudio");
    Ok(())
}

/// Replace the embedded serialization in `index.html` with `document`,
/// re-indented to the host line's indentation.
///
/// Returns whether the HTML was updated. A missing file or unmatched pattern
/// is a warning, not an error: the HTML host is optional.
pub fn update_embedded_data(document: &SlideshowDocument, dir: &Path) -> Result<bool> {
    let html_path = dir.join(HTML_FILE);
    if !html_path.exists() {
        tracing::warn!(path = %html_path.display(), "no HTML host document, skipping embedded update");
        return Ok(false);
    }

    let html = fs::read_to_string(&html_path)?;
    let Some(found) = embedded_data_pattern().find(&html) else {
        tracing::warn!(path = %html_path.display(), "slideshowData assignment not found, skipping embedded update");
        return Ok(false);
    };

    let indent = line_indent(&html, found.start());
    let serialized = serde_json::to_string_pretty(document)?;
    let reindented = reindent(&serialized, &indent);

    let mut updated = String::with_capacity(html.len());
    updated.push_str(&html[..found.start()]);
    updated.push_str("let slideshowData = ");
    updated.push_str(&reindented);
    updated.push(';');
    updated.push_str(&html[found.end()..]);

    fs::write(&html_path, updated)?;
    tracing::debug!(path = %html_path.display(), "embedded slideshowData updated");
    Ok(true)
}

/// Leading whitespace of the line containing byte offset `at`.
fn line_indent(text: &str, at: usize) -> String {
    let line_start = text[..at].rfind('\n').map_or(0, |i| i + 1);
    text[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

/// Prefix every line after the first with `indent`, so a multi-line value
/// sits flush with the assignment that hosts it.
fn reindent(serialized: &str, indent: &str) -> String {
    let mut lines = serialized.lines();
    let mut out = String::with_capacity(serialized.len());
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        out.push('\n');
        out.push_str(indent);
        out.push_str(line);
    }
    out
}
