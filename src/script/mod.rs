//! Script extraction: one narration entry per slide plus the title slot.
//!
//! Entry ids are positional (`slide-0` for the title narration, `slide-{n+1}`
//! for the n-th slide) and are the key under which audio is materialized, so
//! they must come out identical on every run over the same document.

use crate::types::SlideshowDocument;

/// One narration slot, derived from the document and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    /// Stable id, `slide-0 .. slide-N`.
    pub id: String,
    /// Text to synthesize.
    pub text: String,
}

/// Derive the ordered narration entries for a document.
///
/// The title entry falls back to a greeting built from title and subtitle;
/// slides without a script get a spoken placeholder naming the slide.
pub fn extract_scripts(document: &SlideshowDocument) -> Vec<ScriptEntry> {
    let metadata = &document.metadata;
    let mut entries = Vec::with_capacity(document.slides.len() + 1);

    let title_text = metadata.title_script.clone().unwrap_or_else(|| {
        match metadata.subtitle.as_deref() {
            Some(subtitle) if !subtitle.is_empty() => {
                format!("Welcome to {}. {}", metadata.title, subtitle)
            }
            _ => format!("Welcome to {}.", metadata.title),
        }
    });
    entries.push(ScriptEntry {
        id: "slide-0".to_string(),
        text: title_text,
    });

    for (index, slide) in document.slides.iter().enumerate() {
        let text = slide
            .script
            .clone()
            .unwrap_or_else(|| format!("Slide {}: {}", index + 1, slide.title));
        entries.push(ScriptEntry {
            id: format!("slide-{}", index + 1),
            text,
        });
    }

    entries
}
