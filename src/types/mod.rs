//! Slideshow document types.
//!
//! These mirror the persisted `slideshow_data.json` schema. Unknown fields are
//! preserved through flattened maps so that rewriting the document never drops
//! data the pipeline does not understand.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Voice used when the document does not select one.
pub const DEFAULT_VOICE: &str = "shimmer";

/// A persisted slideshow: presentation metadata plus an ordered slide list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideshowDocument {
    pub metadata: SlideMetadata,
    pub slides: Vec<Slide>,
}

/// Document-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Provider voice identifier; `DEFAULT_VOICE` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    /// Set by the pipeline once audio has been materialized.
    #[serde(default)]
    pub has_audio: bool,
    /// RFC 3339 timestamp of the last audio run, set by the pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_generated_at: Option<String>,
    /// Explicit narration for the title slide (`slide-0`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_script: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SlideMetadata {
    /// Voice to synthesize with, falling back to the provider default.
    pub fn voice(&self) -> &str {
        self.voice.as_deref().unwrap_or(DEFAULT_VOICE)
    }
}

/// One slide. The `id` field is stable across runs and is carried through
/// untouched; narration identity is derived from slide position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub content: Vec<String>,
    /// Narration text for this slide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn unknown_fields_round_trip() {
        let raw = json!({
            "metadata": {
                "title": "T",
                "voice": "alloy",
                "theme": "dark",
                "hasAudio": false
            },
            "slides": [{
                "id": 1,
                "type": "content",
                "title": "S1",
                "content": ["a"],
                "script": "hello",
                "transition": "fade"
            }]
        });

        let doc: SlideshowDocument = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.metadata.extra["theme"], json!("dark"));
        assert_eq!(doc.slides[0].extra["transition"], json!("fade"));

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["metadata"]["theme"], json!("dark"));
        assert_eq!(back["slides"][0]["transition"], json!("fade"));
        assert_eq!(back["slides"][0]["type"], json!("content"));
    }

    #[test]
    fn voice_defaults_to_shimmer() {
        let metadata = SlideMetadata {
            title: "T".to_string(),
            ..Default::default()
        };
        assert_eq!(metadata.voice(), "shimmer");
    }
}
