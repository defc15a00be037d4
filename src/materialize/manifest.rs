//! Audio manifest: a derived index of what exists on disk.

use serde::{Deserialize, Serialize};

/// Manifest file name inside the audio directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Summary of one materializer run, rewritten wholesale each time.
///
/// `files` lists only entries whose audio file exists on disk after the run,
/// so the manifest never claims audio that a failed entry did not produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub voice: String,
    pub model: String,
    /// RFC 3339 generation timestamp.
    pub generated: String,
    pub files: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    pub filename: String,
    /// Length of the source narration text, in characters.
    pub text_length: usize,
}
