//! Audio materialization: the skip-if-exists batch driver.
//!
//! One MP3 per script entry, keyed by the entry's stable id. A file that
//! already exists is never re-synthesized and never rewritten, which is what
//! makes an interrupted or partially failed batch resumable by simply running
//! again.

pub mod manifest;

pub use manifest::{Manifest, ManifestEntry, MANIFEST_FILE};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use crate::error::{Result, SlidevoxError};
use crate::script::ScriptEntry;
use crate::synthesis::SpeechProvider;

/// Audio directory name inside a slideshow directory.
pub const AUDIO_DIR: &str = "slideshow_audio";

/// Default pause between successive provider calls.
pub const DEFAULT_PACING: Duration = Duration::from_secs(1);

/// Per-entry progress events, for CLI reporting.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// About to process entry `index` (0-based) of `total`.
    Processing {
        index: usize,
        total: usize,
        id: String,
    },
    /// Audio already on disk; no provider call made.
    Skipped { id: String },
    /// Audio synthesized and written.
    Generated { id: String },
    /// This entry failed; the batch continues.
    Failed { id: String, error: String },
}

/// One entry that failed this run.
#[derive(Debug)]
pub struct EntryFailure {
    pub id: String,
    pub error: SlidevoxError,
}

/// Outcome of a materializer run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub generated: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<EntryFailure>,
}

impl RunReport {
    /// Whether at least one new audio file was written this run.
    pub fn materialized_any(&self) -> bool {
        !self.generated.is_empty()
    }
}

/// Drives per-entry synthesis with idempotent skips, pacing between provider
/// calls, and partial-failure tolerance.
pub struct Materializer {
    audio_dir: PathBuf,
    voice: String,
    model: String,
    pacing: Duration,
}

impl Materializer {
    pub fn new(audio_dir: impl Into<PathBuf>, voice: impl Into<String>) -> Self {
        Self {
            audio_dir: audio_dir.into(),
            voice: voice.into(),
            model: crate::synthesis::openai::DEFAULT_TTS_MODEL.to_string(),
            pacing: DEFAULT_PACING,
        }
    }

    /// Model identifier recorded in the manifest.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Pause between successive provider calls (skips never pause).
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Process every entry in order, then write the manifest regardless of
    /// per-entry failures. Fails only when the audio directory itself cannot
    /// be created or the manifest cannot be written.
    pub async fn run<F>(
        &self,
        provider: &dyn SpeechProvider,
        entries: &[ScriptEntry],
        mut on_event: F,
    ) -> Result<RunReport>
    where
        F: FnMut(BatchEvent),
    {
        fs::create_dir_all(&self.audio_dir)?;

        let mut report = RunReport::default();
        let mut provider_called = false;
        let total = entries.len();

        for (index, entry) in entries.iter().enumerate() {
            on_event(BatchEvent::Processing {
                index,
                total,
                id: entry.id.clone(),
            });

            let target = self.target_path(&entry.id);
            if target.exists() {
                tracing::debug!(id = %entry.id, "audio already materialized, skipping");
                report.skipped.push(entry.id.clone());
                on_event(BatchEvent::Skipped {
                    id: entry.id.clone(),
                });
                continue;
            }

            if provider_called {
                tokio::time::sleep(self.pacing).await;
            }
            provider_called = true;

            match self.materialize_one(provider, entry, &target).await {
                Ok(()) => {
                    report.generated.push(entry.id.clone());
                    on_event(BatchEvent::Generated {
                        id: entry.id.clone(),
                    });
                }
                Err(error) => {
                    tracing::warn!(id = %entry.id, error = %error, "entry failed, continuing batch");
                    on_event(BatchEvent::Failed {
                        id: entry.id.clone(),
                        error: error.to_string(),
                    });
                    report.failed.push(EntryFailure {
                        id: entry.id.clone(),
                        error,
                    });
                }
            }
        }

        self.write_manifest(entries)?;
        Ok(report)
    }

    fn target_path(&self, id: &str) -> PathBuf {
        self.audio_dir.join(format!("{id}.mp3"))
    }

    async fn materialize_one(
        &self,
        provider: &dyn SpeechProvider,
        entry: &ScriptEntry,
        target: &Path,
    ) -> Result<()> {
        let audio = provider.synthesize(&entry.text, &self.voice).await?;
        fs::write(target, &audio)?;
        Ok(())
    }

    /// Rewrite the manifest to index exactly the audio files present on disk.
    fn write_manifest(&self, entries: &[ScriptEntry]) -> Result<()> {
        let files = entries
            .iter()
            .filter(|entry| self.target_path(&entry.id).exists())
            .map(|entry| ManifestEntry {
                id: entry.id.clone(),
                filename: format!("{}.mp3", entry.id),
                text_length: entry.text.chars().count(),
            })
            .collect();

        let manifest = Manifest {
            voice: self.voice.clone(),
            model: self.model.clone(),
            generated: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            files,
        };

        let path = self.audio_dir.join(MANIFEST_FILE);
        fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
        tracing::debug!(path = %path.display(), files = manifest.files.len(), "manifest written");
        Ok(())
    }
}
