//! End-to-end audio generation for one slideshow directory.
//!
//! Load document → resolve credential → extract scripts → materialize audio →
//! sync JSON and embedded HTML. Fatal errors (no document, no credential)
//! surface before the audio directory is created; per-entry failures are
//! reported through the batch event stream and the summary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::artifact;
use crate::config::{ChainCredential, CredentialSource};
use crate::error::Result;
use crate::materialize::{BatchEvent, Materializer, RunReport, AUDIO_DIR, DEFAULT_PACING};
use crate::script::extract_scripts;
use crate::synthesis::OpenAiTtsProvider;
use crate::util::retry::RetryPolicy;

/// What one pipeline run did.
#[derive(Debug)]
pub struct RunSummary {
    /// Document title, for reporting.
    pub title: String,
    /// Voice the audio was synthesized with.
    pub voice: String,
    /// Number of narration entries processed.
    pub entries: usize,
    /// Per-entry outcome of the materializer batch.
    pub report: RunReport,
    /// Whether the embedded HTML copy was rewritten.
    pub html_updated: bool,
}

/// Pipeline over one slideshow directory.
pub struct Pipeline {
    dir: PathBuf,
    credentials: Box<dyn CredentialSource>,
    base_url: Option<String>,
    pacing: Duration,
    retry_policy: Option<RetryPolicy>,
}

impl Pipeline {
    /// Pipeline with the conventional credential chain and default pacing.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            credentials: Box::new(ChainCredential::conventional()),
            base_url: None,
            pacing: DEFAULT_PACING,
            retry_policy: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Box<dyn CredentialSource>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Override the provider base URL (tests point this at a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Override the provider retry policy.
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = Some(retry_policy);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Run the pipeline, reporting per-entry progress through `on_event`.
    pub async fn run<F>(&self, on_event: F) -> Result<RunSummary>
    where
        F: FnMut(BatchEvent),
    {
        let mut document = artifact::load_document(&self.dir)?;

        // Pre-flight: a missing credential aborts before any filesystem writes.
        let api_key = self.credentials.resolve()?;

        let entries = extract_scripts(&document);
        let voice = document.metadata.voice().to_string();
        tracing::debug!(
            title = %document.metadata.title,
            voice = %voice,
            entries = entries.len(),
            "starting audio run"
        );

        let mut provider = match &self.base_url {
            Some(base_url) => OpenAiTtsProvider::new_with_base_url(api_key, base_url.clone()),
            None => OpenAiTtsProvider::new(api_key),
        };
        if let Some(retry_policy) = &self.retry_policy {
            provider = provider.with_retry_policy(retry_policy.clone());
        }

        let materializer = Materializer::new(self.dir.join(AUDIO_DIR), voice.clone())
            .with_model(provider.model().to_string())
            .with_pacing(self.pacing);
        let report = materializer.run(&provider, &entries, on_event).await?;

        artifact::mark_audio_generated(&mut document, &self.dir)?;
        let html_updated = artifact::update_embedded_data(&document, &self.dir)?;

        Ok(RunSummary {
            title: document.metadata.title.clone(),
            voice,
            entries: entries.len(),
            report,
            html_updated,
        })
    }
}
