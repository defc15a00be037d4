//! Convenience re-exports for common use.

pub use crate::config::{
    ChainCredential, CredentialSource, EnvCredential, KeyFileCredential, StaticCredential,
};
pub use crate::error::{Result, SlidevoxError};
pub use crate::materialize::{BatchEvent, Manifest, ManifestEntry, Materializer, RunReport};
pub use crate::pipeline::{Pipeline, RunSummary};
pub use crate::script::{extract_scripts, ScriptEntry};
pub use crate::synthesis::{OpenAiTtsProvider, SpeechProvider};
pub use crate::types::{Slide, SlideMetadata, SlideshowDocument};
