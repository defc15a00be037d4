//! slidevox — narrated-slideshow audio pipeline.
//!
//! Keeps a slideshow's three artifacts (the persisted JSON document, the copy
//! embedded in its HTML page, and the audio manifest) consistent across
//! partial and repeated runs: stable per-slide ids, one MP3 per narration
//! entry, skip-if-exists idempotence, and wholesale manifest rewrites.
//!
//! # Quick Start
//!
//! ```no_run
//! use slidevox::pipeline::Pipeline;
//!
//! # async fn example() -> slidevox::error::Result<()> {
//! let summary = Pipeline::new(".").run(|_event| {}).await?;
//! println!("{} entries, {} generated", summary.entries, summary.report.generated.len());
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod materialize;
pub mod pipeline;
pub mod prelude;
pub mod script;
pub mod synthesis;
pub mod types;
pub mod util;
