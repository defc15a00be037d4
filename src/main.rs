//! slidevox CLI binary entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use slidevox::error::SlidevoxError;
use slidevox::materialize::BatchEvent;
use slidevox::pipeline::Pipeline;

/// Generate narration audio for a slideshow directory.
///
/// Behavior is fully determined by the directory's files: re-running after a
/// partial failure synthesizes only what is still missing.
#[derive(Parser)]
#[command(name = "slidevox", version)]
struct Cli {
    /// Slideshow directory (defaults to the current directory).
    #[arg(default_value = ".")]
    dir: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Pick up OPENAI_API_KEY from a .env in the slideshow directory, if any.
    let _ = dotenvy::dotenv();

    println!("🎙️  Generating audio files for slideshow...\n");

    let pipeline = Pipeline::new(&cli.dir);
    match pipeline.run(print_event).await {
        Ok(summary) => {
            println!("\n📚 Slideshow: {}", summary.title);
            println!("🎤 Voice: {}", summary.voice);
            println!(
                "✅ {} generated, {} skipped, {} failed (of {} entries)",
                summary.report.generated.len(),
                summary.report.skipped.len(),
                summary.report.failed.len(),
                summary.entries
            );
            if !summary.report.failed.is_empty() {
                println!("ℹ️  Run again to retry the failed entries; existing audio is never re-synthesized.");
            }
            if !summary.html_updated {
                println!("⚠️  index.html was not updated (missing file or slideshowData not found).");
            }
            // Per-entry failures are not fatal: the next run resumes from disk.
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {e}");
            if let SlidevoxError::Configuration(_) = e {
                eprintln!("\nSet OPENAI_API_KEY in the environment (or a .env file),");
                eprintln!("or provide ~/keys/openai-key.js containing:");
                eprintln!("  export const OPENAI_API_KEY = \"your-api-key-here\";");
            }
            ExitCode::FAILURE
        }
    }
}

fn print_event(event: BatchEvent) {
    match event {
        BatchEvent::Processing { index, total, id } => {
            println!("[{}/{}] Generating {}...", index + 1, total, id);
        }
        BatchEvent::Skipped { .. } => println!("   ✓ Already exists, skipping"),
        BatchEvent::Generated { .. } => println!("   ✓ Generated successfully"),
        BatchEvent::Failed { error, .. } => println!("   ❌ Error: {error}"),
    }
}
