use anyhow::Context as _;
use dotenvy::dotenv;
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod output;
mod transcribe;

use output::Outcome;
use transcribe::Transcriber;

fn main() {
    dotenv().ok();

    // Diagnostics go to stderr so stdout stays a single JSON line for the
    // host process. Silent unless RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    transcribe::ensure_ffmpeg_on_path();

    let outcome = match std::env::args().nth(1) {
        None => Outcome::no_path_provided(),
        Some(path) => transcribe_file(&path),
    };

    output::emit(&outcome);
}

fn transcribe_file(path: &str) -> Outcome {
    if !Path::new(path).is_file() {
        return Outcome::file_not_found(path);
    }

    match run(path) {
        Ok(text) => Outcome::text(text),
        Err(err) => Outcome::transcribe_failed(&err),
    }
}

/// Everything that can fail after the path check runs inside this boundary;
/// the caller folds any error into the TRANSCRIBE_FAILED payload.
fn run(path: &str) -> anyhow::Result<String> {
    let model = transcribe::selected_model().context("invalid model selection")?;

    let samples =
        transcribe::load_samples(Path::new(path)).context("failed to decode audio")?;

    let transcriber = Transcriber::new(model).context("failed to load whisper model")?;

    let text = transcriber
        .transcribe(&samples)
        .context("transcription failed")?;

    Ok(text)
}
