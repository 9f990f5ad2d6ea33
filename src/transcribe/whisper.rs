//! Whisper.cpp integration via the whisper-rs bindings.

use thiserror::Error;
use tracing::info;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::audio::WHISPER_SAMPLE_RATE;
use super::model::{self, ModelError, WhisperModel};

#[derive(Error, Debug)]
pub enum WhisperError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("failed to initialize whisper: {0}")]
    Init(String),
    #[error("transcription failed: {0}")]
    Transcription(String),
}

/// Whisper transcriber
pub struct Transcriber {
    ctx: WhisperContext,
    /// Number of threads whisper.cpp may use
    n_threads: i32,
}

impl Transcriber {
    /// Load the given model, downloading it first if needed.
    pub fn new(whisper_model: WhisperModel) -> Result<Self, WhisperError> {
        let path = model::download_model(whisper_model)?;

        info!("loading whisper {} model", whisper_model);

        let path = path
            .to_str()
            .ok_or_else(|| WhisperError::Init(format!("non-UTF-8 model path: {path:?}")))?;

        let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| WhisperError::Init(format!("failed to load model: {e}")))?;

        let n_threads = std::thread::available_parallelism()
            .map(|p| p.get() as i32)
            .unwrap_or(4);

        info!("whisper model loaded ({} threads)", n_threads);

        Ok(Self { ctx, n_threads })
    }

    /// Transcribe 16kHz mono samples, letting Whisper detect the language.
    ///
    /// Returns the trimmed transcript; pure silence yields an empty string.
    pub fn transcribe(&self, samples: &[f32]) -> Result<String, WhisperError> {
        let started = std::time::Instant::now();

        // Greedy sampling; beam search is 2-3x slower
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.n_threads);

        // Never force a language; the host sends audio in whatever language
        // its users speak
        params.set_language(Some("auto"));
        params.set_translate(false);

        // Segment-level output is all the host consumes
        params.set_token_timestamps(false);

        // Keep whisper.cpp's own console output off; stdout belongs to the
        // JSON result line
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_print_special(false);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| WhisperError::Transcription(format!("failed to create state: {e}")))?;

        state
            .full(params, samples)
            .map_err(|e| WhisperError::Transcription(format!("inference failed: {e}")))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| WhisperError::Transcription(format!("failed to get segments: {e}")))?;

        let mut text = String::new();

        for i in 0..num_segments {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| WhisperError::Transcription(format!("failed to get text: {e}")))?;

            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(segment);
        }

        if let Ok(id) = state.full_lang_id_from_state() {
            if let Some(lang) = whisper_rs::get_lang_str(id) {
                info!("detected language: {}", lang);
            }
        }

        info!(
            "transcribed {:.1}s of audio in {:.1}s ({} segments)",
            samples.len() as f32 / WHISPER_SAMPLE_RATE as f32,
            started.elapsed().as_secs_f32(),
            num_segments
        );

        Ok(text)
    }
}
