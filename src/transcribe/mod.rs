//! Local speech-to-text through whisper.cpp.
//!
//! Models are fetched from Hugging Face on first use; audio is decoded to
//! 16kHz mono either natively (WAV) or through the ffmpeg executable.

mod audio;
mod ffmpeg;
mod model;
mod whisper;

pub use audio::{AudioError, WHISPER_SAMPLE_RATE, load_samples};
pub use ffmpeg::ensure_on_path as ensure_ffmpeg_on_path;
pub use model::{ModelError, WhisperModel, selected_model};
pub use whisper::{Transcriber, WhisperError};
