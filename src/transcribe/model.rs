use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Selects the model size; one of tiny, base, small, medium, large.
pub const MODEL_ENV: &str = "WHISPER_MODEL";
/// Overrides where downloaded weights are stored.
pub const MODEL_DIR_ENV: &str = "WHISPER_MODEL_DIR";

/// Available Whisper model sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhisperModel {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl WhisperModel {
    /// Get the Hugging Face URL for this model
    pub fn hf_url(&self) -> String {
        format!(
            "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/{}",
            self.filename()
        )
    }

    /// Get the weights filename for this model
    pub fn filename(&self) -> &'static str {
        match self {
            WhisperModel::Tiny => "ggml-tiny.bin",
            WhisperModel::Base => "ggml-base.bin",
            WhisperModel::Small => "ggml-small.bin",
            WhisperModel::Medium => "ggml-medium.bin",
            WhisperModel::Large => "ggml-large-v3.bin",
        }
    }

    /// Get approximate model size in MB
    pub fn size_mb(&self) -> u64 {
        match self {
            WhisperModel::Tiny => 75,
            WhisperModel::Base => 142,
            WhisperModel::Small => 466,
            WhisperModel::Medium => 1500,
            WhisperModel::Large => 3100,
        }
    }
}

impl std::fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WhisperModel::Tiny => write!(f, "tiny"),
            WhisperModel::Base => write!(f, "base"),
            WhisperModel::Small => write!(f, "small"),
            WhisperModel::Medium => write!(f, "medium"),
            WhisperModel::Large => write!(f, "large"),
        }
    }
}

impl std::str::FromStr for WhisperModel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(WhisperModel::Tiny),
            "base" => Ok(WhisperModel::Base),
            "small" => Ok(WhisperModel::Small),
            "medium" => Ok(WhisperModel::Medium),
            "large" => Ok(WhisperModel::Large),
            _ => Err(ModelError::UnknownModel(s.to_string())),
        }
    }
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown model {0:?}: use tiny, base, small, medium, or large")]
    UnknownModel(String),
    #[error("failed to download model: {0}")]
    Download(String),
}

/// Resolve the model size from the environment.
///
/// Unset means `small`. A set-but-unrecognized value is an error, raised
/// inside the guarded transcription sequence rather than at argument
/// parsing, so it surfaces to the host as TRANSCRIBE_FAILED.
pub fn selected_model() -> Result<WhisperModel, ModelError> {
    match std::env::var(MODEL_ENV) {
        Ok(raw) => raw.parse(),
        Err(_) => Ok(WhisperModel::Small),
    }
}

/// Get the models directory path
pub fn models_dir() -> PathBuf {
    std::env::var_os(MODEL_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("models").join("whisper"))
}

/// Get the path to a specific model file
pub fn model_path(model: WhisperModel) -> PathBuf {
    models_dir().join(model.filename())
}

/// Check if a model is already downloaded
pub fn is_model_downloaded(model: WhisperModel) -> bool {
    let path = model_path(model);
    if !path.exists() {
        return false;
    }

    // Reject leftovers from interrupted downloads (under 50% of expected)
    if let Ok(metadata) = fs::metadata(&path) {
        let expected_bytes = model.size_mb() * 1024 * 1024;
        return metadata.len() >= expected_bytes / 2;
    }

    false
}

/// Download a Whisper model from Hugging Face
pub fn download_model(model: WhisperModel) -> Result<PathBuf, ModelError> {
    let path = model_path(model);

    if is_model_downloaded(model) {
        info!("model {} already downloaded at {:?}", model, path);
        return Ok(path);
    }

    fs::create_dir_all(models_dir())?;

    info!("downloading whisper {} model (~{}MB)", model, model.size_mb());

    let url = model.hf_url();

    let response = reqwest::blocking::Client::new()
        .get(&url)
        .send()
        .map_err(|e| ModelError::Download(format!("HTTP request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(ModelError::Download(format!(
            "HTTP {} from {}",
            response.status(),
            url
        )));
    }

    let total_size = response
        .content_length()
        .unwrap_or(model.size_mb() * 1024 * 1024);

    // Progress on stderr; stdout is reserved for the result line
    let pb = indicatif::ProgressBar::new(total_size);
    pb.set_style(
        indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );

    // Stream into a temp file, then rename into place
    let temp_path = path.with_extension("bin.tmp");
    let mut file = File::create(&temp_path)?;
    let mut reader = pb.wrap_read(response);
    io::copy(&mut reader, &mut file)?;

    pb.finish_with_message("download complete");

    fs::rename(&temp_path, &path)?;

    info!("model downloaded to {:?}", path);

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_parsing() {
        assert_eq!("tiny".parse::<WhisperModel>().unwrap(), WhisperModel::Tiny);
        assert_eq!("SMALL".parse::<WhisperModel>().unwrap(), WhisperModel::Small);
        assert!("turbo".parse::<WhisperModel>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for model in [
            WhisperModel::Tiny,
            WhisperModel::Base,
            WhisperModel::Small,
            WhisperModel::Medium,
            WhisperModel::Large,
        ] {
            assert_eq!(model.to_string().parse::<WhisperModel>().unwrap(), model);
        }
    }

    #[test]
    fn test_model_paths() {
        assert!(
            model_path(WhisperModel::Tiny)
                .to_str()
                .unwrap()
                .contains("ggml-tiny.bin")
        );
        assert_eq!(WhisperModel::Large.filename(), "ggml-large-v3.bin");
        assert!(WhisperModel::Large.hf_url().ends_with("ggml-large-v3.bin"));
    }
}
