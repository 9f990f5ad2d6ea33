//! Decoding of non-WAV audio through the external ffmpeg executable.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;
use tracing::debug;

use super::audio::{AudioError, WHISPER_SAMPLE_RATE};

/// Stock ffmpeg install location on Windows machines where the installer
/// was never asked to touch PATH.
#[cfg(windows)]
const FFMPEG_DIR: &str = r"C:\ffmpeg\bin";

/// On Windows, prepend the stock ffmpeg directory to PATH if it exists and
/// is missing from the search path. Best effort, process-local, runs once
/// before any decoding. No-op elsewhere.
pub fn ensure_on_path() {
    #[cfg(windows)]
    {
        let dir = Path::new(FFMPEG_DIR);
        let current = env::var_os("PATH").unwrap_or_default();
        if dir.is_dir() {
            if let Some(updated) = path_with_dir_prepended(dir, &current) {
                // Safety: called from main before any other threads exist.
                unsafe { env::set_var("PATH", updated) };
                tracing::info!("added {} to PATH", FFMPEG_DIR);
            }
        }
    }
}

/// Returns a PATH value with `dir` prepended, or None if `dir` is already
/// one of its entries.
#[cfg_attr(not(windows), allow(dead_code))]
fn path_with_dir_prepended(dir: &Path, path_var: &OsStr) -> Option<OsString> {
    if env::split_paths(path_var).any(|p| p == dir) {
        return None;
    }

    let entries = std::iter::once(dir.to_path_buf()).chain(env::split_paths(path_var));
    env::join_paths(entries).ok()
}

/// Decode any container/codec ffmpeg understands into 16kHz mono f32.
pub fn decode_to_pcm(path: &Path) -> Result<Vec<f32>, AudioError> {
    debug!("decoding {:?} via ffmpeg", path);

    let output = Command::new("ffmpeg")
        .args(["-nostdin", "-hide_banner", "-loglevel", "error"])
        .arg("-i")
        .arg(path)
        .args(["-f", "s16le", "-ac", "1", "-acodec", "pcm_s16le"])
        .arg("-ar")
        .arg(WHISPER_SAMPLE_RATE.to_string())
        .arg("pipe:1")
        .output()
        .map_err(|e| AudioError::Decode(format!("failed to run ffmpeg: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr.lines().last().unwrap_or_default().trim().to_string();
        return Err(AudioError::Decode(if reason.is_empty() {
            format!("ffmpeg exited with {}", output.status)
        } else {
            format!("ffmpeg exited with {}: {}", output.status, reason)
        }));
    }

    Ok(pcm_s16le_to_f32(&output.stdout))
}

fn pcm_s16le_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
        .collect()
}
