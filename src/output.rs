//! The single-line JSON contract with the host process.
//!
//! Every invocation prints exactly one JSON object to stdout and exits 0;
//! the host distinguishes success from failure by payload shape, never by
//! exit code or stderr.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NoPathProvided,
    FileNotFound,
    TranscribeFailed,
}

/// Outcome of one invocation. Serializes to one of:
/// `{"text": ...}`, `{"error": "NO_PATH_PROVIDED"}`,
/// `{"error": "FILE_NOT_FOUND", "path": ...}`,
/// `{"error": "TRANSCRIBE_FAILED", "details": ...}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Text {
        text: String,
    },
    Error {
        error: ErrorKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl Outcome {
    pub fn text(text: impl Into<String>) -> Self {
        Outcome::Text { text: text.into() }
    }

    pub fn no_path_provided() -> Self {
        Outcome::Error {
            error: ErrorKind::NoPathProvided,
            path: None,
            details: None,
        }
    }

    /// Echoes the given path back verbatim so the host can report it.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Outcome::Error {
            error: ErrorKind::FileNotFound,
            path: Some(path.into()),
            details: None,
        }
    }

    pub fn transcribe_failed(err: &anyhow::Error) -> Self {
        Outcome::Error {
            error: ErrorKind::TranscribeFailed,
            path: None,
            details: Some(format!("{err:#}")),
        }
    }
}

/// Print the outcome as one line on stdout.
///
/// serde_json writes non-ASCII characters literally, so transcripts in any
/// script (or emoji) survive unescaped.
pub fn emit(outcome: &Outcome) {
    let line = serde_json::to_string(outcome).unwrap_or_else(|_| {
        r#"{"error":"TRANSCRIBE_FAILED","details":"failed to encode result"}"#.to_owned()
    });
    println!("{line}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_shape() {
        let json = serde_json::to_string(&Outcome::no_path_provided()).unwrap();
        assert_eq!(json, r#"{"error":"NO_PATH_PROVIDED"}"#);
    }

    #[test]
    fn file_not_found_echoes_path_verbatim() {
        let json = serde_json::to_string(&Outcome::file_not_found("uploads/voice msg.ogg")).unwrap();
        assert_eq!(
            json,
            r#"{"error":"FILE_NOT_FOUND","path":"uploads/voice msg.ogg"}"#
        );
    }

    #[test]
    fn transcribe_failed_carries_context_chain() {
        let err = anyhow::anyhow!("decoder exploded").context("transcription failed");
        let json = serde_json::to_string(&Outcome::transcribe_failed(&err)).unwrap();
        assert_eq!(
            json,
            r#"{"error":"TRANSCRIBE_FAILED","details":"transcription failed: decoder exploded"}"#
        );
    }

    #[test]
    fn non_ascii_text_is_not_escaped() {
        let json = serde_json::to_string(&Outcome::text("Привет, мир 🎙️")).unwrap();
        assert_eq!(json, r#"{"text":"Привет, мир 🎙️"}"#);
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn empty_transcript_is_a_success() {
        let json = serde_json::to_string(&Outcome::text("")).unwrap();
        assert_eq!(json, r#"{"text":""}"#);
    }
}
