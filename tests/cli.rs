//! End-to-end checks of the single-line JSON contract.
//!
//! These only exercise paths that never reach model loading, so they run
//! without weights, network access, or ffmpeg installed.

use std::process::Command;

fn bridge() -> Command {
    Command::new(env!("CARGO_BIN_EXE_whisper-bridge"))
}

fn one_line(stdout: &[u8]) -> String {
    let text = String::from_utf8(stdout.to_vec()).unwrap();
    assert_eq!(text.matches('\n').count(), 1, "expected exactly one line");
    text.trim_end().to_string()
}

#[test]
fn no_argument_reports_no_path() {
    let out = bridge().output().unwrap();

    assert!(out.status.success());
    assert_eq!(one_line(&out.stdout), r#"{"error":"NO_PATH_PROVIDED"}"#);
}

#[test]
fn missing_file_reports_file_not_found_with_path_verbatim() {
    let out = bridge().arg("does/not/exist.ogg").output().unwrap();

    assert!(out.status.success());
    assert_eq!(
        one_line(&out.stdout),
        r#"{"error":"FILE_NOT_FOUND","path":"does/not/exist.ogg"}"#
    );
}

#[test]
fn directory_is_not_a_regular_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = bridge().arg(dir.path()).output().unwrap();

    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_str(&one_line(&out.stdout)).unwrap();
    assert_eq!(parsed["error"], "FILE_NOT_FOUND");
}

#[test]
fn non_ascii_path_survives_unescaped() {
    let out = bridge().arg("нет/такого/файла 🎤.ogg").output().unwrap();

    assert!(out.status.success());
    let line = one_line(&out.stdout);
    assert!(line.contains("файла 🎤"));
    assert!(!line.contains("\\u"));
}

#[test]
fn unknown_model_name_fails_inside_the_guarded_block() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let out = bridge()
        .arg(file.path())
        .env("WHISPER_MODEL", "gigantic")
        .output()
        .unwrap();

    assert!(out.status.success(), "handled errors still exit 0");
    let parsed: serde_json::Value = serde_json::from_str(&one_line(&out.stdout)).unwrap();
    assert_eq!(parsed["error"], "TRANSCRIBE_FAILED");
    let details = parsed["details"].as_str().unwrap();
    assert!(details.contains("gigantic"));
}

#[test]
fn corrupt_wav_reports_transcribe_failed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.wav");
    std::fs::write(&path, b"").unwrap();

    let out = bridge()
        .arg(&path)
        .env_remove("WHISPER_MODEL")
        .output()
        .unwrap();

    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_str(&one_line(&out.stdout)).unwrap();
    assert_eq!(parsed["error"], "TRANSCRIBE_FAILED");
    assert!(!parsed["details"].as_str().unwrap().is_empty());
}
