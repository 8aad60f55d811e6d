use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn run_hoopchat(config_dir: &Path, input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_hoopchat"))
        .arg("--config-dir")
        .arg(config_dir)
        .env_remove("HOOPCHAT_API_URL")
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start hoopchat");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for hoopchat")
}

#[test]
fn test_help_lists_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_hoopchat"))
        .arg("--help")
        .output()
        .expect("Failed to run hoopchat");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--config-dir"));
    assert!(stdout.contains("--base-url"));
}

#[test]
fn test_theme_toggle_is_persisted() {
    let temp_dir = tempfile::tempdir().unwrap();

    let output = run_hoopchat(temp_dir.path(), "/theme\n/quit\n");
    let stdout = String::from_utf8_lossy(&output.stdout);
    println!("STDOUT:\n{}", stdout);
    println!("STDERR:\n{}", String::from_utf8_lossy(&output.stderr));

    assert!(output.status.success());
    assert!(stdout.contains("Theme set to dark."));

    let content = std::fs::read_to_string(temp_dir.path().join("preferences.json")).unwrap();
    let prefs: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(prefs["theme"], "dark");

    // Second run starts dark and flips back
    let output = run_hoopchat(temp_dir.path(), "/theme\n");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Theme set to light."));
}

#[test]
fn test_session_commands_without_backend() {
    let temp_dir = tempfile::tempdir().unwrap();

    let output = run_hoopchat(
        temp_dir.path(),
        "/new\n/rename 2 Playoffs\n/pin 2\n/list\n/delete 9\n/bogus\n",
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    println!("STDOUT:\n{}", stdout);

    assert!(output.status.success());
    assert!(stdout.contains("*^  1. Playoffs"));
    assert!(stdout.contains("No chat 9 (there are 2)."));
    assert!(stdout.contains("unknown command /bogus"));
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_hoopchat"))
        .arg("--config-dir")
        .arg(temp_dir.path())
        .args(["--base-url", "localhost:8000"])
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run hoopchat");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("base_url"));
}
