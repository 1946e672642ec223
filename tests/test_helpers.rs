#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// Address nothing listens on, so classifier loading fails fast.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

/// Creates a `Command` for the `quill` binary with a clean environment rooted at `data_dir`.
pub fn base_quill_command(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("quill").expect("quill binary not built");
    configure_quill_command(&mut cmd, data_dir);
    cmd
}

/// Applies the standard non-interactive environment to an existing `Command`.
pub fn configure_quill_command(cmd: &mut Command, data_dir: &Path) {
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("HOME", data_dir)
        .env("QUILL_DIR", data_dir)
        .env("QUILL_OLLAMA_URL", UNREACHABLE_URL)
        .env("QUILL_LOG_LEVEL", "warn");
}

/// Runs `quill new` and returns the id it prints.
pub fn create_entry(data_dir: &Path, args: &[&str]) -> String {
    let output = base_quill_command(data_dir)
        .arg("new")
        .args(args)
        .output()
        .expect("failed to run quill new");
    assert!(
        output.status.success(),
        "quill new failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
