//! Shared integration-test helpers for running the `crossconf` binary and
//! locating fixtures.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Runs the binary with `args` to completion and captures its output.
///
/// Logging is silenced and environment overrides are cleared so that the
/// caller's shell cannot change the outcome.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_crossconf"))
        .args(args)
        .env_remove("CROSSCONF_CONFIG_DIR")
        .env_remove("CROSSCONF_LOG_LEVEL")
        .env_remove("CROSSCONF_LOG_FORMAT")
        .env_remove("CROSSCONF_MAX_CONFIG_SIZE")
        .env("CROSSCONF_COLOR", "never")
        .output()
        .expect("failed to run crossconf")
}

/// Runs `crossconf validate <dir>` with extra arguments.
#[allow(clippy::missing_panics_doc)]
pub fn validate(dir: &Path, extra: &[&str]) -> Output {
    let dir = dir.to_str().expect("non-UTF-8 fixture path");
    let mut args = vec!["--quiet", "validate", dir];
    args.extend_from_slice(extra);
    spawn_command(&args)
}

/// Captured stdout as a string.
#[must_use]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Captured stderr as a string.
#[must_use]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
