use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use assert_cmd::{assert::Assert, Command};
use once_cell::sync::Lazy;
use regex::Regex;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").expect("uuid regex")
});

static SHORT_ID_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s([0-9a-f]{8})  Open\s").expect("case row regex"));

/// Creates an isolated `CASE_INTAKE_HOME` for one test.
pub fn isolated_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Runs the shell in script mode with `lines` on stdin.
pub fn run_script<S: AsRef<str>>(home: &Path, lines: &[S]) -> Assert {
    let mut input = String::new();
    for line in lines {
        input.push_str(line.as_ref());
        input.push('\n');
    }
    Command::cargo_bin("case_intake_cli")
        .expect("binary built")
        .env("CASE_INTAKE_CLI_SCRIPT", "1")
        .env("CASE_INTAKE_HOME", home)
        .write_stdin(input)
        .assert()
}

pub fn stdout_of(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

/// Replaces generated case ids so output can be compared.
pub fn scrub_ids(text: &str) -> String {
    UUID.replace_all(text, "<case-id>").into_owned()
}

/// Short ids of the cases listed by `cases`, newest first.
pub fn listed_short_ids(text: &str) -> Vec<String> {
    SHORT_ID_ROW
        .captures_iter(text)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Answers a Question request end to end.
pub fn question_script(description: &str, contact: &str) -> Vec<String> {
    vec![
        "config set redirect_delay_ms 0".into(),
        "new question".into(),
        format!("set briefDescription \"{}\"", description),
        "next".into(),
        "next".into(),
        format!("toggle contactMethod {}", contact),
        "next".into(),
        "submit".into(),
    ]
}
