use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

// Run hsearch with xdg directories pointed into `home` so the user's own
// config and log files are never touched.
fn run_hsearch(home: &Path, args: &[&str]) -> std::process::Output {
    let hsearch_path = env!("CARGO_BIN_EXE_hsearch");
    Command::new(hsearch_path)
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_STATE_HOME", home.join("state"))
        .output()
        .expect("failed to execute hsearch")
}

fn history_file(lines: &[&str]) -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("history");
    std::fs::write(&path, lines.join("\n")).expect("failed to write history");
    let path = path.to_string_lossy().into_owned();
    (dir, path)
}

#[test]
fn query_prints_matches_best_first() {
    let (dir, path) = history_file(&["cd project", "git status", "npm install", "git commit -m fix"]);
    let output = run_hsearch(
        dir.path(),
        &["--history-file", &path, "--shell", "plain", "query", "git"],
    );
    assert!(output.status.success(), "hsearch failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["git commit -m fix", "git status"]);
}

#[test]
fn query_shows_tiers_and_respects_limit() {
    let (dir, path) = history_file(&["log messages", "sudo git status", "git status", "echo g s"]);
    let output = run_hsearch(
        dir.path(),
        &["--history-file", &path, "query", "g s", "--show-tier", "--plain"],
    );
    assert!(output.status.success(), "hsearch failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "exact\techo g s",
            "word-prefix-line\tgit status",
            "word-prefix\tsudo git status",
            "substring\tlog messages",
        ]
    );

    let output = run_hsearch(
        dir.path(),
        &["--history-file", &path, "query", "g s", "--limit", "1"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["echo g s"]);
}

#[test]
fn query_without_matches_exits_nonzero() {
    let (dir, path) = history_file(&["ls"]);
    let output = run_hsearch(dir.path(), &["--history-file", &path, "query", "zzz"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn config_file_selects_format() {
    let (dir, path) = history_file(&[
        "- cmd: make build",
        "  when: 1625097600",
        "- cmd: make test",
        "  when: 1625097601",
    ]);
    let config_dir = dir.path().join("config").join("hsearch");
    std::fs::create_dir_all(&config_dir).expect("failed to create config dir");
    std::fs::write(
        config_dir.join("config.json"),
        format!(r#"{{"shell": "fish", "history_file": {path:?}}}"#),
    )
    .expect("failed to write config");

    let output = run_hsearch(dir.path(), &["query", "make"]);
    assert!(output.status.success(), "hsearch failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["make test", "make build"]);
}

#[test]
fn missing_history_file_is_reported() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let missing = dir.path().join("missing");
    let output = run_hsearch(
        dir.path(),
        &["--history-file", &missing.to_string_lossy(), "query", "x"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("hsearch: Failed to open history file"), "{stderr}");
}
