use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use chrono::DateTime;

fn sst_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("sst");
    path
}

/// Create a temp site with a `notes` collection of three markdown files and
/// a config using the mtime determinator (deterministic without git).
fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let notes_dir = root.join("source/notes");
    fs::create_dir_all(notes_dir.join("nested")).unwrap();
    fs::write(
        notes_dir.join("alpha.md"),
        "---\ntitle: Alpha\npublish: true\n---\n# Alpha\n\nFirst note.\n",
    )
    .unwrap();
    fs::write(notes_dir.join("beta.md"), "# Beta\n\nNo front matter here.\n").unwrap();
    fs::write(
        notes_dir.join("nested/gamma.md"),
        "---\ntitle: Gamma\n---\nNested note.\n",
    )
    .unwrap();

    let config_content = format!(
        r#"[site]
source = "{}/source"

[collections.notes]
dir = "notes"
include_globs = ["**/*.md"]

[timestamp]
source = "mtime"
"#,
        root.display()
    );

    let config_path = root.join("sitestamp.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_sst(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = sst_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run sst binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_DATE", "2023-05-01T10:00:00+00:00")
        .env("GIT_COMMITTER_DATE", "2023-05-01T10:00:00+00:00")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_annotate_reports_all_documents() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_sst(&config_path, &["annotate"]);
    assert!(
        success,
        "annotate failed: stdout={}, stderr={}",
        stdout, stderr
    );
    assert!(stdout.contains("annotated documents: 3"));
    assert!(stdout.contains("alpha.md"));
    assert!(stdout.contains("beta.md"));
    assert!(stdout.contains("nested/gamma.md"));
}

#[test]
fn test_annotate_json_report() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_sst(&config_path, &["annotate", "--json"]);
    assert!(success, "annotate --json failed: {}", stderr);

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["annotated"], 3);
    assert_eq!(report["key"], "last_modified_at_timestamp");

    let documents = report["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 3);
    for doc in documents {
        assert_eq!(doc["collection"], "notes");
        let ts = doc["metadata"]["last_modified_at_timestamp"]
            .as_str()
            .unwrap();
        // Every timestamp must parse back with the default format.
        DateTime::parse_from_str(ts, "%FT%T%:z")
            .unwrap_or_else(|e| panic!("unparseable timestamp '{}': {}", ts, e));
    }
}

#[test]
fn test_annotate_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (first, _, _) = run_sst(&config_path, &["annotate", "--json"]);
    let (second, _, _) = run_sst(&config_path, &["annotate", "--json"]);

    let a: serde_json::Value = serde_json::from_str(&first).unwrap();
    let b: serde_json::Value = serde_json::from_str(&second).unwrap();
    assert_eq!(a["documents"], b["documents"]);
}

#[test]
fn test_annotate_single_collection_flag() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_sst(&config_path, &["annotate", "--collection", "notes"]);
    assert!(success);
    assert!(stdout.contains("annotated documents: 3"));

    // Unknown collection name is an error, not a no-op.
    let (_, stderr, success) = run_sst(&config_path, &["annotate", "--collection", "posts"]);
    assert!(!success);
    assert!(stderr.contains("unknown collection"));
}

#[test]
fn test_annotate_write_persists_front_matter() {
    let (tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_sst(&config_path, &["annotate", "--write"]);
    assert!(success, "annotate --write failed: {}", stderr);

    let alpha = fs::read_to_string(tmp.path().join("source/notes/alpha.md")).unwrap();
    assert!(alpha.starts_with("---\n"));
    assert!(alpha.contains("last_modified_at_timestamp:"));
    assert!(alpha.contains("title: Alpha"));
    assert!(alpha.contains("# Alpha"));

    // A document without front matter gains a fence.
    let beta = fs::read_to_string(tmp.path().join("source/notes/beta.md")).unwrap();
    assert!(beta.starts_with("---\n"));
    assert!(beta.contains("last_modified_at_timestamp:"));
    assert!(beta.contains("No front matter here."));
}

#[test]
fn test_collections_lists_health() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_sst(&config_path, &["collections"]);
    assert!(success);
    assert!(stdout.contains("notes"));
    assert!(stdout.contains("OK"));
    assert!(stdout.contains('3'));
}

#[test]
fn test_collections_reports_missing_dir() {
    let (tmp, config_path) = setup_test_env();
    fs::remove_dir_all(tmp.path().join("source/notes")).unwrap();

    let (stdout, _, success) = run_sst(&config_path, &["collections"]);
    assert!(success);
    assert!(stdout.contains("MISSING"));
}

#[test]
fn test_resolve_prints_parseable_timestamp() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_sst(&config_path, &["resolve", "notes/alpha.md"]);
    assert!(success, "resolve failed: {}", stderr);
    let ts = stdout.trim();
    assert!(DateTime::parse_from_str(ts, "%FT%T%:z").is_ok(), "got '{}'", ts);
}

#[test]
fn test_resolve_custom_format() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_sst(
        &config_path,
        &["resolve", "notes/alpha.md", "--format", "%Y-%m-%d"],
    );
    assert!(success);
    let ts = stdout.trim();
    assert_eq!(ts.len(), 10);
    assert_eq!(ts.matches('-').count(), 2);
}

#[test]
fn test_resolve_missing_file_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success) = run_sst(&config_path, &["resolve", "notes/nope.md"]);
    assert!(!success);
}

#[test]
fn test_published_only_collection() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let notes_dir = root.join("source/notes");
    fs::create_dir_all(&notes_dir).unwrap();
    fs::write(
        notes_dir.join("live.md"),
        "---\npublish: true\n---\nLive.\n",
    )
    .unwrap();
    fs::write(
        notes_dir.join("draft.md"),
        "---\npublish: true\nstatus: draft\n---\nDraft.\n",
    )
    .unwrap();
    fs::write(notes_dir.join("private.md"), "Private.\n").unwrap();

    let config_path = root.join("sitestamp.toml");
    fs::write(
        &config_path,
        format!(
            r#"[site]
source = "{}/source"

[collections.notes]
dir = "notes"
published_only = true

[timestamp]
source = "mtime"
"#,
            root.display()
        ),
    )
    .unwrap();

    let (stdout, _, success) = run_sst(&config_path, &["annotate"]);
    assert!(success);
    assert!(stdout.contains("annotated documents: 1"));
    assert!(stdout.contains("live.md"));
    assert!(!stdout.contains("draft.md"));
}

#[test]
fn test_git_determinator_uses_commit_time() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    let notes_dir = source.join("notes");
    fs::create_dir_all(&notes_dir).unwrap();
    fs::write(
        notes_dir.join("tracked.md"),
        "---\ntitle: Tracked\n---\nTracked note.\n",
    )
    .unwrap();

    git(&source, &["init", "--quiet"]);
    git(&source, &["add", "."]);
    git(
        &source,
        &[
            "-c",
            "user.email=test@example.com",
            "-c",
            "user.name=Test",
            "commit",
            "--quiet",
            "-m",
            "add tracked note",
        ],
    );

    // An untracked file exercises the mtime fallback.
    fs::write(notes_dir.join("untracked.md"), "Untracked note.\n").unwrap();

    let config_path = tmp.path().join("sitestamp.toml");
    fs::write(
        &config_path,
        format!(
            r#"[site]
source = "{}"

[collections.notes]
dir = "notes"

[timestamp]
source = "git"
"#,
            source.display()
        ),
    )
    .unwrap();

    let (stdout, stderr, success) = run_sst(&config_path, &["annotate", "--json"]);
    assert!(success, "annotate failed: {}", stderr);

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let documents = report["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 2);

    let committed_epoch = DateTime::parse_from_rfc3339("2023-05-01T10:00:00+00:00")
        .unwrap()
        .timestamp();

    for doc in documents {
        let path = doc["path"].as_str().unwrap();
        let ts = doc["metadata"]["last_modified_at_timestamp"]
            .as_str()
            .unwrap();
        let parsed = DateTime::parse_from_str(ts, "%FT%T%:z").unwrap();

        if path.ends_with("/tracked.md") {
            assert_eq!(parsed.timestamp(), committed_epoch, "path={}", path);
        } else {
            // Fallback: filesystem mtime of the untracked file.
            let meta = fs::metadata(notes_dir.join("untracked.md")).unwrap();
            let mtime = meta
                .modified()
                .unwrap()
                .duration_since(std::time::SystemTime::UNIX_EPOCH)
                .unwrap()
                .as_secs() as i64;
            assert_eq!(parsed.timestamp(), mtime, "path={}", path);
        }
    }
}

#[test]
fn test_invalid_config_rejected() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("sitestamp.toml");
    fs::write(
        &config_path,
        r#"[site]
source = "/site"

[timestamp]
source = "svn"
"#,
    )
    .unwrap();

    let (_, stderr, success) = run_sst(&config_path, &["collections"]);
    assert!(!success);
    assert!(stderr.contains("Unknown timestamp source"));
}
