//! Last-modification timestamp resolution.
//!
//! A [`Determinator`] answers "when was this file last modified?" as a
//! formatted string. [`GitDeterminator`] consults version-control history
//! and falls back to the filesystem; [`MtimeDeterminator`] uses the
//! filesystem alone.

use anyhow::{anyhow, Context, Result};
use chrono::{Local, TimeZone};
use std::fmt::Write as _;
use std::path::Path;
use std::process::Command;

/// Resolves a formatted last-modification timestamp for a single file.
///
/// Injected into the annotation pass so it can be mocked in tests and
/// swapped for alternative history sources.
pub trait Determinator {
    /// Return the last-modification time of `relative_path` (relative to
    /// `source_root`), rendered with the strftime `format`.
    fn resolve(&self, source_root: &Path, relative_path: &Path, format: &str) -> Result<String>;
}

/// Determinator backed by version-control history.
///
/// Asks `git log` for the file's most recent commit time, run from the
/// source root. Untracked files, files with no history, and source roots
/// that are not repositories fall back to the filesystem mtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitDeterminator;

impl Determinator for GitDeterminator {
    fn resolve(&self, source_root: &Path, relative_path: &Path, format: &str) -> Result<String> {
        let epoch = match git_last_commit_time(source_root, relative_path) {
            Some(ts) => ts,
            None => file_mtime(&source_root.join(relative_path))?,
        };
        format_epoch(epoch, format)
    }
}

/// Determinator backed by the filesystem mtime alone.
///
/// Useful where git is unavailable and as a deterministic test double for
/// the fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct MtimeDeterminator;

impl Determinator for MtimeDeterminator {
    fn resolve(&self, source_root: &Path, relative_path: &Path, format: &str) -> Result<String> {
        let epoch = file_mtime(&source_root.join(relative_path))?;
        format_epoch(epoch, format)
    }
}

/// Get the last commit timestamp for a file, or `None` when git is missing,
/// the root is not a repository, or the file has no recorded history.
fn git_last_commit_time(source_root: &Path, relative_path: &Path) -> Option<i64> {
    let output = Command::new("git")
        .args(["log", "-1", "--format=%ct", "--"])
        .arg(relative_path)
        .current_dir(source_root)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let ts_str = String::from_utf8_lossy(&output.stdout);
    ts_str.trim().parse::<i64>().ok()
}

fn file_mtime(path: &Path) -> Result<i64> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?;
    let modified = metadata
        .modified()
        .with_context(|| format!("Failed to read mtime of {}", path.display()))?;
    let secs = modified
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    Ok(secs)
}

/// Render an epoch in the local timezone with a strftime format string.
fn format_epoch(epoch: i64, format: &str) -> Result<String> {
    let dt = Local
        .timestamp_opt(epoch, 0)
        .single()
        .with_context(|| format!("timestamp out of range: {}", epoch))?;

    // chrono surfaces bad format strings as fmt errors at render time.
    let mut out = String::new();
    write!(out, "{}", dt.format(format))
        .map_err(|_| anyhow!("invalid strftime format: '{}'", format))?;
    Ok(out)
}
