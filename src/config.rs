//! TOML configuration parsing and validation.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::annotate::{LAST_MODIFIED_KEY, TIMESTAMP_FORMAT};
use crate::determinator::{Determinator, GitDeterminator, MtimeDeterminator};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionConfig>,
    #[serde(default)]
    pub timestamp: TimestampConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Source root. All document paths are made relative to this directory,
    /// and the git determinator runs inside it.
    pub source: PathBuf,
}

/// One named collection of content files under the source root.
#[derive(Debug, Deserialize, Clone)]
pub struct CollectionConfig {
    /// Collection directory, relative to the source root.
    pub dir: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Keep only documents with `publish: true` front matter that are not
    /// marked `status: draft`.
    #[serde(default)]
    pub published_only: bool,
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.md".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct TimestampConfig {
    /// strftime format for the rendered timestamp.
    #[serde(default = "default_format")]
    pub format: String,
    /// Metadata key the annotation pass writes.
    #[serde(default = "default_key")]
    pub key: String,
    /// Timestamp source: `git` (history with mtime fallback) or `mtime`.
    #[serde(default = "default_source")]
    pub source: String,
}

impl Default for TimestampConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            key: default_key(),
            source: default_source(),
        }
    }
}

fn default_format() -> String {
    TIMESTAMP_FORMAT.to_string()
}
fn default_key() -> String {
    LAST_MODIFIED_KEY.to_string()
}
fn default_source() -> String {
    "git".to_string()
}

impl TimestampConfig {
    /// Build the configured determinator.
    pub fn determinator(&self) -> Box<dyn Determinator> {
        match self.source.as_str() {
            "mtime" => Box::new(MtimeDeterminator),
            _ => Box::new(GitDeterminator),
        }
    }
}

impl Config {
    /// Fallback used by commands that can run without a config file: the
    /// current directory as source root, no collections, default timestamps.
    pub fn minimal() -> Self {
        Self {
            site: SiteConfig {
                source: PathBuf::from("."),
            },
            collections: BTreeMap::new(),
            timestamp: TimestampConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate timestamp settings
    if config.timestamp.key.is_empty() {
        bail!("timestamp.key must not be empty");
    }

    match config.timestamp.source.as_str() {
        "git" | "mtime" => {}
        other => bail!(
            "Unknown timestamp source: '{}'. Must be git or mtime.",
            other
        ),
    }

    validate_strftime(&config.timestamp.format)?;

    // Validate collections
    for (name, collection) in &config.collections {
        if collection.dir.as_os_str().is_empty() {
            bail!("collections.{}.dir must not be empty", name);
        }
        if collection.include_globs.is_empty() {
            bail!("collections.{}.include_globs must not be empty", name);
        }
    }

    Ok(config)
}

fn validate_strftime(format: &str) -> Result<()> {
    use chrono::format::{Item, StrftimeItems};

    if format.is_empty() {
        bail!("timestamp.format must not be empty");
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        bail!("timestamp.format is not a valid strftime string: '{}'", format);
    }
    Ok(())
}
