//! Collection loading: walk a collection directory, parse front matter, and
//! build the documents the annotation pass operates on.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use walkdir::WalkDir;

use crate::config::{CollectionConfig, Config};
use crate::models::{Document, MetaValue, Metadata, Site};

/// Load every configured collection into a [`Site`].
pub fn load_site(config: &Config) -> Result<Site> {
    let mut site = Site::new(config.site.source.clone());
    for (name, collection) in &config.collections {
        let docs = load_collection(&config.site.source, collection)
            .with_context(|| format!("Failed to load collection '{}'", name))?;
        site.collections.insert(name.clone(), docs);
    }
    Ok(site)
}

/// Scan one collection directory and produce documents.
///
/// Files are matched against the include/exclude globs, parsed for front
/// matter, optionally filtered to published documents, and returned sorted
/// by path for deterministic ordering.
pub fn load_collection(source_root: &Path, config: &CollectionConfig) -> Result<Vec<Document>> {
    let dir = source_root.join(&config.dir);
    if !dir.exists() {
        bail!("Collection directory does not exist: {}", dir.display());
    }

    let include_set = build_globset(&config.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/_site/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut docs = Vec::new();

    let walker = WalkDir::new(&dir).follow_links(config.follow_symlinks);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(&dir).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) {
            continue;
        }
        if !include_set.is_match(&rel_str) {
            continue;
        }

        let doc = load_document(path)?;
        if config.published_only && !is_published(&doc.metadata) {
            continue;
        }
        docs.push(doc);
    }

    // Sort for deterministic ordering
    docs.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(docs)
}

/// Read a single file and split it into front matter metadata and body.
pub fn load_document(path: &Path) -> Result<Document> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let (metadata, body) = split_front_matter(&raw)
        .with_context(|| format!("Invalid front matter in {}", path.display()))?;

    Ok(Document {
        path: path.to_path_buf(),
        body,
        metadata,
    })
}

/// Split raw file contents into (front matter metadata, body).
///
/// Front matter is an optional leading YAML block fenced by `---` lines. A
/// file without a leading fence has empty metadata and the whole contents as
/// body. An opening fence without a closing one is an error.
pub fn split_front_matter(raw: &str) -> Result<(Metadata, String)> {
    let mut lines = raw.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((Metadata::new(), String::new()));
    };
    if first.trim_end() != "---" {
        return Ok((Metadata::new(), raw.to_string()));
    }

    let mut offset = first.len();
    let mut fence: Option<(usize, usize)> = None;
    for line in lines {
        if line.trim_end() == "---" {
            fence = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let Some((yaml_end, body_start)) = fence else {
        bail!("unterminated front matter fence");
    };

    let yaml = &raw[first.len()..yaml_end];
    let metadata: Metadata = if yaml.trim().is_empty() {
        Metadata::new()
    } else {
        serde_yaml::from_str(yaml)?
    };

    Ok((metadata, raw[body_start..].to_string()))
}

/// Publish gate used by Obsidian-style vaults: `publish: true` front matter
/// and not `status: draft`.
pub fn is_published(metadata: &Metadata) -> bool {
    let publish = matches!(metadata.get("publish"), Some(MetaValue::Bool(true)));
    let draft = matches!(metadata.get("status"), Some(MetaValue::String(s)) if s == "draft");
    publish && !draft
}

/// Persist a document's metadata back into its file as YAML front matter.
pub fn write_front_matter(doc: &Document) -> Result<()> {
    let contents = if doc.metadata.is_empty() {
        doc.body.clone()
    } else {
        let yaml = serde_yaml::to_string(&doc.metadata)?;
        format!("---\n{}---\n{}", yaml, doc.body)
    };

    std::fs::write(&doc.path, contents)
        .with_context(|| format!("Failed to write {}", doc.path.display()))?;
    Ok(())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
