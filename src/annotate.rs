//! The annotation pass: attach a last-modified timestamp to every document
//! in a collection.
//!
//! For each document the pass computes its path relative to the site source
//! root, asks the injected [`Determinator`] for a formatted timestamp, and
//! writes the result into the document's metadata under
//! [`LAST_MODIFIED_KEY`]. No filtering and no caching: every document is
//! processed unconditionally on every pass.

use std::path::Path;

use crate::determinator::Determinator;
use crate::error::{AnnotateError, Result};
use crate::models::{Document, MetaValue, Site};

/// Metadata key written by the annotation pass.
pub const LAST_MODIFIED_KEY: &str = "last_modified_at_timestamp";

/// Default timestamp format: full date, full time, colon-separated UTC
/// offset (e.g. `2023-05-01T10:00:00+00:00`).
pub const TIMESTAMP_FORMAT: &str = "%FT%T%:z";

/// Annotate every document in `docs` with a last-modified timestamp.
///
/// Documents are processed in stored order. Each one receives exactly one
/// metadata write at `key`, overwriting any prior value. The value is
/// whatever string the determinator returned, including an empty string.
///
/// The pass fails fast: a document whose path is not under `source_root`
/// ([`AnnotateError::PathResolution`]) or a determinator error
/// ([`AnnotateError::Determinator`], passed through unchanged) stops the
/// pass there, leaving that document and all later ones unwritten. The
/// caller decides whether to abort the build or continue.
///
/// Returns the number of documents annotated.
pub fn annotate_documents(
    source_root: &Path,
    docs: &mut [Document],
    determinator: &dyn Determinator,
    format: &str,
    key: &str,
) -> Result<usize> {
    let mut annotated = 0;

    for doc in docs.iter_mut() {
        let relative = doc
            .path
            .strip_prefix(source_root)
            .map_err(|_| AnnotateError::PathResolution {
                path: doc.path.clone(),
                root: source_root.to_path_buf(),
            })?;

        let timestamp = determinator.resolve(source_root, relative, format)?;
        doc.metadata
            .insert(key.to_string(), MetaValue::String(timestamp));
        annotated += 1;
    }

    Ok(annotated)
}

/// Annotate one named collection of `site` in place.
///
/// Convenience wrapper over [`annotate_documents`] for hosts that carry a
/// whole [`Site`]. Asking for a collection the site does not have is an
/// error rather than a no-op, so a misconfigured name cannot silently skip
/// the pass.
pub fn annotate_collection(
    site: &mut Site,
    name: &str,
    determinator: &dyn Determinator,
    format: &str,
    key: &str,
) -> Result<usize> {
    let source_root = site.source.clone();
    let docs = site
        .collections
        .get_mut(name)
        .ok_or_else(|| AnnotateError::UnknownCollection {
            name: name.to_string(),
        })?;
    annotate_documents(&source_root, docs, determinator, format, key)
}
