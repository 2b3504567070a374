//! Typed errors for the annotation pass.
//!
//! The annotator distinguishes path-resolution failures (configuration
//! mistakes the host must see) from determinator failures, which are opaque
//! and pass through unchanged. Everything outside the annotator uses
//! `anyhow` directly.

use std::path::PathBuf;

/// Errors produced by the annotation pass.
#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    /// A document's absolute path is not a descendant of the site source
    /// root, so no relative path can be computed.
    #[error("document path {path:?} is not under source root {root:?}")]
    PathResolution { path: PathBuf, root: PathBuf },

    /// The named collection does not exist on the site.
    #[error("unknown collection: '{name}'")]
    UnknownCollection { name: String },

    /// Opaque failure from the injected determinator. Never inspected,
    /// retried, or replaced with a default.
    #[error(transparent)]
    Determinator(#[from] anyhow::Error),
}

/// Convenience alias for annotation results.
pub type Result<T> = std::result::Result<T, AnnotateError>;
