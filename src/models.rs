//! Core data models used throughout sitestamp.
//!
//! These types represent the site build context, the documents that flow
//! through the annotation pass, and the metadata values attached to them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A single metadata value attached to a document.
///
/// Front matter is dynamically typed, so this enum is the closed set of
/// value shapes the pipeline supports. Untagged so YAML front matter and
/// JSON reports round-trip without wrapper objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<MetaValue>),
    Map(BTreeMap<String, MetaValue>),
}

impl MetaValue {
    /// Borrow the inner string, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Return the inner boolean, if this value is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::String(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::String(s)
    }
}

/// Mutable metadata mapping carried by each document.
pub type Metadata = BTreeMap<String, MetaValue>;

/// One content file plus its mutable metadata used during rendering.
#[derive(Debug, Clone)]
pub struct Document {
    /// Absolute path to the source file.
    pub path: PathBuf,
    /// Content below the front matter (the whole file when there is none).
    pub body: String,
    /// Metadata consumed by downstream template rendering.
    pub metadata: Metadata,
}

impl Document {
    /// Create an empty document for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            body: String::new(),
            metadata: Metadata::new(),
        }
    }
}

/// Process-wide build context: a source root plus named document collections.
///
/// Owned by the host build; the annotation pass only mutates document
/// metadata and holds no state afterward. Document order within a collection
/// is the order the loader produced and is preserved.
#[derive(Debug, Clone, Default)]
pub struct Site {
    /// Base directory against which all document paths are made relative.
    pub source: PathBuf,
    /// Named, ordered groups of documents.
    pub collections: BTreeMap<String, Vec<Document>>,
}

impl Site {
    /// Create a site with no collections.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            collections: BTreeMap::new(),
        }
    }

    /// Borrow a collection's documents by name.
    pub fn collection(&self, name: &str) -> Option<&[Document]> {
        self.collections.get(name).map(|docs| docs.as_slice())
    }
}
