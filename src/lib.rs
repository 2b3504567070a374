//! # sitestamp
//!
//! Annotates static-site content collections with "last modified" timestamps
//! derived from version-control history.
//!
//! sitestamp loads named collections of content files (Markdown with
//! optional YAML front matter), resolves each document's last-modification
//! time through a pluggable determinator (git history with filesystem-mtime
//! fallback), and writes the formatted timestamp into the document's
//! metadata under `last_modified_at_timestamp` for template rendering.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌─────────────┐   ┌───────────────┐
//! │ Collection │──▶│  Annotation  │──▶│   Metadata     │
//! │  Loader    │   │    Pass      │   │ (front matter) │
//! └────────────┘   └──────┬──────┘   └───────────────┘
//!                         │
//!                         ▼
//!                  ┌─────────────┐
//!                  │ Determinator │
//!                  │  git / mtime │
//!                  └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! sst collections               # list configured collections
//! sst annotate                  # resolve and report timestamps
//! sst annotate --write          # persist them into front matter
//! sst resolve notes/a.md        # look up a single file
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Site, document, and metadata types |
//! | [`load`] | Collection scanning and front-matter parsing |
//! | [`determinator`] | Last-modification timestamp resolution |
//! | [`annotate`] | The annotation pass |
//! | [`collections`] | Collection health listing |
//! | [`error`] | Typed annotation errors |

pub mod annotate;
pub mod collections;
pub mod config;
pub mod determinator;
pub mod error;
pub mod load;
pub mod models;
