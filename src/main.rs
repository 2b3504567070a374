//! # sitestamp CLI (`sst`)
//!
//! The `sst` binary drives the annotation pass from the command line. It
//! loads the configured collections from disk, resolves last-modified
//! timestamps, and reports (or persists) the results.
//!
//! ## Usage
//!
//! ```bash
//! sst --config ./sitestamp.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sst annotate` | Annotate every configured collection and print a report |
//! | `sst annotate --write` | Also persist timestamps into each file's front matter |
//! | `sst collections` | List configured collections and their health |
//! | `sst resolve <path>` | Resolve the timestamp for a single file |
//!
//! ## Examples
//!
//! ```bash
//! # Report timestamps for all collections
//! sst annotate --config ./sitestamp.toml
//!
//! # Annotate one collection and emit JSON
//! sst annotate --collection notes --json
//!
//! # Write timestamps back into front matter before a site build
//! sst annotate --write
//!
//! # Check one file
//! sst resolve notes/a.md --format "%Y-%m-%d"
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use sitestamp::annotate::annotate_collection;
use sitestamp::collections::list_collections;
use sitestamp::config::{self, Config};
use sitestamp::error::AnnotateError;
use sitestamp::load;

/// sitestamp CLI — last-modified annotation for static-site collections.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `sitestamp.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "sst",
    about = "sitestamp — annotate static-site collections with last-modified timestamps",
    version,
    long_about = "sitestamp loads named collections of content files, resolves each document's \
    last-modification time from version-control history (with filesystem-mtime fallback), and \
    attaches the formatted timestamp to the document's metadata for template rendering."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./sitestamp.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Annotate collections with last-modified timestamps.
    ///
    /// Loads every configured collection (or one named with --collection),
    /// resolves each document's last-modification time through the
    /// configured determinator, and writes it into the document metadata
    /// under the configured key. Prints a per-document report.
    Annotate {
        /// Only annotate this collection.
        #[arg(long)]
        collection: Option<String>,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Persist the annotated metadata back into each file's front matter.
        #[arg(long)]
        write: bool,
    },

    /// List configured collections and their health.
    ///
    /// Shows each collection's directory, whether it exists, and how many
    /// documents currently match its globs. Useful for verifying
    /// configuration before an annotation run.
    Collections,

    /// Resolve the last-modified timestamp for a single file.
    ///
    /// Prints the formatted timestamp and nothing else, so the output can be
    /// fed to other tools.
    Resolve {
        /// File path, relative to the site source root (or absolute and
        /// under it).
        path: PathBuf,

        /// Override the strftime format from the config.
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Annotate {
            collection,
            json,
            write,
        } => run_annotate(&cli.config, collection.as_deref(), json, write),
        Commands::Collections => {
            let config = config::load_config(&cli.config)?;
            list_collections(&config)
        }
        Commands::Resolve { path, format } => {
            run_resolve(&cli.config, &path, format.as_deref())
        }
    }
}

fn run_annotate(
    config_path: &Path,
    only: Option<&str>,
    json: bool,
    write: bool,
) -> Result<()> {
    let config = config::load_config(config_path)?;
    let mut site = load::load_site(&config)?;
    let determinator = config.timestamp.determinator();

    let names: Vec<String> = match only {
        Some(name) => vec![name.to_string()],
        None => site.collections.keys().cloned().collect(),
    };

    let mut total = 0;
    for name in &names {
        total += annotate_collection(
            &mut site,
            name,
            determinator.as_ref(),
            &config.timestamp.format,
            &config.timestamp.key,
        )?;
    }

    if write {
        for name in &names {
            for doc in site.collection(name).unwrap_or(&[]) {
                load::write_front_matter(doc)?;
            }
        }
    }

    if json {
        let mut documents = Vec::new();
        for name in &names {
            for doc in site.collection(name).unwrap_or(&[]) {
                let relative = doc.path.strip_prefix(&site.source).unwrap_or(&doc.path);
                documents.push(serde_json::json!({
                    "collection": name,
                    "path": relative.to_string_lossy(),
                    "metadata": doc.metadata,
                }));
            }
        }
        let report = serde_json::json!({
            "annotated": total,
            "key": config.timestamp.key,
            "documents": documents,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for name in &names {
            for doc in site.collection(name).unwrap_or(&[]) {
                let relative = doc.path.strip_prefix(&site.source).unwrap_or(&doc.path);
                let timestamp = doc
                    .metadata
                    .get(&config.timestamp.key)
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                println!("{:<12} {:<40} {}", name, relative.display().to_string(), timestamp);
            }
        }
        println!("annotated documents: {}", total);
    }

    Ok(())
}

fn run_resolve(config_path: &Path, path: &Path, format: Option<&str>) -> Result<()> {
    // Fall back to a minimal config so `sst resolve` works outside a
    // configured site, with the current directory as source root.
    let config = config::load_config(config_path).unwrap_or_else(|_| Config::minimal());
    let determinator = config.timestamp.determinator();
    let format = format.unwrap_or(&config.timestamp.format);

    let source_root = &config.site.source;
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        source_root.join(path)
    };
    let relative = absolute
        .strip_prefix(source_root)
        .map_err(|_| AnnotateError::PathResolution {
            path: absolute.clone(),
            root: source_root.clone(),
        })?;

    let timestamp = determinator.resolve(source_root, relative, format)?;
    println!("{}", timestamp);
    Ok(())
}
