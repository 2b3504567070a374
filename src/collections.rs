//! The `sst collections` command: configured collections and their health.

use anyhow::Result;

use crate::config::Config;
use crate::load;

pub fn list_collections(config: &Config) -> Result<()> {
    if config.collections.is_empty() {
        println!("No collections configured.");
        return Ok(());
    }

    println!("{:<16} {:<24} {:<10} DOCS", "COLLECTION", "DIR", "STATUS");

    for (name, collection) in &config.collections {
        let dir_str = collection.dir.display().to_string();
        let dir = config.site.source.join(&collection.dir);

        if !dir.exists() {
            println!("{:<16} {:<24} {:<10} -", name, dir_str, "MISSING");
            continue;
        }

        match load::load_collection(&config.site.source, collection) {
            Ok(docs) => {
                println!("{:<16} {:<24} {:<10} {}", name, dir_str, "OK", docs.len())
            }
            Err(e) => println!("{:<16} {:<24} {:<10} {}", name, dir_str, "ERROR", e),
        }
    }

    Ok(())
}
