//! `kiln list`: print the compiled index.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::config::KilnConfig;
use crate::site::Site;
use crate::template::EngineKind;
use crate::utils::path::normalize_path;
use crate::utils::plural_count;

/// One row of the listing.
#[derive(Debug, Serialize)]
struct Entry<'a> {
    path: &'a str,
    content_type: &'a str,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    engine: Option<EngineKind>,
    /// Byte length of static payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<usize>,
    source: String,
}

pub fn list(config: &KilnConfig, json: bool, pretty: bool) -> Result<()> {
    let site = super::load_site(config)?;
    let entries = entries(&site, &config.root);

    if json {
        let formatted = if pretty {
            serde_json::to_string_pretty(&entries)?
        } else {
            serde_json::to_string(&entries)?
        };
        println!("{}", formatted);
        return Ok(());
    }

    print_table(&entries);
    Ok(())
}

/// Index entries sorted by public path, sources relative to `base`.
fn entries<'a>(site: &'a Site, base: &Path) -> Vec<Entry<'a>> {
    let base = normalize_path(base);
    let mut entries: Vec<_> = site
        .artifacts()
        .iter()
        .map(|(path, artifact)| Entry {
            path,
            content_type: artifact.content_type,
            kind: if artifact.is_template() { "template" } else { "static" },
            engine: artifact.engine,
            size: artifact.content().map(<[u8]>::len),
            source: artifact
                .source_path
                .strip_prefix(&base)
                .unwrap_or(&artifact.source_path)
                .display()
                .to_string(),
        })
        .collect();
    entries.sort_by(|a, b| a.path.cmp(b.path));
    entries
}

fn print_table(entries: &[Entry<'_>]) {
    let width = entries.iter().map(|e| e.path.len()).max().unwrap_or(0);
    for entry in entries {
        let detail = match (entry.engine, entry.size) {
            (Some(engine), _) => engine.to_string(),
            (None, Some(size)) => format!("{size} B"),
            (None, None) => String::new(),
        };
        let path = format!("{:<width$}", entry.path);
        if entry.engine.is_some() {
            println!(
                "{}  {:<24} {:<10} {}",
                path.cyan(),
                entry.content_type,
                detail,
                entry.source.dimmed()
            );
        } else {
            println!(
                "{}  {:<24} {:<10} {}",
                path,
                entry.content_type,
                detail,
                entry.source.dimmed()
            );
        }
    }
    eprintln!("{}", plural_count(entries.len(), "asset"));
}
