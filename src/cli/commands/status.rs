//! Status Command
//!
//! Display component count, cache usage and which components are stale.

use std::collections::BTreeMap;

use crate::analyzer::{ComponentScanner, MetadataExtractor};
use crate::cache::{CacheStore, Staleness};
use crate::cli::util::{CommandContext, is_initialized, project_root};
use crate::types::Result;

pub fn run(format: &str, detailed: bool) -> Result<()> {
    let json_output = format == "json";

    if !is_initialized(&project_root()?) {
        if json_output {
            println!("{{\"status\": \"not_initialized\"}}");
        } else {
            println!("docsync Status");
            println!("══════════════════════════════════════");
            println!("Not initialized. Run 'docsync init' first.");
        }
        // informational, not an error
        return Ok(());
    }

    let ctx = CommandContext::load()?;
    let scanner = ComponentScanner::from_config(&ctx.project_root, &ctx.config.components);
    let mut extractor = MetadataExtractor::for_project(&ctx.project_root)?;
    let store = CacheStore::new(ctx.cache_dir());

    let components = scanner.scan();
    let stale: Vec<(String, Staleness)> = components
        .iter()
        .filter_map(|file| {
            let staleness = store.staleness(file, &mut extractor);
            staleness.is_stale().then(|| {
                let rel = file.strip_prefix(&ctx.project_root).unwrap_or(file);
                (rel.display().to_string(), staleness)
            })
        })
        .collect();

    let mut by_reason: BTreeMap<&'static str, usize> = BTreeMap::new();
    for (_, staleness) in &stale {
        *by_reason.entry(staleness.label()).or_default() += 1;
    }

    let stats = store.stats();

    if json_output {
        let status = serde_json::json!({
            "status": "initialized",
            "components": components.len(),
            "cache": {
                "entries": stats.entry_count,
                "bytes": stats.total_bytes,
            },
            "stale": stale.len(),
            "stale_by_reason": by_reason,
            "stale_files": stale
                .iter()
                .map(|(path, s)| serde_json::json!({ "path": path, "reason": s.to_string() }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("docsync Status");
    println!("══════════════════════════════════════");
    println!("Components: {}", components.len());
    println!(
        "Cache:      {} entries ({} bytes)",
        stats.entry_count, stats.total_bytes
    );
    println!(
        "Up to date: {}",
        components.len().saturating_sub(stale.len())
    );
    println!();

    if stale.is_empty() {
        println!("All component docs are up to date.");
        return Ok(());
    }

    println!("Stale: {}", stale.len());
    for (reason, count) in &by_reason {
        println!("  {:<20} {}", reason, count);
    }

    if detailed {
        println!();
        for (path, staleness) in &stale {
            println!("  {} ({})", path, staleness);
        }
    }

    println!();
    println!("Run 'docsync sync' to update.");
    Ok(())
}
