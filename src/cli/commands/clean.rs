//! Clean Command
//!
//! Clears the incremental cache so the next sync re-analyzes everything.

use crate::cache::CacheStore;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::Result;

pub fn run() -> Result<()> {
    let ctx = CommandContext::load()?;
    let out = Output::new();
    let store = CacheStore::new(ctx.cache_dir());

    let stats = store.stats();
    if stats.entry_count == 0 {
        out.info("No cache entries to clear");
        return Ok(());
    }

    println!(
        "  Clearing {} cache entries ({} bytes)...",
        stats.entry_count, stats.total_bytes
    );

    let cleared = store.clear();
    out.success(&format!("Cleared {} cache entries", cleared));
    if cleared < stats.entry_count {
        out.warning(&format!(
            "{} entries could not be removed",
            stats.entry_count - cleared
        ));
    }

    Ok(())
}
