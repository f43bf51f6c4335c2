//! Sync Command
//!
//! Document every component, an explicit file list, or the staged files.
//!
//! Usage:
//!   docsync sync                  # full scan of the components root
//!   docsync sync src/Button.tsx   # only these files
//!   docsync sync --staged         # files in the git index
//!   docsync sync --force --ai     # ignore the cache, extended pages

use std::path::PathBuf;

use tracing::info;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::git;
use crate::sync::{SyncMode, SyncOrchestrator};
use crate::types::Result;

pub struct SyncOptions {
    pub files: Vec<PathBuf>,
    pub staged: bool,
    pub force: bool,
    pub enrich: bool,
}

pub fn run(options: SyncOptions) -> Result<()> {
    let ctx = CommandContext::load()?;
    let out = Output::new();

    let (listed, mode) = if options.staged {
        (git::staged_files(&ctx.project_root)?, SyncMode::listed())
    } else if !options.files.is_empty() {
        let cwd = std::env::current_dir()?;
        let files = options.files.iter().map(|f| cwd.join(f)).collect();
        (files, SyncMode::listed())
    } else {
        (Vec::new(), SyncMode::full())
    };
    let mode = mode
        .with_force(options.force)
        .with_enrichment(options.enrich);

    if mode.restrict_to_list && listed.is_empty() {
        out.info("No files to sync");
        return Ok(());
    }

    info!(
        "Syncing {} in {}",
        if mode.restrict_to_list {
            format!("{} listed files", listed.len())
        } else {
            "all components".to_string()
        },
        ctx.project_root.display()
    );

    let mut orchestrator = SyncOrchestrator::from_config(&ctx.project_root, &ctx.config)?;
    let report = orchestrator.run(&listed, mode);

    out.report(&report);
    if report.processed > 0 {
        out.info(&format!(
            "Docs written to {}",
            ctx.project_root
                .join(&ctx.config.documentation.output_dir)
                .display()
        ));
    }

    Ok(())
}
