//! Init Command
//!
//! Initialize docsync in the current project.

use crate::cli::ui::Output;
use crate::cli::util::{is_initialized, project_root};
use crate::config::ConfigLoader;
use crate::git;
use crate::types::{DocsError, Result};

pub fn run(force: bool, install_hook: bool) -> Result<()> {
    let root = project_root()?;
    let out = Output::new();

    if is_initialized(&root) && !force && !install_hook {
        return Err(DocsError::Config(
            "Already initialized. Use --force to overwrite.".to_string(),
        ));
    }

    let dir = ConfigLoader::init_project(&root, force)?;
    out.success(&format!("Initialized docsync in {}", dir.display()));

    if install_hook {
        let hook = git::install_pre_commit_hook(&root, force)?;
        out.success(&format!("Installed pre-commit hook: {}", hook.display()));
    }

    println!();
    println!("Next steps:");
    println!("  1. Review .docsync/config.toml (components root, output directory)");
    println!("  2. Run 'docsync sync' to document every component");
    if !install_hook {
        println!("  3. Run 'docsync init --hook' to keep docs in sync on commit");
    }

    Ok(())
}
