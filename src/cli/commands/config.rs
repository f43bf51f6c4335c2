//! Config Command
//!
//! Inspect docsync configuration.
//!
//! Usage:
//!   docsync config show [-f json]
//!   docsync config path

use crate::cli::util::project_root;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show merged effective configuration
pub fn show(format: &str) -> Result<()> {
    let root = project_root()?;
    ConfigLoader::show_config(&root, format == "json")
}

/// Show configuration paths
pub fn path() -> Result<()> {
    let root = project_root()?;
    ConfigLoader::show_path(&root);
    Ok(())
}
