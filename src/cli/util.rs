//! CLI Common Utilities
//!
//! Shared project discovery and context loading for CLI commands.

use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigLoader};
use crate::git;
use crate::types::{DocsError, Result};

/// Command execution context
///
/// Created via `CommandContext::load()` for commands that need an
/// initialized project and its configuration.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Project root directory (canonical)
    pub project_root: PathBuf,
    /// Loaded configuration
    pub config: Config,
}

impl CommandContext {
    /// Validates initialization and loads config
    pub fn load() -> Result<Self> {
        let project_root = project_root()?;
        require_initialized(&project_root)?;
        let config = ConfigLoader::load_for(&project_root)?;

        Ok(Self {
            project_root,
            config,
        })
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.config.cache.resolve(&self.project_root)
    }
}

/// Repository root of the working directory, or the working directory itself
/// outside a git repository
pub fn project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?.canonicalize()?;
    match git::repo_root(&cwd) {
        Ok(root) => Ok(root),
        Err(e) => {
            tracing::debug!("Using working directory as project root: {}", e);
            Ok(cwd)
        }
    }
}

/// Require docsync to be initialized
///
/// Returns `DocsError::NotInitialized` if `.docsync/` is missing.
pub fn require_initialized(project_root: &Path) -> Result<()> {
    if !is_initialized(project_root) {
        return Err(DocsError::NotInitialized);
    }
    Ok(())
}

/// Check if docsync is initialized
pub fn is_initialized(project_root: &Path) -> bool {
    ConfigLoader::is_project_initialized(project_root)
}
