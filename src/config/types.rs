//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/docsync/) and project (.docsync/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{analysis, hook, paths};
use crate::types::{DocsError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Which files are components
    pub components: ComponentsConfig,

    /// Documentation output settings
    pub documentation: DocumentationConfig,

    /// Incremental cache settings
    pub cache: CacheConfig,

    /// Pre-commit hook settings
    pub hook: HookConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            components: ComponentsConfig::default(),
            documentation: DocumentationConfig::default(),
            cache: CacheConfig::default(),
            hook: HookConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DocsError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.components.extensions.is_empty() {
            return Err(DocsError::Config(
                "components.extensions must list at least one extension".to_string(),
            ));
        }

        if self.components.max_file_size == 0 {
            return Err(DocsError::Config(
                "components.max_file_size must be greater than 0".to_string(),
            ));
        }

        if let Some(bad) = self
            .components
            .exclude
            .iter()
            .find(|p| glob::Pattern::new(p).is_err())
        {
            return Err(DocsError::Config(format!(
                "components.exclude contains an invalid glob: {}",
                bad
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Components Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentsConfig {
    /// Directory scanned in full-sync mode (relative to project root)
    pub root: PathBuf,

    /// File extensions treated as components
    pub extensions: Vec<String>,

    /// Glob patterns to exclude, matched against project-relative paths
    pub exclude: Vec<String>,

    /// Maximum file size in bytes
    pub max_file_size: u64,
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(paths::DEFAULT_COMPONENTS_ROOT),
            extensions: vec!["tsx".to_string(), "jsx".to_string()],
            exclude: vec![
                "**/node_modules/**".to_string(),
                "**/*.test.*".to_string(),
                "**/*.spec.*".to_string(),
                "**/*.stories.*".to_string(),
                "**/*.d.ts".to_string(),
            ],
            max_file_size: analysis::DEFAULT_MAX_FILE_SIZE,
        }
    }
}

// =============================================================================
// Documentation Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationConfig {
    /// Output directory (relative to project root)
    pub output_dir: PathBuf,
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(paths::DEFAULT_OUTPUT_DIR),
        }
    }
}

// =============================================================================
// Cache Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory (relative to project root)
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(paths::DEFAULT_CACHE_DIR),
        }
    }
}

impl CacheConfig {
    pub fn resolve(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.dir)
    }
}

// =============================================================================
// Hook Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Wall-clock limit for the pre-commit sync in milliseconds (0 = no limit)
    pub timeout_ms: u64,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            timeout_ms: hook::DEFAULT_TIMEOUT_MS,
        }
    }
}

impl HookConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.components.root, PathBuf::from("src"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_extensions() {
        let mut config = Config::default();
        config.components.extensions.clear();
        assert!(matches!(config.validate(), Err(DocsError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let mut config = Config::default();
        config.components.exclude.push("[".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hook_timeout() {
        assert_eq!(
            HookConfig::default().timeout(),
            Some(Duration::from_millis(5_000))
        );
        assert_eq!(HookConfig { timeout_ms: 0 }.timeout(), None);
    }

    #[test]
    fn test_cache_dir_resolves_against_root() {
        let cache = CacheConfig::default();
        assert_eq!(
            cache.resolve(Path::new("/repo")),
            PathBuf::from("/repo/.docsync/cache")
        );
    }
}
