//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Project layout constants
pub mod paths {
    /// Project data directory, relative to the project root
    pub const PROJECT_DIR: &str = ".docsync";

    /// Project config file, relative to the project data directory
    pub const CONFIG_FILE: &str = "config.toml";

    /// Default cache directory, relative to the project root
    pub const DEFAULT_CACHE_DIR: &str = ".docsync/cache";

    /// Default markdown output directory, relative to the project root
    pub const DEFAULT_OUTPUT_DIR: &str = "docs/components";

    /// Default components directory, relative to the project root
    pub const DEFAULT_COMPONENTS_ROOT: &str = "src";
}

/// Incremental cache constants
pub mod cache {
    /// Schema version of persisted cache entries.
    ///
    /// Bump whenever `CacheEntry` or `ComponentMetadata` changes shape;
    /// entries written under another version are treated as stale.
    pub const FORMAT_VERSION: u32 = 1;

    /// File extension of cache entries
    pub const ENTRY_EXTENSION: &str = "json";
}

/// Metadata extraction constants
pub mod analysis {
    /// Substring that marks an interface or type alias as a props declaration
    pub const PROPS_MARKER: &str = "Props";

    /// Source extensions handled by the extractor
    pub const COMPONENT_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js", "mts", "cts"];

    /// Extensions tried, in order, when resolving an extensionless import
    pub const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "d.ts", "js", "jsx", "mjs", "cjs"];

    /// Default maximum file size for analysis (1MB)
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

    /// Type rendered for a field declared without a type annotation
    pub const UNTYPED_FIELD: &str = "any";
}

/// Pre-commit hook constants
pub mod hook {
    /// Default wall-clock limit for the hook sync (milliseconds, 0 = none)
    pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

    /// Marker line identifying a hook script written by `docsync init --hook`
    pub const SCRIPT_MARKER: &str = "# installed by docsync";
}
