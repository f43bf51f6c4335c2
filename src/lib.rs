//! docsync - Incremental Component Documentation
//!
//! Keeps markdown documentation for TypeScript/React components in step with
//! their source. Each component file is parsed with tree-sitter, its props and
//! local imports are extracted, and the result is cached on disk so later runs
//! only re-analyze what changed.
//!
//! ## Core Features
//!
//! - **Metadata Extraction**: component name, props fields, doc comments, defaults
//! - **Incremental Cache**: content fingerprints plus one-level dependency mtimes
//! - **Batch Sync**: per-file failure isolation with an aggregate report
//! - **Pre-commit Fast Path**: staged files only, never blocks a commit
//!
//! ## Quick Start
//!
//! ```ignore
//! use docsync::{Config, SyncMode, SyncOrchestrator};
//!
//! let mut sync = SyncOrchestrator::from_config(&project_root, &Config::default())?;
//! let report = sync.run(&[], SyncMode::full());
//! println!("{} processed, {} skipped", report.processed, report.skipped);
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: Parsing, fingerprinting, import resolution, scanning
//! - [`cache`]: Persistent per-file metadata cache and staleness checks
//! - [`sync`]: Batch orchestration and the pre-commit fast path
//! - [`render`]: Markdown documentation output
//! - [`config`]: Layered configuration

pub mod analyzer;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod git;
pub mod render;
pub mod sync;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{AnalysisError, DocsError, Result, ResultExt};

// Domain Types
pub use types::{ComponentMetadata, FieldMetadata, Fingerprint};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use analyzer::{DependencySource, MetadataExtractor, fingerprint_file};
pub use cache::{CacheEntry, CacheStore, Staleness};
pub use render::{DocumentRenderer, MarkdownRenderer};
pub use sync::{FastPath, SyncMode, SyncOrchestrator, SyncReport};
