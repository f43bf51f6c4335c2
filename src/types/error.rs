//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Propagation Policy
//!
//! - **Io**: absorbed by the cache store as "treat as stale"
//! - **Analysis**: absorbed by the sync orchestrator per file (batch continues)
//! - **Storage**: cache write failures, logged and swallowed by the cache store
//! - Everything else surfaces to the CLI, except in the pre-commit hook

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Analysis Error
// =============================================================================

/// Failure to extract metadata from a single source file.
///
/// Kept separate from [`DocsError`] so the orchestrator can count and skip it
/// without inspecting error variants.
#[derive(Debug, Clone, Error)]
#[error("Analysis failed for {}: {cause}", path.display())]
pub struct AnalysisError {
    pub path: PathBuf,
    pub cause: String,
}

impl AnalysisError {
    pub fn new(path: impl AsRef<Path>, cause: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cause: cause.into(),
        }
    }
}

// =============================================================================
// Main Error Type
// =============================================================================

#[derive(Debug, Error)]
pub enum DocsError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    #[error("Rendering failed for {item}: {reason}")]
    Render { item: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not initialized: run 'docsync init' first")]
    NotInitialized,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Git error: {0}")]
    Git(String),

    /// Operation timeout with context
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },
}

/// Result type alias using DocsError
pub type Result<T> = std::result::Result<T, DocsError>;

impl DocsError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a render error
    pub fn render(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Render {
            item: item.into(),
            reason: reason.into(),
        }
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context using a closure (lazy evaluation)
    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| DocsError::Storage(format!("{}: {}", f().into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
