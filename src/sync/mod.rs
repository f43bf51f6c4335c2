//! Sync Pipeline
//!
//! - Batch orchestration over component files
//! - Pre-commit fast path with an optional wall-clock limit

pub mod fast_path;
pub mod orchestrator;
pub mod timeout;

pub use fast_path::FastPath;
pub use orchestrator::{SyncFailure, SyncMode, SyncOrchestrator, SyncReport};
