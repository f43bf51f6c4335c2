//! Hook Command
//!
//! Pre-commit entry point. Syncs the staged components through the fast
//! path and never fails: anything that goes wrong is logged and dropped.

use tracing::debug;

use crate::cli::util::{is_initialized, project_root};
use crate::config::{ConfigLoader, HookConfig};
use crate::git;
use crate::sync::FastPath;

pub async fn run() {
    let root = match project_root() {
        Ok(root) => root,
        Err(e) => {
            debug!("Hook skipped: {}", e);
            return;
        }
    };

    if !is_initialized(&root) {
        debug!("Hook skipped: {} is not initialized", root.display());
        return;
    }

    let staged = match git::staged_files(&root) {
        Ok(files) => files,
        Err(e) => {
            debug!("Hook skipped: {}", e);
            return;
        }
    };

    // A broken config still reaches the fast path, which reports it
    let timeout = ConfigLoader::load_for(&root)
        .map(|c| c.hook.timeout())
        .unwrap_or_else(|_| HookConfig::default().timeout());

    FastPath::new(root)
        .with_timeout(timeout)
        .run_silent(staged)
        .await;
}
