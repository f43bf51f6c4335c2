//! Fast-Path Invoker
//!
//! Entry point for the pre-commit hook. Runs a listed, non-forced,
//! non-enriched sync on a blocking worker and swallows every failure:
//! configuration errors, panics and the wall-clock limit included.
//! A commit is never blocked by documentation.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use super::orchestrator::{SyncMode, SyncOrchestrator, SyncReport};
use super::timeout::with_optional_timeout;
use crate::config::ConfigLoader;
use crate::types::{DocsError, Result};

pub struct FastPath {
    project_root: PathBuf,
    timeout: Option<Duration>,
}

impl FastPath {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            timeout: None,
        }
    }

    /// `None` waits for the worker however long it takes
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sync the staged files. Never fails.
    pub async fn run_silent(&self, staged: Vec<PathBuf>) {
        match self.run(staged).await {
            Ok(report) if report.is_clean() => debug!(
                "Fast path done: {} processed, {} skipped",
                report.processed, report.skipped
            ),
            Ok(report) => {
                for failure in &report.failures {
                    debug!("Fast path skipped {}: {}", failure.path.display(), failure.reason);
                }
                warn!(
                    "Fast path finished with {} errors ({} processed)",
                    report.errors, report.processed
                );
            }
            Err(e @ DocsError::Timeout { .. }) => warn!("Documentation sync abandoned: {}", e),
            Err(e) => debug!("Documentation sync skipped: {}", e),
        }
    }

    async fn run(&self, staged: Vec<PathBuf>) -> Result<SyncReport> {
        if staged.is_empty() {
            return Ok(SyncReport::default());
        }

        let root = self.project_root.clone();
        let worker = tokio::task::spawn_blocking(move || -> Result<SyncReport> {
            let config = ConfigLoader::load_for(&root)?;
            let mut orchestrator = SyncOrchestrator::from_config(&root, &config)?;
            Ok(orchestrator.run(&staged, SyncMode::fast_path()))
        });

        with_optional_timeout(
            self.timeout,
            async {
                worker
                    .await
                    .map_err(|e| DocsError::Storage(format!("sync worker failed: {}", e)))?
            },
            "pre-commit documentation sync",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(
            root.join("src/Button.tsx"),
            "interface ButtonProps { label: string }\nexport const Button = (p: ButtonProps) => null;\n",
        )
        .unwrap();
        (temp, root)
    }

    #[tokio::test]
    async fn test_empty_list() {
        let (_temp, root) = project();
        let fast = FastPath::new(&root);

        assert_eq!(fast.run(Vec::new()).await.unwrap(), SyncReport::default());
        fast.run_silent(Vec::new()).await;
    }

    #[tokio::test]
    async fn test_missing_cache_dir_is_created() {
        let (_temp, root) = project();
        assert!(!root.join(".docsync/cache").exists());

        let fast = FastPath::new(&root);
        let report = fast.run(vec![PathBuf::from("src/Button.tsx")]).await.unwrap();
        assert_eq!(report.processed, 1);
        assert!(root.join(".docsync/cache").is_dir());

        fast.run_silent(vec![PathBuf::from("src/Button.tsx")]).await;
        let report = fast.run(vec![PathBuf::from("src/Button.tsx")]).await.unwrap();
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn test_unparseable_file_is_absorbed() {
        let (_temp, root) = project();
        fs::write(root.join("src/Broken.tsx"), "export const = (;\n").unwrap();

        let fast = FastPath::new(&root);
        let staged = vec![PathBuf::from("src/Broken.tsx"), PathBuf::from("src/Button.tsx")];
        let report = fast.run(staged.clone()).await.unwrap();
        assert_eq!(report.errors, 1);
        assert_eq!(report.processed, 1);

        fast.run_silent(staged).await;
    }

    #[tokio::test]
    async fn test_broken_config_is_absorbed() {
        let (_temp, root) = project();
        fs::create_dir_all(root.join(".docsync")).unwrap();
        fs::write(root.join(".docsync/config.toml"), "[components]\nextensions = []\n").unwrap();

        let fast = FastPath::new(&root);
        assert!(matches!(
            fast.run(vec![PathBuf::from("src/Button.tsx")]).await,
            Err(DocsError::Config(_))
        ));
        fast.run_silent(vec![PathBuf::from("src/Button.tsx")]).await;
    }

    #[tokio::test]
    async fn test_missing_project_root_is_absorbed() {
        let temp = TempDir::new().unwrap();
        let fast = FastPath::new(temp.path().join("gone"));

        assert!(fast.run(vec![PathBuf::from("src/A.tsx")]).await.is_err());
        fast.run_silent(vec![PathBuf::from("src/A.tsx")]).await;
    }

    #[tokio::test]
    async fn test_timeout_is_absorbed() {
        let (_temp, root) = project();
        let fast = FastPath::new(&root).with_timeout(Some(Duration::ZERO));

        // a zero limit expires before the worker reports back
        let result = fast.run(vec![PathBuf::from("src/Button.tsx")]).await;
        assert!(matches!(result, Err(DocsError::Timeout { .. })));
        fast.run_silent(vec![PathBuf::from("src/Button.tsx")]).await;
    }
}
