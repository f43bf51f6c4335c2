//! Batch Sync Orchestrator
//!
//! Drives cache check → analysis → rendering → cache write over a set of
//! component files, one at a time. A failure in one file is recorded in the
//! report and never stops the batch.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::analyzer::{ComponentScanner, MetadataExtractor};
use crate::cache::CacheStore;
use crate::config::Config;
use crate::render::{DocumentRenderer, MarkdownRenderer};
use crate::types::Result;

// =============================================================================
// Mode & Report
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncMode {
    /// Only process the given candidates instead of scanning the components root
    pub restrict_to_list: bool,
    /// Re-analyze even when the cache says the file is fresh
    pub force: bool,
    /// Passed through to the renderer
    pub enable_enrichment: bool,
}

impl SyncMode {
    /// Scan the whole components root
    pub fn full() -> Self {
        Self::default()
    }

    /// Only the given files
    pub fn listed() -> Self {
        Self {
            restrict_to_list: true,
            ..Self::default()
        }
    }

    /// Pre-commit mode: listed files, cache respected, no enrichment
    pub fn fast_path() -> Self {
        Self::listed()
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_enrichment(mut self, enabled: bool) -> Self {
        self.enable_enrichment = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.errors
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }

    fn fail(&mut self, path: &Path, reason: String) {
        warn!("Skipping {}: {}", path.display(), reason);
        self.errors += 1;
        self.failures.push(SyncFailure {
            path: path.to_path_buf(),
            reason,
        });
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

pub struct SyncOrchestrator<R: DocumentRenderer> {
    project_root: PathBuf,
    extractor: MetadataExtractor,
    cache: CacheStore,
    renderer: R,
    scanner: ComponentScanner,
}

impl SyncOrchestrator<MarkdownRenderer> {
    /// Orchestrator wired from project configuration
    pub fn from_config(project_root: &Path, config: &Config) -> Result<Self> {
        let root = project_root.canonicalize()?;
        let extractor = MetadataExtractor::for_project(&root)?;
        let cache = CacheStore::new(config.cache.resolve(&root));
        let renderer = MarkdownRenderer::new(root.join(&config.documentation.output_dir))
            .with_project_root(&root);
        let scanner = ComponentScanner::from_config(&root, &config.components);

        Ok(Self::new(root, extractor, cache, renderer, scanner))
    }
}

impl<R: DocumentRenderer> SyncOrchestrator<R> {
    pub fn new(
        project_root: PathBuf,
        extractor: MetadataExtractor,
        cache: CacheStore,
        renderer: R,
        scanner: ComponentScanner,
    ) -> Self {
        Self {
            project_root,
            extractor,
            cache,
            renderer,
            scanner,
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Files a run with `mode` would consider, before the cache check
    pub fn candidates(&self, listed: &[PathBuf], mode: SyncMode) -> Vec<PathBuf> {
        if !mode.restrict_to_list {
            return self.scanner.scan();
        }

        let mut seen = HashSet::new();
        listed
            .iter()
            .filter_map(|p| self.resolve_candidate(p))
            .filter(|p| seen.insert(p.clone()))
            .collect()
    }

    fn resolve_candidate(&self, path: &Path) -> Option<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        };

        let Ok(canonical) = absolute.canonicalize() else {
            debug!("Ignoring missing file {}", absolute.display());
            return None;
        };

        if self.scanner.accepts(&canonical) {
            Some(canonical)
        } else {
            debug!("Not a component file: {}", canonical.display());
            None
        }
    }

    /// Process every candidate. Two files that resolve to the same component
    /// name would write the same page, so the later one in the run is
    /// reported as a failure and left uncached.
    pub fn run(&mut self, listed: &[PathBuf], mode: SyncMode) -> SyncReport {
        let files = self.candidates(listed, mode);
        let mut report = SyncReport::default();
        // page name -> source file that owns it in this run
        let mut claimed: HashMap<String, PathBuf> = HashMap::new();

        debug!("Syncing {} candidate files ({:?})", files.len(), mode);

        for file in &files {
            if !mode.force && !self.cache.needs_update(file, &mut self.extractor) {
                debug!("Up to date: {}", file.display());
                if let Some(entry) = self.cache.load(file) {
                    claimed.entry(entry.metadata.name).or_insert_with(|| file.clone());
                }
                report.skipped += 1;
                continue;
            }

            let started = Utc::now();
            let metadata = match self.extractor.analyze(file) {
                Ok(m) => m,
                Err(e) => {
                    report.fail(file, e.cause);
                    continue;
                }
            };

            if let Some(owner) = claimed.get(&metadata.name)
                && owner != file
            {
                let reason = format!(
                    "page '{}' already written for {}",
                    metadata.name,
                    owner.display()
                );
                report.fail(file, reason);
                continue;
            }

            if let Err(e) = self.renderer.render(&metadata, mode.enable_enrichment) {
                report.fail(file, e.to_string());
                continue;
            }

            claimed.insert(metadata.name.clone(), file.clone());
            self.cache.save(file, &metadata, started);
            report.processed += 1;
        }

        info!(
            "Sync complete: {} processed, {} skipped, {} errors",
            report.processed, report.skipped, report.errors
        );
        report
    }
}

// =============================================================================
// Tests
// =============================================================================
