//! Incremental Cache Store
//!
//! One JSON entry per component file under the cache directory, addressed by
//! the SHA-256 of the file's canonical path. An entry is valid while:
//!
//! 1. its `format_version` matches [`FORMAT_VERSION`]
//! 2. the file's current fingerprint matches `content_fingerprint`
//! 3. no direct dependency (re-derived from the current file) was modified
//!    after `analyzed_at`
//!
//! Dependency tracking is one level deep: a change two imports away does not
//! invalidate an entry.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analyzer::{DependencySource, fingerprint_file, path_key};
use crate::constants::cache::{ENTRY_EXTENSION, FORMAT_VERSION};
use crate::types::{ComponentMetadata, DocsError, Fingerprint, Result, ResultExt};

// =============================================================================
// Entry Types
// =============================================================================

/// State of one direct dependency at save time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencySnapshot {
    pub path: PathBuf,
    /// `None` when the dependency could not be read at save time
    pub fingerprint: Option<Fingerprint>,
    pub modified_at: DateTime<Utc>,
}

/// Persisted cache entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub format_version: u32,
    pub content_fingerprint: Fingerprint,
    pub dependency_snapshots: Vec<DependencySnapshot>,
    pub metadata: ComponentMetadata,
    pub analyzed_at: DateTime<Utc>,
}

/// Why a file does (or does not) need re-analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    Fresh,
    NotCached,
    VersionMismatch { found: u32 },
    ContentChanged,
    DependencyChanged(PathBuf),
    /// State could not be determined, so the entry is not trusted
    Indeterminate(String),
}

impl Staleness {
    pub fn is_stale(&self) -> bool {
        !matches!(self, Self::Fresh)
    }

    /// Short label for status output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::NotCached => "not cached",
            Self::VersionMismatch { .. } => "format changed",
            Self::ContentChanged => "content changed",
            Self::DependencyChanged(_) => "dependency changed",
            Self::Indeterminate(_) => "unreadable",
        }
    }
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionMismatch { found } => {
                write!(f, "format changed (v{} -> v{})", found, FORMAT_VERSION)
            }
            Self::DependencyChanged(dep) => write!(f, "dependency changed: {}", dep.display()),
            Self::Indeterminate(reason) => write!(f, "unreadable: {}", reason),
            other => f.write_str(other.label()),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_bytes: u64,
}

// =============================================================================
// Store
// =============================================================================

pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// The directory is created lazily on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the entry for a (canonical) source path
    pub fn entry_path(&self, path: &Path) -> PathBuf {
        self.dir
            .join(format!("{}.{}", path_key(path), ENTRY_EXTENSION))
    }

    /// Whether `path` must be re-analyzed
    pub fn needs_update(&self, path: &Path, deps: &mut dyn DependencySource) -> bool {
        self.staleness(path, deps).is_stale()
    }

    pub fn staleness(&self, path: &Path, deps: &mut dyn DependencySource) -> Staleness {
        let path = match path.canonicalize() {
            Ok(p) => p,
            Err(e) => return Staleness::Indeterminate(e.to_string()),
        };

        let Some(entry) = self.load(&path) else {
            return Staleness::NotCached;
        };

        if entry.format_version != FORMAT_VERSION {
            return Staleness::VersionMismatch {
                found: entry.format_version,
            };
        }

        match fingerprint_file(&path) {
            Ok(current) if current == entry.content_fingerprint => {}
            Ok(_) => return Staleness::ContentChanged,
            Err(e) => return Staleness::Indeterminate(e.to_string()),
        }

        let dependencies = match deps.direct_dependencies(&path) {
            Ok(d) => d,
            Err(e) => return Staleness::Indeterminate(e.to_string()),
        };

        for dep in dependencies {
            match modified_at(&dep) {
                Ok(mtime) if mtime > entry.analyzed_at => {
                    return Staleness::DependencyChanged(dep);
                }
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("Dependency {} is gone, ignoring", dep.display());
                }
                Err(e) => return Staleness::Indeterminate(e.to_string()),
            }
        }

        Staleness::Fresh
    }

    /// Read the entry for `path`; missing or corrupt entries are `None`
    pub fn load(&self, path: &Path) -> Option<CacheEntry> {
        let entry_path = self.entry_path(path);
        let content = match fs::read_to_string(&entry_path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                debug!("Cannot read cache entry {}: {}", entry_path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Corrupt cache entry {}: {}", entry_path.display(), e);
                None
            }
        }
    }

    /// Record a fresh analysis. Failures are logged, never returned.
    ///
    /// `analyzed_at` is when the analysis started, so a dependency edited
    /// while it ran is still seen as newer than the entry.
    pub fn save(&self, path: &Path, metadata: &ComponentMetadata, analyzed_at: DateTime<Utc>) {
        if let Err(e) = self.try_save(path, metadata, analyzed_at) {
            warn!("Failed to cache {}: {}", path.display(), e);
        }
    }

    fn try_save(
        &self,
        path: &Path,
        metadata: &ComponentMetadata,
        analyzed_at: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let path = path.canonicalize()?;
        let entry = CacheEntry {
            format_version: FORMAT_VERSION,
            content_fingerprint: fingerprint_file(&path)?,
            dependency_snapshots: snapshot(&metadata.dependencies),
            metadata: metadata.clone(),
            analyzed_at,
        };

        fs::create_dir_all(&self.dir)
            .with_context_fn(|| format!("cannot create {}", self.dir.display()))?;

        let target = self.entry_path(&path);
        let key = path_key(&path);
        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", key, std::process::id()));

        let content = serde_json::to_vec_pretty(&entry)?;
        fs::write(&tmp, &content).with_context_fn(|| format!("cannot write {}", tmp.display()))?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(DocsError::Storage(format!(
                "cannot replace {}: {}",
                target.display(),
                e
            )));
        }

        debug!(
            "Cached {} ({}, {} deps)",
            path.display(),
            entry.content_fingerprint.short(),
            entry.dependency_snapshots.len()
        );
        Ok(target)
    }

    /// Remove every entry. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!("Cannot read cache dir {}: {}", self.dir.display(), e);
                return 0;
            }
        };

        let mut count = 0;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !is_entry_file(&path) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => count += 1,
                Err(e) => warn!("Cannot remove {}: {}", path.display(), e),
            }
        }

        info!("Cleared {} cache entries", count);
        count
    }

    pub fn stats(&self) -> CacheStats {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return CacheStats::default();
        };

        entries
            .filter_map(|e| e.ok())
            .filter(|e| is_entry_file(&e.path()))
            .filter_map(|e| e.metadata().ok())
            .fold(CacheStats::default(), |mut stats, meta| {
                stats.entry_count += 1;
                stats.total_bytes += meta.len();
                stats
            })
    }
}

fn is_entry_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == ENTRY_EXTENSION)
}

fn modified_at(path: &Path) -> std::io::Result<DateTime<Utc>> {
    Ok(fs::metadata(path)?.modified()?.into())
}

fn snapshot(dependencies: &[PathBuf]) -> Vec<DependencySnapshot> {
    dependencies
        .iter()
        .filter_map(|dep| {
            let modified_at = modified_at(dep).ok()?;
            Some(DependencySnapshot {
                path: dep.clone(),
                fingerprint: fingerprint_file(dep).ok(),
                modified_at,
            })
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::MetadataExtractor;
    use proptest::prelude::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    struct NoDeps;

    impl DependencySource for NoDeps {
        fn direct_dependencies(&mut self, _path: &Path) -> Result<Vec<PathBuf>> {
            Ok(Vec::new())
        }
    }

    struct FixedDeps(Vec<PathBuf>);

    impl DependencySource for FixedDeps {
        fn direct_dependencies(&mut self, _path: &Path) -> Result<Vec<PathBuf>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenDeps;

    impl DependencySource for BrokenDeps {
        fn direct_dependencies(&mut self, path: &Path) -> Result<Vec<PathBuf>> {
            Err(crate::types::AnalysisError::new(path, "boom").into())
        }
    }

    fn touch_forward(path: &Path) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(120))
            .unwrap();
    }

    fn setup() -> (TempDir, PathBuf, CacheStore) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let store = CacheStore::new(root.join(".docsync/cache"));
        (temp, root, store)
    }

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    const BUTTON: &str = r#"
interface ButtonProps {
  children: React.ReactNode;
  variant?: 'a' | 'b';
}

export function Button({ children, variant }: ButtonProps) {
  return <button>{children}</button>;
}
"#;

    #[test]
    fn test_missing_entry_is_not_cached() {
        let (_temp, root, store) = setup();
        let file = write(&root, "src/Button.tsx", BUTTON);
        assert_eq!(store.staleness(&file, &mut NoDeps), Staleness::NotCached);
        assert!(store.needs_update(&file, &mut NoDeps));
    }

    #[test]
    fn test_save_then_fresh() {
        let (_temp, root, store) = setup();
        let file = write(&root, "src/Button.tsx", BUTTON);
        let mut extractor = MetadataExtractor::for_project(&root).unwrap();

        let metadata = extractor.analyze(&file).unwrap();
        store.save(&file, &metadata, Utc::now());

        assert!(!store.needs_update(&file, &mut extractor));
        // idempotent
        assert!(!store.needs_update(&file, &mut extractor));

        let entry = store.load(&file).unwrap();
        assert_eq!(entry.format_version, FORMAT_VERSION);
        assert_eq!(entry.metadata.name, "Button");
    }

    #[test]
    fn test_button_field_added_is_stale() {
        let (_temp, root, store) = setup();
        let file = write(&root, "src/Button.tsx", BUTTON);
        let mut extractor = MetadataExtractor::for_project(&root).unwrap();

        let metadata = extractor.analyze(&file).unwrap();
        assert_eq!(metadata.fields.len(), 2);
        store.save(&file, &metadata, Utc::now());

        fs::write(
            &file,
            BUTTON.replace("variant?: 'a' | 'b';", "variant?: 'a' | 'b';\n  size?: number;"),
        )
        .unwrap();

        assert_eq!(
            store.staleness(&file, &mut extractor),
            Staleness::ContentChanged
        );
        assert_eq!(extractor.analyze(&file).unwrap().fields.len(), 3);
    }

    #[test]
    fn test_card_dependency_touch_is_stale() {
        let (_temp, root, store) = setup();
        let types = write(&root, "src/types.ts", "export type Size = 'sm' | 'lg';\n");
        let card = write(
            &root,
            "src/Card.tsx",
            "import { Size } from './types';\nexport const Card = (p: { size: Size }) => null;\n",
        );
        let mut extractor = MetadataExtractor::for_project(&root).unwrap();

        let metadata = extractor.analyze(&card).unwrap();
        assert_eq!(metadata.dependencies, vec![types.clone()]);
        store.save(&card, &metadata, Utc::now());
        assert!(!store.needs_update(&card, &mut extractor));

        touch_forward(&types);
        assert_eq!(
            store.staleness(&card, &mut extractor),
            Staleness::DependencyChanged(types)
        );
    }

    #[test]
    fn test_dependency_edited_during_analysis_is_stale() {
        let (_temp, root, store) = setup();
        let types = write(&root, "src/types.ts", "export type Size = 'sm';\n");
        let card = write(
            &root,
            "src/Card.tsx",
            "import { Size } from './types';\nexport const Card = () => null;\n",
        );
        let mut extractor = MetadataExtractor::for_project(&root).unwrap();

        let started = Utc::now() - chrono::Duration::seconds(30);
        let metadata = extractor.analyze(&card).unwrap();
        // dependency rewritten after analysis began, before the save
        fs::write(&types, "export type Size = 'sm' | 'lg';\n").unwrap();
        store.save(&card, &metadata, started);

        assert_eq!(store.load(&card).unwrap().analyzed_at, started);
        assert_eq!(
            store.staleness(&card, &mut extractor),
            Staleness::DependencyChanged(types)
        );
    }

    #[test]
    fn test_transitive_change_is_not_tracked() {
        let (_temp, root, store) = setup();
        let tokens = write(&root, "src/tokens.ts", "export const gap = 4;\n");
        write(
            &root,
            "src/types.ts",
            "import { gap } from './tokens';\nexport type Size = typeof gap;\n",
        );
        let card = write(
            &root,
            "src/Card.tsx",
            "import { Size } from './types';\nexport const Card = () => null;\n",
        );
        let mut extractor = MetadataExtractor::for_project(&root).unwrap();

        store.save(&card, &extractor.analyze(&card).unwrap(), Utc::now());
        touch_forward(&tokens);

        assert!(!store.needs_update(&card, &mut extractor));
    }

    #[test]
    fn test_deleted_dependency_is_skipped() {
        let (_temp, root, store) = setup();
        let file = write(&root, "src/Card.tsx", "export const Card = () => null;\n");
        let gone = root.join("src/gone.ts");
        let metadata = ComponentMetadata::new("Card", &file);
        store.save(&file, &metadata, Utc::now());

        assert!(!store.needs_update(&file, &mut FixedDeps(vec![gone])));
    }

    #[test]
    fn test_dependency_error_is_indeterminate() {
        let (_temp, root, store) = setup();
        let file = write(&root, "src/Card.tsx", "export const Card = () => null;\n");
        store.save(&file, &ComponentMetadata::new("Card", &file), Utc::now());

        assert!(matches!(
            store.staleness(&file, &mut BrokenDeps),
            Staleness::Indeterminate(_)
        ));
    }

    #[test]
    fn test_version_mismatch_is_stale() {
        let (_temp, root, store) = setup();
        let file = write(&root, "src/Card.tsx", "export const Card = () => null;\n");
        store.save(&file, &ComponentMetadata::new("Card", &file), Utc::now());

        let entry_path = store.entry_path(&file);
        let mut entry: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&entry_path).unwrap()).unwrap();
        entry["format_version"] = serde_json::json!(FORMAT_VERSION + 1);
        fs::write(&entry_path, entry.to_string()).unwrap();

        assert_eq!(
            store.staleness(&file, &mut NoDeps),
            Staleness::VersionMismatch {
                found: FORMAT_VERSION + 1
            }
        );
    }

    #[test]
    fn test_corrupt_entry_is_not_cached() {
        let (_temp, root, store) = setup();
        let file = write(&root, "src/Card.tsx", "export const Card = () => null;\n");
        store.save(&file, &ComponentMetadata::new("Card", &file), Utc::now());
        fs::write(store.entry_path(&file), "{ not json").unwrap();

        assert_eq!(store.staleness(&file, &mut NoDeps), Staleness::NotCached);
    }

    #[test]
    fn test_missing_source_is_indeterminate() {
        let (_temp, root, store) = setup();
        let missing = root.join("src/Nope.tsx");
        assert!(matches!(
            store.staleness(&missing, &mut NoDeps),
            Staleness::Indeterminate(_)
        ));
    }

    #[test]
    fn test_save_creates_directory_and_leaves_no_temp_files() {
        let (_temp, root, store) = setup();
        assert!(!store.dir().exists());

        let file = write(&root, "src/Card.tsx", "export const Card = () => null;\n");
        store.save(&file, &ComponentMetadata::new("Card", &file), Utc::now());

        assert!(store.entry_path(&file).exists());
        let names: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with(".json"));
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let (_temp, root, _store) = setup();
        let blocker = write(&root, "blocker", "");
        let store = CacheStore::new(blocker.join("cache"));
        let file = write(&root, "src/Card.tsx", "export const Card = () => null;\n");

        store.save(&file, &ComponentMetadata::new("Card", &file), Utc::now());
        assert!(store.needs_update(&file, &mut NoDeps));
    }

    #[test]
    fn test_clear_and_stats() {
        let (_temp, root, store) = setup();
        assert_eq!(store.clear(), 0);

        for name in ["A", "B", "C"] {
            let file = write(&root, &format!("src/{name}.tsx"), "export {};\n");
            store.save(&file, &ComponentMetadata::new(name, &file), Utc::now());
        }

        let stats = store.stats();
        assert_eq!(stats.entry_count, 3);
        assert!(stats.total_bytes > 0);

        assert_eq!(store.clear(), 3);
        assert_eq!(store.stats(), CacheStats::default());
    }

    #[test]
    fn test_staleness_display() {
        assert_eq!(Staleness::Fresh.to_string(), "fresh");
        assert!(!Staleness::Fresh.is_stale());
        assert!(
            Staleness::DependencyChanged(PathBuf::from("/a/types.ts"))
                .to_string()
                .contains("/a/types.ts")
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_any_byte_edit_is_stale(
            original in proptest::collection::vec(any::<u8>(), 1..256),
            index in any::<prop::sample::Index>(),
            replacement in any::<u8>(),
        ) {
            let i = index.index(original.len());
            prop_assume!(original[i] != replacement);

            let (_temp, root, store) = setup();
            let file = root.join("Blob.tsx");
            fs::write(&file, &original).unwrap();
            store.save(&file, &ComponentMetadata::new("Blob", &file), Utc::now());
            prop_assert!(!store.needs_update(&file, &mut NoDeps));

            let mut edited = original.clone();
            edited[i] = replacement;
            fs::write(&file, &edited).unwrap();
            prop_assert_eq!(store.staleness(&file, &mut NoDeps), Staleness::ContentChanged);
        }
    }
}
