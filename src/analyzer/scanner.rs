//! Component File Scanner
//!
//! Walks the components root (respecting `.gitignore`) and decides whether a
//! single path is a component file. Both the full-scan and the restricted-list
//! sync modes go through the same acceptance rules.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::config::ComponentsConfig;
use crate::constants::analysis::{COMPONENT_EXTENSIONS, DEFAULT_MAX_FILE_SIZE};

pub struct ComponentScanner {
    project_root: PathBuf,
    root: PathBuf,
    extensions: Vec<String>,
    exclude: Vec<glob::Pattern>,
    max_file_size: u64,
}

impl ComponentScanner {
    /// Scanner over `<project_root>/<components_root>`.
    /// `project_root` should be canonical; exclude globs match paths relative to it.
    pub fn new<P: AsRef<Path>>(project_root: P, components_root: impl AsRef<Path>) -> Self {
        let project_root = project_root.as_ref().to_path_buf();
        Self {
            root: project_root.join(components_root),
            project_root,
            extensions: COMPONENT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn from_config<P: AsRef<Path>>(project_root: P, config: &ComponentsConfig) -> Self {
        Self::new(project_root, &config.root)
            .with_extensions(config.extensions.clone())
            .with_exclude(&config.exclude)
            .with_max_file_size(config.max_file_size)
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Invalid patterns are logged and skipped
    pub fn with_exclude(mut self, patterns: &[String]) -> Self {
        self.exclude = patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!("Ignoring invalid exclude pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All component files under the root, sorted
    pub fn scan(&self) -> Vec<PathBuf> {
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false) // Security: prevent symlink traversal attacks
            .build();

        let mut files: Vec<PathBuf> = walker
            .filter_map(|e| e.ok())
            .map(|entry| entry.into_path())
            .filter(|path| self.accepts(path))
            .collect();

        files.sort();
        files
    }

    /// Whether an existing path is a component file this scanner would pick up
    pub fn accepts(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
            && self.check_extension(path)
            && !self.should_exclude(path)
            && self.check_size(path)
    }

    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.project_root).unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(relative))
    }

    fn check_size(&self, path: &Path) -> bool {
        path.metadata()
            .map(|m| m.is_file() && m.len() <= self.max_file_size)
            .unwrap_or(false)
    }

    fn check_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        for file in [
            "src/Button.tsx",
            "src/Button.test.tsx",
            "src/forms/Input.tsx",
            "src/styles.css",
            "src/node_modules/lib/index.js",
            "other/Outside.tsx",
        ] {
            let path = root.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "export {};").unwrap();
        }
        (temp, root)
    }

    fn excludes() -> Vec<String> {
        vec!["**/*.test.*".to_string(), "**/node_modules/**".to_string()]
    }

    #[test]
    fn test_scan_filters() {
        let (_temp, root) = project();
        let scanner = ComponentScanner::new(&root, "src").with_exclude(&excludes());

        let files = scanner.scan();
        assert_eq!(
            files,
            vec![root.join("src/Button.tsx"), root.join("src/forms/Input.tsx")]
        );
    }

    #[test]
    fn test_accepts_rejects_outside_root() {
        let (_temp, root) = project();
        let scanner = ComponentScanner::new(&root, "src").with_exclude(&excludes());

        assert!(scanner.accepts(&root.join("src/Button.tsx")));
        assert!(!scanner.accepts(&root.join("other/Outside.tsx")));
        assert!(!scanner.accepts(&root.join("src/Button.test.tsx")));
        assert!(!scanner.accepts(&root.join("src/Missing.tsx")));
    }

    #[test]
    fn test_max_file_size() {
        let (_temp, root) = project();
        let scanner = ComponentScanner::new(&root, "src").with_max_file_size(2);
        assert!(scanner.scan().is_empty());
    }

    #[test]
    fn test_invalid_exclude_pattern_skipped() {
        let (_temp, root) = project();
        let scanner = ComponentScanner::new(&root, "src").with_exclude(&["[".to_string()]);
        assert!(scanner.accepts(&root.join("src/Button.tsx")));
    }
}
