//! Parse Session
//!
//! The parsing context used by the extractor. A session owns one tree-sitter
//! parser per grammar and accumulates parsed-file state (source text, syntax
//! tree, fingerprint) keyed by path, so a file parsed once for a staleness
//! check is not parsed again for extraction.
//!
//! ## Thread Safety
//!
//! A session is mutated on every load and is **not** safe to share between
//! workers. Give each worker its own session, or serialize access to a shared
//! one behind a `Mutex`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use tree_sitter::{Language, Node, Tree};

use super::fingerprint::fingerprint_bytes;
use super::syntax::{create_ts_parser, first_error, node_text};
use crate::types::{AnalysisError, Fingerprint, Result};

/// Grammar used to parse a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    TypeScript,
    Tsx,
}

impl Dialect {
    /// Detect the grammar from a file extension.
    /// JavaScript may carry JSX, so it goes through the TSX grammar too.
    /// Plain `.ts` stays on TypeScript, where `<T>expr` casts are valid.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "tsx" | "jsx" | "js" | "mjs" | "cjs" => Some(Self::Tsx),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    pub fn language(&self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// A file loaded into the session
pub struct ParsedFile {
    pub path: PathBuf,
    pub dialect: Dialect,
    pub fingerprint: Fingerprint,
    pub source: String,
    pub tree: Tree,
}

impl ParsedFile {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: Node) -> &str {
        node_text(node, self.source.as_bytes())
    }

    /// Describe the first syntax error, if the tree has any
    pub fn syntax_error(&self) -> Option<String> {
        let root = self.root();
        if !root.has_error() {
            return None;
        }
        let position = first_error(root)
            .map(|n| n.start_position())
            .unwrap_or_else(|| root.start_position());
        Some(format!(
            "syntax error at {}:{}",
            position.row + 1,
            position.column + 1
        ))
    }
}

/// Load counters, for debug output
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionStats {
    pub parses: u64,
    pub reuses: u64,
}

pub struct ParseSession {
    typescript: tree_sitter::Parser,
    tsx: tree_sitter::Parser,
    files: HashMap<PathBuf, ParsedFile>,
    stats: SessionStats,
}

impl ParseSession {
    pub fn new() -> Result<Self> {
        Ok(Self {
            typescript: create_ts_parser(tree_sitter_typescript::LANGUAGE_TYPESCRIPT, "TypeScript")?,
            tsx: create_ts_parser(tree_sitter_typescript::LANGUAGE_TSX, "TSX")?,
            files: HashMap::new(),
            stats: SessionStats::default(),
        })
    }

    /// Load a file, reusing the cached tree when its content is unchanged.
    ///
    /// Syntax errors do not fail the load; callers decide via
    /// [`ParsedFile::syntax_error`].
    pub fn load(&mut self, path: &Path) -> Result<&ParsedFile> {
        let dialect = Dialect::from_path(path)
            .ok_or_else(|| AnalysisError::new(path, "unsupported file type"))?;

        let bytes = std::fs::read(path)?;
        let fingerprint = fingerprint_bytes(&bytes);

        let reusable = self
            .files
            .get(path)
            .is_some_and(|f| f.fingerprint == fingerprint);
        if reusable {
            self.stats.reuses += 1;
            return self.cached(path);
        }

        let source = String::from_utf8(bytes)
            .map_err(|e| AnalysisError::new(path, format!("not valid UTF-8: {}", e)))?;

        let parser = match dialect {
            Dialect::TypeScript => &mut self.typescript,
            Dialect::Tsx => &mut self.tsx,
        };
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| AnalysisError::new(path, "parser produced no syntax tree"))?;

        self.stats.parses += 1;
        debug!(
            "Parsed {} ({:?}, {})",
            path.display(),
            dialect,
            fingerprint.short()
        );

        self.files.insert(
            path.to_path_buf(),
            ParsedFile {
                path: path.to_path_buf(),
                dialect,
                fingerprint,
                source,
                tree,
            },
        );
        self.cached(path)
    }

    fn cached(&self, path: &Path) -> Result<&ParsedFile> {
        self.files
            .get(path)
            .ok_or_else(|| AnalysisError::new(path, "file missing from parse session").into())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dialect_from_path() {
        assert_eq!(Dialect::from_path(Path::new("a/Button.tsx")), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_path(Path::new("a/Button.jsx")), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_path(Path::new("a/types.ts")), Some(Dialect::TypeScript));
        assert_eq!(Dialect::from_path(Path::new("a/util.js")), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_path(Path::new("a/util.cjs")), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_path(Path::new("a/types.mts")), Some(Dialect::TypeScript));
        assert_eq!(Dialect::from_path(Path::new("README.md")), None);
    }

    #[test]
    fn test_load_reuses_unchanged_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Button.tsx");
        std::fs::write(&file, "export const Button = () => <button />;").unwrap();

        let mut session = ParseSession::new().unwrap();
        session.load(&file).unwrap();
        session.load(&file).unwrap();

        assert_eq!(session.stats().parses, 1);
        assert_eq!(session.stats().reuses, 1);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_load_reparses_changed_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.ts");
        std::fs::write(&file, "export const a = 1;").unwrap();

        let mut session = ParseSession::new().unwrap();
        session.load(&file).unwrap();
        std::fs::write(&file, "export const a = 2;").unwrap();
        let parsed = session.load(&file).unwrap();

        assert!(parsed.source.contains('2'));
        assert_eq!(session.stats().parses, 2);
    }

    #[test]
    fn test_syntax_error_reported() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Broken.tsx");
        std::fs::write(&file, "export function Broken( {\n  return <div>;\n").unwrap();

        let mut session = ParseSession::new().unwrap();
        let parsed = session.load(&file).unwrap();
        assert!(parsed.syntax_error().is_some());
    }

    #[test]
    fn test_unsupported_extension() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("notes.md");
        std::fs::write(&file, "# hi").unwrap();

        let mut session = ParseSession::new().unwrap();
        assert!(session.load(&file).is_err());
        assert!(session.is_empty());
    }

    #[test]
    fn test_js_with_jsx_parses_cleanly() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Button.js");
        std::fs::write(
            &file,
            "export function Button({ label }) {\n  return <button>{label}</button>;\n}\n",
        )
        .unwrap();

        let mut session = ParseSession::new().unwrap();
        let parsed = session.load(&file).unwrap();
        assert_eq!(parsed.dialect, Dialect::Tsx);
        assert_eq!(parsed.syntax_error(), None);
    }
}
