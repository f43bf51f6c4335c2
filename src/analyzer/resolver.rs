//! Module Resolution
//!
//! Resolves import specifiers to concrete project-local files.
//!
//! ## Resolution Order
//!
//! 1. Relative (`./`, `../`) and absolute specifiers against the importing file
//! 2. `tsconfig.json` `compilerOptions.paths` aliases
//! 3. `compilerOptions.baseUrl` for bare specifiers
//!
//! Anything that resolves under `node_modules` or outside the project root is
//! a third-party location and dropped.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::constants::analysis::RESOLVE_EXTENSIONS;

/// A `compilerOptions.paths` entry, e.g. `"@/*": ["src/*"]`
#[derive(Debug, Clone)]
struct PathAlias {
    pattern: String,
    targets: Vec<String>,
}

impl PathAlias {
    /// Substitute the wildcard match of `specifier`, if the pattern applies
    fn expand(&self, specifier: &str) -> Option<Vec<String>> {
        match self.pattern.split_once('*') {
            Some((prefix, suffix)) => {
                let rest = specifier.strip_prefix(prefix)?.strip_suffix(suffix)?;
                Some(self.targets.iter().map(|t| t.replacen('*', rest, 1)).collect())
            }
            None => (self.pattern == specifier).then(|| self.targets.clone()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfig {
    #[serde(default)]
    compiler_options: CompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    base_url: Option<String>,
    #[serde(default)]
    paths: serde_json::Map<String, serde_json::Value>,
}

/// Import resolver bound to one project root
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    project_root: PathBuf,
    base_url: Option<PathBuf>,
    aliases: Vec<PathAlias>,
}

impl ModuleResolver {
    /// Resolver without alias support
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let project_root = project_root.canonicalize().unwrap_or(project_root);
        Self {
            project_root,
            base_url: None,
            aliases: Vec::new(),
        }
    }

    /// Resolver configured from `<root>/tsconfig.json` when present.
    ///
    /// An unreadable or malformed tsconfig is logged and ignored.
    pub fn from_project(project_root: impl Into<PathBuf>) -> Self {
        let mut resolver = Self::new(project_root);
        let tsconfig_path = resolver.project_root.join("tsconfig.json");

        let Ok(raw) = std::fs::read_to_string(&tsconfig_path) else {
            return resolver;
        };

        match parse_tsconfig(&raw) {
            Ok(tsconfig) => resolver.apply(tsconfig.compiler_options),
            Err(e) => debug!("Ignoring {}: {}", tsconfig_path.display(), e),
        }

        resolver
    }

    fn apply(&mut self, options: CompilerOptions) {
        let base = options
            .base_url
            .as_deref()
            .map(|b| self.project_root.join(b));

        self.aliases = options
            .paths
            .into_iter()
            .map(|(pattern, targets)| PathAlias {
                pattern,
                targets: targets
                    .as_array()
                    .map(|a| {
                        a.iter()
                            .filter_map(|t| t.as_str().map(String::from))
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();
        self.base_url = base;
    }

    /// Resolve a specifier imported by `importer` to a project-local file.
    pub fn resolve(&self, importer: &Path, specifier: &str) -> Option<PathBuf> {
        if specifier.is_empty() {
            return None;
        }

        if specifier.starts_with('.') || specifier.starts_with('/') {
            let dir = importer.parent()?;
            return self.locate(&dir.join(specifier));
        }

        // `paths` are resolved relative to baseUrl, or the project root when unset
        let alias_base = self.base_url.as_deref().unwrap_or(&self.project_root);
        for alias in &self.aliases {
            if let Some(targets) = alias.expand(specifier) {
                for target in targets {
                    if let Some(found) = self.locate(&alias_base.join(target)) {
                        return Some(found);
                    }
                }
            }
        }

        let base = self.base_url.as_deref()?;
        self.locate(&base.join(specifier))
    }

    /// Try the candidate as-is, with each extension, then as a directory index
    fn locate(&self, candidate: &Path) -> Option<PathBuf> {
        let mut attempts = Vec::with_capacity(1 + RESOLVE_EXTENSIONS.len() * 2);
        attempts.push(candidate.to_path_buf());

        let raw = candidate.as_os_str().to_string_lossy();
        for ext in RESOLVE_EXTENSIONS {
            attempts.push(PathBuf::from(format!("{}.{}", raw, ext)));
        }
        for ext in RESOLVE_EXTENSIONS {
            attempts.push(candidate.join(format!("index.{}", ext)));
        }

        attempts
            .into_iter()
            .find(|p| p.is_file())
            .and_then(|p| p.canonicalize().ok())
            .filter(|p| self.is_local(p))
    }

    /// Inside the project root and outside any `node_modules`
    pub fn is_local(&self, path: &Path) -> bool {
        path.starts_with(&self.project_root)
            && !path.components().any(|c| c.as_os_str() == "node_modules")
    }
}

/// Parse tsconfig JSON, tolerating comments and trailing commas
fn parse_tsconfig(raw: &str) -> serde_json::Result<TsConfig> {
    serde_json::from_str(raw).or_else(|_| serde_json::from_str(&strip_jsonc(raw)))
}

/// Remove `//` and `/* */` comments outside strings, then trailing commas
fn strip_jsonc(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    let trailing_comma = regex::Regex::new(r",(\s*[}\]])").ok();
    match trailing_comma {
        Some(re) => re.replace_all(&out, "$1").into_owned(),
        None => out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        std::fs::create_dir_all(root.join("src/components/Button")).unwrap();
        std::fs::create_dir_all(root.join("node_modules/react")).unwrap();
        std::fs::write(root.join("src/types.ts"), "export type Size = 'sm';").unwrap();
        std::fs::write(root.join("src/components/Button/index.tsx"), "").unwrap();
        std::fs::write(root.join("src/components/Card.tsx"), "").unwrap();
        std::fs::write(root.join("node_modules/react/index.js"), "").unwrap();
        (temp, root)
    }

    #[test]
    fn test_resolve_relative_adds_extension() {
        let (_temp, root) = project();
        let resolver = ModuleResolver::new(&root);
        let importer = root.join("src/components/Card.tsx");

        assert_eq!(
            resolver.resolve(&importer, "../types"),
            Some(root.join("src/types.ts"))
        );
        assert_eq!(
            resolver.resolve(&importer, "./Button"),
            Some(root.join("src/components/Button/index.tsx"))
        );
    }

    #[test]
    fn test_bare_specifier_is_external() {
        let (_temp, root) = project();
        let resolver = ModuleResolver::new(&root);
        let importer = root.join("src/components/Card.tsx");

        assert_eq!(resolver.resolve(&importer, "react"), None);
    }

    #[test]
    fn test_node_modules_excluded() {
        let (_temp, root) = project();
        let resolver = ModuleResolver::new(&root);
        let importer = root.join("src/components/Card.tsx");

        assert_eq!(
            resolver.resolve(&importer, "../../node_modules/react/index.js"),
            None
        );
    }

    #[test]
    fn test_missing_file_unresolved() {
        let (_temp, root) = project();
        let resolver = ModuleResolver::new(&root);
        let importer = root.join("src/components/Card.tsx");

        assert_eq!(resolver.resolve(&importer, "./Missing"), None);
    }

    #[test]
    fn test_tsconfig_paths_alias() {
        let (_temp, root) = project();
        std::fs::write(
            root.join("tsconfig.json"),
            r#"{
                // comments are allowed in tsconfig
                "compilerOptions": {
                    "baseUrl": ".",
                    "paths": { "@/*": ["src/*"], },
                },
            }"#,
        )
        .unwrap();

        let resolver = ModuleResolver::from_project(&root);
        let importer = root.join("src/components/Card.tsx");

        assert_eq!(
            resolver.resolve(&importer, "@/types"),
            Some(root.join("src/types.ts"))
        );
        assert_eq!(
            resolver.resolve(&importer, "src/types"),
            Some(root.join("src/types.ts"))
        );
    }

    #[test]
    fn test_alias_expand() {
        let alias = PathAlias {
            pattern: "~components/*".to_string(),
            targets: vec!["src/components/*".to_string()],
        };
        assert_eq!(
            alias.expand("~components/Card"),
            Some(vec!["src/components/Card".to_string()])
        );
        assert_eq!(alias.expand("react"), None);
    }

    #[test]
    fn test_strip_jsonc_keeps_strings() {
        let stripped = strip_jsonc(r#"{"url": "http://x", /* c */ "a": [1,],}"#);
        let value: serde_json::Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(value["url"], "http://x");
        assert_eq!(value["a"][0], 1);
    }
}
