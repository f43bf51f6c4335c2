//! Component Metadata Extraction
//!
//! Turns a component source file into [`ComponentMetadata`]: the component
//! name, its props fields, its direct local imports and whether it is
//! documented.
//!
//! ## Heuristics
//!
//! - **Name**: first exported value declaration in upper-camel-case, else the
//!   file stem. Interfaces and type aliases are never candidates.
//! - **Fields**: every interface or object-shaped type alias whose name
//!   contains `Props`, concatenated in declaration order.
//! - **Defaults**: destructured parameter defaults of the component function,
//!   then `@default` doc tags. Defaults assigned in the function body are not
//!   seen.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::debug;
use tree_sitter::Node;

use super::resolver::ModuleResolver;
use super::session::{ParseSession, ParsedFile};
use super::syntax::{doc_comment_before, has_token, named_children, query_captures, unquote};
use crate::constants::analysis::{PROPS_MARKER, UNTYPED_FIELD};
use crate::types::{AnalysisError, ComponentMetadata, DocsError, FieldMetadata, Result};

/// Import and re-export sources
const IMPORT_QUERY: &str = r#"
    (import_statement source: (string) @source)
    (export_statement source: (string) @source)
"#;

/// Anything that can re-derive a file's direct dependencies from its
/// current contents.
pub trait DependencySource {
    fn direct_dependencies(&mut self, path: &Path) -> Result<Vec<PathBuf>>;
}

pub struct MetadataExtractor {
    session: ParseSession,
    resolver: ModuleResolver,
}

impl MetadataExtractor {
    pub fn new(resolver: ModuleResolver) -> Result<Self> {
        Ok(Self {
            session: ParseSession::new()?,
            resolver,
        })
    }

    /// Extractor resolving imports through the project's tsconfig
    pub fn for_project(project_root: impl Into<PathBuf>) -> Result<Self> {
        Self::new(ModuleResolver::from_project(project_root))
    }

    pub fn session(&self) -> &ParseSession {
        &self.session
    }

    /// Extract metadata from a component file.
    pub fn analyze(&mut self, path: &Path) -> std::result::Result<ComponentMetadata, AnalysisError> {
        let path = path
            .canonicalize()
            .map_err(|e| AnalysisError::new(path, e.to_string()))?;
        let parsed = load_clean(&mut self.session, &path)?;

        let name = resolve_name(parsed)
            .or_else(|| file_stem(&path))
            .ok_or_else(|| AnalysisError::new(&path, "no component identifier could be resolved"))?;

        let defaults = destructured_defaults(parsed, &name);
        let (fields, fields_documented) = extract_fields(parsed, &defaults);
        let has_documentation = fields_documented || has_top_level_docs(parsed);
        let dependencies = resolve_dependencies(parsed, &self.resolver);

        debug!(
            "Analyzed {} as '{}' ({} fields, {} deps)",
            path.display(),
            name,
            fields.len(),
            dependencies.len()
        );

        Ok(ComponentMetadata {
            name,
            file_path: path,
            fields,
            dependencies,
            has_documentation,
        })
    }
}

impl DependencySource for MetadataExtractor {
    fn direct_dependencies(&mut self, path: &Path) -> Result<Vec<PathBuf>> {
        let path = path.canonicalize()?;
        let parsed = load_clean(&mut self.session, &path)?;
        Ok(resolve_dependencies(parsed, &self.resolver))
    }
}

/// Load through the session, rejecting trees with syntax errors
fn load_clean<'s>(
    session: &'s mut ParseSession,
    path: &Path,
) -> std::result::Result<&'s ParsedFile, AnalysisError> {
    let parsed = session.load(path).map_err(|e| match e {
        DocsError::Analysis(inner) => inner,
        other => AnalysisError::new(path, other.to_string()),
    })?;

    if let Some(reason) = parsed.syntax_error() {
        return Err(AnalysisError::new(path, reason));
    }
    Ok(parsed)
}

// =============================================================================
// Name Resolution
// =============================================================================

fn resolve_name(parsed: &ParsedFile) -> Option<String> {
    exported_value_names(parsed)
        .into_iter()
        .find(|n| is_upper_camel(n))
}

/// Exported value identifiers in source order
fn exported_value_names(parsed: &ParsedFile) -> Vec<String> {
    let mut names = Vec::new();

    for stmt in named_children(parsed.root()) {
        if stmt.kind() != "export_statement" {
            continue;
        }

        if let Some(decl) = stmt.child_by_field_name("declaration") {
            match decl.kind() {
                "function_declaration"
                | "generator_function_declaration"
                | "function_signature"
                | "class_declaration"
                | "abstract_class_declaration"
                | "enum_declaration" => {
                    if let Some(name) = decl.child_by_field_name("name") {
                        names.push(parsed.text(name).to_string());
                    }
                }
                "lexical_declaration" | "variable_declaration" => {
                    names.extend(declarator_names(parsed, decl));
                }
                _ => {}
            }
        } else if let Some(value) = stmt.child_by_field_name("value") {
            if value.kind() == "identifier" {
                names.push(parsed.text(value).to_string());
            }
        } else {
            for clause in named_children(stmt) {
                if clause.kind() != "export_clause" {
                    continue;
                }
                for spec in named_children(clause) {
                    let exported = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(node) = exported {
                        names.push(parsed.text(node).to_string());
                    }
                }
            }
        }
    }

    names
}

fn declarator_names(parsed: &ParsedFile, decl: Node) -> Vec<String> {
    named_children(decl)
        .into_iter()
        .filter(|d| d.kind() == "variable_declarator")
        .filter_map(|d| d.child_by_field_name("name"))
        .filter(|n| n.kind() == "identifier")
        .map(|n| parsed.text(n).to_string())
        .collect()
}

/// `Button`, `DataGrid2`; not `button`, `MAX_SIZE`, `_Private`
fn is_upper_camel(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && !s.starts_with('.'))
        .map(String::from)
}

// =============================================================================
// Field Extraction
// =============================================================================

/// Top-level statements, with `export` wrappers unwrapped to their declaration
fn top_level_declarations<'t>(parsed: &'t ParsedFile) -> Vec<Node<'t>> {
    named_children(parsed.root())
        .into_iter()
        .filter_map(|stmt| match stmt.kind() {
            "export_statement" => stmt
                .child_by_field_name("declaration")
                .or_else(|| stmt.child_by_field_name("value")),
            "comment" => None,
            _ => Some(stmt),
        })
        .collect()
}

/// Props fields in declaration order, and whether any field has a doc comment
fn extract_fields(
    parsed: &ParsedFile,
    defaults: &HashMap<String, String>,
) -> (Vec<FieldMetadata>, bool) {
    let mut fields = Vec::new();
    let mut documented = false;

    for decl in top_level_declarations(parsed) {
        let Some(name) = decl.child_by_field_name("name") else {
            continue;
        };
        if !parsed.text(name).contains(PROPS_MARKER) {
            continue;
        }

        let bodies = match decl.kind() {
            "interface_declaration" => decl.child_by_field_name("body").into_iter().collect(),
            "type_alias_declaration" => decl
                .child_by_field_name("value")
                .map(object_types)
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        for body in bodies {
            for member in named_children(body) {
                if let Some((field, has_doc)) = member_field(parsed, member, defaults) {
                    documented |= has_doc;
                    fields.push(field);
                }
            }
        }
    }

    (fields, documented)
}

/// Object-shaped parts of a type alias value (`{..}`, `A & {..}`, `({..})`)
fn object_types(node: Node<'_>) -> Vec<Node<'_>> {
    match node.kind() {
        "object_type" => vec![node],
        "intersection_type" | "parenthesized_type" => named_children(node)
            .into_iter()
            .flat_map(object_types)
            .collect(),
        _ => Vec::new(),
    }
}

fn member_field(
    parsed: &ParsedFile,
    member: Node,
    defaults: &HashMap<String, String>,
) -> Option<(FieldMetadata, bool)> {
    let type_signature = match member.kind() {
        "property_signature" => member
            .child_by_field_name("type")
            .map(|annotation| annotation_type(parsed, annotation))
            .unwrap_or_else(|| UNTYPED_FIELD.to_string()),
        "method_signature" => {
            let params = member
                .child_by_field_name("parameters")
                .map(|p| parsed.text(p))
                .unwrap_or("()");
            let returns = member
                .child_by_field_name("return_type")
                .map(|r| annotation_type(parsed, r))
                .unwrap_or_else(|| "void".to_string());
            format!("{} => {}", params, returns)
        }
        _ => return None,
    };

    let name = unquote(parsed.text(member.child_by_field_name("name")?)).to_string();
    let required = !has_token(member, "?");
    let doc = doc_comment_before(member, parsed.source.as_bytes()).map(parse_doc_comment);
    let has_doc = doc.is_some();

    let (description, tag_default) = doc.unwrap_or_default();
    let default_value = defaults.get(&name).cloned().or(tag_default);

    let field = FieldMetadata {
        name,
        type_signature,
        required,
        description,
        default_value,
    };
    Some((field, has_doc))
}

/// Type text of a `: T` annotation, without the colon
fn annotation_type(parsed: &ParsedFile, annotation: Node) -> String {
    annotation
        .named_child(0)
        .map(|t| parsed.text(t))
        .unwrap_or_else(|| parsed.text(annotation).trim_start_matches(':'))
        .trim()
        .to_string()
}

/// Split a `/** ... */` comment into description and `@default` tag value.
///
/// The description is the text before the first tag line.
fn parse_doc_comment(raw: &str) -> (Option<String>, Option<String>) {
    let body = raw
        .trim()
        .trim_start_matches("/**")
        .trim_end_matches("*/");

    let mut description = Vec::new();
    let mut default_value = None;
    let mut in_tags = false;

    for line in body.lines() {
        let line = line.trim().trim_start_matches('*').trim();
        if let Some(tag) = line.strip_prefix('@') {
            in_tags = true;
            let (tag_name, rest) = tag.split_once(char::is_whitespace).unwrap_or((tag, ""));
            if matches!(tag_name, "default" | "defaultValue") && !rest.trim().is_empty() {
                default_value = Some(rest.trim().to_string());
            }
            continue;
        }
        if !in_tags && !line.is_empty() {
            description.push(line);
        }
    }

    let description = description.join(" ");
    let description = (!description.is_empty()).then_some(description);
    (description, default_value)
}

fn has_top_level_docs(parsed: &ParsedFile) -> bool {
    named_children(parsed.root())
        .into_iter()
        .filter(|n| n.kind() != "comment")
        .any(|stmt| doc_comment_before(stmt, parsed.source.as_bytes()).is_some())
}

// =============================================================================
// Default Values
// =============================================================================

/// Defaults from `function C({ a = 1 }: Props)` / `const C = ({ a = 1 }) => ..`
fn destructured_defaults(parsed: &ParsedFile, component: &str) -> HashMap<String, String> {
    let mut defaults = HashMap::new();

    let Some(function) = component_function(parsed, component) else {
        return defaults;
    };
    let Some(first_param) = function
        .child_by_field_name("parameters")
        .and_then(|p| p.named_child(0))
    else {
        return defaults;
    };
    let pattern = match first_param.kind() {
        "required_parameter" | "optional_parameter" => first_param.child_by_field_name("pattern"),
        "object_pattern" => Some(first_param),
        _ => None,
    };
    let Some(pattern) = pattern.filter(|p| p.kind() == "object_pattern") else {
        return defaults;
    };

    for prop in named_children(pattern) {
        let entry = match prop.kind() {
            "object_assignment_pattern" => prop
                .child_by_field_name("left")
                .zip(prop.child_by_field_name("right")),
            "pair_pattern" => prop.child_by_field_name("key").zip(
                prop.child_by_field_name("value")
                    .filter(|v| v.kind() == "assignment_pattern")
                    .and_then(|v| v.child_by_field_name("right")),
            ),
            _ => None,
        };
        if let Some((key, value)) = entry {
            defaults.insert(
                unquote(parsed.text(key)).to_string(),
                parsed.text(value).to_string(),
            );
        }
    }

    defaults
}

/// The function implementing the component, by name, else the default export
fn component_function<'t>(parsed: &'t ParsedFile, component: &str) -> Option<Node<'t>> {
    let mut default_export = None;

    for stmt in named_children(parsed.root()) {
        let decl = if stmt.kind() == "export_statement" {
            if let Some(value) = stmt.child_by_field_name("value") {
                default_export = default_export.or_else(|| unwrap_function(value));
                continue;
            }
            match stmt.child_by_field_name("declaration") {
                Some(decl) => decl,
                None => continue,
            }
        } else {
            stmt
        };

        match decl.kind() {
            "function_declaration" => {
                let named = decl
                    .child_by_field_name("name")
                    .is_some_and(|n| parsed.text(n) == component);
                if named {
                    return Some(decl);
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                for declarator in named_children(decl) {
                    let named = declarator
                        .child_by_field_name("name")
                        .is_some_and(|n| parsed.text(n) == component);
                    if named
                        && let Some(function) = declarator
                            .child_by_field_name("value")
                            .and_then(unwrap_function)
                    {
                        return Some(function);
                    }
                }
            }
            _ => {}
        }
    }

    default_export
}

/// Look through `memo(...)`, `forwardRef(...)` and parentheses for a function
fn unwrap_function(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "arrow_function" | "function_expression" | "function" | "function_declaration" => {
            Some(node)
        }
        "call_expression" => node
            .child_by_field_name("arguments")
            .and_then(|args| named_children(args).into_iter().find_map(unwrap_function)),
        "parenthesized_expression" => node.named_child(0).and_then(unwrap_function),
        _ => None,
    }
}

// =============================================================================
// Dependencies
// =============================================================================

fn resolve_dependencies(parsed: &ParsedFile, resolver: &ModuleResolver) -> Vec<PathBuf> {
    let language = parsed.dialect.language();
    let specifiers = query_captures(&language, IMPORT_QUERY, parsed.root(), parsed.source.as_bytes());

    let mut seen = HashSet::new();
    let mut dependencies = Vec::new();

    for raw in &specifiers {
        let specifier = unquote(raw);
        let Some(resolved) = resolver.resolve(&parsed.path, specifier) else {
            continue;
        };
        if resolved != parsed.path && seen.insert(resolved.clone()) {
            dependencies.push(resolved);
        }
    }

    dependencies
}
