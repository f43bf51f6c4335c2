//! Tree-sitter helpers shared by the session, extractor and resolver.

use tree_sitter::{Language, Node, Query, QueryCursor, StreamingIterator};

use crate::types::{DocsError, Result};

/// Create a tree-sitter parser for the given language.
pub fn create_ts_parser<L: Into<Language>>(language: L, lang_name: &str) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.into())
        .map_err(|e| DocsError::Config(format!("Failed to set {} language: {}", lang_name, e)))?;
    Ok(parser)
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}-{}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            node.end_position().row + 1,
            node.end_position().column,
            e
        );
        ""
    })
}

/// Execute a query and collect the text of every capture, in match order.
pub fn query_captures(language: &Language, query_str: &str, root: Node, source: &[u8]) -> Vec<String> {
    let mut results = Vec::new();

    match Query::new(language, query_str) {
        Ok(query) => {
            let mut cursor = QueryCursor::new();
            let mut matches = cursor.matches(&query, root, source);

            while let Some(m) = matches.next() {
                for cap in m.captures.iter() {
                    results.push(node_text(cap.node, source).to_string());
                }
            }
        }
        Err(e) => tracing::debug!("Invalid query: {}", e),
    }

    results
}

/// Named children of a node, collected.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Whether a node has an anonymous child token of the given kind (e.g. `?`).
pub fn has_token(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| !c.is_named() && c.kind() == kind);
    found
}

/// The `/** ... */` comment attached directly before a node, if any.
///
/// Only JSDoc-style block comments count; line comments and plain block
/// comments are ignored.
pub fn doc_comment_before<'a>(node: Node, source: &'a [u8]) -> Option<&'a str> {
    let prev = node.prev_named_sibling()?;
    if prev.kind() != "comment" {
        return None;
    }
    let text = node_text(prev, source);
    text.starts_with("/**").then_some(text)
}

/// First syntax error or missing node in a subtree, depth-first.
pub fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Strip quotes from a string literal node's text.
pub fn unquote(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser =
            create_ts_parser(tree_sitter_typescript::LANGUAGE_TYPESCRIPT, "TypeScript").unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_query_captures_imports() {
        let source = "import a from './a';\nimport { b } from \"b\";\n";
        let tree = parse(source);
        let language: Language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();
        let sources = query_captures(
            &language,
            "(import_statement source: (string) @source)",
            tree.root_node(),
            source.as_bytes(),
        );
        let sources: Vec<_> = sources.iter().map(|s| unquote(s)).collect();
        assert_eq!(sources, vec!["./a", "b"]);
    }

    #[test]
    fn test_doc_comment_before() {
        let source = "/** Primary button */\nexport function Button() {}\n// plain\nexport const x = 1;\n";
        let tree = parse(source);
        let root = tree.root_node();
        let statements = named_children(root);
        let exports: Vec<_> = statements
            .iter()
            .filter(|n| n.kind() == "export_statement")
            .collect();

        assert_eq!(
            doc_comment_before(*exports[0], source.as_bytes()),
            Some("/** Primary button */")
        );
        assert_eq!(doc_comment_before(*exports[1], source.as_bytes()), None);
    }

    #[test]
    fn test_first_error_found() {
        let tree = parse("export const = ;");
        assert!(tree.root_node().has_error());
        assert!(first_error(tree.root_node()).is_some());

        let clean = parse("export const a = 1;");
        assert!(first_error(clean.root_node()).is_none());
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'./a'"), "./a");
        assert_eq!(unquote("\"react\""), "react");
    }
}
