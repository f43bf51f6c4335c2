//! Documentation Rendering
//!
//! Turns extracted [`ComponentMetadata`] into a markdown page per component.
//! The orchestrator only sees the [`DocumentRenderer`] trait.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::{ComponentMetadata, DocsError, FieldMetadata, Result};

/// Writes documentation for one component and returns the written path
pub trait DocumentRenderer {
    /// `enrich` asks for the extended page (usage example); renderers may ignore it
    fn render(&mut self, metadata: &ComponentMetadata, enrich: bool) -> Result<PathBuf>;
}

/// Markdown page per component at `<output_dir>/<Name>.md`
pub struct MarkdownRenderer {
    output_dir: PathBuf,
    project_root: Option<PathBuf>,
}

impl MarkdownRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            project_root: None,
        }
    }

    /// Source paths are shown relative to this root
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    pub fn page_path(&self, metadata: &ComponentMetadata) -> PathBuf {
        self.output_dir.join(format!("{}.md", metadata.name))
    }

    fn display_path<'a>(&self, path: &'a Path) -> std::borrow::Cow<'a, str> {
        self.project_root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path)
            .to_string_lossy()
    }

    pub fn to_markdown(&self, metadata: &ComponentMetadata, enrich: bool) -> String {
        let mut md = String::new();

        md.push_str(&format!("# {}\n\n", metadata.name));
        md.push_str(&format!(
            "Source: `{}`\n\n",
            self.display_path(&metadata.file_path)
        ));

        md.push_str("## Props\n\n");
        if metadata.fields.is_empty() {
            md.push_str("_This component declares no props._\n");
        } else {
            md.push_str("| Name | Type | Required | Default | Description |\n");
            md.push_str("|------|------|----------|---------|-------------|\n");
            for field in &metadata.fields {
                md.push_str(&props_row(field));
            }
        }

        if !metadata.dependencies.is_empty() {
            md.push_str("\n## Dependencies\n\n");
            for dep in &metadata.dependencies {
                md.push_str(&format!("- `{}`\n", self.display_path(dep)));
            }
        }

        if enrich {
            md.push_str("\n## Usage\n\n```tsx\n");
            md.push_str(&usage_example(metadata));
            md.push_str("```\n");
        }

        md
    }
}

impl DocumentRenderer for MarkdownRenderer {
    fn render(&mut self, metadata: &ComponentMetadata, enrich: bool) -> Result<PathBuf> {
        let page = self.page_path(metadata);
        let markdown = self.to_markdown(metadata, enrich);

        fs::create_dir_all(&self.output_dir)
            .and_then(|_| fs::write(&page, markdown))
            .map_err(|e| DocsError::render(&metadata.name, e.to_string()))?;

        debug!("Rendered {} -> {}", metadata.name, page.display());
        Ok(page)
    }
}

fn props_row(field: &FieldMetadata) -> String {
    format!(
        "| `{}` | `{}` | {} | {} | {} |\n",
        field.name,
        escape_cell(&field.type_signature),
        if field.required { "yes" } else { "no" },
        field
            .default_value
            .as_deref()
            .map(|d| format!("`{}`", escape_cell(d)))
            .unwrap_or_else(|| "-".to_string()),
        field
            .description
            .as_deref()
            .map(|d| escape_cell(&d.replace('\n', " ")))
            .unwrap_or_default(),
    )
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn usage_example(metadata: &ComponentMetadata) -> String {
    let mut attrs = Vec::new();
    let mut children = false;

    for field in metadata.required_fields() {
        if field.name == "children" {
            children = true;
        } else {
            attrs.push(format!(" {}={{...}}", field.name));
        }
    }

    if children {
        format!(
            "<{name}{}>...</{name}>\n",
            attrs.concat(),
            name = metadata.name
        )
    } else {
        format!("<{}{} />\n", metadata.name, attrs.concat())
    }
}
