//! Component Metadata
//!
//! Structured description of a component source file's public interface.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Derived description of one component source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    /// Component identifier (first upper-camel-case export, else file stem)
    pub name: String,
    /// Absolute path of the source file
    pub file_path: PathBuf,
    /// Props fields in declaration order
    pub fields: Vec<FieldMetadata>,
    /// Direct project-local imports, de-duplicated in first-seen order
    pub dependencies: Vec<PathBuf>,
    /// Whether any field or top-level declaration carries a doc comment
    pub has_documentation: bool,
}

impl ComponentMetadata {
    pub fn new(name: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            file_path: file_path.into(),
            fields: Vec::new(),
            dependencies: Vec::new(),
            has_documentation: false,
        }
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldMetadata> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A single props field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub name: String,
    /// Declared type as written in source; never interpreted
    pub type_signature: String,
    pub required: bool,
    pub description: Option<String>,
    /// Best-effort; absent does not mean there is no runtime default
    pub default_value: Option<String>,
}

impl FieldMetadata {
    pub fn new(name: impl Into<String>, type_signature: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            type_signature: type_signature.into(),
            required,
            description: None,
            default_value: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields() {
        let mut meta = ComponentMetadata::new("Button", "/src/Button.tsx");
        meta.fields.push(FieldMetadata::new("children", "ReactNode", true));
        meta.fields
            .push(FieldMetadata::new("variant", "'primary' | 'ghost'", false).with_default("'primary'"));

        let required: Vec<_> = meta.required_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(required, vec!["children"]);
        assert_eq!(
            meta.field("variant").and_then(|f| f.default_value.as_deref()),
            Some("'primary'")
        );
    }

    #[test]
    fn test_metadata_serialization() {
        let mut meta = ComponentMetadata::new("Card", "/src/Card.tsx");
        meta.dependencies.push(PathBuf::from("/src/types.ts"));
        meta.fields
            .push(FieldMetadata::new("title", "string", true).with_description("Card heading"));

        let json = serde_json::to_string(&meta).unwrap();
        let back: ComponentMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
