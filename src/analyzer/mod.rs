//! Code Analyzer Module
//!
//! Component source analysis:
//! - Content fingerprinting
//! - Tree-sitter parse session (TypeScript / TSX)
//! - Import resolution and metadata extraction
//! - Component file scanning

pub mod extractor;
pub mod fingerprint;
pub mod resolver;
pub mod scanner;
pub mod session;
pub mod syntax;

pub use extractor::{DependencySource, MetadataExtractor};
pub use fingerprint::{fingerprint_bytes, fingerprint_file, path_key};
pub use resolver::ModuleResolver;
pub use scanner::ComponentScanner;
pub use session::{Dialect, ParseSession, ParsedFile};
