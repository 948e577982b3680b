//! Digest parsing.
//!
//! A digest is the tagged text document produced by the packaging service:
//! a directory-structure section wrapped in its own delimiter pair, plus a
//! files section of repeated `<file path="...">` blocks. This module turns
//! that text back into a file list and a path -> content map. Everything
//! here is pure and synchronous; malformed input degrades, it never panics.

pub mod parser;
pub mod structure;
pub mod tree;

pub use parser::parse_digest;
pub use structure::decode_structure;
pub use tree::render_tree;

use serde::Serialize;
use std::collections::HashMap;

/// Marker pair delimiting the directory-structure section.
pub const STRUCTURE_OPEN: &str = "<directory_structure>";
pub const STRUCTURE_CLOSE: &str = "</directory_structure>";

/// Marker pair delimiting the files section.
pub const FILES_OPEN: &str = "<files>";
pub const FILES_CLOSE: &str = "</files>";

/// Structured form of a digest.
///
/// `file_paths` preserves the order of first appearance in the directory
/// listing and is not de-duplicated. `file_contents` keys are exact path
/// strings from the file blocks. The two come from independent passes over
/// different sections, so they may disagree; consumers must tolerate paths
/// without content and content without a path entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedDigest {
    pub file_paths: Vec<String>,
    pub file_contents: HashMap<String, String>,
}

impl ParsedDigest {
    /// Raw content for `path`, if a file block carried it.
    pub fn content(&self, path: &str) -> Option<&str> {
        self.file_contents.get(path).map(String::as_str)
    }

    pub fn file_count(&self) -> usize {
        self.file_paths.len()
    }
}
