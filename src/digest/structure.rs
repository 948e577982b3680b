//! Directory-structure decoding.
//!
//! The structure section comes in two notations. Flat: every non-empty line
//! is already a complete relative path. Indented: leading whitespace encodes
//! nesting depth, directory lines end in `/`. The mode is chosen once per
//! block from the first non-empty line and applies to the whole block.

use tracing::warn;

/// Columns per nesting level in the indented notation.
pub const INDENT_WIDTH: usize = 2;

/// Decode a directory-structure block into file paths in encounter order.
///
/// Lines ending in `/` denote directories and never appear in the output.
/// Duplicates are preserved; an empty block decodes to an empty list.
pub fn decode_structure(block: &str) -> Vec<String> {
    let Some(first) = block.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return Vec::new();
    };

    if first.contains('/') && !first.ends_with('/') {
        decode_flat(block)
    } else {
        decode_indented(block)
    }
}

fn decode_flat(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        // A trailing separator marks an empty directory, not a file.
        .filter(|line| !line.ends_with('/'))
        .map(str::to_string)
        .collect()
}

fn decode_indented(block: &str) -> Vec<String> {
    let mut stack: Vec<String> = Vec::new();
    let mut paths = Vec::new();

    for line in block.lines() {
        let name = line.trim();
        if name.is_empty() {
            continue;
        }

        let indent = line.chars().take_while(|c| c.is_whitespace()).count();
        if indent % INDENT_WIDTH != 0 {
            warn!(line, indent, "irregular indentation in directory structure");
        }
        let mut depth = indent / INDENT_WIDTH;
        if depth > stack.len() {
            // Deeper than any directory we have seen: decode it at the
            // deepest known level instead of dropping the entry.
            warn!(line, depth, expected = stack.len(), "indentation skips a level");
            depth = stack.len();
        }
        stack.truncate(depth);

        if let Some(dir) = name.strip_suffix('/') {
            stack.push(dir.to_string());
        } else if stack.is_empty() {
            paths.push(name.to_string());
        } else {
            paths.push(format!("{}/{}", stack.join("/"), name));
        }
    }

    paths
}
