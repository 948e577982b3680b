//! Digest text parsing.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::structure::decode_structure;
use super::{ParsedDigest, FILES_CLOSE, FILES_OPEN, STRUCTURE_CLOSE, STRUCTURE_OPEN};

// One newline after the open tag belongs to the markup; everything else in
// the body is verbatim. Non-greedy so an unterminated block never swallows
// the well-formed blocks after it.
static FILE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<file path="([^"]*)">\n?(.*?)</file>"#).expect("file block pattern")
});

/// Parse digest text into a [`ParsedDigest`].
///
/// Returns `None` only when either outer delimiter pair is absent, which
/// callers treat as "attached but not recognized as structured". Disagreement
/// between the directory listing and the file blocks is not an error; both
/// sides are emitted as-is. A path attribute appearing twice resolves to the
/// later block's content.
pub fn parse_digest(raw: &str) -> Option<ParsedDigest> {
    let structure = section(raw, STRUCTURE_OPEN, STRUCTURE_CLOSE)?;
    let files = section(raw, FILES_OPEN, FILES_CLOSE)?;

    let file_paths = decode_structure(structure);

    let mut digest = ParsedDigest { file_paths, ..Default::default() };
    for cap in FILE_BLOCK.captures_iter(files) {
        digest.file_contents.insert(cap[1].to_string(), cap[2].to_string());
    }

    if digest.file_paths.len() != digest.file_contents.len() {
        debug!(
            listed = digest.file_paths.len(),
            bodies = digest.file_contents.len(),
            "directory listing and file blocks disagree"
        );
    }

    Some(digest)
}

fn section<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = text.find(open)? + open.len();
    let end = text[start..].find(close)?;
    Some(&text[start..start + end])
}
