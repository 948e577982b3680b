//! Side-by-side comparison of an original file and a suggested rewrite.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

/// An original/suggested pairing for one path. `original` is a snapshot
/// taken when the comparison started; later document changes do not touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonView {
    pub file_path: String,
    pub original: String,
    pub suggested: String,
}

/// Pull the first non-empty fenced or indented code block out of an
/// assistant reply, for feeding into a comparison.
pub fn first_code_block(markdown: &str) -> Option<String> {
    let mut buf = String::new();
    let mut in_block = false;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                if let CodeBlockKind::Fenced(_) | CodeBlockKind::Indented = kind {
                    in_block = true;
                    buf.clear();
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if in_block && !buf.trim().is_empty() {
                    return Some(buf);
                }
                in_block = false;
            }
            Event::Text(text) if in_block => buf.push_str(&text),
            _ => {}
        }
    }

    None
}
