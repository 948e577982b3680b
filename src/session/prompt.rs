//! Prompt composition.

use thiserror::Error;

use super::document::ActiveDocument;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("nothing to send: type a message, select files, or attach a digest")]
    NothingToSend,
}

/// Build the message text for the next chat turn: the selected files as a
/// tagged context block, then the user's instruction. Pure read; the
/// document is never mutated here.
///
/// When the user typed nothing but a context block or an attached document
/// exists, a placeholder instruction is substituted so the collaborator
/// always receives a non-empty instruction. Selected paths whose content is
/// missing from the digest are skipped, not inserted as empty segments.
pub fn compose(document: Option<&ActiveDocument>, typed: &str) -> Result<String, ComposeError> {
    let context = document.map(context_block).unwrap_or_default();
    let typed = typed.trim();

    let instruction = if !typed.is_empty() {
        typed.to_string()
    } else if let Some(doc) = document {
        let selected_with_content = doc
            .selected_paths()
            .iter()
            .filter(|p| doc.content(p).is_some())
            .count();
        if selected_with_content > 0 {
            format!(
                "Please review the {selected_with_content} selected file{} from this repository digest.",
                if selected_with_content == 1 { "" } else { "s" }
            )
        } else {
            format!("Please review the attached digest {}.", doc.source().filename())
        }
    } else {
        return Err(ComposeError::NothingToSend);
    };

    if context.is_empty() {
        Ok(instruction)
    } else {
        Ok(format!("{context}\n{instruction}"))
    }
}

fn context_block(doc: &ActiveDocument) -> String {
    let mut block = String::new();
    for path in doc.selected_paths() {
        let Some(content) = doc.content(path) else {
            continue;
        };
        block.push_str(&format!("<file path=\"{path}\">\n{content}\n</file>\n"));
    }
    if block.is_empty() {
        return block;
    }
    format!("These files from the repository are attached for context:\n\n{block}")
}
