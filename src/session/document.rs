//! The active document: one loaded digest plus the user's state over it.

use tracing::debug;

use crate::digest::ParsedDigest;

/// Where the active digest came from. Server files can be reloaded by name;
/// local uploads cannot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Server { filename: String },
    LocalUpload { filename: String },
}

impl DocumentSource {
    pub fn server(filename: impl Into<String>) -> Self {
        Self::Server { filename: filename.into() }
    }

    pub fn local(filename: impl Into<String>) -> Self {
        Self::LocalUpload { filename: filename.into() }
    }

    pub fn filename(&self) -> &str {
        match self {
            Self::Server { filename } | Self::LocalUpload { filename } => filename,
        }
    }
}

/// One digest's worth of state: the raw text, its parse (if the text was
/// recognized), the path open in the viewer, and the checkbox selection that
/// feeds the next prompt. Replaced wholesale on every load; two digests'
/// file sets are never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDocument {
    source: DocumentSource,
    raw: String,
    parsed: Option<ParsedDigest>,
    viewed_path: Option<String>,
    prompt_selected: Vec<String>,
}

impl ActiveDocument {
    /// Build a document from freshly loaded text. When the text parses, the
    /// prompt selection starts as every known path (opt-out, not opt-in).
    pub fn new(source: DocumentSource, raw: String, parsed: Option<ParsedDigest>) -> Self {
        let prompt_selected =
            parsed.as_ref().map(|p| p.file_paths.clone()).unwrap_or_default();
        Self { source, raw, parsed, viewed_path: None, prompt_selected }
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    /// The raw digest text, kept even when unparsed so the user can still
    /// inspect what was attached.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> Option<&ParsedDigest> {
        self.parsed.as_ref()
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }

    pub fn file_paths(&self) -> &[String] {
        self.parsed.as_ref().map(|p| p.file_paths.as_slice()).unwrap_or_default()
    }

    pub fn content(&self, path: &str) -> Option<&str> {
        self.parsed.as_ref().and_then(|p| p.content(path))
    }

    /// Open `path` in the viewer. Unknown paths clear the viewer instead of
    /// erroring; returns whether something is now being viewed.
    pub fn select_for_viewing(&mut self, path: &str) -> bool {
        if self.content(path).is_some() {
            self.viewed_path = Some(path.to_string());
            true
        } else {
            debug!(path, "viewer selection for a path the digest does not contain");
            self.viewed_path = None;
            false
        }
    }

    pub fn viewed_path(&self) -> Option<&str> {
        self.viewed_path.as_deref()
    }

    pub fn viewed_content(&self) -> Option<&str> {
        self.viewed_path.as_deref().and_then(|p| self.content(p))
    }

    /// Paths currently ticked for prompt inclusion, in stable order.
    pub fn selected_paths(&self) -> &[String] {
        &self.prompt_selected
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.prompt_selected.iter().any(|p| p == path)
    }

    /// Flip `path` in or out of the prompt selection. Paths the digest does
    /// not list are ignored.
    pub fn toggle_prompt_selection(&mut self, path: &str) {
        if !self.file_paths().iter().any(|p| p == path) {
            debug!(path, "selection toggle for a path the digest does not list");
            return;
        }
        if let Some(pos) = self.prompt_selected.iter().position(|p| p == path) {
            self.prompt_selected.remove(pos);
        } else {
            self.prompt_selected.push(path.to_string());
        }
    }

    pub fn select_all_prompt_files(&mut self) {
        self.prompt_selected =
            self.parsed.as_ref().map(|p| p.file_paths.clone()).unwrap_or_default();
    }

    pub fn deselect_all_prompt_files(&mut self) {
        self.prompt_selected.clear();
    }
}
