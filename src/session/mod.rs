//! Session state: the active document, the comparison view, and the load
//! lifecycle that feeds them.
//!
//! One `Session` belongs to one signed-in user context; it is created at
//! sign-in and dropped at sign-out. All mutation goes through `&mut self`
//! on the single event-processing task, so there is no locking here.

pub mod compare;
pub mod document;
pub mod prompt;

pub use compare::{first_code_block, ComparisonView};
pub use document::{ActiveDocument, DocumentSource};
pub use prompt::{compose, ComposeError};

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::digest::parse_digest;
use crate::remote::{DigestStore, RemoteError};
use crate::utils::encoding::{decode_text, looks_binary};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no file named {0} in the active digest")]
    UnknownPath(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("could not read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} does not look like a text file")]
    BinaryUpload { path: String },
}

/// How an applied load resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A newer load was requested after this one; nothing changed.
    Superseded,
    /// The text parsed as a digest and is now active.
    Parsed { files: usize },
    /// The text is attached and viewable, but was not recognized as a
    /// digest; tree and selection features are unavailable.
    Unrecognized,
}

/// Stamp for one load request. Only the most recently issued ticket may
/// mutate the session when its result arrives.
#[derive(Debug)]
pub struct LoadTicket {
    seq: u64,
    source: DocumentSource,
}

/// Whether the surrounding UI should use the expanded layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Compact,
    Expanded,
}

#[derive(Debug, Default)]
pub struct Session {
    active: Option<ActiveDocument>,
    comparison: Option<ComparisonView>,
    load_seq: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&ActiveDocument> {
        self.active.as_ref()
    }

    pub fn document_mut(&mut self) -> Option<&mut ActiveDocument> {
        self.active.as_mut()
    }

    pub fn comparison(&self) -> Option<&ComparisonView> {
        self.comparison.as_ref()
    }

    /// Start a load. The returned ticket must be handed back to
    /// [`Session::apply_load`] together with the fetched text; issuing a
    /// newer ticket in the meantime invalidates this one.
    pub fn begin_load(&mut self, source: DocumentSource) -> LoadTicket {
        self.load_seq += 1;
        LoadTicket { seq: self.load_seq, source }
    }

    /// Resolve a load. Stale tickets are discarded without touching any
    /// state, whether they carry text or an error; the user only ever sees
    /// the outcome of the most recently requested load. A current load that
    /// failed clears the document entirely rather than leaving a
    /// half-populated one.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        text: Result<String, SessionError>,
    ) -> Result<LoadOutcome, SessionError> {
        if ticket.seq != self.load_seq {
            debug!(
                filename = ticket.source.filename(),
                "discarding superseded load response"
            );
            return Ok(LoadOutcome::Superseded);
        }

        let raw = match text {
            Ok(raw) => raw,
            Err(err) => {
                self.active = None;
                return Err(err);
            }
        };

        let parsed = parse_digest(&raw);
        let outcome = match &parsed {
            Some(digest) => LoadOutcome::Parsed { files: digest.file_count() },
            None => LoadOutcome::Unrecognized,
        };
        self.active = Some(ActiveDocument::new(ticket.source, raw, parsed));
        Ok(outcome)
    }

    /// Fetch a server-stored digest by filename and make it active.
    pub async fn load_from_server(
        &mut self,
        store: &dyn DigestStore,
        filename: &str,
    ) -> Result<LoadOutcome, SessionError> {
        let ticket = self.begin_load(DocumentSource::server(filename));
        let fetched = store.fetch_digest(filename).await.map_err(SessionError::from);
        self.apply_load(ticket, fetched)
    }

    /// Read a locally chosen file and make it active.
    pub async fn load_from_local(&mut self, path: &Path) -> Result<LoadOutcome, SessionError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let ticket = self.begin_load(DocumentSource::local(filename));

        let display = path.display().to_string();
        let text = match tokio::fs::read(path).await {
            Ok(bytes) if looks_binary(&bytes) => {
                Err(SessionError::BinaryUpload { path: display })
            }
            Ok(bytes) => Ok(decode_text(&bytes).0),
            Err(source) => Err(SessionError::Read { path: display, source }),
        };
        self.apply_load(ticket, text)
    }

    /// Drop the active document. The comparison keeps its snapshot until
    /// explicitly closed.
    pub fn detach(&mut self) {
        self.active = None;
    }

    /// Snapshot `path`'s current content against `suggested`. Fails without
    /// disturbing an existing comparison when the active digest has no such
    /// path.
    pub fn start_comparison(
        &mut self,
        path: &str,
        suggested: String,
    ) -> Result<&ComparisonView, SessionError> {
        let original = self
            .active
            .as_ref()
            .and_then(|doc| doc.content(path))
            .ok_or_else(|| SessionError::UnknownPath(path.to_string()))?
            .to_string();

        self.comparison = Some(ComparisonView {
            file_path: path.to_string(),
            original,
            suggested,
        });
        Ok(self.comparison.as_ref().expect("just set"))
    }

    pub fn close_comparison(&mut self) {
        self.comparison = None;
    }

    /// Expanded while a comparison is open or a parsed document is attached;
    /// compact once both are gone.
    pub fn layout(&self) -> LayoutMode {
        let doc_parsed = self.active.as_ref().is_some_and(ActiveDocument::is_parsed);
        if self.comparison.is_some() || doc_parsed {
            LayoutMode::Expanded
        } else {
            LayoutMode::Compact
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{ChatReply, DigestEntry, GenerateRequest};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::io::Write;

    const DIGEST_A: &str = "<directory_structure>\na.rs\nb.rs\nc.rs\n</directory_structure>\n<files>\n<file path=\"a.rs\">aa</file>\n<file path=\"b.rs\">bb</file>\n<file path=\"c.rs\">cc</file>\n</files>";
    const DIGEST_B: &str = "<directory_structure>\nonly.rs\n</directory_structure>\n<files>\n<file path=\"only.rs\">solo</file>\n</files>";

    struct FakeStore {
        digests: HashMap<String, String>,
    }

    impl FakeStore {
        fn with(entries: &[(&str, &str)]) -> Self {
            Self {
                digests: entries
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl DigestStore for FakeStore {
        async fn list_digests(&self) -> Result<Vec<DigestEntry>, RemoteError> {
            Ok(Vec::new())
        }

        async fn fetch_digest(&self, filename: &str) -> Result<String, RemoteError> {
            self.digests
                .get(filename)
                .cloned()
                .ok_or_else(|| RemoteError::NotFound(filename.to_string()))
        }

        async fn delete_digest(&self, _filename: &str) -> Result<(), RemoteError> {
            Ok(())
        }

        async fn generate_digest(
            &self,
            _request: &GenerateRequest,
        ) -> Result<DigestEntry, RemoteError> {
            Err(RemoteError::Transport("not implemented".into()))
        }
    }

    #[tokio::test]
    async fn test_server_load_attaches_and_selects_everything() {
        let store = FakeStore::with(&[("x.txt", DIGEST_A)]);
        let mut session = Session::new();

        let outcome = session.load_from_server(&store, "x.txt").await.expect("load");
        assert_eq!(outcome, LoadOutcome::Parsed { files: 3 });

        let doc = session.document().expect("active");
        assert_eq!(doc.source(), &DocumentSource::server("x.txt"));
        assert_eq!(doc.selected_paths().len(), 3);
        assert_eq!(session.layout(), LayoutMode::Expanded);
    }

    #[tokio::test]
    async fn test_failed_fetch_clears_document_and_surfaces_error() {
        let store = FakeStore::with(&[("x.txt", DIGEST_A)]);
        let mut session = Session::new();
        session.load_from_server(&store, "x.txt").await.expect("first load");

        let err = session.load_from_server(&store, "missing.txt").await.unwrap_err();
        assert!(matches!(err, SessionError::Remote(RemoteError::NotFound(_))));
        assert!(session.document().is_none());
        assert_eq!(session.layout(), LayoutMode::Compact);
    }

    #[tokio::test]
    async fn test_unrecognized_text_is_attached_but_unparsed() {
        let store = FakeStore::with(&[("notes.txt", "just some prose")]);
        let mut session = Session::new();

        let outcome = session.load_from_server(&store, "notes.txt").await.expect("load");
        assert_eq!(outcome, LoadOutcome::Unrecognized);

        let doc = session.document().expect("attached");
        assert!(!doc.is_parsed());
        assert_eq!(doc.raw(), "just some prose");
        assert_eq!(session.layout(), LayoutMode::Compact);
    }

    #[test]
    fn test_stale_response_is_discarded_regardless_of_arrival_order() {
        let mut session = Session::new();

        let ticket_x = session.begin_load(DocumentSource::server("x.txt"));
        let ticket_y = session.begin_load(DocumentSource::server("y.txt"));

        // Y was requested last and resolves first: applied.
        let outcome = session
            .apply_load(ticket_y, Ok(DIGEST_B.to_string()))
            .expect("apply y");
        assert_eq!(outcome, LoadOutcome::Parsed { files: 1 });

        // X arrives late: silently dropped, state still reflects Y.
        let outcome = session
            .apply_load(ticket_x, Ok(DIGEST_A.to_string()))
            .expect("apply x");
        assert_eq!(outcome, LoadOutcome::Superseded);
        assert_eq!(
            session.document().expect("doc").source(),
            &DocumentSource::server("y.txt")
        );
    }

    #[test]
    fn test_stale_failure_is_also_silent() {
        let mut session = Session::new();

        let ticket_old = session.begin_load(DocumentSource::server("old.txt"));
        let ticket_new = session.begin_load(DocumentSource::server("new.txt"));
        session
            .apply_load(ticket_new, Ok(DIGEST_A.to_string()))
            .expect("apply new");

        let outcome = session
            .apply_load(
                ticket_old,
                Err(SessionError::Remote(RemoteError::Transport("boom".into()))),
            )
            .expect("stale error swallowed");
        assert_eq!(outcome, LoadOutcome::Superseded);
        assert!(session.document().is_some());
    }

    #[test]
    fn test_comparison_snapshots_and_survives_reload() {
        let mut session = Session::new();
        let ticket = session.begin_load(DocumentSource::server("x.txt"));
        session.apply_load(ticket, Ok(DIGEST_A.to_string())).expect("load");

        session
            .start_comparison("a.rs", "rewritten".into())
            .expect("comparison");

        // Replacing the document must not rewrite the snapshot.
        let ticket = session.begin_load(DocumentSource::server("y.txt"));
        session.apply_load(ticket, Ok(DIGEST_B.to_string())).expect("reload");

        let view = session.comparison().expect("still open");
        assert_eq!(view.original, "aa");
        assert_eq!(view.suggested, "rewritten");
    }

    #[test]
    fn test_comparison_on_unknown_path_keeps_prior_view() {
        let mut session = Session::new();
        let ticket = session.begin_load(DocumentSource::server("x.txt"));
        session.apply_load(ticket, Ok(DIGEST_A.to_string())).expect("load");

        session.start_comparison("a.rs", "v1".into()).expect("first");
        let err = session.start_comparison("ghost.rs", "v2".into()).unwrap_err();
        assert!(matches!(err, SessionError::UnknownPath(p) if p == "ghost.rs"));

        let view = session.comparison().expect("prior survives");
        assert_eq!(view.file_path, "a.rs");
        assert_eq!(view.suggested, "v1");
    }

    #[test]
    fn test_failed_comparison_with_none_open_stays_absent() {
        let mut session = Session::new();
        let err = session.start_comparison("a.rs", "v".into()).unwrap_err();
        assert!(matches!(err, SessionError::UnknownPath(_)));
        assert!(session.comparison().is_none());
    }

    #[test]
    fn test_layout_reverts_only_when_both_are_gone() {
        let mut session = Session::new();
        assert_eq!(session.layout(), LayoutMode::Compact);

        let ticket = session.begin_load(DocumentSource::server("x.txt"));
        session.apply_load(ticket, Ok(DIGEST_A.to_string())).expect("load");
        session.start_comparison("a.rs", "s".into()).expect("comparison");

        // Closing the comparison while a document is attached keeps the
        // expanded layout.
        session.close_comparison();
        assert_eq!(session.layout(), LayoutMode::Expanded);

        // Detaching with a comparison open also keeps it.
        session.start_comparison("a.rs", "s".into()).expect("comparison");
        session.detach();
        assert_eq!(session.layout(), LayoutMode::Expanded);

        session.close_comparison();
        assert_eq!(session.layout(), LayoutMode::Compact);
    }

    #[tokio::test]
    async fn test_local_upload_reads_and_parses() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp");
        file.write_all(DIGEST_A.as_bytes()).expect("write");
        file.flush().expect("flush");

        let mut session = Session::new();
        let outcome = session.load_from_local(file.path()).await.expect("load");
        assert_eq!(outcome, LoadOutcome::Parsed { files: 3 });
        assert!(matches!(
            session.document().expect("doc").source(),
            DocumentSource::LocalUpload { .. }
        ));
    }

    #[tokio::test]
    async fn test_binary_upload_is_rejected_recoverably() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp");
        file.write_all(&[0x00, 0x01, 0xff, 0x00]).expect("write");
        file.flush().expect("flush");

        let mut session = Session::new();
        let err = session.load_from_local(file.path()).await.unwrap_err();
        assert!(matches!(err, SessionError::BinaryUpload { .. }));
        assert!(session.document().is_none());
    }

    #[test]
    fn test_reply_code_block_feeds_comparison() {
        let mut session = Session::new();
        let ticket = session.begin_load(DocumentSource::server("x.txt"));
        session.apply_load(ticket, Ok(DIGEST_A.to_string())).expect("load");

        let reply = ChatReply {
            text: "Try this:\n\n```rust\nlet fixed = true;\n```\n".into(),
            model: "test".into(),
            usage: Default::default(),
            cost_usd: None,
        };
        let suggested = first_code_block(&reply.text).expect("block");
        let view = session.start_comparison("b.rs", suggested).expect("comparison");
        assert_eq!(view.original, "bb");
        assert_eq!(view.suggested, "let fixed = true;\n");
    }
}
