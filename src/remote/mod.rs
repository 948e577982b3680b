//! Collaborator interfaces for the digest service and the hosted LLM,
//! plus the HTTP client that implements both.
//!
//! Everything user-facing here is a recognized, recoverable failure; the
//! enums below force callers to handle both branches instead of probing
//! optional fields.

pub mod chat;
pub mod digests;
pub mod http;

pub use chat::{
    available_models, estimate_cost, ChatBackend, ChatError, ChatMessage, ChatReply, ChatRole,
    ModelInfo, TokenUsage, DEFAULT_MODEL,
};
pub use digests::{DigestEntry, DigestStore, GenerateRequest};
pub use http::ApiClient;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("not signed in, or the access token was rejected")]
    Unauthorized,

    #[error("digest not found: {0}")]
    NotFound(String),

    #[error("server error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Transport(err.to_string())
    }
}
