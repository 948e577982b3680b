//! LLM collaborator: conversation types, failure taxonomy, and the small
//! model/pricing catalog used for cost display.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::RemoteError;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub model: String,
    #[serde(default)]
    pub usage: TokenUsage,
    /// Server-computed cost; when absent, [`estimate_cost`] can fill in.
    #[serde(default)]
    pub cost_usd: Option<f64>,
}

/// Recognized converse failures. All of these are recoverable: the caller
/// shows a message and keeps its state.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no API key is configured for this account")]
    MissingApiKey,

    #[error("the configured API key was rejected by the provider")]
    InvalidApiKey,

    #[error("the provider declined this request: {0}")]
    Blocked(String),

    #[error("the reply was cut off at the model's output limit")]
    Truncated,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Hosted conversation endpoint. The composer produces `message`; history,
/// model choice, and cost recording stay with the caller.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn converse(
        &self,
        history: &[ChatMessage],
        message: &str,
        model: &str,
    ) -> Result<ChatReply, ChatError>;
}

/// One selectable model with its per-million-token prices in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
}

const MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "claude-opus-4-20250514",
        label: "Claude Opus 4",
        input_per_mtok: 15.0,
        output_per_mtok: 75.0,
    },
    ModelInfo {
        id: "claude-sonnet-4-20250514",
        label: "Claude Sonnet 4",
        input_per_mtok: 3.0,
        output_per_mtok: 15.0,
    },
    ModelInfo {
        id: "claude-3-5-haiku-20241022",
        label: "Claude Haiku 3.5",
        input_per_mtok: 0.8,
        output_per_mtok: 4.0,
    },
];

pub fn available_models() -> &'static [ModelInfo] {
    MODELS
}

/// Price a usage record against the catalog. Unknown models price as `None`
/// rather than zero so the caller can say "unknown" instead of "free".
pub fn estimate_cost(model: &str, usage: &TokenUsage) -> Option<f64> {
    let info = MODELS.iter().find(|m| m.id == model)?;
    Some(
        usage.input_tokens as f64 / 1_000_000.0 * info.input_per_mtok
            + usage.output_tokens as f64 / 1_000_000.0 * info.output_per_mtok,
    )
}
