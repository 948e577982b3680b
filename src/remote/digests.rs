//! Digest source collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RemoteError;

/// One server-stored digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestEntry {
    pub filename: String,
    /// Repository identifier the digest was generated from, e.g. "owner/repo".
    pub repo: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Parameters for a new digest generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateRequest {
    pub repo_url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_globs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_globs: Vec<String>,
}

/// Server-side digest storage. Generation runs the packaging tool on the
/// server and can take a while; no client-side timeout is imposed here.
#[async_trait]
pub trait DigestStore: Send + Sync {
    async fn list_digests(&self) -> Result<Vec<DigestEntry>, RemoteError>;

    async fn fetch_digest(&self, filename: &str) -> Result<String, RemoteError>;

    async fn delete_digest(&self, filename: &str) -> Result<(), RemoteError>;

    async fn generate_digest(&self, request: &GenerateRequest)
        -> Result<DigestEntry, RemoteError>;
}
