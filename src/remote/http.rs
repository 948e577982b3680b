//! HTTP implementation of the collaborator traits.
//!
//! The surrounding service authenticates with a per-user bearer token; this
//! client only attaches it. Timeouts and retries are the server's concern.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::chat::{ChatBackend, ChatError, ChatMessage, ChatReply};
use super::digests::{DigestEntry, DigestStore, GenerateRequest};
use super::RemoteError;

pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: String,
    #[serde(default)]
    message: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn expect_success(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(RemoteError::Unauthorized);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::Api { status: status.as_u16(), message })
    }
}

#[async_trait]
impl DigestStore for ApiClient {
    async fn list_digests(&self) -> Result<Vec<DigestEntry>, RemoteError> {
        let response = self.request(self.http.get(self.url("api/digests"))).send().await?;
        Ok(self.expect_success(response).await?.json().await?)
    }

    async fn fetch_digest(&self, filename: &str) -> Result<String, RemoteError> {
        let url = self.url(&format!("api/digests/{filename}"));
        let response = self.request(self.http.get(url)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(filename.to_string()));
        }
        Ok(self.expect_success(response).await?.text().await?)
    }

    async fn delete_digest(&self, filename: &str) -> Result<(), RemoteError> {
        let url = self.url(&format!("api/digests/{filename}"));
        let response = self.request(self.http.delete(url)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(filename.to_string()));
        }
        self.expect_success(response).await?;
        Ok(())
    }

    async fn generate_digest(
        &self,
        request: &GenerateRequest,
    ) -> Result<DigestEntry, RemoteError> {
        debug!(repo_url = %request.repo_url, "requesting digest generation");
        let response = self
            .request(self.http.post(self.url("api/digests")).json(request))
            .send()
            .await?;
        Ok(self.expect_success(response).await?.json().await?)
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn converse(
        &self,
        history: &[ChatMessage],
        message: &str,
        model: &str,
    ) -> Result<ChatReply, ChatError> {
        let mut messages: Vec<ChatMessage> = history.to_vec();
        messages.push(ChatMessage::user(message));

        let body = serde_json::json!({ "messages": messages, "model": model });
        let response = self
            .request(self.http.post(self.url("api/chat")).json(&body))
            .send()
            .await
            .map_err(RemoteError::from)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(chat_error_from(status.as_u16(), &text));
        }

        Ok(response.json().await.map_err(RemoteError::from)?)
    }
}

/// Map a failed chat response onto the recognized failure taxonomy. Bodies
/// the server did not shape as `{"error": {...}}` fall through to the
/// generic API error.
fn chat_error_from(status: u16, body: &str) -> ChatError {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return match parsed.error.code.as_str() {
            "api_key_missing" => ChatError::MissingApiKey,
            "api_key_invalid" => ChatError::InvalidApiKey,
            "content_blocked" => ChatError::Blocked(parsed.error.message),
            "reply_truncated" => ChatError::Truncated,
            _ => ChatError::Remote(RemoteError::Api { status, message: parsed.error.message }),
        };
    }
    if status == 401 {
        return ChatError::Remote(RemoteError::Unauthorized);
    }
    ChatError::Remote(RemoteError::Api { status, message: body.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_codes_map_to_variants() {
        let body = r#"{"error":{"code":"api_key_missing","message":"no key"}}"#;
        assert!(matches!(chat_error_from(400, body), ChatError::MissingApiKey));

        let body = r#"{"error":{"code":"api_key_invalid","message":""}}"#;
        assert!(matches!(chat_error_from(403, body), ChatError::InvalidApiKey));

        let body = r#"{"error":{"code":"content_blocked","message":"policy"}}"#;
        assert!(matches!(chat_error_from(400, body), ChatError::Blocked(m) if m == "policy"));

        let body = r#"{"error":{"code":"reply_truncated","message":""}}"#;
        assert!(matches!(chat_error_from(200, body), ChatError::Truncated));
    }

    #[test]
    fn test_unshaped_error_body_falls_back_to_api_error() {
        let err = chat_error_from(500, "Internal Server Error");
        assert!(matches!(
            err,
            ChatError::Remote(RemoteError::Api { status: 500, .. })
        ));
    }

    #[test]
    fn test_bare_unauthorized_maps_without_a_body() {
        assert!(matches!(
            chat_error_from(401, ""),
            ChatError::Remote(RemoteError::Unauthorized)
        ));
    }

    #[test]
    fn test_url_joining_tolerates_trailing_slash() {
        let client = ApiClient::new("https://digests.example/", None);
        assert_eq!(client.url("api/digests"), "https://digests.example/api/digests");
        assert_eq!(client.url("/api/chat"), "https://digests.example/api/chat");
    }
}
