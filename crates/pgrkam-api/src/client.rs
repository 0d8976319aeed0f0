//! HTTP client for the chat endpoint

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

use crate::{
    error::{Error, Result},
    types::{ChatRequest, ChatResponse, ErrorDetail},
};

/// Default endpoint base, matching the development server
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Trait for anything that can answer a chat turn
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Send one user turn and wait for the assistant reply
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

/// reqwest-backed chat client
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatClient {
    /// Create a client for an endpoint base such as `http://localhost:8000`
    /// or `https://host/api/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client with a total request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(base_url).with_client(client))
    }

    /// Replace the underlying reqwest client
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the chat endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/chat", self.base_url)
    }
}

impl Default for HttpChatClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl ChatApi for HttpChatClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.endpoint();
        if reqwest::Url::parse(&url).is_err() {
            return Err(Error::InvalidConfig(format!("invalid chat endpoint: {}", url)));
        }

        tracing::debug!(
            url = %url,
            language = %request.language,
            history = request.history.len(),
            has_session = request.session_id.is_some(),
            "sending chat request"
        );

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorDetail>()
                .await
                .ok()
                .and_then(|d| d.detail);
            tracing::debug!(status = status.as_u16(), ?detail, "chat request rejected");
            return Err(Error::server(status.as_u16(), detail));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(Error::UnexpectedResponse("empty response body".into()));
        }

        let reply: ChatResponse = serde_json::from_str(&body)?;
        tracing::debug!(
            response_id = %reply.response_id,
            session_id = %reply.session_id,
            "chat reply received"
        );
        Ok(reply)
    }
}
