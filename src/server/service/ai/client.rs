//! HTTP client for OpenAI-compatible chat completion endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::server::{
    error::ai::AiError,
    service::ai::{ChatCompletion, ChatRequest},
};

/// Chat completion backed by `{base_url}/chat/completions` with bearer authentication.
pub struct HttpChatCompletion {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpChatCompletion {
    /// Creates a client for the given endpoint.
    ///
    /// # Arguments
    /// - `client` - Shared HTTP client
    /// - `base_url` - API root such as `https://api.deepseek.com/v1`
    /// - `api_key` - Bearer token; `None` makes every call fail with `AiError::NotConfigured`
    /// - `model` - Model name sent with each request
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
        model: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionReply {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatCompletion for HttpChatCompletion {
    async fn complete(&self, request: ChatRequest) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::NotConfigured)?;

        let body = CompletionBody {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: &request.system,
                },
                Message {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: CompletionReply = response.json().await?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AiError::EmptyCompletion)
    }
}
