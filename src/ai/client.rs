//! LLM (`OpenAI`) API client module
//!
//! Encapsulates the chat-completion call behind the [`LanguageModel`] seam.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

use crate::core::config::AppConfig;
use crate::core::models::{Role, Turn};
use crate::errors::ChainError;

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Request/response boundary to a chat model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ChainError::Capability`] on transport, auth, quota or
    /// malformed-response failures.
    async fn invoke(&self, conversation: &[Turn]) -> Result<String, ChainError>;
}

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

#[must_use]
pub fn wire_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::Human => "user",
        Role::Ai => "assistant",
        Role::Function => "function",
    }
}

pub fn wire_message(turn: &Turn) -> Value {
    let mut message = json!({
        "role": wire_role(turn.role),
        "content": turn.content,
    });

    if let Some(call) = &turn.function_call {
        message["function_call"] = json!({
            "name": call.name,
            "arguments": call.arguments,
        });
    }

    message
}

/// Pull `choices[0].message.content` out of a chat-completion response.
pub fn extract_completion_text(response: &Value) -> Option<String> {
    response
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(ToString::to_string)
}

/// Chat-completion client for any `OpenAI`-compatible endpoint.
pub struct LlmClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    base_url: String,
    temperature: f32,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ChainError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            api_key: config.openai_api_key.clone(),
            org_id: config.openai_org_id.clone(),
            model_name: config.openai_model.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
        })
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub fn request_body(&self, conversation: &[Turn]) -> Value {
        let messages: Vec<Value> = conversation.iter().map(wire_message).collect();

        json!({
            "model": self.model_name,
            "messages": messages,
            "temperature": self.temperature,
        })
    }

    fn headers(&self) -> Result<HeaderMap, ChainError> {
        let invalid = |e: reqwest::header::InvalidHeaderValue| {
            ChainError::Config(format!("Invalid header value: {}", e))
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(invalid)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(org) = &self.org_id {
            headers.insert("OpenAI-Organization", HeaderValue::from_str(org).map_err(invalid)?);
        }

        Ok(headers)
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn invoke(&self, conversation: &[Turn]) -> Result<String, ChainError> {
        #[cfg(feature = "debug-logs")]
        info!("Using chat prompt:\n{:?}", conversation);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            "Calling model {} with {} messages",
            self.model_name,
            conversation.len()
        );

        let estimated_input_tokens = conversation
            .iter()
            .map(|turn| estimate_tokens(&turn.content))
            .sum::<usize>();
        debug!("Estimated input tokens: {}", estimated_input_tokens);

        let response = self
            .http
            .post(self.endpoint())
            .headers(self.headers()?)
            .json(&self.request_body(conversation))
            .send()
            .await
            .map_err(|e| ChainError::Capability(format!("Chat request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChainError::Capability(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            ChainError::Capability(format!("Failed to parse chat response: {}", e))
        })?;

        extract_completion_text(&response_json)
            .ok_or_else(|| ChainError::Capability("No text in response".to_string()))
    }
}
