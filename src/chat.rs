//! ============================================================================
//! Chat Proxy - Studio assistant via an OpenAI-compatible chat API
//! ============================================================================
//! One utterance in, one reply out. Any failure (no key, network, bad status,
//! unparseable body) becomes FALLBACK_REPLY; callers never see an error.
//! No retries, no timeout, no request queueing.
//! ============================================================================

use crate::config::Config;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Reply shown whenever the assistant cannot be reached
pub const FALLBACK_REPLY: &str =
    "Sorry, I can't reach our assistant right now. Please try again in a moment, or send us a booking request and we'll get back to you.";

const SYSTEM_PROMPT: &str = "You are the assistant for KFO Studio, a small creative studio offering \
brand identity, web design, video production, photography and motion design. \
Answer briefly and warmly. For prices, quote the published starting prices and suggest the \
booking form for a tailored quote. Never invent availability or promise dates.";

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Reply to a visitor's message; never fails
    async fn send_message(&self, text: &str) -> String;
}

/// Executor for chat replies through the LLM API
pub struct ChatProxy {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl ChatProxy {
    pub fn new(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            model,
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.chat_url.clone(),
            config.chat_model.clone(),
            config.chat_api_key.clone(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Call the chat API
    async fn call_api(&self, text: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No chat API key configured"))?;

        debug!("Calling chat API with {} chars", text.len());

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            temperature: Some(0.7),
            max_tokens: Some(400),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to call chat API: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Chat API error {}: {}", status, body));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse chat response: {}", e))?;

        extract_reply(chat_response)
    }
}

#[async_trait]
impl ChatBackend for ChatProxy {
    async fn send_message(&self, text: &str) -> String {
        match self.call_api(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("chat request failed, using fallback: {}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

fn extract_reply(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.trim().to_string())
        .filter(|reply| !reply.is_empty())
        .ok_or_else(|| anyhow!("No reply in chat response"))
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
