// OpenAI chat-completions provider

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Completion, CompletionProvider};
use crate::prompt::Turn;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// HTTP client for the OpenAI chat-completions API.
///
/// Constructed once at process start and shared behind an `Arc`; holds no
/// per-request state. The API key is optional so a misconfigured deployment
/// starts up and reports the problem per request rather than crashing.
pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: "https://api.openai.com".to_string(),
            model: model.into(),
        })
    }

    /// Point the provider at a different host. Used by tests against a mock
    /// server and by OpenAI-compatible gateways.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        prompt: &[Turn],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Completion> {
        let api_key = self
            .api_key
            .as_deref()
            .context("OpenAI API key not configured")?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: prompt,
            max_tokens,
            temperature,
        };
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(model = %self.model, turns = prompt.len(), "Sending chat-completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "OpenAI API request failed\n\nStatus: {}\nBody: {}",
                status,
                error_body
            );
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        // First choice's message content; empty when the API returned no
        // choices or a null content field
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(Completion { text })
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiProvider::new(Some("test-key".to_string()), "gpt-3.5-turbo");
        assert!(provider.is_ok());
    }

    #[test]
    fn test_configured_flag_tracks_key_presence() {
        let with_key = OpenAiProvider::new(Some("k".to_string()), "gpt-3.5-turbo").unwrap();
        assert!(with_key.is_configured());

        let without_key = OpenAiProvider::new(None, "gpt-3.5-turbo").unwrap();
        assert!(!without_key.is_configured());
    }

    #[test]
    fn test_request_serialization() {
        let prompt = vec![Turn::system("persona"), Turn::user("hi")];
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &prompt,
            max_tokens: 512,
            temperature: 0.7,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 512);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_response_parsing_null_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
