// HTTP client for the relay endpoints
//
// Thin wrapper used by the terminal chat surfaces. Failures come back as
// user-facing strings ready to render as an answer bubble: the server's
// `error` field when available, the static connection fallback otherwise.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::conversation::CONNECTION_ERROR_FALLBACK;
use crate::prompt::Turn;
use crate::server::{AskResponse, ChatResponse, ErrorBody};

const REQUEST_TIMEOUT_SECS: u64 = 90;

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Single-turn question against `POST /ask`.
    pub async fn ask(&self, question: &str) -> Result<AskResponse, String> {
        let url = format!("{}/ask", self.base_url);
        let body = serde_json::json!({ "question": question });
        self.post_json(&url, &body).await
    }

    /// Multi-turn transcript against `POST /api/chat`. Returns the reply text.
    pub async fn chat(&self, transcript: &[Turn]) -> Result<String, String> {
        let url = format!("{}/api/chat", self.base_url);
        let body = serde_json::json!({ "messages": transcript });
        let response: ChatResponse = self.post_json(&url, &body).await?;
        Ok(response.reply)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, String> {
        let response = match self.client.post(url).json(body).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(error = %err, "Relay request failed to send");
                return Err(CONNECTION_ERROR_FALLBACK.to_string());
            }
        };

        if response.status().is_success() {
            response
                .json::<T>()
                .await
                .map_err(|_| CONNECTION_ERROR_FALLBACK.to_string())
        } else {
            // Prefer the server's structured error text over the generic
            // fallback
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| CONNECTION_ERROR_FALLBACK.to_string());
            Err(message)
        }
    }
}
