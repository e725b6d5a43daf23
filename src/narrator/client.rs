// =============================================================================
// Narrator — OpenAI-compatible chat-completions client
// =============================================================================
//
// One user message in, the first choice's content out.  Payload construction
// and reply extraction are free functions so they can be tested offline.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::config::NarratorConfig;

pub struct NarratorClient {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl NarratorClient {
    /// Build a client from `config`.  Fails when no API key is configured.
    pub fn new(config: &NarratorConfig) -> Result<Self> {
        let api_key = config
            .bearer_token()
            .context("narrator API key is not configured (set DEEPSEEK_API_KEY)")?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            client,
        })
    }

    /// Send `prompt` and return the generated text.
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    pub async fn summarize(&self, prompt: &str) -> Result<String> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&chat_payload(&self.model, prompt))
            .send()
            .await
            .context("narrator request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("narrator returned {}: {}", status, body);
        }

        let body: Value = resp
            .json()
            .await
            .context("failed to decode narrator response")?;

        let reply = extract_reply(&body)?;
        debug!(reply_len = reply.len(), "narration received");
        Ok(reply)
    }
}

impl std::fmt::Debug for NarratorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarratorClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

/// Request body for a single-turn chat completion.
pub fn chat_payload(model: &str, prompt: &str) -> Value {
    json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }]
    })
}

/// Content of the first choice in a chat-completions response.
pub fn extract_reply(body: &Value) -> Result<String> {
    let first = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .context("no analysis returned from narrator")?;

    first
        .pointer("/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .context("narrator choice has no message content")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_has_single_user_message() {
        let p = chat_payload("deepseek-coder", "hello");
        assert_eq!(p["model"], "deepseek-coder");
        let messages = p["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "hello");
    }

    #[test]
    fn extracts_first_choice() {
        let body = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Trend is up." } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        });
        assert_eq!(extract_reply(&body).unwrap(), "Trend is up.");
    }

    #[test]
    fn empty_choices_is_an_error() {
        assert!(extract_reply(&json!({ "choices": [] })).is_err());
        assert!(extract_reply(&json!({})).is_err());
        assert!(extract_reply(&json!({ "choices": [{ "message": {} }] })).is_err());
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let mut cfg = NarratorConfig::default();
        assert!(NarratorClient::new(&cfg).is_err());
        cfg.api_key = Some("   ".into());
        assert!(NarratorClient::new(&cfg).is_err());
        cfg.api_key = Some("sk-test".into());
        let client = NarratorClient::new(&cfg).unwrap();
        assert!(!format!("{client:?}").contains("sk-test"));
    }
}
