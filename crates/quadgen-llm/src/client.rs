//! Minimal client for an OpenAI-compatible chat-completions endpoint.
//!
//! One synchronous POST per call, no retry or backoff. The caller owns
//! failure isolation (a failed page or batch item is reported and
//! skipped upstream).

use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

pub struct ChatClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl ChatClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, temperature: f64) -> Self {
        Self {
            agent: ureq::agent(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature,
        }
    }

    /// Send one system+user exchange and return the assistant text.
    pub fn chat(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        debug!(model = %self.model, %url, "sending chat completion request");
        let response: Value = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(body)
            .with_context(|| format!("chat completion request to {url} failed"))?
            .into_json()
            .context("chat completion response is not valid JSON")?;

        extract_content(&response)
    }
}

fn extract_content(response: &Value) -> Result<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("completion response has no message content: {response}"))
}

/// Strip a wrapping Markdown code fence from LLM output. Models often
/// return the requested JSON inside ```` ```json ... ``` ```` even when
/// asked not to.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content() {
        let response = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "[]" } }
            ]
        });
        assert_eq!(extract_content(&response).unwrap(), "[]");
    }

    #[test]
    fn test_extract_content_missing_is_error() {
        let response = json!({ "error": { "message": "rate limited" } });
        assert!(extract_content(&response).is_err());
    }

    #[test]
    fn test_strip_json_fence() {
        let raw = "```json\n[{\"equation\": \"y = x^2\"}]\n```";
        assert_eq!(strip_code_fences(raw), "[{\"equation\": \"y = x^2\"}]");
    }

    #[test]
    fn test_strip_plain_fence() {
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
    }

    #[test]
    fn test_strip_is_noop_without_fence() {
        assert_eq!(strip_code_fences("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let client = ChatClient::new("https://example.test/v1/", "k", "m", 0.1);
        assert_eq!(client.base_url, "https://example.test/v1");
    }
}
