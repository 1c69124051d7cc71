/// OpenAI-compatible chat-completion client.
///
/// Talks to any endpoint implementing `POST {base_url}/chat/completions`
/// (DeepSeek by default) using the synchronous `ureq` HTTP client. One call
/// is one request: no streaming, no retry.
use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::schema::LlmConfig;

// ---------------------------------------------------------------------------
// Request / response types for the completion API
// ---------------------------------------------------------------------------

/// A single message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

/// Response body from `POST /chat/completions` (non-streaming).
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous completion client, built once at startup.
pub struct CompletionClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    agent: ureq::Agent,
}

impl fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl CompletionClient {
    /// Build a client from the resolved config.
    ///
    /// Fails when the API key is missing or the base URL is not http(s);
    /// these are the initialization errors that disable the chatbot.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            anyhow::bail!("no API key configured (set llm.api_key or ALERTDASH_API_KEY)");
        }

        let base_url = config.base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            anyhow::bail!("invalid completion endpoint URL: '{}'", config.base_url);
        }

        let mut builder = ureq::AgentBuilder::new();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            agent: builder.build(),
        })
    }

    /// Send chat messages and return the first choice's text.
    pub fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = self.completions_url();

        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        let resp = match self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&body)
        {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, resp)) => {
                let detail = resp.into_string().unwrap_or_default();
                anyhow::bail!(
                    "completion endpoint returned HTTP {status}: {}",
                    summarize(&detail)
                );
            }
            Err(e) => return Err(e).context("completion request failed"),
        };

        let parsed: CompletionResponse = resp
            .into_json()
            .context("failed to parse completion response")?;

        extract_content(parsed)
    }

    /// Return the model name for logging.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Pull the first non-empty completion text out of a response.
fn extract_content(parsed: CompletionResponse) -> Result<String> {
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    if content.trim().is_empty() {
        anyhow::bail!("completion endpoint returned an empty response");
    }

    Ok(content)
}

/// Trim an error body to something that fits on one log line.
fn summarize(body: &str) -> String {
    let flat = body.replace(['\r', '\n'], " ");
    let flat = flat.trim();
    if flat.chars().count() > 200 {
        let cut: String = flat.chars().take(200).collect();
        format!("{cut}...")
    } else {
        flat.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: &str) -> LlmConfig {
        LlmConfig {
            api_key: key.to_string(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn missing_api_key_fails_initialization() {
        assert!(CompletionClient::from_config(&config_with_key("")).is_err());
        assert!(CompletionClient::from_config(&config_with_key("   ")).is_err());
    }

    #[test]
    fn non_http_base_url_fails_initialization() {
        let mut config = config_with_key("sk-test");
        config.base_url = "api.deepseek.com".to_string();
        assert!(CompletionClient::from_config(&config).is_err());
    }

    #[test]
    fn client_from_default_config_with_key() {
        let client = CompletionClient::from_config(&config_with_key("sk-test")).unwrap();
        assert_eq!(client.base_url, "https://api.deepseek.com");
        assert_eq!(client.model_name(), "deepseek-chat");
        assert_eq!(client.max_tokens, 350);
        assert_eq!(client.completions_url(), "https://api.deepseek.com/chat/completions");
    }

    #[test]
    fn client_strips_trailing_slash() {
        let mut config = config_with_key("sk-test");
        config.base_url = "https://api.example.com/v1/".to_string();
        let client = CompletionClient::from_config(&config).unwrap();
        assert_eq!(client.completions_url(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = CompletionClient::from_config(&config_with_key("sk-very-secret")).unwrap();
        assert!(!format!("{client:?}").contains("sk-very-secret"));
    }

    #[test]
    fn request_body_shape() {
        let messages = [ChatMessage::system("s"), ChatMessage::user("u")];
        let body = CompletionRequest {
            model: "deepseek-chat",
            messages: &messages,
            temperature: 0.7,
            max_tokens: 350,
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "deepseek-chat");
        assert_eq!(json["max_tokens"], 350);
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
    }

    #[test]
    fn extracts_first_choice() {
        let parsed: CompletionResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Stay safe."}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(parsed).unwrap(), "Stay safe.");
    }

    #[test]
    fn empty_or_missing_choices_are_errors() {
        let none: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_content(none).is_err());

        let null: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(extract_content(null).is_err());
    }

    #[test]
    fn summarize_flattens_and_truncates() {
        assert_eq!(summarize("a\nb"), "a b");
        let long = "x".repeat(300);
        assert_eq!(summarize(&long).len(), 203);
    }
}
