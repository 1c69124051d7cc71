/// Disaster-response chatbot backed by a hosted completion API.
///
/// [`ChatService`] is built once at startup. If the client cannot be
/// initialized (no API key, bad endpoint URL) the failure is logged once and
/// every later question short-circuits to [`ChatReply::NotInitialized`]
/// without touching the network.
///
/// Questions are answered one at a time with no history: each call sends the
/// fixed system prompt plus `question + document text` and returns whatever
/// the model produced, or a fixed apology on any transport or API error.
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::schema::LlmConfig;

pub mod client;
pub mod prompts;

use client::CompletionClient;
use prompts::build_chat_messages;

/// Reply text when the client failed to initialize.
pub const NOT_INITIALIZED_TEXT: &str = "Error: OpenAI client not initialized";

/// Reply text when a completion request fails.
pub const APOLOGY_TEXT: &str = "Sorry, I couldn't process your request at this time.";

/// Outcome of one chatbot question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChatReply {
    /// The model's completion text.
    Answer { text: String },
    /// The request was attempted and failed.
    Failed { error: String },
    /// No client is available; nothing was sent.
    NotInitialized,
}

impl ChatReply {
    /// Text to show in place of an answer.
    pub fn text(&self) -> &str {
        match self {
            Self::Answer { text } => text,
            Self::Failed { .. } => APOLOGY_TEXT,
            Self::NotInitialized => NOT_INITIALIZED_TEXT,
        }
    }

    /// Error notice to show next to the reply, if any.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Answer { .. } | Self::NotInitialized => None,
            Self::Failed { error } => Some(format!("Error in completion API call: {error}")),
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, Self::Answer { .. })
    }
}

#[derive(Debug)]
enum ClientState {
    Ready(CompletionClient),
    Unavailable(String),
}

/// Chatbot entry point shared by the web server and the CLI.
#[derive(Debug)]
pub struct ChatService {
    state: ClientState,
}

impl ChatService {
    /// Initialize the completion client, logging the failure if there is one.
    pub fn from_config(config: &LlmConfig) -> Self {
        match CompletionClient::from_config(config) {
            Ok(client) => {
                info!(
                    model = client.model_name(),
                    endpoint = client.base_url(),
                    "completion client initialized"
                );
                Self {
                    state: ClientState::Ready(client),
                }
            }
            Err(e) => {
                error!(error = %e, "failed to initialize completion client; chatbot disabled");
                Self::uninitialized(e.to_string())
            }
        }
    }

    /// A service whose every call short-circuits with `reason` recorded.
    pub fn uninitialized(reason: impl Into<String>) -> Self {
        Self {
            state: ClientState::Unavailable(reason.into()),
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, ClientState::Ready(_))
    }

    /// Why initialization failed, if it did.
    pub fn init_error(&self) -> Option<&str> {
        match &self.state {
            ClientState::Ready(_) => None,
            ClientState::Unavailable(reason) => Some(reason),
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        match &self.state {
            ClientState::Ready(client) => Some(client.model_name()),
            ClientState::Unavailable(_) => None,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        match &self.state {
            ClientState::Ready(client) => Some(client.base_url()),
            ClientState::Unavailable(_) => None,
        }
    }

    /// Ask one question against `document` text (which may be empty).
    pub fn ask(&self, question: &str, document: &str) -> ChatReply {
        let ClientState::Ready(client) = &self.state else {
            return ChatReply::NotInitialized;
        };

        let messages = build_chat_messages(question, document);

        let start = Instant::now();
        let result = client.chat(&messages);
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                info!(
                    model = client.model_name(),
                    latency_ms,
                    question_chars = question.len(),
                    answer_chars = text.len(),
                    "completion received"
                );
                ChatReply::Answer { text }
            }
            Err(e) => {
                let error = format!("{e:#}");
                warn!(model = client.model_name(), latency_ms, error = %error, "completion failed");
                ChatReply::Failed { error }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
