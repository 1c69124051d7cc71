//! JSON API handlers for the web dashboard.
//!
//! Handlers take the pieces of [`super::App`] they need and return plain
//! serializable values; the router turns them into replies. Failures in the
//! document fetch or the completion call are not errors here: they come back
//! as `notice` fields for the frontend to display.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::alerts::{AlertRecord, SeverityChart, categorize, sample_messages};
use crate::config::DashConfig;
use crate::document::DocumentFetcher;
use crate::guide::{self, ADVISORY};
use crate::llm::{ChatReply, ChatService};
use crate::session::{DocumentSlot, DocumentStatus, SessionState};

/// Notice shown when the chatbot has no document text to work with.
pub const DOCUMENT_UNAVAILABLE_NOTICE: &str =
    "PDF content not available. Some features may be limited.";

// ---------------------------------------------------------------------------
// JSON request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub pool_size: usize,
    pub sample_size: usize,
    pub document: DocumentStatus,
    pub chat_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Dashboard refresh: chart plus raw message text per severity.
#[derive(Debug, Serialize)]
pub struct SampleResponse {
    pub counts: SeverityCounts,
    pub chart: SeverityChart,
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub status: DocumentStatus,
    pub chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Text to display; absent when no question was asked or no call was made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GuideResponse {
    pub disaster_type: String,
    pub steps: Vec<&'static str>,
    pub advisory: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub version: &'static str,
    pub chat_initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub document_link_valid: bool,
    pub active_sessions: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a query parameter from a URL, decoding `+` and `%20` as spaces.
fn query_param<'a>(url: &'a str, key: &str) -> Option<std::borrow::Cow<'a, str>> {
    url.split('?').nth(1)?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k != key {
            return None;
        }
        if v.contains('+') || v.contains("%20") {
            Some(v.replace('+', " ").replace("%20", " ").into())
        } else {
            Some(v.into())
        }
    })
}

/// Fetch the reference document into the session unless already attempted.
fn ensure_document<'s>(
    fetcher: &DocumentFetcher,
    document_url: &str,
    session: &'s mut SessionState,
) -> &'s DocumentSlot {
    if session.document == DocumentSlot::NotLoaded {
        session.document = match fetcher.fetch(document_url) {
            Ok(text) => DocumentSlot::Loaded(text),
            Err(e) => {
                warn!(error = %e, "reference document unavailable for this session");
                DocumentSlot::Unavailable(e.to_string())
            }
        };
    }
    &session.document
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/session` — create or refresh the caller's session.
pub fn get_session(config: &DashConfig, chat: &ChatService, session: &SessionState) -> SessionResponse {
    SessionResponse {
        pool_size: session.messages.len(),
        sample_size: config.dashboard.sample_size,
        document: session.document.status(),
        chat_enabled: chat.is_initialized(),
    }
}

/// `POST /api/dashboard/sample` — draw a fresh sample from the session pool.
pub fn post_sample<R: Rng>(session: &SessionState, sample_size: usize, rng: &mut R) -> SampleResponse {
    let sample = sample_messages(&session.messages, sample_size, rng);
    let buckets = categorize(&sample);
    let (high, medium, low) = buckets.counts();
    let chart = buckets.chart();

    let texts = |records: Vec<AlertRecord>| {
        records.into_iter().map(|r| r.message).collect::<Vec<_>>()
    };

    SampleResponse {
        counts: SeverityCounts { high, medium, low },
        chart,
        high: texts(buckets.high),
        medium: texts(buckets.medium),
        low: texts(buckets.low),
    }
}

/// `GET /api/chat/document` — load (once per session) the reference document.
pub fn get_document(
    fetcher: &DocumentFetcher,
    document_url: &str,
    session: &mut SessionState,
) -> DocumentResponse {
    match ensure_document(fetcher, document_url, session) {
        DocumentSlot::Loaded(text) => DocumentResponse {
            status: DocumentStatus::Loaded,
            chars: text.chars().count(),
            notice: text
                .trim()
                .is_empty()
                .then(|| DOCUMENT_UNAVAILABLE_NOTICE.to_string()),
        },
        DocumentSlot::Unavailable(reason) => DocumentResponse {
            status: DocumentStatus::Unavailable,
            chars: 0,
            notice: Some(format!("Error processing PDF: {reason}")),
        },
        DocumentSlot::NotLoaded => DocumentResponse {
            status: DocumentStatus::NotLoaded,
            chars: 0,
            notice: None,
        },
    }
}

/// `POST /api/chat` — answer one question against the session's document.
pub fn post_chat(
    chat: &ChatService,
    fetcher: &DocumentFetcher,
    document_url: &str,
    session: &mut SessionState,
    request: &ChatRequest,
) -> ChatResponse {
    let question = request.question.trim();
    if question.is_empty() {
        return ChatResponse {
            reply: None,
            notice: None,
        };
    }

    let Some(document) = ensure_document(fetcher, document_url, session).usable_text() else {
        return ChatResponse {
            reply: None,
            notice: Some(DOCUMENT_UNAVAILABLE_NOTICE.to_string()),
        };
    };

    let reply: ChatReply = chat.ask(question, document);
    ChatResponse {
        reply: Some(reply.text().to_string()),
        notice: reply.notice(),
    }
}

/// `GET /api/guide?type=<label>` — response steps for a disaster type.
pub fn get_guide(url: &str) -> GuideResponse {
    let label = query_param(url, "type").unwrap_or_default();
    GuideResponse {
        steps: guide::response_steps(&label).to_vec(),
        disaster_type: label.into_owned(),
        advisory: ADVISORY,
    }
}

/// `GET /api/health` — chat client and configuration summary.
pub fn get_health(config: &DashConfig, chat: &ChatService, active_sessions: usize) -> HealthResponse {
    HealthResponse {
        version: env!("CARGO_PKG_VERSION"),
        chat_initialized: chat.is_initialized(),
        chat_error: chat.init_error().map(str::to_string),
        model: chat.model_name().map(str::to_string),
        endpoint: chat.endpoint().map(str::to_string),
        document_link_valid: crate::document::extract_file_id(&config.document.url).is_some(),
        active_sessions,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::config::schema::DocumentConfig;

    fn offline_fetcher() -> DocumentFetcher {
        DocumentFetcher::from_config(&DocumentConfig::default())
    }

    #[test]
    fn query_param_extracts_value() {
        assert_eq!(query_param("/api/guide?type=Flood", "type").as_deref(), Some("Flood"));
        assert_eq!(query_param("/api/guide?a=1&type=Earthquake", "type").as_deref(), Some("Earthquake"));
        assert_eq!(query_param("/api/guide?type=Response+Guide", "type").as_deref(), Some("Response Guide"));
        assert_eq!(query_param("/api/guide", "type"), None);
    }

    #[test]
    fn guide_handler_returns_steps_and_advisory() {
        let resp = get_guide("/api/guide?type=Wildfire");
        assert_eq!(resp.disaster_type, "Wildfire");
        assert_eq!(resp.steps.len(), 5);
        assert_eq!(resp.advisory, ADVISORY);

        let resp = get_guide("/api/guide?type=Tornado");
        assert_eq!(resp.steps, ["Steps not available."]);
        let resp = get_guide("/api/guide");
        assert_eq!(resp.steps, ["Steps not available."]);
    }

    #[test]
    fn empty_question_makes_no_call() {
        let mut session = SessionState::new(Vec::new(), Utc::now());
        let chat = ChatService::uninitialized("unused");
        let resp = post_chat(
            &chat,
            &offline_fetcher(),
            "https://invalid/no-id",
            &mut session,
            &ChatRequest {
                question: "   ".to_string(),
            },
        );
        assert!(resp.reply.is_none());
        assert!(resp.notice.is_none());
        // Document is only fetched when there is a question to answer.
        assert_eq!(session.document, DocumentSlot::NotLoaded);
    }

    #[test]
    fn unavailable_document_blocks_chat_with_notice() {
        let mut session = SessionState::new(Vec::new(), Utc::now());
        let chat = ChatService::uninitialized("unused");
        let resp = post_chat(
            &chat,
            &offline_fetcher(),
            "https://example.com/file/missing-id",
            &mut session,
            &ChatRequest {
                question: "What now?".to_string(),
            },
        );
        assert!(resp.reply.is_none());
        assert_eq!(resp.notice.as_deref(), Some(DOCUMENT_UNAVAILABLE_NOTICE));
        assert!(matches!(session.document, DocumentSlot::Unavailable(_)));
    }

    #[test]
    fn loaded_document_reaches_chat_client() {
        let mut session = SessionState::new(Vec::new(), Utc::now());
        session.document = DocumentSlot::Loaded("Evacuation routes...".to_string());
        let chat = ChatService::uninitialized("no key");
        let resp = post_chat(
            &chat,
            &offline_fetcher(),
            "unused",
            &mut session,
            &ChatRequest {
                question: "Where do I go?".to_string(),
            },
        );
        assert_eq!(resp.reply.as_deref(), Some("Error: OpenAI client not initialized"));
        assert!(resp.notice.is_none());
    }

    #[test]
    fn document_failure_is_cached_per_session() {
        let mut session = SessionState::new(Vec::new(), Utc::now());
        let fetcher = offline_fetcher();
        let first = get_document(&fetcher, "no-id-here", &mut session);
        assert_eq!(first.status, DocumentStatus::Unavailable);
        assert!(first.notice.unwrap().starts_with("Error processing PDF:"));

        // A valid link afterwards does not trigger another attempt.
        let again = get_document(&fetcher, "https://drive.google.com/file/d/abc/view", &mut session);
        assert_eq!(again.status, DocumentStatus::Unavailable);
    }

    #[test]
    fn health_reports_uninitialized_client() {
        let chat = ChatService::uninitialized("no API key configured");
        let resp = get_health(&DashConfig::default(), &chat, 2);
        assert!(!resp.chat_initialized);
        assert_eq!(resp.chat_error.as_deref(), Some("no API key configured"));
        assert!(resp.document_link_valid);
        assert_eq!(resp.active_sessions, 2);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("\"model\""));
    }
}
