//! Embedded web dashboard for alertdash.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with three views: Dashboard, Chatbot, Response Guide
//! - JSON API endpoints backing those views
//!
//! Launched via `alertdash serve` (default: `http://127.0.0.1:8501`).
//! Requests are handled one at a time on the calling thread; chat and
//! document calls block the loop while they run.

mod api;
mod frontend;

use std::io::Cursor;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{info, warn};

use crate::config::DashConfig;
use crate::document::DocumentFetcher;
use crate::llm::ChatService;
use crate::session::{SESSION_COOKIE, SessionStore};

pub use api::{
    ChatRequest, ChatResponse, DocumentResponse, GuideResponse, HealthResponse, SampleResponse,
    SessionResponse,
};

// ---------------------------------------------------------------------------
// Application context
// ---------------------------------------------------------------------------

/// Everything a request handler can touch. Owned by the request loop.
#[derive(Debug)]
pub struct App {
    pub config: DashConfig,
    pub chat: ChatService,
    pub fetcher: DocumentFetcher,
    pub sessions: SessionStore,
    pub rng: StdRng,
}

impl App {
    pub fn new(config: DashConfig, chat: ChatService, rng: StdRng) -> Self {
        let fetcher = DocumentFetcher::from_config(&config.document);
        let sessions = SessionStore::new(
            config.dashboard.pool_size,
            config.server.session_idle_secs,
        );
        Self {
            config,
            chat,
            fetcher,
            sessions,
            rng,
        }
    }

    /// Build the app from config, initializing the chat client once.
    pub fn from_config(config: DashConfig) -> Self {
        let chat = ChatService::from_config(&config.llm);
        Self::new(config, chat, StdRng::from_entropy())
    }

    /// Route one request. Never fails: handler errors become a 500 reply.
    pub fn handle(
        &mut self,
        method: &Method,
        url: &str,
        cookie_header: Option<&str>,
        body: Option<&str>,
    ) -> Reply {
        self.sessions.prune(Utc::now());

        let session_id = cookie_header.and_then(session_id_from_cookie);
        match self.dispatch(method, url, session_id.as_deref(), body) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(%method, url, error = %format!("{e:#}"), "request handler failed");
                Reply::error(500, &e.to_string())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Router
    // -----------------------------------------------------------------------

    fn dispatch(
        &mut self,
        method: &Method,
        url: &str,
        session_id: Option<&str>,
        body: Option<&str>,
    ) -> Result<Reply> {
        // Strip query string for path matching
        let path = url.split('?').next().unwrap_or(url);

        let Self {
            config,
            chat,
            fetcher,
            sessions,
            rng,
        } = self;

        match (method, path) {
            // Frontend
            (&Method::Get, "/") | (&Method::Get, "/index.html") => {
                Ok(Reply::html(frontend::INDEX_HTML))
            }

            // API — stateless
            (&Method::Get, "/api/guide") => Reply::json(&api::get_guide(url)),
            (&Method::Get, "/api/health") => {
                Reply::json(&api::get_health(config, chat, sessions.len()))
            }

            // API — session-scoped
            (&Method::Get, "/api/session")
            | (&Method::Post, "/api/dashboard/sample")
            | (&Method::Get, "/api/chat/document")
            | (&Method::Post, "/api/chat") => {
                // Reject a bad body before a session is created for it.
                let chat_request: Option<ChatRequest> = if path == "/api/chat" {
                    Some(
                        serde_json::from_str(body.unwrap_or("{}"))
                            .context("invalid JSON in chat request")?,
                    )
                } else {
                    None
                };

                let (id, session) = sessions.resolve(session_id, Utc::now(), rng);
                let reply = match (method, path, &chat_request) {
                    (_, _, Some(request)) => Reply::json(&api::post_chat(
                        chat,
                        fetcher,
                        &config.document.url,
                        session,
                        request,
                    )),
                    (&Method::Post, "/api/dashboard/sample", _) => Reply::json(&api::post_sample(
                        session,
                        config.dashboard.sample_size,
                        rng,
                    )),
                    (&Method::Get, "/api/chat/document", _) => Reply::json(&api::get_document(
                        fetcher,
                        &config.document.url,
                        session,
                    )),
                    _ => Reply::json(&api::get_session(config, chat, session)),
                }?;

                Ok(if session_id == Some(id.as_str()) {
                    reply
                } else {
                    reply.with_session_cookie(&id)
                })
            }

            // 404
            _ => Ok(Reply::error(404, "not found")),
        }
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server on `addr`.
///
/// Blocks the current thread. Handles requests sequentially and keeps serving
/// after per-request failures.
pub fn serve(mut app: App, addr: &str, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    info!(%addr, "alertdash dashboard running at http://{addr}");

    if open {
        let url = format!("http://{addr}");
        if let Err(e) = open_browser(&url) {
            warn!(error = %e, "could not open browser");
        }
    }

    for mut request in server.incoming_requests() {
        let start = Instant::now();
        let method = request.method().clone();
        let url = request.url().to_string();

        // Read body up-front for methods that carry one
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let cookie = request
            .headers()
            .iter()
            .find(|h| h.field.equiv("Cookie"))
            .map(|h| h.value.as_str().to_string());

        let reply = app.handle(&method, &url, cookie.as_deref(), body.as_deref());
        let status = reply.status;

        if let Err(e) = request.respond(reply.into_response()) {
            warn!(%method, url = %url, error = %e, "failed to write response");
        }

        info!(
            %method,
            path = url.split('?').next().unwrap_or(&url),
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "request"
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// A transport-agnostic HTTP reply, converted to a `tiny_http` response at
/// the edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub set_cookie: Option<String>,
}

impl Reply {
    /// Build a JSON success response.
    pub fn json<T: Serialize>(data: &T) -> Result<Self> {
        let body = serde_json::to_vec(data).context("failed to serialize JSON response")?;
        Ok(Self {
            status: 200,
            content_type: "application/json; charset=utf-8",
            body,
            set_cookie: None,
        })
    }

    fn html(html: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: html.as_bytes().to_vec(),
            set_cookie: None,
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: "application/json; charset=utf-8",
            body: serde_json::json!({ "error": message }).to_string().into_bytes(),
            set_cookie: None,
        }
    }

    fn with_session_cookie(mut self, id: &str) -> Self {
        self.set_cookie = Some(format!(
            "{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"
        ));
        self
    }

    /// Parse the body as JSON (test and diagnostics helper).
    pub fn json_body(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.body).context("reply body is not JSON")
    }

    fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        if let Ok(header) = Header::from_bytes("Content-Type", self.content_type) {
            response.add_header(header);
        }
        if let Some(cookie) = self.set_cookie
            && let Ok(header) = Header::from_bytes("Set-Cookie", cookie.as_bytes())
        {
            response.add_header(header);
        }
        response
    }
}

/// Extract a well-formed session id from a `Cookie` header value.
fn session_id_from_cookie(header: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|v| v.len() == 32 && v.chars().all(|c| c.is_ascii_hexdigit()))
        .map(str::to_string)
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_parsed() {
        let id = "0123456789abcdef0123456789abcdef";
        let header = format!("theme=dark; {SESSION_COOKIE}={id}; other=1");
        assert_eq!(session_id_from_cookie(&header).as_deref(), Some(id));
    }

    #[test]
    fn malformed_session_cookie_is_ignored() {
        assert!(session_id_from_cookie("alertdash_session=short").is_none());
        assert!(session_id_from_cookie("alertdash_session=zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz").is_none());
        assert!(session_id_from_cookie("theme=dark").is_none());
        assert!(session_id_from_cookie("").is_none());
    }

    #[test]
    fn error_reply_is_json() {
        let reply = Reply::error(404, "not found");
        assert_eq!(reply.status, 404);
        assert_eq!(reply.json_body().unwrap()["error"], "not found");
    }

    #[test]
    fn session_cookie_attributes() {
        let reply = Reply::html("x").with_session_cookie("abc");
        assert_eq!(
            reply.set_cookie.as_deref(),
            Some("alertdash_session=abc; Path=/; HttpOnly; SameSite=Lax")
        );
    }
}
