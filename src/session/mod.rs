//! Per-browser-session state for the dashboard.
//!
//! Each session owns its generated alert pool and the cached outcome of the
//! reference-document fetch. Sessions are keyed by an opaque cookie value and
//! dropped after a configurable idle period. The store is owned by the
//! single-threaded request loop, so it needs no locking.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::alerts::{AlertRecord, generate_messages};

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "alertdash_session";

// ---------------------------------------------------------------------------
// Document slot
// ---------------------------------------------------------------------------

/// Cached reference-document text for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DocumentSlot {
    /// The chatbot view has not been opened yet.
    #[default]
    NotLoaded,
    Loaded(String),
    /// The fetch failed; it is not retried for this session.
    Unavailable(String),
}

/// Wire summary of a [`DocumentSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    NotLoaded,
    Loaded,
    Unavailable,
}

impl DocumentSlot {
    pub fn status(&self) -> DocumentStatus {
        match self {
            Self::NotLoaded => DocumentStatus::NotLoaded,
            Self::Loaded(_) => DocumentStatus::Loaded,
            Self::Unavailable(_) => DocumentStatus::Unavailable,
        }
    }

    /// Document text usable as chat context. Empty text counts as missing.
    pub fn usable_text(&self) -> Option<&str> {
        match self {
            Self::Loaded(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SessionState {
    pub messages: Vec<AlertRecord>,
    pub document: DocumentSlot,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl SessionState {
    pub fn new(messages: Vec<AlertRecord>, now: DateTime<Utc>) -> Self {
        Self {
            messages,
            document: DocumentSlot::NotLoaded,
            created_at: now,
            last_seen: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// All live sessions, keyed by cookie value.
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<String, SessionState>,
    pool_size: usize,
    idle_secs: i64,
}

impl SessionStore {
    pub fn new(pool_size: usize, idle_secs: u64) -> Self {
        Self {
            sessions: HashMap::new(),
            pool_size,
            idle_secs: i64::try_from(idle_secs).unwrap_or(i64::MAX),
        }
    }

    /// Return the session for `id`, creating a fresh one when the id is absent
    /// or unknown. The returned id is the one the client should keep.
    pub fn resolve<R: Rng>(
        &mut self,
        id: Option<&str>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> (String, &mut SessionState) {
        let id = match id {
            Some(id) if self.sessions.contains_key(id) => id.to_string(),
            _ => new_session_id(rng),
        };

        let pool_size = self.pool_size;
        let state = self.sessions.entry(id.clone()).or_insert_with(|| {
            debug!(session = %id, pool = pool_size, "session created");
            SessionState::new(generate_messages(pool_size, rng), now)
        });
        state.last_seen = now;
        (id, state)
    }

    /// Drop sessions idle for longer than the configured timeout.
    /// Returns how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        let idle_secs = self.idle_secs;
        self.sessions.retain(|_, state| {
            now.signed_duration_since(state.last_seen).num_seconds() <= idle_secs
        });
        let removed = before - self.sessions.len();
        if removed > 0 {
            debug!(removed, remaining = self.sessions.len(), "idle sessions pruned");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// 128 random bits as 32 lowercase hex characters.
fn new_session_id<R: Rng>(rng: &mut R) -> String {
    format!("{:032x}", rng.r#gen::<u128>())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
