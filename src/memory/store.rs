// Per-session conversation memory

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

use crate::analysis::{Analysis, Emotion};
use crate::config::MemoryConfig;

/// Session used when the caller does not name one
pub const DEFAULT_SESSION_ID: &str = "default";

// A century; keeps the chrono duration in range
const MAX_TTL_MINUTES: u64 = 100 * 365 * 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One entry of a session's history; never modified after append
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(rename = "message")]
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

impl Message {
    fn new(role: Role, text: String, analysis: Option<Analysis>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role,
            text,
            timestamp,
            analysis,
        }
    }
}

#[derive(Debug)]
struct Session {
    messages: Vec<Message>,
    emotion_timeline: Vec<Emotion>,
    started_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            messages: Vec::new(),
            emotion_timeline: Vec::new(),
            started_at: now,
            last_activity: now,
        }
    }

    fn push(&mut self, message: Message) {
        if let Some(analysis) = &message.analysis {
            self.emotion_timeline.push(analysis.emotion);
        }
        self.last_activity = message.timestamp;
        self.messages.push(message);
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: ChronoDuration) -> bool {
        now.signed_duration_since(self.last_activity) >= ttl
    }
}

/// Session summary
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub message_count: usize,
}

/// Concurrent conversation store.
///
/// Each session lives in one DashMap slot, so appends to a session are
/// serialized by the slot's lock and reads see whole appends only.
pub struct ConversationMemory {
    sessions: DashMap<String, Session>,
    max_sessions: usize,
    ttl: ChronoDuration,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::from_config(&MemoryConfig::default())
    }
}

impl ConversationMemory {
    pub fn new(max_sessions: usize, ttl_minutes: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions: max_sessions.max(1),
            ttl: ChronoDuration::minutes(ttl_minutes.min(MAX_TTL_MINUTES) as i64),
        }
    }

    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(config.max_sessions, config.session_ttl_minutes)
    }

    /// Append one message, creating the session on first use.
    ///
    /// An attached analysis also extends the session's emotion timeline.
    pub fn add_message(
        &self,
        session_id: &str,
        role: Role,
        text: impl Into<String>,
        analysis: Option<Analysis>,
    ) -> Message {
        self.make_room_for(session_id);

        let message = Message::new(role, text.into(), analysis, Utc::now());
        let mut session = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(Session::new);
        session.push(message.clone());
        message
    }

    /// Append a user message and its bot reply as one unit
    pub fn record_exchange(
        &self,
        session_id: &str,
        user_text: impl Into<String>,
        analysis: Analysis,
        reply: impl Into<String>,
    ) -> (Message, Message) {
        self.make_room_for(session_id);

        let now = Utc::now();
        let user = Message::new(Role::User, user_text.into(), Some(analysis), now);
        let bot = Message::new(Role::Bot, reply.into(), None, now);

        let mut session = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(Session::new);
        session.push(user.clone());
        session.push(bot.clone());

        (user, bot)
    }

    /// Most recent `limit` messages in original order; empty for unknown sessions
    pub fn get_history(&self, session_id: &str, limit: usize) -> Vec<Message> {
        match self.sessions.get(session_id) {
            Some(session) => {
                let start = session.messages.len().saturating_sub(limit);
                session.messages[start..].to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Full emotion timeline; empty for unknown sessions
    pub fn get_emotion_pattern(&self, session_id: &str) -> Vec<Emotion> {
        self.sessions
            .get(session_id)
            .map(|session| session.emotion_timeline.clone())
            .unwrap_or_default()
    }

    pub fn session_info(&self, session_id: &str) -> Option<SessionInfo> {
        self.sessions.get(session_id).map(|session| SessionInfo {
            id: session_id.to_string(),
            started_at: session.started_at,
            last_activity: session.last_activity,
            message_count: session.messages.len(),
        })
    }

    /// Get active session count
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Evict the least recently active session if a new one would exceed the cap.
    ///
    /// Runs before the slot lock is taken; concurrent creators may overshoot
    /// the cap briefly.
    fn make_room_for(&self, session_id: &str) {
        if self.sessions.contains_key(session_id) || self.sessions.len() < self.max_sessions {
            return;
        }

        let oldest = self
            .sessions
            .iter()
            .min_by_key(|entry| entry.value().last_activity)
            .map(|entry| entry.key().clone());

        if let Some(oldest) = oldest {
            if self.sessions.remove(&oldest).is_some() {
                tracing::info!(
                    evicted = %oldest,
                    max_sessions = self.max_sessions,
                    "Evicted least recently active session"
                );
            }
        }
    }

    /// Remove sessions idle past the TTL as of `now`; returns how many went
    pub fn cleanup_expired(&self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let expired_sessions: Vec<String> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().is_expired(now, ttl))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed_count = 0;
        for session_id in expired_sessions {
            // Re-checked under the slot lock in case it was touched meanwhile
            if self
                .sessions
                .remove_if(&session_id, |_, session| session.is_expired(now, ttl))
                .is_some()
            {
                removed_count += 1;
                tracing::debug!(session_id = %session_id, "Removed expired session");
            }
        }

        if removed_count > 0 {
            tracing::info!(
                removed = removed_count,
                active = self.sessions.len(),
                "Cleaned up expired sessions"
            );
        }

        removed_count
    }

    /// Start background cleanup task
    pub fn spawn_cleanup_task(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let memory = Arc::clone(self);

        tokio::spawn(async move {
            let mut interval = time::interval(every);
            loop {
                interval.tick().await;
                memory.cleanup_expired(Utc::now());
            }
        })
    }
}
