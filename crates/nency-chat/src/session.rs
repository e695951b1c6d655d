//! Session-keyed store for dialogs and message history.
//!
//! Every lock is taken and released inside a single method call, so callers
//! can never hold one across an `.await`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeZone};
use uuid::Uuid;

use crate::dialog::{Dialog, DialogState};
use crate::error::ChatError;
use crate::types::{ChatMessage, Role, Session, SessionSummary};

pub struct SessionStore {
    session_timeout_minutes: u32,
    history_limit: usize,
    sessions: Mutex<HashMap<Uuid, Session>>,
    messages: Mutex<HashMap<Uuid, Vec<ChatMessage>>>,
}

impl SessionStore {
    pub fn new(session_timeout_minutes: u32, history_limit: usize) -> Self {
        Self {
            session_timeout_minutes,
            history_limit,
            sessions: Mutex::new(HashMap::new()),
            messages: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Session>>, ChatError> {
        self.sessions
            .lock()
            .map_err(|e| ChatError::StorageError(format!("session lock poisoned: {}", e)))
    }

    fn messages(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Vec<ChatMessage>>>, ChatError> {
        self.messages
            .lock()
            .map_err(|e| ChatError::StorageError(format!("messages lock poisoned: {}", e)))
    }

    /// Check whether a session has been idle longer than the timeout at `now`.
    pub fn is_expired_at(&self, session: &Session, now: i64) -> bool {
        let timeout_secs = i64::from(self.session_timeout_minutes) * 60;
        now - session.last_message_at > timeout_secs
    }

    /// Return `requested` if it names a live session, otherwise a new id.
    ///
    /// An expired session is dropped together with its history.
    pub fn resolve(&self, requested: Option<Uuid>) -> Result<Uuid, ChatError> {
        let now = Local::now().timestamp();
        let mut sessions = self.sessions()?;

        if let Some(sid) = requested {
            let live = sessions.get(&sid).map(|s| !self.is_expired_at(s, now));
            match live {
                Some(true) => return Ok(sid),
                Some(false) => {
                    tracing::info!(session_id = %sid, "Session expired; starting a new one");
                    sessions.remove(&sid);
                    self.messages()?.remove(&sid);
                }
                None => {
                    tracing::debug!(session_id = %sid, "Unknown session id; starting a new one");
                }
            }
        }

        let session = Session {
            id: Uuid::new_v4(),
            started_at: now,
            last_message_at: now,
            message_count: 0,
            dialog: Dialog::new(),
        };
        let sid = session.id;
        sessions.insert(sid, session);
        tracing::debug!(session_id = %sid, "Session created");
        Ok(sid)
    }

    /// Run `f` against a session's dialog under the lock.
    pub fn with_dialog<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut Dialog) -> R,
    ) -> Result<R, ChatError> {
        let mut sessions = self.sessions()?;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(ChatError::SessionNotFound(session_id))?;
        Ok(f(&mut session.dialog))
    }

    pub fn dialog_state(&self, session_id: Uuid) -> Result<DialogState, ChatError> {
        self.with_dialog(session_id, |d| d.state())
    }

    /// Append a message, bump the session counters and trim old history.
    pub fn record(&self, session_id: Uuid, role: Role, content: &str) -> Result<(), ChatError> {
        let now = Local::now().timestamp();
        {
            let mut sessions = self.sessions()?;
            let session = sessions
                .get_mut(&session_id)
                .ok_or(ChatError::SessionNotFound(session_id))?;
            session.last_message_at = now;
            session.message_count += 1;
        }

        let mut msgs = self.messages()?;
        let history = msgs.entry(session_id).or_default();
        history.push(ChatMessage {
            id: Uuid::new_v4(),
            session_id,
            role,
            content: content.to_string(),
            created_at: now,
        });
        if history.len() > self.history_limit {
            let excess = history.len() - self.history_limit;
            history.drain(..excess);
        }
        Ok(())
    }

    pub fn get(&self, session_id: Uuid) -> Option<Session> {
        self.sessions
            .lock()
            .ok()
            .and_then(|s| s.get(&session_id).cloned())
    }

    pub fn contains(&self, session_id: Uuid) -> bool {
        self.get(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All sessions, most recently active first.
    pub fn list(&self) -> Vec<SessionSummary> {
        let sessions = match self.sessions.lock() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut list: Vec<&Session> = sessions.values().collect();
        list.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        list.into_iter()
            .map(|s| SessionSummary {
                id: s.id,
                started_at: format_epoch(s.started_at),
                last_message_at: format_epoch(s.last_message_at),
                message_count: s.message_count,
                dialog_state: s.dialog.state(),
            })
            .collect()
    }

    pub fn remove(&self, session_id: Uuid) -> Result<(), ChatError> {
        let mut sessions = self.sessions()?;
        if sessions.remove(&session_id).is_some() {
            self.messages()?.remove(&session_id);
            tracing::info!(session_id = %session_id, "Session deleted");
            Ok(())
        } else {
            Err(ChatError::SessionNotFound(session_id))
        }
    }

    pub fn history(&self, session_id: Uuid) -> Result<Vec<ChatMessage>, ChatError> {
        if !self.sessions()?.contains_key(&session_id) {
            return Err(ChatError::SessionNotFound(session_id));
        }
        Ok(self
            .messages()?
            .get(&session_id)
            .cloned()
            .unwrap_or_default())
    }

    /// Drop every session idle past the timeout. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, ChatError> {
        let now = Local::now().timestamp();
        let mut sessions = self.sessions()?;
        let expired: Vec<Uuid> = sessions
            .values()
            .filter(|s| self.is_expired_at(s, now))
            .map(|s| s.id)
            .collect();

        if !expired.is_empty() {
            let mut msgs = self.messages()?;
            for id in &expired {
                sessions.remove(id);
                msgs.remove(id);
            }
            tracing::info!(count = expired.len(), "Expired sessions purged");
        }
        Ok(expired.len())
    }
}

/// Format epoch seconds as RFC 3339.
fn format_epoch(epoch: i64) -> String {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|dt: DateTime<Local>| dt.to_rfc3339())
        .unwrap_or_else(|| epoch.to_string())
}
