use chrono::{DateTime, Utc};

use super::types::{ChatMessage, NodeIdentity, Suggestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-visible outcome of an action.
#[derive(Debug, Clone)]
pub struct Notice {
    pub timestamp: DateTime<Utc>,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Events the session actor publishes to the front end.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    IdentityResolved(NodeIdentity),
    /// Full, ordered conversation; replaces whatever was shown before.
    ConversationUpdated(Vec<ChatMessage>),
    /// Emitted before the backend is called.
    SuggestionPending(String),
    SuggestionUpdated(Suggestion),
    Notice(Notice),
}
