use serde::{Deserialize, Deserializer, Serialize};

/// Which side of the conversation a message came from.
///
/// Never on the wire: the inbox fetcher tags what it receives, the outbound
/// log tags what it creates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    Sent,
    #[default]
    Received,
}

/// Domain model for a single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    #[serde(default)]
    pub from_user: String,
    #[serde(default)]
    pub to_user: String,
    #[serde(default)]
    pub content: String,
    /// ISO-8601 as produced by the sender, parsed only when ordering.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: String,
    #[serde(skip)]
    pub direction: Direction,
}

/// Accept any JSON value so one odd record cannot sink a whole inbox decode.
/// `null` becomes empty; other non-strings keep their JSON text.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(value) => value,
        other => other.to_string(),
    })
}

impl ChatMessage {
    pub fn is_sent(&self) -> bool {
        self.direction == Direction::Sent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionStatus {
    /// The backend produced a draft (possibly empty).
    Ready,
    /// The backend failed; `draft_text` holds a placeholder.
    Unavailable,
}

/// AI-drafted reply for one received message, keyed by that message's id.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub source_message_id: String,
    pub draft_text: String,
    pub status: SuggestionStatus,
}

/// Answer of the node's identity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeIdentity {
    pub username: String,
    #[serde(default)]
    pub peer_id: String,
    #[serde(default)]
    pub addrs: Vec<String>,
}

impl NodeIdentity {
    pub fn anonymous() -> Self {
        Self {
            username: "me".to_string(),
            peer_id: String::new(),
            addrs: Vec::new(),
        }
    }
}
