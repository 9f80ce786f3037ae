use thiserror::Error;

/// Failures surfaced by the chat node, the text-generation backend and the
/// session core.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChatError {
    /// The chat node could not be reached.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The chat node answered with a non-success status.
    #[error("node rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The text-generation backend could not be reached or returned garbage.
    #[error("generation failed: {0}")]
    Generation(String),

    #[error("generation backend returned status {status}")]
    GenerationStatus { status: u16 },

    #[error("generation timed out after {secs}s")]
    GenerationTimeout { secs: u64 },

    /// A message timestamp could not be interpreted.
    #[error("unparseable timestamp `{value}`: {reason}")]
    Parse { value: String, reason: String },

    #[error("no sendable suggestion for message {message_id}")]
    NoSuggestion { message_id: String },
}

impl ChatError {
    /// Placeholder shown in place of a draft when generation failed.
    pub fn draft_placeholder(&self) -> String {
        match self {
            ChatError::GenerationStatus { .. } => "(LLM error)".to_string(),
            other => format!("(LLM unavailable: {other})"),
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Transport(err.to_string())
    }
}
