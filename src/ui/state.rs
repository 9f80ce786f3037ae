use std::collections::{HashMap, HashSet};

use crate::common::{ChatMessage, NodeIdentity, Notice, SessionEvent, Suggestion};

const MAX_NOTICES: usize = 100;

/// Local state of the window; a mirror of what the session actor published.
pub struct AppState {
    pub identity: Option<NodeIdentity>,
    pub conversation: Vec<ChatMessage>,
    pub suggestions: HashMap<String, Suggestion>,
    /// Messages whose draft is being generated right now.
    pub pending_suggestions: HashSet<String>,
    pub recipient_input: String,
    pub message_input: String,
    pub notices: Vec<Notice>,
}

impl AppState {
    pub fn new(default_recipient: &str) -> Self {
        Self {
            identity: None,
            conversation: Vec::new(),
            suggestions: HashMap::new(),
            pending_suggestions: HashSet::new(),
            recipient_input: default_recipient.to_string(),
            message_input: String::new(),
            notices: Vec::new(),
        }
    }

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::IdentityResolved(identity) => self.identity = Some(identity),
            SessionEvent::ConversationUpdated(conversation) => self.conversation = conversation,
            SessionEvent::SuggestionPending(message_id) => {
                self.pending_suggestions.insert(message_id);
            }
            SessionEvent::SuggestionUpdated(suggestion) => {
                self.pending_suggestions
                    .remove(&suggestion.source_message_id);
                self.suggestions
                    .insert(suggestion.source_message_id.clone(), suggestion);
            }
            SessionEvent::Notice(notice) => self.push_notice(notice),
        }
    }

    pub fn username(&self) -> &str {
        self.identity
            .as_ref()
            .map(|identity| identity.username.as_str())
            .unwrap_or("")
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);

        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }

    /// Take the compose bar contents if both fields are filled in.
    pub fn take_outgoing(&mut self) -> Option<(String, String)> {
        let to_user = self.recipient_input.trim();
        if to_user.is_empty() || self.message_input.trim().is_empty() {
            return None;
        }
        let to_user = to_user.to_string();
        Some((to_user, std::mem::take(&mut self.message_input)))
    }
}
