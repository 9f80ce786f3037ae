pub mod inbox;
pub mod outbound;
pub mod reconcile;
pub mod suggestions;

#[cfg(test)]
pub mod test_support;

use std::time::Duration;

use crate::common::{ChatError, ChatMessage, NodeIdentity, Suggestion};
use crate::network::drafter::ReplyDrafter;
use crate::network::node::ChatNode;

pub use inbox::InboxFetcher;
pub use outbound::OutboundLog;
pub use reconcile::reconcile;
pub use suggestions::SuggestionTracker;

/// All per-session state: what we sent, the drafts we hold, and the last
/// merged view. Owned by exactly one actor.
#[derive(Debug)]
pub struct ChatSession {
    identity: NodeIdentity,
    outbound: OutboundLog,
    suggestions: SuggestionTracker,
    last_snapshot: Vec<ChatMessage>,
    conversation: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(generation_timeout: Duration) -> Self {
        let identity = NodeIdentity::anonymous();
        Self {
            outbound: OutboundLog::new(identity.username.clone()),
            identity,
            suggestions: SuggestionTracker::new(generation_timeout),
            last_snapshot: Vec::new(),
            conversation: Vec::new(),
        }
    }

    pub fn set_identity(&mut self, identity: NodeIdentity) {
        self.outbound.set_local_user(identity.username.clone());
        self.identity = identity;
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    pub fn outbound(&self) -> &OutboundLog {
        &self.outbound
    }

    pub fn suggestion(&self, message_id: &str) -> Option<&Suggestion> {
        self.suggestions.get(message_id)
    }

    /// Poll the inbox and rebuild the conversation from the new snapshot.
    pub async fn refresh(&mut self, node: &dyn ChatNode) -> &[ChatMessage] {
        self.last_snapshot = InboxFetcher::fetch(node).await;
        self.rebuild()
    }

    /// Rebuild the conversation from the last snapshot without polling.
    pub fn rebuild(&mut self) -> &[ChatMessage] {
        self.conversation = reconcile(self.outbound.messages(), &self.last_snapshot);
        &self.conversation
    }

    pub async fn send(
        &mut self,
        node: &dyn ChatNode,
        to_user: &str,
        content: &str,
    ) -> Result<ChatMessage, ChatError> {
        self.outbound.append(node, to_user, content).await
    }

    /// Request a draft for a message in the current conversation.
    ///
    /// Returns `None` when the id is not a received message in view.
    pub async fn request_suggestion(
        &mut self,
        drafter: &dyn ReplyDrafter,
        message_id: &str,
    ) -> Option<&Suggestion> {
        let message = self
            .conversation
            .iter()
            .find(|message| message.id == message_id && !message.is_sent())?
            .clone();
        Some(self.suggestions.request_suggestion(drafter, &message).await)
    }

    pub async fn promote_suggestion(
        &mut self,
        node: &dyn ChatNode,
        message_id: &str,
        to_user: &str,
    ) -> Result<ChatMessage, ChatError> {
        self.suggestions
            .promote_to_outbound(message_id, to_user, node, &mut self.outbound)
            .await
    }
}
