use chrono::Utc;

use crate::common::{ChatError, ChatMessage, Direction};
use crate::network::node::{ChatNode, SendRequest};

/// Append-only record of the messages sent during this session.
#[derive(Debug, Default)]
pub struct OutboundLog {
    local_user: String,
    messages: Vec<ChatMessage>,
}

impl OutboundLog {
    pub fn new(local_user: impl Into<String>) -> Self {
        Self {
            local_user: local_user.into(),
            messages: Vec::new(),
        }
    }

    pub fn set_local_user(&mut self, local_user: impl Into<String>) {
        self.local_user = local_user.into();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Hand `content` to the node and record it once the node accepts it.
    /// A failed send leaves the log untouched.
    pub async fn append(
        &mut self,
        node: &dyn ChatNode,
        to_user: &str,
        content: &str,
    ) -> Result<ChatMessage, ChatError> {
        let request = SendRequest {
            to_username: to_user.to_string(),
            content: content.to_string(),
        };
        let receipt = node.send(&request).await?;
        log::info!(
            "Sent message to {to_user} (node says {:?}, id {:?})",
            receipt.status, receipt.id
        );

        let message = ChatMessage {
            id: format!("sent_{}", self.messages.len() + 1),
            from_user: self.local_user.clone(),
            to_user: to_user.to_string(),
            content: content.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            direction: Direction::Sent,
        };
        self.messages.push(message.clone());
        Ok(message)
    }
}
