use crate::common::{ChatMessage, Direction};
use crate::network::node::ChatNode;

/// Point-in-time retrieval of the node's inbox.
pub struct InboxFetcher;

impl InboxFetcher {
    /// Fetch the full visible inbox, tagged as received.
    ///
    /// Failures read as an empty snapshot; the loop just tries again on the
    /// next tick.
    pub async fn fetch(node: &dyn ChatNode) -> Vec<ChatMessage> {
        match node.list_inbox(None).await {
            Ok(mut messages) => {
                for message in &mut messages {
                    message.direction = Direction::Received;
                }
                log::debug!("Fetched {} inbox messages", messages.len());
                messages
            }
            Err(err) => {
                log::warn!("Inbox fetch failed: {err}");
                Vec::new()
            }
        }
    }
}
