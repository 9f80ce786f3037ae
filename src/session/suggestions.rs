use std::collections::HashMap;
use std::time::Duration;

use crate::common::{ChatError, ChatMessage, Suggestion, SuggestionStatus};
use crate::network::drafter::ReplyDrafter;
use crate::network::node::ChatNode;

use super::outbound::OutboundLog;

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

pub fn reply_prompt(content: &str) -> String {
    format!(
        "You are a helpful assistant. Draft a concise, friendly reply to the following message:\n\n{content}\n\nReply:"
    )
}

/// At most one suggestion per received message, keyed by message id.
#[derive(Debug)]
pub struct SuggestionTracker {
    suggestions: HashMap<String, Suggestion>,
    timeout: Duration,
}

impl Default for SuggestionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATION_TIMEOUT)
    }
}

impl SuggestionTracker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            suggestions: HashMap::new(),
            timeout,
        }
    }

    /// Draft a reply to `message` and store it, replacing any earlier one.
    ///
    /// Never fails: a backend error or timeout stores a placeholder instead.
    pub async fn request_suggestion(
        &mut self,
        drafter: &dyn ReplyDrafter,
        message: &ChatMessage,
    ) -> &Suggestion {
        let prompt = reply_prompt(&message.content);
        let outcome = match tokio::time::timeout(self.timeout, drafter.draft(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ChatError::GenerationTimeout {
                secs: self.timeout.as_secs(),
            }),
        };

        let suggestion = match outcome {
            Ok(draft_text) => Suggestion {
                source_message_id: message.id.clone(),
                draft_text,
                status: SuggestionStatus::Ready,
            },
            Err(err) => {
                log::warn!("Suggestion for {} failed: {err}", message.id);
                Suggestion {
                    source_message_id: message.id.clone(),
                    draft_text: err.draft_placeholder(),
                    status: SuggestionStatus::Unavailable,
                }
            }
        };

        self.suggestions.insert(message.id.clone(), suggestion);
        &self.suggestions[&message.id]
    }

    pub fn get(&self, message_id: &str) -> Option<&Suggestion> {
        self.suggestions.get(message_id)
    }

    /// Send the stored draft for `message_id` to `to_user` as a new outbound
    /// message. The suggestion stays stored either way.
    pub async fn promote_to_outbound(
        &self,
        message_id: &str,
        to_user: &str,
        node: &dyn ChatNode,
        outbound: &mut OutboundLog,
    ) -> Result<ChatMessage, ChatError> {
        let suggestion = self
            .get(message_id)
            .ok_or_else(|| ChatError::NoSuggestion {
                message_id: message_id.to_string(),
            })?;

        outbound.append(node, to_user, &suggestion.draft_text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::{FakeDrafter, FakeNode, RecordingDrafter, incoming};

    fn hello() -> ChatMessage {
        incoming("in_1", "userB", "hello", "2025-01-01T09:59:00Z")
    }

    #[tokio::test]
    async fn stores_generated_draft_under_message_id() {
        let mut tracker = SuggestionTracker::default();
        let drafter = FakeDrafter::Reply("Hi there!".to_string());

        tracker.request_suggestion(&drafter, &hello()).await;

        let suggestion = tracker.get("in_1").unwrap();
        assert_eq!(suggestion.draft_text, "Hi there!");
        assert_eq!(suggestion.source_message_id, "in_1");
        assert_eq!(suggestion.status, SuggestionStatus::Ready);
        assert!(tracker.get("in_2").is_none());
    }

    #[tokio::test]
    async fn prompt_embeds_message_content() {
        let mut tracker = SuggestionTracker::default();
        let drafter = RecordingDrafter::default();

        tracker.request_suggestion(&drafter, &hello()).await;

        let prompts = drafter.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Draft a concise, friendly reply"));
        assert!(prompts[0].contains("\n\nhello\n\n"));
    }

    #[tokio::test]
    async fn new_request_overwrites_previous_draft() {
        let mut tracker = SuggestionTracker::default();
        let drafter = RecordingDrafter::default();

        tracker.request_suggestion(&drafter, &hello()).await;
        tracker.request_suggestion(&drafter, &hello()).await;

        assert_eq!(tracker.get("in_1").unwrap().draft_text, "draft #2");
        assert_eq!(drafter.prompts().len(), 2);
    }

    #[tokio::test]
    async fn timeout_yields_placeholder() {
        let mut tracker = SuggestionTracker::new(Duration::from_millis(20));
        let drafter = FakeDrafter::Stall(Duration::from_secs(5));

        let suggestion = tracker.request_suggestion(&drafter, &hello()).await;

        assert_eq!(suggestion.status, SuggestionStatus::Unavailable);
        assert!(!suggestion.draft_text.is_empty());
        assert!(suggestion.draft_text.starts_with("(LLM unavailable"));
    }

    #[tokio::test]
    async fn backend_status_error_yields_llm_error() {
        let mut tracker = SuggestionTracker::default();
        let drafter = FakeDrafter::Fail(ChatError::GenerationStatus { status: 500 });

        let suggestion = tracker.request_suggestion(&drafter, &hello()).await;
        assert_eq!(suggestion.draft_text, "(LLM error)");
    }

    #[tokio::test]
    async fn promote_sends_draft_and_appends_one_entry() {
        let node = FakeNode::default();
        let mut outbound = OutboundLog::new("userA");
        let mut tracker = SuggestionTracker::default();
        tracker
            .request_suggestion(&FakeDrafter::Reply("Hi there!".to_string()), &hello())
            .await;

        let sent = tracker
            .promote_to_outbound("in_1", "userB", &node, &mut outbound)
            .await
            .unwrap();

        assert_eq!(outbound.len(), 1);
        assert_eq!(sent.content, "Hi there!");
        assert_eq!(sent.to_user, "userB");
        assert_eq!(node.sent()[0].content, "Hi there!");
        assert!(tracker.get("in_1").is_some());
    }

    #[tokio::test]
    async fn failed_promote_keeps_log_and_suggestion() {
        let node = FakeNode::default();
        node.fail_sends(true);
        let mut outbound = OutboundLog::new("userA");
        let mut tracker = SuggestionTracker::default();
        tracker
            .request_suggestion(&FakeDrafter::Reply("Hi there!".to_string()), &hello())
            .await;

        let result = tracker
            .promote_to_outbound("in_1", "userB", &node, &mut outbound)
            .await;

        assert!(result.is_err());
        assert!(outbound.is_empty());
        assert_eq!(tracker.get("in_1").unwrap().draft_text, "Hi there!");

        node.fail_sends(false);
        tracker
            .promote_to_outbound("in_1", "userB", &node, &mut outbound)
            .await
            .unwrap();
        assert_eq!(outbound.len(), 1);
    }

    #[tokio::test]
    async fn any_stored_draft_is_sent_verbatim() {
        let node = FakeNode::default();
        let mut outbound = OutboundLog::new("userA");
        let mut tracker = SuggestionTracker::default();

        let missing = tracker
            .promote_to_outbound("in_1", "userB", &node, &mut outbound)
            .await;
        assert!(matches!(missing, Err(ChatError::NoSuggestion { .. })));
        assert!(node.sent().is_empty());

        tracker
            .request_suggestion(
                &FakeDrafter::Fail(ChatError::Generation("refused".to_string())),
                &hello(),
            )
            .await;
        let placeholder = tracker.get("in_1").unwrap().draft_text.clone();
        let sent = tracker
            .promote_to_outbound("in_1", "userB", &node, &mut outbound)
            .await
            .unwrap();
        assert_eq!(sent.content, placeholder);
        assert_eq!(sent.content, "(LLM unavailable: generation failed: refused)");

        tracker
            .request_suggestion(&FakeDrafter::Reply(String::new()), &hello())
            .await;
        let empty = tracker
            .promote_to_outbound("in_1", "userB", &node, &mut outbound)
            .await
            .unwrap();
        assert_eq!(empty.content, "");

        let contents: Vec<_> = node.sent().into_iter().map(|request| request.content).collect();
        assert_eq!(contents, vec![placeholder, String::new()]);
        assert_eq!(outbound.len(), 2);
    }
}
