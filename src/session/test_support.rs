//! In-memory stand-ins for the chat node and the drafting backend.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::common::{ChatError, ChatMessage, Direction, NodeIdentity};
use crate::network::drafter::ReplyDrafter;
use crate::network::node::{ChatNode, SendReceipt, SendRequest};

pub fn incoming(id: &str, from_user: &str, content: &str, timestamp: &str) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        from_user: from_user.to_string(),
        to_user: "userA".to_string(),
        content: content.to_string(),
        timestamp: timestamp.to_string(),
        direction: Direction::Received,
    }
}

#[derive(Default)]
pub struct FakeNode {
    inbox: Mutex<Vec<ChatMessage>>,
    sent: Mutex<Vec<SendRequest>>,
    cursors: Mutex<Vec<Option<String>>>,
    fail_sends: AtomicBool,
    fail_inbox: AtomicBool,
    fail_whoami: AtomicBool,
}

impl FakeNode {
    pub fn push_inbox(&self, message: ChatMessage) {
        self.inbox.lock().unwrap().push(message);
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn fail_inbox(&self, fail: bool) {
        self.fail_inbox.store(fail, Ordering::SeqCst);
    }

    pub fn fail_whoami(&self, fail: bool) {
        self.fail_whoami.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SendRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn inbox_cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatNode for FakeNode {
    async fn whoami(&self) -> Result<NodeIdentity, ChatError> {
        if self.fail_whoami.load(Ordering::SeqCst) {
            return Err(ChatError::Transport("connection refused".to_string()));
        }
        Ok(NodeIdentity {
            username: "userA".to_string(),
            peer_id: "12D3KooWfake".to_string(),
            addrs: Vec::new(),
        })
    }

    async fn send(&self, request: &SendRequest) -> Result<SendReceipt, ChatError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(ChatError::Rejected {
                status: 404,
                body: r#"{"error":"user not found"}"#.to_string(),
            });
        }
        self.sent.lock().unwrap().push(request.clone());
        Ok(SendReceipt {
            status: "sent".to_string(),
            id: format!("node-{}", self.sent.lock().unwrap().len()),
        })
    }

    async fn list_inbox(&self, after: Option<&str>) -> Result<Vec<ChatMessage>, ChatError> {
        self.cursors
            .lock()
            .unwrap()
            .push(after.map(str::to_string));
        if self.fail_inbox.load(Ordering::SeqCst) {
            return Err(ChatError::Transport("connection refused".to_string()));
        }
        Ok(self.inbox.lock().unwrap().clone())
    }
}

/// Drafter that answers from a fixed script.
pub enum FakeDrafter {
    Reply(String),
    Fail(ChatError),
    Stall(Duration),
}

#[async_trait]
impl ReplyDrafter for FakeDrafter {
    async fn draft(&self, _prompt: &str) -> Result<String, ChatError> {
        match self {
            FakeDrafter::Reply(text) => Ok(text.clone()),
            FakeDrafter::Fail(err) => Err(err.clone()),
            FakeDrafter::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("too late".to_string())
            }
        }
    }
}

/// Drafter that records the prompts it receives.
#[derive(Default)]
pub struct RecordingDrafter {
    prompts: Mutex<Vec<String>>,
}

impl RecordingDrafter {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyDrafter for RecordingDrafter {
    async fn draft(&self, prompt: &str) -> Result<String, ChatError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(format!("draft #{}", self.prompts.lock().unwrap().len()))
    }
}
