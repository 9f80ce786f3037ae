use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::{ChatError, ChatMessage, NodeIdentity};

/// Body of `POST /send`.
#[derive(Debug, Clone, Serialize)]
pub struct SendRequest {
    pub to_username: String,
    pub content: String,
}

/// Success body of `POST /send`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendReceipt {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub id: String,
}

/// The remote chat node as seen from this client.
#[async_trait]
pub trait ChatNode: Send + Sync {
    async fn whoami(&self) -> Result<NodeIdentity, ChatError>;

    async fn send(&self, request: &SendRequest) -> Result<SendReceipt, ChatError>;

    /// `after` is the node's cursor; `None` asks for the whole visible history.
    async fn list_inbox(&self, after: Option<&str>) -> Result<Vec<ChatMessage>, ChatError>;
}

/// `ChatNode` over the node's local HTTP API.
pub struct HttpNode {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNode {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn reject(response: reqwest::Response) -> ChatError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ChatError::Rejected { status, body }
}

#[async_trait]
impl ChatNode for HttpNode {
    async fn whoami(&self) -> Result<NodeIdentity, ChatError> {
        let response = self.client.get(self.url("/me")).send().await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        Ok(response.json::<NodeIdentity>().await?)
    }

    async fn send(&self, request: &SendRequest) -> Result<SendReceipt, ChatError> {
        let response = self
            .client
            .post(self.url("/send"))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        // The node has accepted the message at this point; a body we cannot
        // read does not undo that.
        Ok(response.json::<SendReceipt>().await.unwrap_or_default())
    }

    async fn list_inbox(&self, after: Option<&str>) -> Result<Vec<ChatMessage>, ChatError> {
        let response = self
            .client
            .get(self.url("/inbox"))
            .query(&[("after", after.unwrap_or(""))])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        Ok(response.json::<Vec<ChatMessage>>().await?)
    }
}
