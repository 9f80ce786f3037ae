use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::MissedTickBehavior;

use crate::common::{ChatMessage, Notice, SessionEvent, SuggestionStatus, UserCommand};
use crate::session::ChatSession;

use super::drafter::ReplyDrafter;
use super::node::ChatNode;

/// Drives one chat session: polls the inbox on a fixed interval and executes
/// front-end commands, one at a time.
pub struct ChatClient {
    node: Arc<dyn ChatNode>,
    drafter: Arc<dyn ReplyDrafter>,
    event_sender: mpsc::Sender<SessionEvent>,
    command_receiver: mpsc::Receiver<UserCommand>,
    poll_interval: Duration,
    session: ChatSession,
}

impl ChatClient {
    pub fn new(
        node: Arc<dyn ChatNode>,
        drafter: Arc<dyn ReplyDrafter>,
        event_sender: mpsc::Sender<SessionEvent>,
        command_receiver: mpsc::Receiver<UserCommand>,
        poll_interval: Duration,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            node,
            drafter,
            event_sender,
            command_receiver,
            poll_interval,
            session: ChatSession::new(generation_timeout),
        }
    }

    /// Run until `shutdown` resolves or every command sender is dropped.
    /// Returns the session so nothing already sent is lost.
    pub async fn run<F>(mut self, shutdown: F) -> ChatSession
    where
        F: Future<Output = ()>,
    {
        self.resolve_identity().await;

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        log::info!(
            "Refresh loop started (every {} ms)",
            self.poll_interval.as_millis()
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("Shutdown requested");
                    break;
                }
                command = self.command_receiver.recv() => {
                    if let Some(command) = command {
                        self.handle_command(command).await;
                    } else {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.refresh().await;
                }
            }
        }

        log::info!(
            "Refresh loop stopped with {} sent messages",
            self.session.outbound().len()
        );
        self.session
    }

    async fn resolve_identity(&mut self) {
        match self.node.whoami().await {
            Ok(identity) => {
                log::info!("Chatting as {}", identity.username);
                self.session.set_identity(identity);
            }
            Err(err) => {
                log::warn!("Identity query failed: {err}");
                self.notify(Notice::error(format!(
                    "Could not reach node ({err}); labelling messages as `{}`",
                    self.session.identity().username
                )))
                .await;
            }
        }
        self.emit(SessionEvent::IdentityResolved(self.session.identity().clone()))
            .await;
    }

    async fn refresh(&mut self) {
        let conversation = self.session.refresh(self.node.as_ref()).await.to_vec();
        self.publish_conversation(conversation);
    }

    async fn publish_view(&mut self) {
        let conversation = self.session.rebuild().to_vec();
        self.publish_conversation(conversation);
    }

    /// Every view is a full snapshot, so a front end that is behind only
    /// misses views the next one replaces. Never wait on it.
    fn publish_conversation(&self, conversation: Vec<ChatMessage>) {
        match self
            .event_sender
            .try_send(SessionEvent::ConversationUpdated(conversation))
        {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log::debug!("Front end is behind, skipping a conversation update")
            }
            Err(TrySendError::Closed(_)) => {
                log::debug!("Front end is gone, dropping conversation update")
            }
        }
    }

    async fn handle_command(&mut self, command: UserCommand) {
        match command {
            UserCommand::SendMessage { to_user, content } => {
                match self
                    .session
                    .send(self.node.as_ref(), &to_user, &content)
                    .await
                {
                    Ok(_) => self.notify(Notice::info(format!("Sent to {to_user}"))).await,
                    Err(err) => {
                        log::warn!("Send to {to_user} failed: {err}");
                        self.notify(Notice::error(format!("Send failed: {err}")))
                            .await
                    }
                }
                self.publish_view().await;
            }
            UserCommand::RequestSuggestion { message_id } => {
                self.emit(SessionEvent::SuggestionPending(message_id.clone()))
                    .await;
                let suggestion = self
                    .session
                    .request_suggestion(self.drafter.as_ref(), &message_id)
                    .await
                    .cloned();
                match suggestion {
                    Some(suggestion) => {
                        if suggestion.status == SuggestionStatus::Unavailable {
                            self.notify(Notice::error(format!(
                                "No reply suggestion for {message_id}: {}",
                                suggestion.draft_text
                            )))
                            .await;
                        }
                        self.emit(SessionEvent::SuggestionUpdated(suggestion)).await;
                    }
                    None => {
                        self.notify(Notice::error(format!(
                            "No received message {message_id} in view"
                        )))
                        .await
                    }
                }
            }
            UserCommand::SendSuggestion {
                message_id,
                to_user,
            } => {
                match self
                    .session
                    .promote_suggestion(self.node.as_ref(), &message_id, &to_user)
                    .await
                {
                    Ok(_) => {
                        self.notify(Notice::info(format!("AI reply sent to {to_user}")))
                            .await
                    }
                    Err(err) => {
                        log::warn!("AI reply for {message_id} failed: {err}");
                        self.notify(Notice::error(format!("AI reply failed: {err}")))
                            .await
                    }
                }
                self.publish_view().await;
            }
            UserCommand::Refresh => self.refresh().await,
        }
    }

    async fn notify(&self, notice: Notice) {
        self.emit(SessionEvent::Notice(notice)).await;
    }

    async fn emit(&self, event: SessionEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::debug!("Front end is gone, dropping event: {err}");
        }
    }
}
