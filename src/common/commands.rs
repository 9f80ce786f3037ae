/// Commands a front end sends down to the session actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Send a hand-written message.
    SendMessage { to_user: String, content: String },
    /// Ask the text-generation backend for a reply draft to a received message.
    RequestSuggestion { message_id: String },
    /// Forward the stored draft for `message_id` to `to_user`.
    SendSuggestion { message_id: String, to_user: String },
    /// Poll the inbox now instead of waiting for the next tick.
    Refresh,
}
