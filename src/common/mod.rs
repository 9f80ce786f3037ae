pub mod commands;
pub mod error;
pub mod events;
pub mod types;

pub use commands::UserCommand;
pub use error::ChatError;
pub use events::{Notice, NoticeLevel, SessionEvent};
pub use types::{ChatMessage, Direction, NodeIdentity, Suggestion, SuggestionStatus};
