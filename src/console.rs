//! Headless front end: commands on stdin, transcript on stdout.

use std::collections::HashMap;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::common::{ChatMessage, NoticeLevel, SessionEvent, Suggestion, UserCommand};
use crate::ui::state::AppState;

pub const HELP: &str = "\
commands:
  /send <user> <text>    send a message
  /suggest <message-id>  draft an AI reply to a received message
  /reply <message-id>    send the drafted reply to its author
  /refresh               poll the inbox now
  /quit                  leave
anything else is sent to the default recipient";

#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleInput {
    Command(UserCommand),
    Help,
    Quit,
    Invalid(String),
    Nothing,
}

/// Interpret one stdin line against the conversation currently shown.
pub fn parse_line(line: &str, state: &AppState) -> ConsoleInput {
    let line = line.trim();
    if line.is_empty() {
        return ConsoleInput::Nothing;
    }
    if !line.starts_with('/') {
        return ConsoleInput::Command(UserCommand::SendMessage {
            to_user: state.recipient_input.clone(),
            content: line.to_string(),
        });
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    match verb {
        "/send" => match rest.split_once(char::is_whitespace) {
            Some((to_user, content)) if !content.trim().is_empty() => {
                ConsoleInput::Command(UserCommand::SendMessage {
                    to_user: to_user.to_string(),
                    content: content.trim().to_string(),
                })
            }
            _ => ConsoleInput::Invalid("usage: /send <user> <text>".to_string()),
        },
        "/suggest" if !rest.is_empty() => ConsoleInput::Command(UserCommand::RequestSuggestion {
            message_id: rest.to_string(),
        }),
        "/reply" if !rest.is_empty() => {
            match state.conversation.iter().find(|message| message.id == rest) {
                Some(message) if !message.is_sent() => {
                    ConsoleInput::Command(UserCommand::SendSuggestion {
                        message_id: message.id.clone(),
                        to_user: message.from_user.clone(),
                    })
                }
                _ => ConsoleInput::Invalid(format!("no received message `{rest}` in view")),
            }
        }
        "/suggest" | "/reply" => ConsoleInput::Invalid(format!("usage: {verb} <message-id>")),
        "/refresh" => ConsoleInput::Command(UserCommand::Refresh),
        "/help" => ConsoleInput::Help,
        "/quit" | "/exit" => ConsoleInput::Quit,
        other => ConsoleInput::Invalid(format!("unknown command `{other}` (try /help)")),
    }
}

pub fn format_transcript(
    conversation: &[ChatMessage],
    suggestions: &HashMap<String, Suggestion>,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(conversation.len());
    for message in conversation {
        if message.is_sent() {
            lines.push(format!(
                "[{}] You → {}: {}  ({})",
                message.id, message.to_user, message.content, message.timestamp
            ));
        } else {
            lines.push(format!(
                "[{}] {} → You: {}  ({})",
                message.id, message.from_user, message.content, message.timestamp
            ));
            if let Some(suggestion) = suggestions.get(&message.id) {
                lines.push(format!("    💡 {}", suggestion.draft_text));
            }
        }
    }
    lines
}

fn print_transcript(state: &AppState) {
    println!("──── {} ────", state.username());
    for line in format_transcript(&state.conversation, &state.suggestions) {
        println!("{line}");
    }
}

/// Pump stdin into `commands` and session events onto stdout until the user
/// quits, stdin closes, or the session stops.
pub async fn run(
    default_recipient: &str,
    commands: mpsc::Sender<UserCommand>,
    mut events: mpsc::Receiver<SessionEvent>,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut state = AppState::new(default_recipient);
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(err) => {
                        log::warn!("Failed to read stdin: {err}");
                        break;
                    }
                };
                match parse_line(&line, &state) {
                    ConsoleInput::Command(command) => {
                        if commands.send(command).await.is_err() {
                            break;
                        }
                    }
                    ConsoleInput::Help => println!("{HELP}"),
                    ConsoleInput::Quit => break,
                    ConsoleInput::Invalid(reason) => eprintln!("{reason}"),
                    ConsoleInput::Nothing => {}
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    SessionEvent::ConversationUpdated(conversation) => {
                        let changed = conversation != state.conversation;
                        state.apply(SessionEvent::ConversationUpdated(conversation));
                        if changed {
                            print_transcript(&state);
                        }
                    }
                    SessionEvent::SuggestionUpdated(suggestion) => {
                        state.apply(SessionEvent::SuggestionUpdated(suggestion));
                        print_transcript(&state);
                    }
                    SessionEvent::SuggestionPending(message_id) => {
                        println!("drafting a reply to {message_id}...");
                        state.apply(SessionEvent::SuggestionPending(message_id));
                    }
                    SessionEvent::Notice(notice) => {
                        match notice.level {
                            NoticeLevel::Info => println!("✓ {}", notice.message),
                            NoticeLevel::Error => eprintln!("✗ {}", notice.message),
                        }
                        state.push_notice(notice);
                    }
                    other => state.apply(other),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Direction, SuggestionStatus};

    fn state_with_inbox() -> AppState {
        let mut state = AppState::new("userB");
        state.conversation = vec![
            ChatMessage {
                id: "in_1".to_string(),
                from_user: "userC".to_string(),
                to_user: "userA".to_string(),
                content: "hello".to_string(),
                timestamp: "2025-01-01T09:59:00Z".to_string(),
                direction: Direction::Received,
            },
            ChatMessage {
                id: "sent_1".to_string(),
                from_user: "userA".to_string(),
                to_user: "userC".to_string(),
                content: "hi".to_string(),
                timestamp: "2025-01-01T10:00:00+00:00".to_string(),
                direction: Direction::Sent,
            },
        ];
        state
    }

    #[test]
    fn plain_text_goes_to_default_recipient() {
        let state = state_with_inbox();
        assert_eq!(
            parse_line("  how are you?  ", &state),
            ConsoleInput::Command(UserCommand::SendMessage {
                to_user: "userB".to_string(),
                content: "how are you?".to_string(),
            })
        );
        assert_eq!(parse_line("   ", &state), ConsoleInput::Nothing);
    }

    #[test]
    fn send_takes_user_then_text() {
        let state = state_with_inbox();
        assert_eq!(
            parse_line("/send userD see you at noon", &state),
            ConsoleInput::Command(UserCommand::SendMessage {
                to_user: "userD".to_string(),
                content: "see you at noon".to_string(),
            })
        );
        assert!(matches!(
            parse_line("/send userD", &state),
            ConsoleInput::Invalid(_)
        ));
    }

    #[test]
    fn reply_targets_the_author() {
        let state = state_with_inbox();
        assert_eq!(
            parse_line("/reply in_1", &state),
            ConsoleInput::Command(UserCommand::SendSuggestion {
                message_id: "in_1".to_string(),
                to_user: "userC".to_string(),
            })
        );
        assert!(matches!(
            parse_line("/reply sent_1", &state),
            ConsoleInput::Invalid(_)
        ));
        assert!(matches!(parse_line("/reply", &state), ConsoleInput::Invalid(_)));
    }

    #[test]
    fn other_commands() {
        let state = state_with_inbox();
        assert_eq!(
            parse_line("/suggest in_1", &state),
            ConsoleInput::Command(UserCommand::RequestSuggestion {
                message_id: "in_1".to_string(),
            })
        );
        assert_eq!(
            parse_line("/refresh", &state),
            ConsoleInput::Command(UserCommand::Refresh)
        );
        assert_eq!(parse_line("/quit", &state), ConsoleInput::Quit);
        assert_eq!(parse_line("/help", &state), ConsoleInput::Help);
        assert!(matches!(parse_line("/dance", &state), ConsoleInput::Invalid(_)));
    }

    #[test]
    fn transcript_shows_direction_and_drafts() {
        let state = state_with_inbox();
        let suggestions = HashMap::from([(
            "in_1".to_string(),
            Suggestion {
                source_message_id: "in_1".to_string(),
                draft_text: "Hi there!".to_string(),
                status: SuggestionStatus::Ready,
            },
        )]);

        let lines = format_transcript(&state.conversation, &suggestions);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[in_1] userC → You: hello"));
        assert_eq!(lines[1], "    💡 Hi there!");
        assert!(lines[2].starts_with("[sent_1] You → userC: hi"));
    }
}
