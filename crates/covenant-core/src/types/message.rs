//! Message types for model interactions.

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    #[default]
    User,
    Assistant,
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Split a conversation into its system instruction and the remaining turns.
///
/// Providers that take the system prompt as a separate field use this; all
/// system messages are concatenated in order.
pub fn split_system(messages: &[Message]) -> (Option<String>, Vec<&Message>) {
    let mut system: Option<String> = None;
    let mut rest = Vec::with_capacity(messages.len());
    for msg in messages {
        match msg.role {
            MessageRole::System => match system.as_mut() {
                Some(s) => {
                    s.push_str("\n\n");
                    s.push_str(&msg.content);
                }
                None => system = Some(msg.content.clone()),
            },
            _ => rest.push(msg),
        }
    }
    (system, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::system("x")).unwrap();
        assert!(json.contains("\"system\""));
    }

    #[test]
    fn test_split_system() {
        let msgs = vec![
            Message::system("a"),
            Message::user("q"),
            Message::system("b"),
        ];
        let (system, rest) = split_system(&msgs);
        assert_eq!(system.as_deref(), Some("a\n\nb"));
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].content, "q");
    }
}
