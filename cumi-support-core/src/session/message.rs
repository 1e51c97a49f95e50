//! Message data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message.
///
/// `Assistant` is the AI responder; `Agent` is a human support agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Agent,
}

impl Role {
    /// Wire-format name for the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Agent => "agent",
        }
    }
}

/// Per-transcript monotonic message identifier
pub type MessageId = u64;

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Monotonic id; later messages always have larger ids
    pub id: MessageId,
    /// Message author
    pub role: Role,
    /// Message text; mutable only while `streaming` is true
    pub body: String,
    /// Creation time, never mutated
    pub created_at: DateTime<Utc>,
    /// True only while tokens are still arriving for this message
    #[serde(default)]
    pub streaming: bool,
    /// Display label, only meaningful for `Agent` messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_label: Option<String>,
}

impl Message {
    /// Create a finalized message
    pub fn new(id: MessageId, role: Role, body: impl Into<String>) -> Self {
        Self {
            id,
            role,
            body: body.into(),
            created_at: Utc::now(),
            streaming: false,
            sender_label: None,
        }
    }

    /// Create an empty streaming placeholder
    pub fn placeholder(id: MessageId, role: Role) -> Self {
        Self {
            id,
            role,
            body: String::new(),
            created_at: Utc::now(),
            streaming: true,
            sender_label: None,
        }
    }

    /// Attach a sender label
    pub fn with_sender_label(mut self, label: impl Into<String>) -> Self {
        self.sender_label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_names() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(serde_json::to_string(&Role::Agent).unwrap(), "\"agent\"");
    }

    #[test]
    fn test_placeholder_starts_empty_and_streaming() {
        let msg = Message::placeholder(7, Role::Assistant);
        assert!(msg.streaming);
        assert!(msg.body.is_empty());
        assert_eq!(msg.id, 7);
    }

    #[test]
    fn test_sender_label() {
        let msg = Message::new(1, Role::Agent, "hello").with_sender_label("Support Team");
        assert_eq!(msg.sender_label.as_deref(), Some("Support Team"));
    }
}
