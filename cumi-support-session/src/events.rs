//! Session events for UI consumers

use crate::chat::SupportMode;
use cumi_support_core::session::MessageId;

/// Progress notifications emitted while the session mutates its
/// transcript, so a widget can render typing indicators without polling.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A user message was appended
    UserMessage { id: MessageId },
    /// A response placeholder was opened (typing indicator on)
    ResponseStarted { id: MessageId },
    /// Incremental assistant text
    AssistantDelta { text: String },
    /// The response message was finalized
    ResponseFinalized { id: MessageId },
    /// The response failed and was finalized with the apology body
    ResponseFailed { id: MessageId },
    /// The support mode changed
    ModeChanged { mode: SupportMode },
    /// The conversation was reset to its greeting
    Cleared,
}
