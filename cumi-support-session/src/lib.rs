//! Chat session orchestration for the CUMI live-support widget
//!
//! A [`chat::ChatSession`] owns the conversation transcript, routes user
//! messages to the AI responder or the human-agent channel depending on
//! the current mode, accumulates streamed tokens, and exposes the
//! human-handoff entry point.

pub mod chat;
pub mod context;
pub mod events;

pub use chat::{ChatSession, HandoffOutcome, SessionError, SupportMode};
pub use context::PromptBuilder;
pub use events::SessionEvent;
