//! Conversation primitives: roles, messages, and the transcript state machine

pub mod message;
pub mod transcript;

pub use message::{Message, MessageId, Role};
pub use transcript::{StreamHandle, Transcript};
