//! AI responder integrations for the CUMI live-support widget
//!
//! This crate provides the responder abstraction the chat session talks
//! to, an OpenAI-compatible HTTP implementation, and the deterministic
//! canned replies used when no responder is configured.

pub mod base;
pub mod canned;
pub mod openai;

pub use base::{
    PromptMessage, Reply, ReplyEvent, ReplyEventStream, Responder, ResponderError, ResponderResult,
};
pub use canned::canned_reply;
pub use openai::OpenAiClient;
