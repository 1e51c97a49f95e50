//! Base trait for AI responders

use async_trait::async_trait;
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::pin::Pin;
use thiserror::Error;

/// Error type for responder operations
#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Stream interrupted: {0}")]
    StreamError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type ResponderResult<T> = Result<T, ResponderError>;

pub type ReplyEventStream = Pin<Box<dyn Stream<Item = ResponderResult<ReplyEvent>> + Send>>;

/// A message in the prompt sent to a responder.
///
/// Roles here are the responder's wire vocabulary (`system`, `user`,
/// `assistant`), not the session's message roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

impl PromptMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Completed response from a responder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub content: Option<String>,
    #[serde(default = "default_finish_reason")]
    pub finish_reason: String,
    #[serde(default)]
    pub usage: HashMap<String, i64>,
}

fn default_finish_reason() -> String {
    "stop".to_string()
}

/// Streaming event emitted by responders.
///
/// A well-behaved stream yields any number of `TokenDelta`s followed by
/// exactly one `Completed`; consumers treat anything after the first
/// terminal item as noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReplyEvent {
    /// Incremental assistant text output
    TokenDelta(String),
    /// Final completed response
    Completed(Reply),
}

/// Trait for AI responders
#[async_trait]
pub trait Responder: Send + Sync {
    /// Request a complete response for the given prompt
    async fn reply(&self, messages: Vec<PromptMessage>) -> ResponderResult<Reply>;

    /// Request a streaming response.
    ///
    /// Default behavior falls back to the atomic call and emits one text
    /// delta followed by the completion.
    async fn reply_stream(&self, messages: Vec<PromptMessage>) -> ResponderResult<ReplyEventStream> {
        let reply = self.reply(messages).await?;

        let mut events = Vec::new();
        if let Some(content) = reply.content.clone() {
            if !content.is_empty() {
                events.push(Ok(ReplyEvent::TokenDelta(content)));
            }
        }
        events.push(Ok(ReplyEvent::Completed(reply)));

        Ok(Box::pin(stream::iter(events)))
    }

    /// The model identifier this responder answers with
    fn model(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    struct AtomicOnly;

    #[async_trait]
    impl Responder for AtomicOnly {
        async fn reply(&self, _messages: Vec<PromptMessage>) -> ResponderResult<Reply> {
            Ok(Reply {
                content: Some("whole answer".to_string()),
                finish_reason: "stop".to_string(),
                usage: HashMap::new(),
            })
        }

        fn model(&self) -> String {
            "atomic-only".to_string()
        }
    }

    #[tokio::test]
    async fn test_default_stream_emits_one_delta_then_completion() {
        let responder = AtomicOnly;
        let mut stream = responder
            .reply_stream(vec![PromptMessage::user("hi")])
            .await
            .unwrap();

        let mut deltas = Vec::new();
        let mut completions = 0;
        while let Some(event) = stream.next().await {
            match event.unwrap() {
                ReplyEvent::TokenDelta(text) => deltas.push(text),
                ReplyEvent::Completed(reply) => {
                    completions += 1;
                    assert_eq!(reply.content.as_deref(), Some("whole answer"));
                }
            }
        }

        assert_eq!(deltas, vec!["whole answer".to_string()]);
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_prompt_message_roles() {
        assert_eq!(PromptMessage::system("s").role, "system");
        assert_eq!(PromptMessage::user("u").role, "user");
        assert_eq!(PromptMessage::assistant("a").role, "assistant");
    }
}
