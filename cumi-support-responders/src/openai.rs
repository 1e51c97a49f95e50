//! OpenAI-compatible HTTP client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::base::{
    PromptMessage, Reply, ReplyEvent, ReplyEventStream, Responder, ResponderError, ResponderResult,
};
use cumi_support_core::config::AiConfig;

/// Chat completions request format
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<PromptMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    max_tokens: u32,
    temperature: f32,
}

/// Chat completions response format
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: i64,
    #[serde(default)]
    completion_tokens: i64,
    #[serde(default)]
    total_tokens: i64,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible responder client
pub struct OpenAiClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(
        api_key: Option<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            client: Client::builder()
                .http1_only() // Force HTTP/1.1 to avoid issues with some local servers
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_base: api_base.into(),
            api_key,
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    /// Build a client from widget AI configuration.
    ///
    /// Returns `None` when no API key is configured; the widget then runs
    /// on canned replies for the whole session.
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        if config.api_key.trim().is_empty() {
            return None;
        }
        Some(Self::new(
            Some(config.api_key.clone()),
            config.api_base.clone(),
            config.model.clone(),
            config.max_tokens,
            config.temperature,
        ))
    }

    fn build_request(&self, messages: Vec<PromptMessage>, stream: bool) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            stream: if stream { Some(true) } else { None },
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    fn apply_headers(&self, mut req_builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(api_key) = &self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }
        req_builder
    }

    /// Parse an atomic response into our standard format
    fn parse_response(response: ChatCompletionResponse) -> ResponderResult<Reply> {
        let choice = response
            .choices
            .first()
            .ok_or_else(|| ResponderError::InvalidResponse("No choices in response".to_string()))?;

        Ok(Reply {
            content: choice.message.content.clone(),
            finish_reason: choice
                .finish_reason
                .clone()
                .unwrap_or_else(|| "stop".to_string()),
            usage: usage_map(&response.usage),
        })
    }

    fn finalize_partial_reply(
        content: String,
        finish_reason: Option<String>,
        usage: Option<Usage>,
    ) -> Reply {
        Reply {
            content: if content.is_empty() {
                None
            } else {
                Some(content)
            },
            finish_reason: finish_reason.unwrap_or_else(|| "stop".to_string()),
            usage: usage.as_ref().map(usage_map).unwrap_or_default(),
        }
    }

    fn parse_sse_events(buffer: &mut String) -> Vec<String> {
        let mut events = Vec::new();
        while let Some(pos) = buffer.find("\n\n") {
            let raw = buffer[..pos].to_string();
            buffer.drain(..pos + 2);

            let mut data_lines = Vec::new();
            for line in raw.lines() {
                if let Some(rest) = line.strip_prefix("data:") {
                    data_lines.push(rest.trim().to_string());
                }
            }

            if !data_lines.is_empty() {
                events.push(data_lines.join("\n"));
            }
        }
        events
    }
}

fn usage_map(usage: &Usage) -> HashMap<String, i64> {
    let mut map = HashMap::new();
    map.insert("prompt_tokens".to_string(), usage.prompt_tokens);
    map.insert("completion_tokens".to_string(), usage.completion_tokens);
    map.insert("total_tokens".to_string(), usage.total_tokens);
    map
}

#[async_trait]
impl Responder for OpenAiClient {
    async fn reply(&self, messages: Vec<PromptMessage>) -> ResponderResult<Reply> {
        let request = self.build_request(messages, false);

        debug!(
            "Sending chat request to {} with model {}",
            self.api_base, self.model
        );

        let url = format!("{}/chat/completions", self.api_base);
        let req_builder = self.apply_headers(self.client.post(&url).json(&request));

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ResponderError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let response_data: ChatCompletionResponse = response.json().await?;
        Self::parse_response(response_data)
    }

    async fn reply_stream(&self, messages: Vec<PromptMessage>) -> ResponderResult<ReplyEventStream> {
        let request = self.build_request(messages, true);

        debug!(
            "Sending streaming chat request to {} with model {}",
            self.api_base, self.model
        );

        let url = format!("{}/chat/completions", self.api_base);
        let req_builder = self.apply_headers(self.client.post(&url).json(&request));
        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ResponderError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut response = response;
            let mut buffer = String::new();
            let mut content = String::new();
            let mut finish_reason: Option<String> = None;
            let mut usage: Option<Usage> = None;

            loop {
                let chunk = match response.chunk().await {
                    Ok(Some(bytes)) => bytes,
                    Ok(None) => break,
                    Err(err) => {
                        let _ = tx.send(Err(ResponderError::HttpError(err)));
                        return;
                    }
                };

                let text = String::from_utf8_lossy(&chunk);
                buffer.push_str(&text);

                for payload in Self::parse_sse_events(&mut buffer) {
                    if payload == "[DONE]" {
                        let final_reply = Self::finalize_partial_reply(
                            content.clone(),
                            finish_reason.clone(),
                            usage.take(),
                        );
                        let _ = tx.send(Ok(ReplyEvent::Completed(final_reply)));
                        return;
                    }

                    let parsed = match serde_json::from_str::<StreamChunk>(&payload) {
                        Ok(chunk) => chunk,
                        Err(err) => {
                            let _ = tx.send(Err(ResponderError::JsonError(err)));
                            return;
                        }
                    };

                    if parsed.choices.is_empty() {
                        usage = parsed.usage;
                        continue;
                    }

                    if let Some(choice) = parsed.choices.first() {
                        if let Some(reason) = &choice.finish_reason {
                            finish_reason = Some(reason.clone());
                        }
                        if let Some(delta_text) = &choice.delta.content {
                            content.push_str(delta_text);
                            let _ = tx.send(Ok(ReplyEvent::TokenDelta(delta_text.clone())));
                        }
                    }
                }
            }

            let final_reply = Self::finalize_partial_reply(content, finish_reason, usage);
            let _ = tx.send(Ok(ReplyEvent::Completed(final_reply)));
        });

        Ok(Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })))
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_parse_sse_events() {
        let mut buffer =
            "data: {\"a\":1}\n\ndata: {\"b\":2}\n\ndata: [DONE]\n\ntrailing".to_string();
        let events = OpenAiClient::parse_sse_events(&mut buffer);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], "{\"a\":1}");
        assert_eq!(events[1], "{\"b\":2}");
        assert_eq!(events[2], "[DONE]");
        assert_eq!(buffer, "trailing");
    }

    #[test]
    fn test_parse_sse_events_waits_for_full_frame() {
        let mut buffer = "data: {\"partial\":tr".to_string();
        let events = OpenAiClient::parse_sse_events(&mut buffer);
        assert!(events.is_empty());

        buffer.push_str("ue}\n\n");
        let events = OpenAiClient::parse_sse_events(&mut buffer);
        assert_eq!(events, vec!["{\"partial\":true}".to_string()]);
    }

    #[test]
    fn test_parse_response_requires_choices() {
        let response = ChatCompletionResponse {
            choices: Vec::new(),
            usage: Usage::default(),
        };
        let err = OpenAiClient::parse_response(response).unwrap_err();
        assert!(err.to_string().contains("No choices"));
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = AiConfig::default();
        assert!(OpenAiClient::from_config(&config).is_none());

        let mut config = AiConfig::default();
        config.api_key = "sk-test".to_string();
        let client = OpenAiClient::from_config(&config).unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_reply_parses_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"content":"Hello!"},"finish_reason":"stop"}],"usage":{"prompt_tokens":5,"completion_tokens":2,"total_tokens":7}}"#,
            )
            .create_async()
            .await;

        let client = OpenAiClient::new(
            Some("sk-test".to_string()),
            server.url(),
            "gpt-4o-mini",
            128,
            0.2,
        );
        let reply = client.reply(vec![PromptMessage::user("hi")]).await.unwrap();

        assert_eq!(reply.content.as_deref(), Some("Hello!"));
        assert_eq!(reply.usage.get("total_tokens"), Some(&7));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reply_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":"invalid api key"}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(
            Some("sk-bad".to_string()),
            server.url(),
            "gpt-4o-mini",
            128,
            0.2,
        );
        let err = client
            .reply(vec![PromptMessage::user("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, ResponderError::ApiError(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_reply_stream_emits_tokens_then_completion() {
        let mut server = mockito::Server::new_async().await;
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\" there\"},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
        );
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await;

        let client = OpenAiClient::new(
            Some("sk-test".to_string()),
            server.url(),
            "gpt-4o-mini",
            128,
            0.2,
        );
        let mut stream = client
            .reply_stream(vec![PromptMessage::user("hi")])
            .await
            .unwrap();

        let mut tokens = Vec::new();
        let mut completed: Option<Reply> = None;
        while let Some(event) = stream.next().await {
            match event.unwrap() {
                ReplyEvent::TokenDelta(text) => tokens.push(text),
                ReplyEvent::Completed(reply) => {
                    completed = Some(reply);
                    break;
                }
            }
        }

        assert_eq!(tokens, vec!["Hi".to_string(), " there".to_string()]);
        let completed = completed.expect("stream completed");
        assert_eq!(completed.content.as_deref(), Some("Hi there"));
        assert_eq!(completed.finish_reason, "stop");
    }
}
