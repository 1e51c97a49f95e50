//! The chat session: message dispatch, mode handling, and handoff

use futures::StreamExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use cumi_support_channels::{AgentReply, HandoffChannel, HumanAgentChannel};
use cumi_support_core::config::Config;
use cumi_support_core::session::{Message, Role, Transcript};
use cumi_support_responders::{canned_reply, ReplyEvent, Responder};

use crate::context::PromptBuilder;
use crate::events::SessionEvent;

/// Who handles the next user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportMode {
    /// AI responder (or canned replies when none is configured)
    Ai,
    /// Human agent channel
    Agent,
}

/// Precondition rejections from the session API
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A response is already in flight; the message was not appended
    #[error("a response is already in flight")]
    Busy,

    /// The message was blank after trimming
    #[error("message is empty")]
    EmptyMessage,
}

/// Result of a human-handoff attempt.
///
/// None of these change session state; the conversation continues either
/// way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffOutcome {
    /// The handoff surface opened in its own context
    Opened,
    /// The surface was blocked; the caller should navigate to `link`
    /// in its own context instead
    FallbackNavigation { link: String },
    /// The channel is misconfigured; direct the user to the static
    /// fallback contact
    Failed { fallback_contact: String },
}

struct SessionState {
    transcript: Transcript,
    mode: SupportMode,
    awaiting_response: bool,
}

/// A live-support conversation.
///
/// Owns the transcript and routes each user message to the AI responder
/// or the human-agent channel depending on the current mode. All
/// responder and channel failures are absorbed here; nothing propagates
/// to the caller beyond the `Busy`/`EmptyMessage` precondition checks.
pub struct ChatSession {
    config: Config,
    prompts: PromptBuilder,
    responder: Option<Arc<dyn Responder>>,
    agent_channel: Arc<dyn HumanAgentChannel>,
    handoff: Arc<dyn HandoffChannel>,
    state: Mutex<SessionState>,
    event_tx: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl ChatSession {
    /// Create a new session seeded with the AI greeting.
    ///
    /// A `None` responder puts the session permanently in canned-reply
    /// mode; that is a supported degraded configuration, not an error.
    pub fn new(
        config: Config,
        responder: Option<Arc<dyn Responder>>,
        agent_channel: Arc<dyn HumanAgentChannel>,
        handoff: Arc<dyn HandoffChannel>,
    ) -> Self {
        let prompts = PromptBuilder::new(&config.widget);
        let greeting = greeting_for(&config, SupportMode::Ai);

        Self {
            config,
            prompts,
            responder,
            agent_channel,
            handoff,
            state: Mutex::new(SessionState {
                transcript: Transcript::new(greeting),
                mode: SupportMode::Ai,
                awaiting_response: false,
            }),
            event_tx: None,
        }
    }

    /// Attach an event sender for UI consumers
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Current support mode
    pub fn mode(&self) -> SupportMode {
        self.state.lock().mode
    }

    /// Snapshot of the conversation in display order
    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().transcript.messages().to_vec()
    }

    /// True between a user message being accepted and its response being
    /// finalized; a second submit is rejected while this holds
    pub fn is_awaiting_response(&self) -> bool {
        self.state.lock().awaiting_response
    }

    /// Switch who handles the next user message.
    ///
    /// History is untouched, and an in-flight response still completes
    /// under the mode that was active when it was requested.
    pub fn set_mode(&self, mode: SupportMode) {
        let changed = {
            let mut state = self.state.lock();
            if state.mode == mode {
                false
            } else {
                state.mode = mode;
                true
            }
        };
        if changed {
            debug!("Support mode switched to {:?}", mode);
            self.emit(SessionEvent::ModeChanged { mode });
        }
    }

    /// Reset the conversation to the greeting for the current mode.
    ///
    /// Outstanding stream handles are invalidated, so a response still in
    /// flight cannot write into the fresh conversation.
    pub fn clear(&self) {
        {
            let mut state = self.state.lock();
            let greeting = greeting_for(&self.config, state.mode);
            state.transcript.clear(greeting);
            state.awaiting_response = false;
        }
        self.emit(SessionEvent::Cleared);
    }

    /// Accept a user message and produce a response in the current mode.
    ///
    /// The user message is appended immediately; the response arrives as
    /// a streamed or atomic append before this call returns. Responder
    /// failures surface as an apology message, never as an `Err`.
    pub async fn submit_user_message(&self, text: &str) -> Result<(), SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let (mode, epoch, history, user_id) = {
            let mut state = self.state.lock();
            if state.awaiting_response {
                return Err(SessionError::Busy);
            }
            // Window is taken before the append so it holds only prior turns
            let history = state.transcript.window(self.config.ai.history_window);
            let user_id = state.transcript.push_user(text);
            state.awaiting_response = true;
            (state.mode, state.transcript.epoch(), history, user_id)
        };
        self.emit(SessionEvent::UserMessage { id: user_id });

        match mode {
            SupportMode::Ai => self.dispatch_ai(epoch, history, text).await,
            SupportMode::Agent => self.dispatch_agent(epoch, text).await,
        }

        Ok(())
    }

    /// Hand the conversation to a human via the handoff channel.
    ///
    /// Side-effect only; the transcript is never modified.
    pub fn request_human_handoff(&self) -> HandoffOutcome {
        let summary = format!(
            "Hello! I was chatting with the {} assistant and would like to continue with a human.",
            self.config.widget.product_name
        );

        match self.handoff.open(&summary) {
            Ok(true) => HandoffOutcome::Opened,
            Ok(false) => match self.handoff.link(&summary) {
                Ok(link) => HandoffOutcome::FallbackNavigation { link },
                Err(err) => {
                    warn!("Handoff link unavailable: {}", err);
                    self.handoff_failed()
                }
            },
            Err(err) => {
                warn!("Handoff channel failed: {}", err);
                self.handoff_failed()
            }
        }
    }

    async fn dispatch_ai(&self, epoch: u64, history: Vec<Message>, text: &str) {
        let Some(responder) = self.responder.clone() else {
            let body = canned_reply(text, &self.config.widget);
            self.finish_atomic(epoch, Role::Assistant, body, None);
            return;
        };

        let prompt = self.prompts.build_messages(&history, text);
        let mut stream = match responder.reply_stream(prompt).await {
            Ok(stream) => stream,
            Err(err) => {
                warn!("Responder call failed: {}", err);
                self.finish_atomic(
                    epoch,
                    Role::Assistant,
                    self.config.widget.apology.clone(),
                    None,
                );
                return;
            }
        };

        // Placeholder goes in before the first token so the UI can show
        // a typing indicator immediately
        let handle = {
            let mut state = self.state.lock();
            if state.transcript.epoch() != epoch {
                return;
            }
            state.transcript.begin_streaming()
        };
        self.emit(SessionEvent::ResponseStarted { id: handle.id() });

        while let Some(event) = stream.next().await {
            match event {
                Ok(ReplyEvent::TokenDelta(token)) => {
                    let delivered = self.state.lock().transcript.push_token(&handle, &token);
                    if delivered {
                        self.emit(SessionEvent::AssistantDelta { text: token });
                    }
                }
                Ok(ReplyEvent::Completed(_)) => break,
                Err(err) => {
                    warn!("Responder stream failed: {}", err);
                    let failed = {
                        let mut state = self.state.lock();
                        let failed = state
                            .transcript
                            .fail(&handle, &self.config.widget.apology);
                        if failed {
                            state.awaiting_response = false;
                        }
                        failed
                    };
                    if failed {
                        self.emit(SessionEvent::ResponseFailed { id: handle.id() });
                    }
                    return;
                }
            }
        }

        // Completion signal received, or the stream simply ended
        let completed = {
            let mut state = self.state.lock();
            let completed = state.transcript.complete(&handle);
            if completed {
                state.awaiting_response = false;
            }
            completed
        };
        if completed {
            self.emit(SessionEvent::ResponseFinalized { id: handle.id() });
        }
    }

    async fn dispatch_agent(&self, epoch: u64, text: &str) {
        let reply = match self.agent_channel.respond(text).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("Agent channel failed: {}", err);
                AgentReply {
                    body: self.config.widget.apology.clone(),
                    sender_label: self.config.widget.agent_name.clone(),
                }
            }
        };

        self.finish_atomic(epoch, Role::Agent, reply.body, Some(reply.sender_label));
    }

    /// Append a finalized response message, unless the conversation was
    /// cleared while the response was being produced.
    fn finish_atomic(&self, epoch: u64, role: Role, body: String, sender_label: Option<String>) {
        let id = {
            let mut state = self.state.lock();
            if state.transcript.epoch() != epoch {
                return;
            }
            let id = match role {
                Role::Agent => state.transcript.push_agent(body, sender_label),
                _ => state.transcript.push_assistant(body),
            };
            state.awaiting_response = false;
            id
        };
        self.emit(SessionEvent::ResponseFinalized { id });
    }

    fn handoff_failed(&self) -> HandoffOutcome {
        HandoffOutcome::Failed {
            fallback_contact: self.config.widget.support_email.clone(),
        }
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }
}

fn greeting_for(config: &Config, mode: SupportMode) -> Message {
    match mode {
        SupportMode::Ai => Message::new(0, Role::Assistant, config.widget.render(&config.widget.greeting)),
        SupportMode::Agent => {
            Message::new(0, Role::Agent, config.widget.render(&config.widget.agent_greeting))
                .with_sender_label(config.widget.agent_name.clone())
        }
    }
}
