//! Transcript: ordered message history with in-place streaming updates

use super::message::{Message, MessageId, Role};

/// Ticket for mutating one in-flight streaming message.
///
/// A handle is only valid for the transcript epoch it was issued under;
/// `clear()` bumps the epoch, so updates from a superseded request are
/// dropped instead of mutating the fresh conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHandle {
    id: MessageId,
    epoch: u64,
}

impl StreamHandle {
    /// Id of the message this handle streams into
    pub fn id(&self) -> MessageId {
        self.id
    }
}

/// Ordered conversation history.
///
/// Append-only, except that the current streaming message grows in place
/// until it is finalized. At most one message is streaming at any time.
#[derive(Debug)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: MessageId,
    epoch: u64,
}

impl Transcript {
    /// Create a transcript seeded with a single greeting message
    pub fn new(greeting: Message) -> Self {
        let mut transcript = Self {
            messages: Vec::new(),
            next_id: greeting.id + 1,
            epoch: 0,
        };
        transcript.messages.push(greeting);
        transcript
    }

    /// Create a transcript seeded with an assistant greeting body
    pub fn with_greeting(body: impl Into<String>) -> Self {
        Self::new(Message::new(0, Role::Assistant, body))
    }

    /// All messages in display order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when the transcript holds no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Current epoch; bumped on every `clear`
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True while a streaming message is still open
    pub fn is_streaming(&self) -> bool {
        self.messages.iter().any(|m| m.streaming)
    }

    /// Append a finalized user message
    pub fn push_user(&mut self, body: impl Into<String>) -> MessageId {
        self.push(Message::new(self.next_id, Role::User, body))
    }

    /// Append a finalized assistant message
    pub fn push_assistant(&mut self, body: impl Into<String>) -> MessageId {
        self.push(Message::new(self.next_id, Role::Assistant, body))
    }

    /// Append a finalized human-agent message
    pub fn push_agent(
        &mut self,
        body: impl Into<String>,
        sender_label: Option<String>,
    ) -> MessageId {
        let mut msg = Message::new(self.next_id, Role::Agent, body);
        msg.sender_label = sender_label;
        self.push(msg)
    }

    /// Open an empty assistant placeholder and return its stream handle.
    ///
    /// The placeholder exists before the first token arrives so the UI can
    /// render a typing indicator. Any stale open stream is closed first to
    /// keep the one-streaming-message invariant.
    pub fn begin_streaming(&mut self) -> StreamHandle {
        for msg in &mut self.messages {
            if msg.streaming {
                msg.streaming = false;
            }
        }
        let id = self.push(Message::placeholder(self.next_id, Role::Assistant));
        StreamHandle {
            id,
            epoch: self.epoch,
        }
    }

    /// Append a token to the streaming message.
    ///
    /// Returns false (and leaves the transcript untouched) when the handle
    /// is stale: superseded epoch, or message already finalized.
    pub fn push_token(&mut self, handle: &StreamHandle, token: &str) -> bool {
        match self.open_message(handle) {
            Some(msg) => {
                msg.body.push_str(token);
                true
            }
            None => false,
        }
    }

    /// Finalize the streaming message, keeping its accumulated body.
    ///
    /// A second terminal signal for the same handle is a no-op.
    pub fn complete(&mut self, handle: &StreamHandle) -> bool {
        match self.open_message(handle) {
            Some(msg) => {
                msg.streaming = false;
                true
            }
            None => false,
        }
    }

    /// Finalize the streaming message with a wholesale replacement body.
    ///
    /// Partial tokens already accumulated are discarded, not appended to.
    pub fn fail(&mut self, handle: &StreamHandle, replacement: &str) -> bool {
        match self.open_message(handle) {
            Some(msg) => {
                msg.body.clear();
                msg.body.push_str(replacement);
                msg.streaming = false;
                true
            }
            None => false,
        }
    }

    /// Reset to a single greeting message and invalidate outstanding
    /// stream handles.
    pub fn clear(&mut self, greeting: Message) {
        self.epoch += 1;
        self.next_id = greeting.id + 1;
        self.messages.clear();
        self.messages.push(greeting);
    }

    /// Last `n` non-agent messages in chronological order.
    ///
    /// Agent-mode messages belong to a different conversational
    /// participant and are excluded from AI context.
    pub fn window(&self, n: usize) -> Vec<Message> {
        let mut recent: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| m.role != Role::Agent && !m.streaming)
            .rev()
            .take(n)
            .cloned()
            .collect();
        recent.reverse();
        recent
    }

    fn push(&mut self, msg: Message) -> MessageId {
        let id = msg.id;
        self.next_id = id + 1;
        self.messages.push(msg);
        id
    }

    fn open_message(&mut self, handle: &StreamHandle) -> Option<&mut Message> {
        if handle.epoch != self.epoch {
            return None;
        }
        self.messages
            .iter_mut()
            .rev()
            .find(|m| m.id == handle.id)
            .filter(|m| m.streaming)
    }
}
