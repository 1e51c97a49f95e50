//! Human-agent channel: live-chat seat for agent mode

use async_trait::async_trait;
use std::time::Duration;

use crate::handoff::ChannelResult;
use cumi_support_core::config::WidgetConfig;

/// A reply authored by a human agent
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub body: String,
    pub sender_label: String,
}

/// Trait for the live-agent side of the widget.
///
/// A production deployment wires this to a real live-chat integration;
/// the widget only needs a reply per user message.
#[async_trait]
pub trait HumanAgentChannel: Send + Sync {
    /// Produce the agent reply to a user message
    async fn respond(&self, text: &str) -> ChannelResult<AgentReply>;
}

/// Stand-in agent channel: acknowledges every message with the
/// configured body after a short delay, so the widget is demonstrable
/// without a live-chat backend.
pub struct SimulatedAgentChannel {
    agent_name: String,
    ack_body: String,
    delay: Duration,
}

impl SimulatedAgentChannel {
    /// Create a simulated channel from widget configuration
    pub fn new(widget: &WidgetConfig) -> Self {
        Self {
            agent_name: widget.agent_name.clone(),
            ack_body: widget.agent_ack.clone(),
            delay: Duration::from_millis(600),
        }
    }

    /// Override the simulated typing delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl HumanAgentChannel for SimulatedAgentChannel {
    async fn respond(&self, _text: &str) -> ChannelResult<AgentReply> {
        tokio::time::sleep(self.delay).await;
        Ok(AgentReply {
            body: self.ack_body.clone(),
            sender_label: self.agent_name.clone(),
        })
    }
}
