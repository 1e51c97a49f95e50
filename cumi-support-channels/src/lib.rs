//! Outbound channels for the CUMI live-support widget
//!
//! The session hands conversations to humans through these collaborator
//! contracts: a deep-link handoff channel and a live-agent channel (the
//! shipped agent channel is a simulation stub).

pub mod agent;
pub mod handoff;

pub use agent::{AgentReply, HumanAgentChannel, SimulatedAgentChannel};
pub use handoff::{ChannelError, ChannelResult, DeepLinkHandoff, HandoffChannel};
