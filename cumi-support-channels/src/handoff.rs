//! Human-handoff channel: deep-link transfer to a messaging surface

use cumi_support_core::config::HandoffConfig;
use tracing::debug;

/// Channel errors
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    #[error("Send failed: {0}")]
    SendFailed(String),
}

pub type ChannelResult<T> = Result<T, ChannelError>;

/// Outbound link used to transfer a conversation to a human agent.
///
/// `open` returns whether a UI surface was actually opened; `false`
/// means the surface was blocked and the caller may retry the same link
/// in its own context. Session state never depends on either outcome.
pub trait HandoffChannel: Send + Sync {
    /// Open the handoff surface carrying the intent summary
    fn open(&self, summary: &str) -> ChannelResult<bool>;

    /// The link a caller can navigate to directly when `open` was blocked
    fn link(&self, summary: &str) -> ChannelResult<String>;
}

/// Opener callback: receives the final link, returns whether a surface
/// was opened (e.g. a popup that wasn't blocked).
pub type LinkOpener = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Deep-link handoff to a messaging account (wa.me-style).
pub struct DeepLinkHandoff {
    link_base: String,
    target: String,
    opener: LinkOpener,
}

impl DeepLinkHandoff {
    /// Create a handoff channel from configuration and an opener callback
    pub fn new(config: &HandoffConfig, opener: LinkOpener) -> Self {
        Self {
            link_base: config.link_base.trim_end_matches('/').to_string(),
            target: config.target.clone(),
            opener,
        }
    }

    fn deep_link(&self, summary: &str) -> ChannelResult<String> {
        if self.target.trim().is_empty() {
            return Err(ChannelError::NotConfigured(
                "handoff.target is not set".to_string(),
            ));
        }

        Ok(format!(
            "{}/{}?text={}",
            self.link_base,
            self.target,
            urlencoding::encode(summary)
        ))
    }
}

impl HandoffChannel for DeepLinkHandoff {
    fn open(&self, summary: &str) -> ChannelResult<bool> {
        let link = self.deep_link(summary)?;
        debug!("Opening handoff link: {}", link);
        Ok((self.opener)(&link))
    }

    fn link(&self, summary: &str) -> ChannelResult<String> {
        self.deep_link(summary)
    }
}
