//! Context builder for assembling responder prompts

use cumi_support_core::config::WidgetConfig;
use cumi_support_core::session::{Message, Role};
use cumi_support_responders::PromptMessage;

/// Builds the prompt for AI responder requests
pub struct PromptBuilder {
    product_name: String,
    support_email: String,
    support_phone: String,
}

impl PromptBuilder {
    /// Create a new prompt builder from widget configuration
    pub fn new(widget: &WidgetConfig) -> Self {
        Self {
            product_name: widget.product_name.clone(),
            support_email: widget.support_email.clone(),
            support_phone: widget.support_phone.clone(),
        }
    }

    /// Build the support-assistant persona prompt from static configuration
    pub fn build_system_prompt(&self) -> String {
        format!(
            r#"You are the {product} support assistant embedded on the {product} website.
Visitors ask about courses, events, their account, and how to reach the team.

## Contact
Email: {email}
Phone: {phone}

Keep replies short and friendly. When you cannot help, point the visitor to
the contact options above instead of guessing."#,
            product = self.product_name,
            email = self.support_email,
            phone = self.support_phone,
        )
    }

    /// Build the complete message list for a responder call.
    ///
    /// `history` is expected to already be windowed to the most recent
    /// non-agent messages; agent messages that slip through are skipped,
    /// since they belong to a different conversational participant.
    pub fn build_messages(&self, history: &[Message], current_message: &str) -> Vec<PromptMessage> {
        let mut messages = Vec::new();

        messages.push(PromptMessage::system(self.build_system_prompt()));

        for msg in history {
            let message = match msg.role {
                Role::User => PromptMessage::user(msg.body.clone()),
                Role::Assistant => PromptMessage::assistant(msg.body.clone()),
                Role::Agent => continue,
            };
            messages.push(message);
        }

        messages.push(PromptMessage::user(current_message));

        messages
    }
}
