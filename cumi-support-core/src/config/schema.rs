//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for the support widget
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Widget copy: product identity, contact details, templates
    #[serde(default)]
    pub widget: WidgetConfig,
    /// AI responder configuration
    #[serde(default)]
    pub ai: AiConfig,
    /// Human-handoff configuration
    #[serde(default)]
    pub handoff: HandoffConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Static widget copy shown to visitors.
///
/// Templates may reference `{product}`, `{email}`, and `{phone}`; see
/// [`WidgetConfig::render`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Product name shown in the widget and interpolated into templates
    #[serde(default = "default_product_name")]
    pub product_name: String,
    /// Support contact email
    #[serde(default = "default_support_email")]
    pub support_email: String,
    /// Support contact phone
    #[serde(default = "default_support_phone")]
    pub support_phone: String,
    /// Greeting seeded into a fresh AI-mode conversation
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Greeting seeded into a fresh agent-mode conversation
    #[serde(default = "default_agent_greeting")]
    pub agent_greeting: String,
    /// Display label attached to human-agent messages
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
    /// Acknowledgement sent when a human agent picks up the conversation
    #[serde(default = "default_agent_ack")]
    pub agent_ack: String,
    /// Body used when an AI response fails
    #[serde(default = "default_apology")]
    pub apology: String,
    /// Canned replies used when no AI responder is configured
    #[serde(default)]
    pub templates: CannedTemplates,
}

fn default_product_name() -> String {
    "CUMI".to_string()
}

fn default_support_email() -> String {
    "support@cumi.dev".to_string()
}

fn default_support_phone() -> String {
    "+1 (555) 010-0042".to_string()
}

fn default_greeting() -> String {
    "Hi there! I'm the {product} assistant. Ask me about courses, events, or anything on the platform.".to_string()
}

fn default_agent_greeting() -> String {
    "You're connected with the {product} support team. How can we help?".to_string()
}

fn default_agent_name() -> String {
    "CUMI Support".to_string()
}

fn default_agent_ack() -> String {
    "Thanks for reaching out! A member of our team has picked up the conversation and will reply shortly.".to_string()
}

fn default_apology() -> String {
    "Sorry, I ran into a problem answering that. Please try again in a moment.".to_string()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            product_name: default_product_name(),
            support_email: default_support_email(),
            support_phone: default_support_phone(),
            greeting: default_greeting(),
            agent_greeting: default_agent_greeting(),
            agent_name: default_agent_name(),
            agent_ack: default_agent_ack(),
            apology: default_apology(),
            templates: CannedTemplates::default(),
        }
    }
}

impl WidgetConfig {
    /// Interpolate `{product}`, `{email}`, and `{phone}` into a template.
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{product}", &self.product_name)
            .replace("{email}", &self.support_email)
            .replace("{phone}", &self.support_phone)
    }
}

/// Canned reply templates, matched first-to-last by keyword
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannedTemplates {
    #[serde(default = "default_help_template")]
    pub help: String,
    #[serde(default = "default_courses_template")]
    pub courses: String,
    #[serde(default = "default_events_template")]
    pub events: String,
    #[serde(default = "default_contact_template")]
    pub contact: String,
    #[serde(default = "default_fallback_template")]
    pub fallback: String,
}

fn default_help_template() -> String {
    "Happy to help! Ask me anything about {product}, or reach our team directly at {email}.".to_string()
}

fn default_courses_template() -> String {
    "{product} offers self-paced courses taught by industry mentors. Browse the catalogue on the courses page, or tell me what topic you're interested in.".to_string()
}

fn default_events_template() -> String {
    "We run regular workshops and live events. Keep an eye on the {product} events page for upcoming dates.".to_string()
}

fn default_contact_template() -> String {
    "You can reach the {product} team at {email} or {phone}.".to_string()
}

fn default_fallback_template() -> String {
    "Thanks for your message! I'm the {product} assistant. Ask me about courses, events, or how to get support.".to_string()
}

impl Default for CannedTemplates {
    fn default() -> Self {
        Self {
            help: default_help_template(),
            courses: default_courses_template(),
            events: default_events_template(),
            contact: default_contact_template(),
            fallback: default_fallback_template(),
        }
    }
}

/// AI responder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// API key; blank leaves the widget in canned-reply mode
    #[serde(default)]
    pub api_key: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum response tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// How many recent messages are replayed to the responder
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_temperature() -> f32 {
    0.7
}

fn default_history_window() -> usize {
    10
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            history_window: default_history_window(),
        }
    }
}

/// Human-handoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffConfig {
    /// Messaging account the conversation is handed to (international
    /// phone number without punctuation); blank disables handoff
    #[serde(default)]
    pub target: String,
    /// Deep-link base URL
    #[serde(default = "default_link_base")]
    pub link_base: String,
}

fn default_link_base() -> String {
    "https://wa.me".to_string()
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            link_base: default_link_base(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.widget.product_name, "CUMI");
        assert_eq!(config.ai.history_window, 10);
        assert!(config.ai.api_key.is_empty());
        assert_eq!(config.handoff.link_base, "https://wa.me");
    }

    #[test]
    fn test_render_interpolates_contact_values() {
        let widget = WidgetConfig::default();
        let rendered = widget.render("Reach {product} at {email} / {phone}");
        assert_eq!(rendered, "Reach CUMI at support@cumi.dev / +1 (555) 010-0042");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"widget":{"product_name":"Acme Learn"}}"#).unwrap();
        assert_eq!(config.widget.product_name, "Acme Learn");
        assert_eq!(config.widget.support_email, "support@cumi.dev");
        assert_eq!(config.ai.model, "gpt-4o-mini");
    }
}
