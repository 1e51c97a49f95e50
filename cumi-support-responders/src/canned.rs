//! Deterministic canned replies for unconfigured widgets
//!
//! When no AI responder is configured the widget still has to answer
//! something, so user text is matched against an ordered list of keyword
//! sets and the first matching template wins. No scoring, no fuzziness.

use cumi_support_core::config::WidgetConfig;

/// Keyword sets checked in order; first match wins.
fn rules(widget: &WidgetConfig) -> [(&'static [&'static str], &str); 4] {
    [
        (&["help", "support"], widget.templates.help.as_str()),
        (&["course", "learn"], widget.templates.courses.as_str()),
        (&["event", "workshop"], widget.templates.events.as_str()),
        (
            &["contact", "phone", "email"],
            widget.templates.contact.as_str(),
        ),
    ]
}

/// Pick the canned reply for a user message.
///
/// Matching is case-insensitive substring membership; text that matches
/// no keyword set gets the generic fallback template. Every template is
/// interpolated with the configured contact values.
pub fn canned_reply(text: &str, widget: &WidgetConfig) -> String {
    let lowered = text.to_lowercase();

    for (keywords, template) in rules(widget) {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return widget.render(template);
        }
    }

    widget.render(&widget.templates.fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> WidgetConfig {
        WidgetConfig::default()
    }

    #[test]
    fn test_course_keyword_matches_case_insensitively() {
        let widget = widget();
        let expected = widget.render(&widget.templates.courses);

        assert_eq!(canned_reply("Tell me about your COURSES", &widget), expected);
        assert_eq!(canned_reply("what can I learn here?", &widget), expected);
    }

    #[test]
    fn test_first_match_wins_over_later_sets() {
        let widget = widget();
        // "help" is checked before "course", so it wins even though both match
        let reply = canned_reply("I need help picking a course", &widget);
        assert_eq!(reply, widget.render(&widget.templates.help));
    }

    #[test]
    fn test_unmatched_text_gets_fallback() {
        let widget = widget();
        let reply = canned_reply("what's the weather like?", &widget);
        assert_eq!(reply, widget.render(&widget.templates.fallback));
    }

    #[test]
    fn test_contact_template_interpolates_static_config() {
        let mut widget = widget();
        widget.support_email = "hello@acme.test".to_string();
        widget.support_phone = "+44 20 7946 0000".to_string();

        let reply = canned_reply("how do I contact you?", &widget);
        assert!(reply.contains("hello@acme.test"));
        assert!(reply.contains("+44 20 7946 0000"));
    }

    #[test]
    fn test_same_input_same_output() {
        let widget = widget();
        let first = canned_reply("any workshops coming up?", &widget);
        let second = canned_reply("any workshops coming up?", &widget);
        assert_eq!(first, second);
    }
}
