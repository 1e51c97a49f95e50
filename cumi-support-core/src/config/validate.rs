//! Configuration validation rules.

use super::schema::Config;

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.widget.product_name.trim().is_empty() {
        errors.push("widget.product_name must not be empty".to_string());
    }
    if !config.widget.support_email.contains('@') {
        errors.push("widget.support_email must be a valid email address".to_string());
    }
    if config.widget.greeting.trim().is_empty() {
        errors.push("widget.greeting must not be empty".to_string());
    }
    if config.widget.apology.trim().is_empty() {
        errors.push("widget.apology must not be empty".to_string());
    }

    if config.ai.max_tokens == 0 {
        errors.push("ai.max_tokens must be > 0".to_string());
    }
    if !(0.0..=2.0).contains(&config.ai.temperature) {
        errors.push("ai.temperature must be in [0.0, 2.0]".to_string());
    }
    if config.ai.history_window == 0 {
        errors.push("ai.history_window must be > 0".to_string());
    }
    if !config.ai.api_key.trim().is_empty() && config.ai.api_base.trim().is_empty() {
        errors.push("ai.api_base is required when ai.api_key is set".to_string());
    }

    if !config.handoff.target.trim().is_empty() && config.handoff.link_base.trim().is_empty() {
        errors.push("handoff.link_base is required when handoff.target is set".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_defaults() {
        let config = Config::default();
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_validate_rejects_blank_email() {
        let mut config = Config::default();
        config.widget.support_email = "not-an-email".to_string();

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("widget.support_email"));
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut config = Config::default();
        config.ai.history_window = 0;

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("ai.history_window"));
    }

    #[test]
    fn test_validate_handoff_requires_link_base() {
        let mut config = Config::default();
        config.handoff.target = "15550100042".to_string();
        config.handoff.link_base = "  ".to_string();

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("handoff.link_base"));
    }
}
