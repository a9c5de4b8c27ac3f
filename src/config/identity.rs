//! Identity provider configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Identity provider configuration (webhook sync)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfig {
    /// Webhook signing secret from the identity provider dashboard
    pub webhook_secret: String,
}

impl IdentityConfig {
    /// Validate identity configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("IDENTITY_WEBHOOK_SECRET"));
        }
        if !self.webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidWebhookSecret);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_secret_passes() {
        let config = IdentityConfig {
            webhook_secret: "whsec_abc123".to_string(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_secret_is_invalid() {
        assert!(IdentityConfig::default().validate().is_err());
    }

    #[test]
    fn wrong_prefix_is_invalid() {
        let config = IdentityConfig {
            webhook_secret: "abc123".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidWebhookSecret)
        ));
    }
}
