//! Payment configuration (Stripe)

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key
    pub stripe_api_key: String,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: String,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }

        // Verify key prefixes before accepting them
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidWebhookSecret);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_detection() {
        let config = PaymentConfig {
            stripe_api_key: "sk_test_xxx".to_string(),
            stripe_webhook_secret: "whsec_xxx".to_string(),
        };
        assert!(config.is_test_mode());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_api_key_is_invalid() {
        let config = PaymentConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn wrong_api_key_prefix_is_invalid() {
        let config = PaymentConfig {
            stripe_api_key: "pk_test_xxx".to_string(),
            stripe_webhook_secret: "whsec_xxx".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidStripeKey)
        ));
    }

    #[test]
    fn wrong_webhook_secret_prefix_is_invalid() {
        let config = PaymentConfig {
            stripe_api_key: "sk_test_xxx".to_string(),
            stripe_webhook_secret: "secret".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidWebhookSecret)
        ));
    }
}
