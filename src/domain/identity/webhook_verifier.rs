//! Identity webhook signature verification (svix scheme).
//!
//! The identity provider signs deliveries with HMAC-SHA256 over
//! `"{message_id}.{timestamp}.{payload}"`. The signing secret is prefixed
//! with `whsec_` followed by the base64-encoded key, and the signature header
//! carries a space-separated list of `v1,<base64 signature>` candidates; any
//! one matching candidate authenticates the delivery.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::IdentityError;
use super::identity_event::IdentityEvent;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed age for webhook events (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Headers carried by every identity webhook delivery.
#[derive(Debug, Clone)]
pub struct IdentityWebhookHeaders {
    /// Unique message id (`svix-id`).
    pub message_id: String,
    /// Unix timestamp of the delivery (`svix-timestamp`).
    pub timestamp: i64,
    /// Signature candidates (`svix-signature`).
    pub signatures: String,
}

/// Verifier for identity-provider webhook signatures.
pub struct IdentityWebhookVerifier {
    key: SecretString,
}

impl IdentityWebhookVerifier {
    /// Creates a new verifier from a `whsec_`-prefixed signing secret.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        let encoded = secret.strip_prefix("whsec_").unwrap_or(&secret);
        Self {
            key: SecretString::new(encoded.to_string()),
        }
    }

    /// Verifies the delivery and parses the event.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - no candidate signature matches
    /// - `TimestampOutOfRange` - delivery outside the replay window
    /// - `ParseError` - malformed secret, signature, or JSON payload
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        headers: &IdentityWebhookHeaders,
    ) -> Result<IdentityEvent, IdentityError> {
        self.validate_timestamp(headers.timestamp)?;

        let expected = self.compute_signature(&headers.message_id, headers.timestamp, payload)?;

        // The header may list several versioned candidates; honor any v1 match.
        let matched = headers
            .signatures
            .split_whitespace()
            .filter_map(|candidate| candidate.split_once(','))
            .filter(|(version, _)| *version == "v1")
            .filter_map(|(_, sig)| BASE64.decode(sig).ok())
            .any(|sig| constant_time_compare(&expected, &sig));

        if !matched {
            return Err(IdentityError::InvalidSignature);
        }

        serde_json::from_slice(payload).map_err(|e| IdentityError::ParseError(e.to_string()))
    }

    fn validate_timestamp(&self, timestamp: i64) -> Result<(), IdentityError> {
        let age = chrono::Utc::now().timestamp() - timestamp;
        if age > MAX_EVENT_AGE_SECS || age < -MAX_CLOCK_SKEW_SECS {
            return Err(IdentityError::TimestampOutOfRange);
        }
        Ok(())
    }

    fn compute_signature(
        &self,
        message_id: &str,
        timestamp: i64,
        payload: &[u8],
    ) -> Result<Vec<u8>, IdentityError> {
        let key = BASE64
            .decode(self.key.expose_secret())
            .map_err(|_| IdentityError::ParseError("signing secret is not base64".to_string()))?;

        let mut mac = HmacSha256::new_from_slice(&key).expect("HMAC accepts any key length");
        mac.update(format!("{}.{}.", message_id, timestamp).as_bytes());
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
pub fn compute_test_signature(secret: &str, message_id: &str, timestamp: i64, payload: &[u8]) -> String {
    let encoded = secret.strip_prefix("whsec_").unwrap_or(secret);
    let key = BASE64.decode(encoded).unwrap();
    let mut mac = HmacSha256::new_from_slice(&key).unwrap();
    mac.update(format!("{}.{}.", message_id, timestamp).as_bytes());
    mac.update(payload);
    BASE64.encode(mac.finalize().into_bytes())
}
