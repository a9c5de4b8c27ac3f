//! Stripe webhook signature verification.
//!
//! Verifies that an inbound event genuinely originated from the payment
//! provider using HMAC-SHA256 over the exact raw body bytes. Re-serializing a
//! parsed body before verification would break signatures, so the verifier
//! only ever sees `&[u8]` straight from the request.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::stripe_event::StripeEvent;
use super::webhook_errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed age for webhook events (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components of the Stripe-Signature header.
///
/// Format: `t=<timestamp>,v1=<hex signature>[,<ignored schemes>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// v1 signature (HMAC-SHA256).
    pub v1_signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Unknown schemes (v0, future versions) are skipped for forward
    /// compatibility.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` if the header is malformed or the
    /// timestamp or v1 signature is missing.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp = None;
        let mut v1_signature = None;

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                return Err(WebhookError::ParseError(
                    "invalid signature header format".to_string(),
                ));
            };

            match key.trim() {
                "t" => {
                    timestamp = Some(value.trim().parse::<i64>().map_err(|_| {
                        WebhookError::ParseError("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signature = Some(hex::decode(value.trim()).map_err(|_| {
                        WebhookError::ParseError("invalid v1 signature hex".to_string())
                    })?);
                }
                _ => {}
            }
        }

        Ok(SignatureHeader {
            timestamp: timestamp
                .ok_or_else(|| WebhookError::ParseError("missing timestamp".to_string()))?,
            v1_signature: v1_signature
                .ok_or_else(|| WebhookError::ParseError("missing v1 signature".to_string()))?,
        })
    }
}

/// Verifier for Stripe webhook signatures.
pub struct StripeWebhookVerifier {
    secret: SecretString,
}

impl StripeWebhookVerifier {
    /// Creates a new verifier with the given signing secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Verifies the webhook signature and parses the event.
    ///
    /// On any failure the caller must reject the request and must not touch
    /// the event data.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - signature does not match the payload
    /// - `TimestampOutOfRange` - event older than the replay window
    /// - `InvalidTimestamp` - event timestamp in the future
    /// - `ParseError` - malformed header or JSON payload
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;

        self.validate_timestamp(header.timestamp)?;

        let expected = self.compute_signature(header.timestamp, payload);
        if !constant_time_compare(&expected, &header.v1_signature) {
            return Err(WebhookError::InvalidSignature);
        }

        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }

    /// Rejects events outside the replay window.
    fn validate_timestamp(&self, timestamp: i64) -> Result<(), WebhookError> {
        let age = chrono::Utc::now().timestamp() - timestamp;

        if age > MAX_EVENT_AGE_SECS {
            return Err(WebhookError::TimestampOutOfRange);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::InvalidTimestamp);
        }

        Ok(())
    }

    /// Computes the HMAC-SHA256 signature over `"{timestamp}.{payload}"`.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes a hex-encoded HMAC-SHA256 signature for test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(format!("{}.", timestamp).as_bytes());
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "whsec_test_secret_12345";

    const COMPLETION_PAYLOAD: &str = r#"{"id":"evt_test123","type":"checkout.session.completed","created":1704067200,"data":{"object":{"id":"cs_1","metadata":{"purchaseId":"p1"}}},"livemode":false}"#;

    fn signed_header(secret: &str, payload: &[u8]) -> String {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_test_signature(secret, timestamp, payload);
        format!("t={},v1={}", timestamp, signature)
    }

    #[test]
    fn parse_header_with_v1() {
        let header = SignatureHeader::parse(&format!("t=1234567890,v1={}", "a".repeat(64))).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signature.len(), 32);
    }

    #[test]
    fn parse_header_skips_unknown_schemes() {
        let header_str = format!("t=1234567890,v1={},v0={},scheme=hmac", "a".repeat(64), "b".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
    }

    #[test]
    fn parse_header_missing_timestamp_fails() {
        let result = SignatureHeader::parse(&format!("v1={}", "a".repeat(64)));
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn parse_header_missing_v1_fails() {
        let result = SignatureHeader::parse("t=1234567890");
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn parse_header_bad_timestamp_fails() {
        let result = SignatureHeader::parse(&format!("t=soon,v1={}", "a".repeat(64)));
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn parse_header_bad_hex_fails() {
        let result = SignatureHeader::parse("t=1234567890,v1=zz_not_hex");
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn parse_header_without_separator_fails() {
        let result = SignatureHeader::parse("t1234567890");
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn verify_valid_signature() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = signed_header(TEST_SECRET, COMPLETION_PAYLOAD.as_bytes());

        let event = verifier
            .verify_and_parse(COMPLETION_PAYLOAD.as_bytes(), &header)
            .unwrap();

        assert_eq!(event.id, "evt_test123");
        assert_eq!(event.event_type, "checkout.session.completed");
    }

    #[test]
    fn verify_garbage_signature_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let timestamp = chrono::Utc::now().timestamp();
        let header = format!("t={},v1={}", timestamp, "a".repeat(64));

        let result = verifier.verify_and_parse(COMPLETION_PAYLOAD.as_bytes(), &header);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let verifier = StripeWebhookVerifier::new("whsec_other_secret");
        let header = signed_header(TEST_SECRET, COMPLETION_PAYLOAD.as_bytes());

        let result = verifier.verify_and_parse(COMPLETION_PAYLOAD.as_bytes(), &header);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_body_byte_flip_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = signed_header(TEST_SECRET, COMPLETION_PAYLOAD.as_bytes());

        // Flip one byte of the signed body
        let mut tampered = COMPLETION_PAYLOAD.as_bytes().to_vec();
        tampered[10] ^= 0x01;

        let result = verifier.verify_and_parse(&tampered, &header);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_stale_timestamp_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let timestamp = chrono::Utc::now().timestamp() - 600;
        let signature = compute_test_signature(TEST_SECRET, timestamp, COMPLETION_PAYLOAD.as_bytes());
        let header = format!("t={},v1={}", timestamp, signature);

        let result = verifier.verify_and_parse(COMPLETION_PAYLOAD.as_bytes(), &header);

        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    #[test]
    fn verify_future_timestamp_beyond_skew_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let timestamp = chrono::Utc::now().timestamp() + 120;
        let signature = compute_test_signature(TEST_SECRET, timestamp, COMPLETION_PAYLOAD.as_bytes());
        let header = format!("t={},v1={}", timestamp, signature);

        let result = verifier.verify_and_parse(COMPLETION_PAYLOAD.as_bytes(), &header);

        assert!(matches!(result, Err(WebhookError::InvalidTimestamp)));
    }

    #[test]
    fn verify_future_timestamp_within_skew_succeeds() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let timestamp = chrono::Utc::now().timestamp() + 30;
        let signature = compute_test_signature(TEST_SECRET, timestamp, COMPLETION_PAYLOAD.as_bytes());
        let header = format!("t={},v1={}", timestamp, signature);

        let result = verifier.verify_and_parse(COMPLETION_PAYLOAD.as_bytes(), &header);

        assert!(result.is_ok());
    }

    #[test]
    fn verify_valid_signature_over_invalid_json_fails_parse() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let payload = b"not valid json";
        let header = signed_header(TEST_SECRET, payload);

        let result = verifier.verify_and_parse(payload, &header);

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }
}
