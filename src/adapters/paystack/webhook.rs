//! Paystack webhook verification and event parsing.
//!
//! Deliveries are authenticated before anything is parsed: Paystack signs the
//! raw request body with HMAC-SHA512 keyed by the account's secret key and
//! sends the hex digest in the `x-paystack-signature` header.
//!
//! Only the two subscription lifecycle events are mapped; every other
//! authentic event parses to `ProviderEvent::Ignored`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha512;
use subtle::ConstantTimeEq;

use crate::domain::foundation::Timestamp;
use crate::ports::{ProviderError, ProviderEvent};

type HmacSha512 = Hmac<Sha512>;

// ════════════════════════════════════════════════════════════════════════════════
// Signature Verification
// ════════════════════════════════════════════════════════════════════════════════

/// Compute the hex HMAC-SHA512 digest of a payload.
///
/// This is what Paystack puts in `x-paystack-signature`; tests use it to
/// build valid deliveries. Verification goes through [`verify_signature`].
pub fn compute_signature(secret: &[u8], payload: &[u8]) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    hex_encode(&mac.finalize().into_bytes())
}

/// Check a delivery's signature in constant time.
///
/// A header that is not valid hex fails the same way a wrong signature does.
pub fn verify_signature(secret: &[u8], payload: &[u8], signature: &str) -> bool {
    let provided = match hex_decode(signature.trim()) {
        Some(bytes) => bytes,
        None => return false,
    };

    let mut mac =
        HmacSha512::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    let expected = mac.finalize().into_bytes();

    expected.as_slice().ct_eq(&provided).unwrap_u8() == 1
}

/// Decode a hex string to bytes.
fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }

    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let byte = u8::from_str_radix(&hex[i..i + 2], 16).ok()?;
        bytes.push(byte);
    }
    Some(bytes)
}

/// Encode bytes to hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Event Parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Event envelope as Paystack delivers it.
#[derive(Debug, Deserialize)]
struct EventEnvelope {
    event: String,
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CreatedData {
    subscription_code: String,
    next_payment_date: Option<String>,
    customer: CustomerData,
}

#[derive(Debug, Deserialize)]
struct DisabledData {
    amount: Option<i64>,
    customer: CustomerData,
}

#[derive(Debug, Deserialize)]
struct CustomerData {
    email: String,
}

/// Parse an already-verified payload into a [`ProviderEvent`].
///
/// # Errors
///
/// Returns `ProviderError::MalformedEvent` when the body is not JSON or a
/// recognized event is missing its required fields.
pub fn parse_event(payload: &[u8]) -> Result<ProviderEvent, ProviderError> {
    let envelope: EventEnvelope = serde_json::from_slice(payload)
        .map_err(|e| ProviderError::MalformedEvent(format!("invalid JSON: {}", e)))?;

    match envelope.event.as_str() {
        "subscription.create" => {
            let data: CreatedData = serde_json::from_value(envelope.data).map_err(|e| {
                ProviderError::MalformedEvent(format!("invalid subscription.create data: {}", e))
            })?;

            Ok(ProviderEvent::SubscriptionCreated {
                customer_email: data.customer.email,
                subscription_code: data.subscription_code,
                next_payment_date: data
                    .next_payment_date
                    .as_deref()
                    .and_then(parse_provider_date),
            })
        }
        "subscription.disable" => {
            let data: DisabledData = serde_json::from_value(envelope.data).map_err(|e| {
                ProviderError::MalformedEvent(format!("invalid subscription.disable data: {}", e))
            })?;

            Ok(ProviderEvent::SubscriptionDisabled {
                customer_email: data.customer.email,
                amount_minor: data.amount,
            })
        }
        other => Ok(ProviderEvent::Ignored {
            event: other.to_string(),
        }),
    }
}

/// Parse the provider's datetime dialects.
///
/// Accepts RFC 3339 and the `"YYYY-MM-DD HH:MM:SS"` form, which is read as
/// UTC after promoting the space to ISO-8601's `T`. Anything else is `None`;
/// an unparseable date degrades to "no billing date reported" rather than
/// rejecting the whole event.
pub fn parse_provider_date(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Timestamp::from_datetime(dt.with_timezone(&Utc)));
    }

    let normalized = raw.replacen(' ', "T", 1);
    let naive = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S").ok()?;
    Some(Timestamp::from_datetime(Utc.from_utc_datetime(&naive)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use proptest::prelude::*;

    const SECRET: &[u8] = b"sk_test_webhook_secret";

    fn created_payload() -> Vec<u8> {
        serde_json::json!({
            "event": "subscription.create",
            "data": {
                "domain": "test",
                "status": "active",
                "subscription_code": "SUB_vsyqdmlzble3uii",
                "amount": 50000,
                "next_payment_date": "2026-09-28 07:00:00",
                "plan": {
                    "name": "Monthly retainer",
                    "plan_code": "PLN_gx2wn530m0i3w3m"
                },
                "customer": {
                    "first_name": "Bolu",
                    "email": "bolu@example.com",
                    "customer_code": "CUS_xnxdt6s1zg1f4nx"
                }
            }
        })
        .to_string()
        .into_bytes()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Signature Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn computed_signature_verifies() {
        let payload = created_payload();
        let signature = compute_signature(SECRET, &payload);

        assert!(verify_signature(SECRET, &payload, &signature));
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let payload = created_payload();
        let signature = compute_signature(SECRET, &payload);

        let mut tampered = payload.clone();
        tampered[10] ^= 0x01;

        assert!(!verify_signature(SECRET, &tampered, &signature));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let payload = created_payload();
        let signature = compute_signature(b"some-other-secret", &payload);

        assert!(!verify_signature(SECRET, &payload, &signature));
    }

    #[test]
    fn non_hex_signature_fails_verification() {
        let payload = created_payload();
        assert!(!verify_signature(SECRET, &payload, "not hex at all"));
        assert!(!verify_signature(SECRET, &payload, "abc"));
        assert!(!verify_signature(SECRET, &payload, ""));
    }

    #[test]
    fn signature_header_whitespace_is_tolerated() {
        let payload = created_payload();
        let signature = format!("  {}  ", compute_signature(SECRET, &payload));

        assert!(verify_signature(SECRET, &payload, &signature));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Event Parsing Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn parses_subscription_create() {
        let event = parse_event(&created_payload()).unwrap();

        match event {
            ProviderEvent::SubscriptionCreated {
                customer_email,
                subscription_code,
                next_payment_date,
            } => {
                assert_eq!(customer_email, "bolu@example.com");
                assert_eq!(subscription_code, "SUB_vsyqdmlzble3uii");
                let date = next_payment_date.unwrap();
                assert_eq!(date.as_datetime().year(), 2026);
            }
            other => panic!("expected SubscriptionCreated, got {:?}", other),
        }
    }

    #[test]
    fn parses_subscription_disable() {
        let payload = serde_json::json!({
            "event": "subscription.disable",
            "data": {
                "domain": "test",
                "status": "complete",
                "amount": 50000,
                "customer": { "email": "bolu@example.com" }
            }
        })
        .to_string();

        let event = parse_event(payload.as_bytes()).unwrap();

        match event {
            ProviderEvent::SubscriptionDisabled {
                customer_email,
                amount_minor,
            } => {
                assert_eq!(customer_email, "bolu@example.com");
                assert_eq!(amount_minor, Some(50000));
            }
            other => panic!("expected SubscriptionDisabled, got {:?}", other),
        }
    }

    #[test]
    fn unknown_event_is_ignored() {
        let payload = br#"{"event": "invoice.update", "data": {"anything": true}}"#;
        let event = parse_event(payload).unwrap();

        assert_eq!(
            event,
            ProviderEvent::Ignored {
                event: "invoice.update".to_string()
            }
        );
    }

    #[test]
    fn non_json_payload_is_malformed() {
        let result = parse_event(b"definitely not json");
        assert!(matches!(result, Err(ProviderError::MalformedEvent(_))));
    }

    #[test]
    fn create_event_missing_code_is_malformed() {
        let payload = serde_json::json!({
            "event": "subscription.create",
            "data": { "customer": { "email": "bolu@example.com" } }
        })
        .to_string();

        let result = parse_event(payload.as_bytes());
        assert!(matches!(result, Err(ProviderError::MalformedEvent(_))));
    }

    #[test]
    fn create_event_without_date_still_parses() {
        let payload = serde_json::json!({
            "event": "subscription.create",
            "data": {
                "subscription_code": "SUB_abc",
                "customer": { "email": "bolu@example.com" }
            }
        })
        .to_string();

        let event = parse_event(payload.as_bytes()).unwrap();
        match event {
            ProviderEvent::SubscriptionCreated {
                next_payment_date, ..
            } => assert!(next_payment_date.is_none()),
            other => panic!("expected SubscriptionCreated, got {:?}", other),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Date Parsing Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn parses_space_separated_datetime_as_utc() {
        let ts = parse_provider_date("2026-09-28 07:00:00").unwrap();
        assert_eq!(ts.as_unix_secs(), 1790578800);
    }

    #[test]
    fn parses_rfc3339_datetime() {
        let ts = parse_provider_date("2026-09-28T07:00:00.000Z").unwrap();
        assert_eq!(ts.as_unix_secs(), 1790578800);
    }

    #[test]
    fn both_dialects_agree() {
        let spaced = parse_provider_date("2026-09-28 07:00:00").unwrap();
        let rfc = parse_provider_date("2026-09-28T07:00:00Z").unwrap();
        assert_eq!(spaced, rfc);
    }

    #[test]
    fn garbage_date_is_none() {
        assert!(parse_provider_date("next tuesday").is_none());
        assert!(parse_provider_date("2026-99-99 07:00:00").is_none());
        assert!(parse_provider_date("").is_none());
    }

    proptest! {
        #[test]
        fn space_form_always_parses(
            year in 2000i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            hour in 0u32..24,
            minute in 0u32..60,
            second in 0u32..60,
        ) {
            let raw = format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            );
            let ts = parse_provider_date(&raw).unwrap();
            prop_assert_eq!(ts.as_datetime().year(), year);
        }

        #[test]
        fn space_and_t_forms_agree(
            year in 2000i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            hour in 0u32..24,
        ) {
            let spaced = format!("{:04}-{:02}-{:02} {:02}:30:00", year, month, day, hour);
            let zoned = format!("{:04}-{:02}-{:02}T{:02}:30:00Z", year, month, day, hour);
            prop_assert_eq!(
                parse_provider_date(&spaced).unwrap(),
                parse_provider_date(&zoned).unwrap()
            );
        }
    }
}
