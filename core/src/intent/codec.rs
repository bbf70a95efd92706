//! Envelope encode/decode for payment intents.
//!
//! Encode is strict (exactly three keys, compact JSON, standard
//! base64); decode is liberal about unknown keys and strict about
//! everything else. The asymmetry is deliberate: emit the narrowest
//! format, accept the widest compatible one.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;
use thiserror::Error;

use super::types::PaymentIntent;
use crate::config;

/// Errors produced by [`decode`]. Both are local and recoverable: the
/// caller rejects the envelope and nothing else changes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// The envelope could not be parsed into the expected shape:
    /// not base64, not UTF-8, not a JSON object, or a field has the
    /// wrong JSON type.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The envelope parsed, but a required field is missing or out of
    /// range (`amount` must be a positive finite number, `payeeUpi`
    /// must be non-empty).
    #[error("invalid intent: {0}")]
    InvalidIntent(String),
}

/// Serialize an intent into its transport envelope.
///
/// Deterministic and lossless: the same intent always yields the same
/// envelope, and `decode(encode(x)) == x` for every valid `x`. The
/// struct's field order matches the specified wire order, so plain
/// compact serde output is exactly the wire format.
pub fn encode(intent: &PaymentIntent) -> String {
    // PaymentIntent has no map/non-string-key fields; serialization
    // cannot fail.
    let json = serde_json::to_string(intent).unwrap_or_default();
    BASE64.encode(json)
}

/// Parse and validate a transport envelope.
///
/// Unknown top-level keys are ignored; a peer speaking a newer envelope
/// revision still interoperates with us.
pub fn decode(envelope: &str) -> Result<PaymentIntent, CodecError> {
    let bytes = BASE64
        .decode(envelope.trim())
        .map_err(|e| CodecError::MalformedEnvelope(format!("not base64: {e}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|_| CodecError::MalformedEnvelope("payload is not UTF-8".into()))?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| CodecError::MalformedEnvelope(format!("not JSON: {e}")))?;
    let obj = value
        .as_object()
        .ok_or_else(|| CodecError::MalformedEnvelope("payload is not a JSON object".into()))?;

    let amount = match obj.get(config::ENVELOPE_FIELD_AMOUNT) {
        None => {
            return Err(CodecError::InvalidIntent("missing amount".into()));
        }
        Some(v) => v.as_f64().ok_or_else(|| {
            CodecError::MalformedEnvelope("amount is not a number".into())
        })?,
    };
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CodecError::InvalidIntent(format!(
            "amount must be positive, got {amount}"
        )));
    }

    let payee_upi = match obj.get(config::ENVELOPE_FIELD_PAYEE) {
        None => {
            return Err(CodecError::InvalidIntent("missing payeeUpi".into()));
        }
        Some(v) => v
            .as_str()
            .ok_or_else(|| CodecError::MalformedEnvelope("payeeUpi is not a string".into()))?,
    };
    if payee_upi.is_empty() {
        return Err(CodecError::InvalidIntent("payeeUpi is empty".into()));
    }

    let timestamp = obj
        .get(config::ENVELOPE_FIELD_TIMESTAMP)
        .and_then(Value::as_i64)
        .ok_or_else(|| {
            CodecError::MalformedEnvelope("missing or non-integer timestamp".into())
        })?;

    Ok(PaymentIntent {
        amount,
        payee_upi: payee_upi.to_string(),
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent() -> PaymentIntent {
        PaymentIntent {
            amount: 99.5,
            payee_upi: "bob@pay".to_string(),
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let original = intent();
        let decoded = decode(&encode(&original)).expect("round trip");
        assert_eq!(decoded, original);
    }

    #[test]
    fn wire_format_is_exactly_as_specified() {
        // The envelope is base64 of compact JSON with exactly these
        // three keys in this order. Pinned so a codec change that
        // breaks cross-device interop fails loudly here.
        let envelope = encode(&intent());
        let expected =
            BASE64.encode(r#"{"amount":99.5,"payeeUpi":"bob@pay","timestamp":1700000000000}"#);
        assert_eq!(envelope, expected);
    }

    #[test]
    fn non_base64_is_malformed() {
        let err = decode("not base64 at all!!!").unwrap_err();
        assert!(matches!(err, CodecError::MalformedEnvelope(_)));
    }

    #[test]
    fn non_json_payload_is_malformed() {
        let err = decode(&BASE64.encode("hello world")).unwrap_err();
        assert!(matches!(err, CodecError::MalformedEnvelope(_)));
    }

    #[test]
    fn json_array_is_malformed() {
        let err = decode(&BASE64.encode("[1,2,3]")).unwrap_err();
        assert!(matches!(err, CodecError::MalformedEnvelope(_)));
    }

    #[test]
    fn missing_amount_is_invalid() {
        let err = decode(&BASE64.encode(r#"{"payeeUpi":"a@b","timestamp":1}"#)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidIntent(_)));
    }

    #[test]
    fn zero_and_negative_amounts_are_invalid() {
        for json in [
            r#"{"amount":0,"payeeUpi":"a@b","timestamp":1}"#,
            r#"{"amount":-5.0,"payeeUpi":"a@b","timestamp":1}"#,
        ] {
            let err = decode(&BASE64.encode(json)).unwrap_err();
            assert!(matches!(err, CodecError::InvalidIntent(_)), "{json}");
        }
    }

    #[test]
    fn empty_payee_is_invalid() {
        let err =
            decode(&BASE64.encode(r#"{"amount":1.0,"payeeUpi":"","timestamp":1}"#)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidIntent(_)));
    }

    #[test]
    fn amount_with_wrong_type_is_malformed() {
        let err =
            decode(&BASE64.encode(r#"{"amount":"99","payeeUpi":"a@b","timestamp":1}"#))
                .unwrap_err();
        assert!(matches!(err, CodecError::MalformedEnvelope(_)));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let json =
            r#"{"amount":42.0,"payeeUpi":"carol@bank","timestamp":7,"correlationId":"x-1"}"#;
        let decoded = decode(&BASE64.encode(json)).expect("extra keys tolerated");
        assert_eq!(decoded.amount, 42.0);
        assert_eq!(decoded.payee_upi, "carol@bank");
        assert_eq!(decoded.timestamp, 7);
    }
}
