//! Stripe webhook signature verification.
//!
//! Stripe signs each delivery with a `Stripe-Signature` header of the form
//! `t=<unix seconds>,v1=<hex hmac>[,v1=<hex hmac>...]`. The signed payload is
//! `"{t}.{raw body}"` under HMAC-SHA256 with the endpoint's signing secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::types::Timestamp;

/// Default tolerance between the signed timestamp and the local clock.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("Malformed Stripe-Signature header")]
    MalformedHeader,

    #[error("Stripe-Signature header has no v1 signature")]
    NoSignatures,

    #[error("Signature timestamp outside the tolerance window")]
    TimestampOutOfTolerance,

    #[error("No signature matches the payload")]
    Mismatch,
}

/// Parsed `Stripe-Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub signatures: Vec<String>,
}

/// Parse a `Stripe-Signature` header. Unknown schemes (e.g. `v0`) are skipped.
pub fn parse_header(header: &str) -> Result<SignatureHeader, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let (key, value) = part
            .trim()
            .split_once('=')
            .ok_or(SignatureError::MalformedHeader)?;
        match key {
            "t" => {
                let t = value
                    .parse::<i64>()
                    .map_err(|_| SignatureError::MalformedHeader)?;
                timestamp = Some(t);
            }
            "v1" => signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureError::NoSignatures);
    }
    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

fn signed_payload_mac(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

/// Hex HMAC-SHA256 of `"{timestamp}.{payload}"`.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    hex::encode(signed_payload_mac(secret, timestamp, payload).finalize().into_bytes())
}

/// Build a header value for `payload`; used by tests and local tooling.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    format!("t={timestamp},v1={}", compute_signature(secret, timestamp, payload))
}

/// Verify `header` against the raw request body.
///
/// Candidates are compared with [`Mac::verify_slice`], which runs in constant time.
pub fn verify(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: Timestamp,
    tolerance_secs: i64,
) -> Result<(), SignatureError> {
    let parsed = parse_header(header)?;

    // The timestamp is attacker-controlled; an overflowing difference is out of tolerance.
    let within_tolerance = now
        .timestamp()
        .checked_sub(parsed.timestamp)
        .is_some_and(|skew| skew.unsigned_abs() <= tolerance_secs.unsigned_abs());
    if !within_tolerance {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let mac = signed_payload_mac(secret, parsed.timestamp, payload);
    let matched = parsed
        .signatures
        .iter()
        .filter_map(|candidate| hex::decode(candidate))
        .any(|bytes| mac.clone().verify_slice(&bytes).is_ok());

    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string; `None` for odd lengths or non-hex characters.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const BODY: &[u8] = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;

    fn now() -> Timestamp {
        Utc.timestamp_opt(1_760_000_000, 0).unwrap()
    }

    #[test]
    fn accepts_freshly_signed_payload() {
        let header = sign_payload(SECRET, now().timestamp(), BODY);
        assert_eq!(verify(BODY, &header, SECRET, now(), DEFAULT_TOLERANCE_SECS), Ok(()));
    }

    #[test]
    fn accepts_when_any_v1_signature_matches() {
        let good = compute_signature(SECRET, now().timestamp(), BODY);
        let header = format!("t={},v1=deadbeef,v0=abc,v1={good}", now().timestamp());
        assert!(verify(BODY, &header, SECRET, now(), DEFAULT_TOLERANCE_SECS).is_ok());
    }

    #[test]
    fn rejects_tampered_body() {
        let header = sign_payload(SECRET, now().timestamp(), BODY);
        let tampered = br#"{"id":"evt_2","type":"checkout.session.completed"}"#;
        assert_eq!(
            verify(tampered, &header, SECRET, now(), DEFAULT_TOLERANCE_SECS),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_wrong_secret() {
        let header = sign_payload("whsec_other", now().timestamp(), BODY);
        assert_eq!(
            verify(BODY, &header, SECRET, now(), DEFAULT_TOLERANCE_SECS),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_stale_timestamp() {
        let signed_at = now().timestamp() - DEFAULT_TOLERANCE_SECS - 1;
        let header = sign_payload(SECRET, signed_at, BODY);
        assert_eq!(
            verify(BODY, &header, SECRET, now(), DEFAULT_TOLERANCE_SECS),
            Err(SignatureError::TimestampOutOfTolerance)
        );
    }

    #[test]
    fn rejects_malformed_headers() {
        for header in ["", "garbage", "t=abc,v1=00", "v1=00"] {
            assert_eq!(
                verify(BODY, header, SECRET, now(), DEFAULT_TOLERANCE_SECS),
                Err(SignatureError::MalformedHeader),
                "header {header:?}"
            );
        }
        assert_eq!(
            parse_header("t=1,v0=abc"),
            Err(SignatureError::NoSignatures)
        );
    }

    #[test]
    fn extreme_timestamps_are_out_of_tolerance() {
        for t in [i64::MIN, i64::MAX, -1] {
            let header = format!("t={t},v1=00");
            assert_eq!(
                verify(b"{}", &header, SECRET, now(), DEFAULT_TOLERANCE_SECS),
                Err(SignatureError::TimestampOutOfTolerance),
                "t={t}"
            );
        }
        assert_eq!(
            verify(
                b"{}",
                "t=-9223372036854775808,v1=00",
                SECRET,
                Utc::now(),
                DEFAULT_TOLERANCE_SECS
            ),
            Err(SignatureError::TimestampOutOfTolerance)
        );
    }

    #[test]
    fn non_hex_signatures_do_not_match() {
        let header = format!("t={},v1=zz,v1=abc", now().timestamp());
        assert_eq!(
            verify(BODY, &header, SECRET, now(), DEFAULT_TOLERANCE_SECS),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn hex_decode_inverts_encode() {
        assert_eq!(hex::decode("00ff7a"), Some(vec![0x00, 0xff, 0x7a]));
        assert_eq!(hex::decode("0"), None);
        assert_eq!(hex::decode("g0"), None);
        assert_eq!(hex::decode("+f"), None);
        assert_eq!(hex::encode([0xde, 0xad]), "dead");
    }

    #[test]
    fn signature_is_lowercase_hex() {
        let sig = compute_signature(SECRET, 1, b"{}");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
