//! Slack request signing (v0 scheme).
//!
//! Every inbound event request carries `X-Slack-Request-Timestamp` and
//! `X-Slack-Signature` headers. The signature is HMAC-SHA256 over the
//! base string `v0:<timestamp>:<body>` under the app's signing secret,
//! hex-encoded and prefixed with `v0=`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Requests whose timestamp is further than this from the local clock
/// are rejected (replay protection).
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 60 * 5;

/// Compute the `v0=<hex>` signature for a request.
pub fn sign_request(secret: &str, timestamp: i64, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(format!("v0:{timestamp}:").as_bytes());
    mac.update(body);
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}

/// Verify a request signature against the signing secret.
///
/// `now` is the verifier's unix time, passed in rather than read from the
/// clock so the tolerance window is testable.
pub fn verify_request(
    secret: &str,
    timestamp: i64,
    body: &[u8],
    signature: &str,
    now: i64,
) -> bool {
    if (now - timestamp).abs() > TIMESTAMP_TOLERANCE_SECS {
        return false;
    }
    let expected = sign_request(secret, timestamp, body);
    // Constant-time comparison
    expected.len() == signature.len()
        && expected
            .as_bytes()
            .iter()
            .zip(signature.as_bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";

    #[test]
    fn sign_and_verify() {
        let body = b"{\"type\":\"event_callback\"}";
        let sig = sign_request(SECRET, 1_700_000_000, body);
        assert!(sig.starts_with("v0="));
        assert!(verify_request(SECRET, 1_700_000_000, body, &sig, 1_700_000_000));
        assert!(!verify_request("wrong-secret", 1_700_000_000, body, &sig, 1_700_000_000));
        assert!(!verify_request(SECRET, 1_700_000_000, b"other body", &sig, 1_700_000_000));
    }

    #[test]
    fn rejects_stale_timestamp() {
        let body = b"payload";
        let ts = 1_700_000_000;
        let sig = sign_request(SECRET, ts, body);
        assert!(verify_request(SECRET, ts, body, &sig, ts + TIMESTAMP_TOLERANCE_SECS));
        assert!(!verify_request(SECRET, ts, body, &sig, ts + TIMESTAMP_TOLERANCE_SECS + 1));
        // A timestamp from the future is just as suspect.
        assert!(!verify_request(SECRET, ts + 600, body, &sig, ts));
    }

    #[test]
    fn rejects_truncated_signature() {
        let body = b"payload";
        let sig = sign_request(SECRET, 1_700_000_000, body);
        assert!(!verify_request(
            SECRET,
            1_700_000_000,
            body,
            &sig[..sig.len() - 2],
            1_700_000_000
        ));
        assert!(!verify_request(SECRET, 1_700_000_000, body, "", 1_700_000_000));
    }
}
