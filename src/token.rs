//! Bearer token inspection.
//!
//! Tokens are issued by the server; the client only peeks at the payload to
//! decide whether a stored session is still worth presenting. The signature is
//! never checked here, the server remains the trust boundary.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Standard alphabet, padding optional (JWT segments are unpadded), and
/// non-zero trailing bits accepted the way browsers' `atob` does.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decoded payload of a bearer token
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    /// Expiry, seconds since the epoch
    #[serde(default)]
    pub exp: Option<Value>,
    /// Every other claim, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Expiry in seconds, if present and numeric.
    pub fn exp_secs(&self) -> Option<f64> {
        self.exp.as_ref().and_then(Value::as_f64)
    }

    /// Look up an arbitrary claim.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// Decode the payload segment of a token.
/// Returns None for anything malformed: wrong segment count, bad base64,
/// non-UTF-8 bytes, or a payload that is not a JSON object.
pub fn decode(token: &str) -> Option<Claims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    let payload = segments[1].replace('-', "+").replace('_', "/");
    let bytes = PAYLOAD_ENGINE.decode(payload.as_bytes()).ok()?;
    let json = String::from_utf8(bytes).ok()?;
    serde_json::from_str(&json).ok()
}

/// Check whether a token is expired (or unreadable) right now.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, now_millis())
}

/// Check expiry against an explicit clock in milliseconds since the epoch.
/// A token without a numeric `exp` counts as expired.
pub fn is_expired_at(token: &str, now_ms: i64) -> bool {
    match decode(token).as_ref().and_then(Claims::exp_secs) {
        Some(exp) => exp * 1000.0 <= now_ms as f64,
        None => true,
    }
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
