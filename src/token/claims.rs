use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use jiff::Timestamp;
use serde_json::Value;

use crate::errors::Error;

/// Standard alphabet, padding optional and loose trailing bits accepted, so
/// payloads from any JWT issuer decode once `-`/`_` are translated.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// The claims this crate cares about from a compact token's payload.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenClaims {
    /// Expiration, seconds since the Unix epoch. May be fractional.
    exp: f64,
}

impl TokenClaims {
    pub fn exp(&self) -> f64 {
        self.exp
    }

    pub fn exp_millis(&self) -> f64 {
        self.exp * 1000.0
    }

    pub fn expires_at(&self) -> Result<Timestamp, Error> {
        Timestamp::from_millisecond(self.exp_millis() as i64)
            .map_err(|e| Error::Token(format!("exp {} out of range: {e}", self.exp)))
    }

    /// Expired once `now` reaches the expiration instant.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.as_millisecond() as f64 >= self.exp_millis()
    }
}

/// Parses `header.payload.signature` and extracts the `exp` claim.
///
/// The signature is not verified; this only answers "when does it expire".
pub fn decode_claims(token: &str) -> Result<TokenClaims, Error> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(Error::Token(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let payload = segments[1].replace('-', "+").replace('_', "/");
    let bytes = PAYLOAD_ENGINE.decode(payload.as_bytes())?;
    let decoded: Value = serde_json::from_slice(&bytes)?;

    // A zero exp counts as absent.
    let exp = match decoded.get("exp") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64().filter(|exp| *exp != 0.0),
        Some(other) => {
            return Err(Error::Token(format!("'exp' is not numeric: {other}")));
        }
    };
    let exp = exp.ok_or_else(|| Error::Token("token does not contain an 'exp' field".into()))?;

    Ok(TokenClaims { exp })
}
