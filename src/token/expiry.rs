use jiff::Timestamp;

use crate::telemetry::{Diagnostic, DiagnosticSink, TracingSink};

use super::decode_claims;

/// Whether `token` must be treated as expired at `now`.
///
/// Fail-closed: an absent, empty, or undecodable token, or one without a
/// usable `exp`, is reported as expired after emitting a
/// [`Diagnostic::TokenDecode`].
pub fn is_token_expired_at(
    token: Option<&str>,
    now: Timestamp,
    sink: &dyn DiagnosticSink,
) -> bool {
    let result = match token {
        Some(token) if !token.is_empty() => decode_claims(token),
        _ => {
            sink.emit(Diagnostic::TokenDecode {
                reason: "token is missing".into(),
            });
            return true;
        }
    };
    match result {
        Ok(claims) => claims.is_expired_at(now),
        Err(err) => {
            sink.emit(Diagnostic::TokenDecode {
                reason: err.to_string(),
            });
            true
        }
    }
}

/// [`is_token_expired_at`] against the current time, logging through `tracing`.
pub fn is_token_expired(token: Option<&str>) -> bool {
    is_token_expired_at(token, Timestamp::now(), &TracingSink)
}
