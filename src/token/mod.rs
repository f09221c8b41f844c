mod claims;
mod expiry;

pub use claims::{TokenClaims, decode_claims};
pub use expiry::{is_token_expired, is_token_expired_at};
