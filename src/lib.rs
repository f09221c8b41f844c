//! Client-side access-token validation with silent refresh.
//!
//! [`AuthStatusChecker::check_auth_status`] reads the stored access token,
//! accepts it if it has not expired, and otherwise exchanges the stored
//! refresh token for a new one at the configured endpoint.

pub mod checker;
pub mod config;
pub mod errors;
pub mod refresh;
pub mod storage;
pub mod telemetry;
pub mod token;

pub use checker::{AuthStatus, AuthStatusChecker};
pub use config::{Config, ConfigLocation, read_config};
pub use errors::Error;
pub use refresh::RefreshClient;
pub use storage::{FileStorage, MemoryStorage, StorageScope, TokenStorage};
pub use telemetry::{Diagnostic, DiagnosticSink, MemorySink, TracingSink};
pub use token::{TokenClaims, decode_claims, is_token_expired, is_token_expired_at};
