//! Diagnostics emitted when a token check or refresh goes wrong.
//!
//! Callers inject a [`DiagnosticSink`]; the default [`TracingSink`] forwards
//! every diagnostic to `tracing`, and [`MemorySink`] records them so tests can
//! assert on what was reported.

pub mod refresh;

use std::sync::Mutex;

use tracing::{Level, event};
use uuid::Uuid;

use crate::storage::StorageScope;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// An access token could not be decoded and was treated as expired.
    TokenDecode { reason: String },
    /// A storage slot could not be read and was treated as empty.
    StorageRead {
        scope: StorageScope,
        key: String,
        error: String,
    },
    /// The refresh exchange failed; `body` is the endpoint's response body if any.
    RefreshFailed {
        attempt_id: Uuid,
        status: Option<u16>,
        body: Option<String>,
        error: String,
    },
}

/// Fire-and-forget diagnostic channel.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::TokenDecode { reason } => {
                event!(Level::ERROR, reason = %reason, "token.decode_failed");
            }
            Diagnostic::StorageRead { scope, key, error } => {
                event!(
                    Level::WARN,
                    scope = %scope,
                    key = %key,
                    error = %error,
                    "storage.read_failed"
                );
            }
            Diagnostic::RefreshFailed {
                attempt_id,
                status,
                body,
                error,
            } => {
                event!(
                    Level::ERROR,
                    attempt_id = %attempt_id,
                    status = ?status,
                    body = ?body,
                    error = %error,
                    "refresh.failure"
                );
            }
        }
    }
}

/// Keeps every emitted diagnostic in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: Diagnostic) {
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(diagnostic);
        }
    }
}
