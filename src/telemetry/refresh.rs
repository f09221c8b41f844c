use jiff::Timestamp;
use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;

use super::{Diagnostic, DiagnosticSink};

/// Per-attempt telemetry for a single refresh exchange.
#[derive(Clone, Debug)]
pub struct RefreshTelemetry {
    attempt_id: Uuid,
    context: String,
}

impl RefreshTelemetry {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            context: context.into(),
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn emit_start(&self, at: Timestamp) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = %at,
            "refresh.start"
        );
    }

    pub fn emit_success(&self, at: Timestamp) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = %at,
            "refresh.success"
        );
    }

    /// Reports the failure through the injected sink rather than `tracing` directly.
    pub fn emit_failure(&self, sink: &dyn DiagnosticSink, error: &Error) {
        sink.emit(Diagnostic::RefreshFailed {
            attempt_id: self.attempt_id,
            status: error.status().map(|s| s.as_u16()),
            body: error.response_body().map(str::to_string),
            error: error.to_string(),
        });
    }
}
