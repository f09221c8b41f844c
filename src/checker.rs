use std::sync::Arc;

use jiff::Timestamp;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::Config;
use crate::errors::Error;
use crate::refresh::RefreshClient;
use crate::storage::{
    ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, StorageScope, TokenStorage, default_storage,
};
use crate::telemetry::refresh::RefreshTelemetry;
use crate::telemetry::{Diagnostic, DiagnosticSink, TracingSink};
use crate::token::is_token_expired_at;

/// Result of a single check-and-refresh pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    /// The stored access token is present and unexpired.
    Valid,
    /// A new access token was obtained and stored.
    Refreshed,
    /// Neither scope holds a refresh token; nothing to recover with.
    NoRefreshToken,
    /// The refresh exchange or the write of its result failed.
    RefreshFailed,
}

impl AuthStatus {
    pub fn is_authenticated(self) -> bool {
        matches!(self, AuthStatus::Valid | AuthStatus::Refreshed)
    }
}

/// Checks the stored access token and silently refreshes it when needed.
pub struct AuthStatusChecker {
    storage: Arc<dyn TokenStorage>,
    refresher: RefreshClient,
    sink: Arc<dyn DiagnosticSink>,
    refresh_lock: Option<Mutex<()>>,
}

impl AuthStatusChecker {
    /// Builds a checker over `storage`, reporting diagnostics to `tracing`.
    pub fn new(config: &Config, storage: Arc<dyn TokenStorage>) -> Result<Self, Error> {
        let refresher = RefreshClient::new(config)?;
        Ok(Self::from_parts(
            refresher,
            storage,
            Arc::new(TracingSink),
            config.single_flight,
        ))
    }

    /// Builds a checker over the storage backend `config` selects.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(config, default_storage(config)?)
    }

    pub fn from_parts(
        refresher: RefreshClient,
        storage: Arc<dyn TokenStorage>,
        sink: Arc<dyn DiagnosticSink>,
        single_flight: bool,
    ) -> Self {
        Self {
            storage,
            refresher,
            sink,
            refresh_lock: single_flight.then(|| Mutex::new(())),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn storage(&self) -> &Arc<dyn TokenStorage> {
        &self.storage
    }

    pub fn single_flight(&self) -> bool {
        self.refresh_lock.is_some()
    }

    /// `true` when a usable access token is stored, refreshing it first if needed.
    pub async fn check_auth_status(&self) -> bool {
        self.check().await.is_authenticated()
    }

    /// One pass: read both slots, validate, refresh at most once. Never errors.
    pub async fn check(&self) -> AuthStatus {
        let access = self.read(StorageScope::Durable, ACCESS_TOKEN_KEY);
        let refresh = self
            .read(StorageScope::Durable, REFRESH_TOKEN_KEY)
            .or_else(|| self.read(StorageScope::Session, REFRESH_TOKEN_KEY));

        let Some(refresh) = refresh else {
            debug!("no refresh token stored");
            return AuthStatus::NoRefreshToken;
        };

        if self.access_token_usable(access.as_deref()) {
            return AuthStatus::Valid;
        }

        let Some(lock) = &self.refresh_lock else {
            return self.refresh(&refresh).await;
        };

        // Only one refresh attempt should run at a time.
        let _lock = lock.lock().await;
        let current = self.read(StorageScope::Durable, ACCESS_TOKEN_KEY);
        if current != access && self.access_token_usable(current.as_deref()) {
            debug!("access token refreshed by a concurrent check");
            return AuthStatus::Valid;
        }
        self.refresh(&refresh).await
    }

    fn access_token_usable(&self, access: Option<&str>) -> bool {
        match access {
            Some(token) => {
                !is_token_expired_at(Some(token), Timestamp::now(), self.sink.as_ref())
            }
            None => false,
        }
    }

    async fn refresh(&self, refresh_token: &str) -> AuthStatus {
        let telemetry = RefreshTelemetry::new("check_auth_status");
        telemetry.emit_start(Timestamp::now());
        match self.exchange_and_store(refresh_token).await {
            Ok(()) => {
                telemetry.emit_success(Timestamp::now());
                AuthStatus::Refreshed
            }
            Err(err) => {
                telemetry.emit_failure(self.sink.as_ref(), &err);
                AuthStatus::RefreshFailed
            }
        }
    }

    async fn exchange_and_store(&self, refresh_token: &str) -> Result<(), Error> {
        let access = self.refresher.refresh(refresh_token).await?;
        self.storage.set(StorageScope::Durable, ACCESS_TOKEN_KEY, &access)
    }

    /// Empty values and read failures both count as absent.
    fn read(&self, scope: StorageScope, key: &str) -> Option<String> {
        match self.storage.get(scope, key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                self.sink.emit(Diagnostic::StorageRead {
                    scope,
                    key: key.to_string(),
                    error: err.to_string(),
                });
                None
            }
        }
    }
}
