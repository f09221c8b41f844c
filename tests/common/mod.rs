#![allow(dead_code)]

use std::sync::Arc;

use auth_status::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use auth_status::{
    AuthStatusChecker, Config, Error, MemorySink, MemoryStorage, RefreshClient,
    StorageScope, TokenStorage,
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use wiremock::MockServer;

pub const REFRESH_PATH: &str = "/api/v1/refresh";

#[derive(serde::Serialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// HS256-signed JWT expiring at `exp` (seconds since epoch).
pub fn signed_token(exp: i64) -> String {
    let claims = Claims {
        sub: "user-1".into(),
        exp,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("signing should succeed")
}

pub fn now_secs() -> i64 {
    jiff::Timestamp::now().as_second()
}

pub fn fresh_token() -> String {
    signed_token(now_secs() + 3_600)
}

pub fn expired_token() -> String {
    signed_token(now_secs() - 3_600)
}

pub fn config_for(server: &MockServer, single_flight: bool) -> Config {
    Config::from_values(format!("{}{REFRESH_PATH}", server.uri()), single_flight, None)
}

pub fn checker_for(
    config: &Config,
    storage: Arc<dyn TokenStorage>,
    sink: Arc<MemorySink>,
) -> AuthStatusChecker {
    let refresher = RefreshClient::new(config).expect("refresh client builds");
    AuthStatusChecker::from_parts(refresher, storage, sink, config.single_flight)
}

pub fn storage_with(
    access: Option<&str>,
    durable_refresh: Option<&str>,
    session_refresh: Option<&str>,
) -> Arc<MemoryStorage> {
    let mut storage = MemoryStorage::new();
    if let Some(access) = access {
        storage = storage.with(StorageScope::Durable, ACCESS_TOKEN_KEY, access);
    }
    if let Some(refresh) = durable_refresh {
        storage = storage.with(StorageScope::Durable, REFRESH_TOKEN_KEY, refresh);
    }
    if let Some(refresh) = session_refresh {
        storage = storage.with(StorageScope::Session, REFRESH_TOKEN_KEY, refresh);
    }
    Arc::new(storage)
}

pub fn stored_access(storage: &impl TokenStorage) -> Option<String> {
    storage
        .get(StorageScope::Durable, ACCESS_TOKEN_KEY)
        .expect("read access slot")
}

/// Storage whose reads always fail.
pub struct BrokenStorage;

impl TokenStorage for BrokenStorage {
    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>, Error> {
        Err(Error::Storage(format!("{scope}/{key} unavailable")))
    }

    fn set(&self, _scope: StorageScope, _key: &str, _value: &str) -> Result<(), Error> {
        Err(Error::Storage("read-only".into()))
    }

    fn remove(&self, _scope: StorageScope, _key: &str) -> Result<(), Error> {
        Err(Error::Storage("read-only".into()))
    }
}

/// Storage whose reads succeed but every write fails.
pub struct ReadOnlyStorage(pub MemoryStorage);

impl TokenStorage for ReadOnlyStorage {
    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>, Error> {
        self.0.get(scope, key)
    }

    fn set(&self, scope: StorageScope, key: &str, _value: &str) -> Result<(), Error> {
        Err(Error::Storage(format!("{scope}/{key} is read-only")))
    }

    fn remove(&self, scope: StorageScope, key: &str) -> Result<(), Error> {
        Err(Error::Storage(format!("{scope}/{key} is read-only")))
    }
}

/// A loopback URL nothing listens on.
pub fn dead_refresh_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}{REFRESH_PATH}")
}

pub fn sink() -> Arc<MemorySink> {
    Arc::new(MemorySink::new())
}
