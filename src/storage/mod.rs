//! Credential slots the checker reads from and writes to.
//!
//! Two persistence scopes exist: the durable scope survives restarts (browser
//! `localStorage`), the session scope is cleared when the session ends
//! (browser `sessionStorage`). Backends implement [`TokenStorage`] so the
//! checker never touches ambient global state.

mod file;
mod memory;

#[cfg(target_arch = "wasm32")]
mod browser;

use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::errors::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageScope {
    Durable,
    Session,
}

impl fmt::Display for StorageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageScope::Durable => write!(f, "durable"),
            StorageScope::Session => write!(f, "session"),
        }
    }
}

/// Key/value access to the two credential scopes.
pub trait TokenStorage: Send + Sync {
    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>, Error>;

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<(), Error>;

    fn remove(&self, scope: StorageScope, key: &str) -> Result<(), Error>;
}

impl<T: TokenStorage + ?Sized> TokenStorage for std::sync::Arc<T> {
    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>, Error> {
        (**self).get(scope, key)
    }

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<(), Error> {
        (**self).set(scope, key, value)
    }

    fn remove(&self, scope: StorageScope, key: &str) -> Result<(), Error> {
        (**self).remove(scope, key)
    }
}

/// Picks the backend for `config`: the browser's stores on `wasm32`, otherwise
/// a JSON file when `storage_path` is set, else process memory.
pub fn default_storage(config: &Config) -> Result<Arc<dyn TokenStorage>, Error> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = config;
        Ok(Arc::new(BrowserStorage))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        match &config.storage_path {
            Some(path) => Ok(Arc::new(FileStorage::open(path)?)),
            None => Ok(Arc::new(MemoryStorage::new())),
        }
    }
}
