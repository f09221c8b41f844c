//! `localStorage` / `sessionStorage` backend for `wasm32` builds.
//!
//! Values are stored as raw strings, not JSON, so tokens written by other
//! parts of the page stay readable.

use gloo::storage::{LocalStorage, SessionStorage, Storage as _};

use crate::errors::Error;

use super::{StorageScope, TokenStorage};

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

fn raw(scope: StorageScope) -> web_sys::Storage {
    match scope {
        StorageScope::Durable => LocalStorage::raw(),
        StorageScope::Session => SessionStorage::raw(),
    }
}

impl TokenStorage for BrowserStorage {
    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>, Error> {
        raw(scope)
            .get_item(key)
            .map_err(|e| Error::Storage(format!("{scope} get_item({key}) failed: {e:?}")))
    }

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<(), Error> {
        raw(scope)
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("{scope} set_item({key}) failed: {e:?}")))
    }

    fn remove(&self, scope: StorageScope, key: &str) -> Result<(), Error> {
        raw(scope)
            .remove_item(key)
            .map_err(|e| Error::Storage(format!("{scope} remove_item({key}) failed: {e:?}")))
    }
}
