use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::Error;

use super::{StorageScope, TokenStorage};

/// Process-local storage; both scopes live only as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<(StorageScope, String), String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seed, mostly for tests and demos.
    pub fn with(self, scope: StorageScope, key: &str, value: &str) -> Self {
        if let Ok(mut slots) = self.slots.write() {
            slots.insert((scope, key.to_string()), value.to_string());
        }
        self
    }

    /// Drops every session-scoped entry, as a browser does when the tab closes.
    pub fn end_session(&self) {
        if let Ok(mut slots) = self.slots.write() {
            slots.retain(|(scope, _), _| *scope != StorageScope::Session);
        }
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>, Error> {
        let slots = self
            .slots
            .read()
            .map_err(|_| Error::Storage("memory storage lock poisoned".into()))?;
        Ok(slots.get(&(scope, key.to_string())).cloned())
    }

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<(), Error> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| Error::Storage("memory storage lock poisoned".into()))?;
        slots.insert((scope, key.to_string()), value.to_string());
        Ok(())
    }

    fn remove(&self, scope: StorageScope, key: &str) -> Result<(), Error> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| Error::Storage("memory storage lock poisoned".into()))?;
        slots.remove(&(scope, key.to_string()));
        Ok(())
    }
}
