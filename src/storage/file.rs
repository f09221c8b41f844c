//! JSON-file backed storage for non-browser clients.
//!
//! The durable scope is a flat `{ key: value }` JSON object on disk, rewritten
//! atomically (temp file + rename) on every change. The session scope is kept
//! in memory and disappears with the `FileStorage` value.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::Error;

use super::{StorageScope, TokenStorage};

pub struct FileStorage {
    path: PathBuf,
    durable: Mutex<HashMap<String, String>>,
    session: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Opens the durable file at `path`; a missing file starts empty and is
    /// created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let durable = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            let slots: HashMap<String, String> = serde_json::from_str(&contents)?;
            info!(path = %path.display(), keys = slots.len(), "loaded durable token storage");
            slots
        } else {
            info!(path = %path.display(), "token storage file not found, starting empty");
            HashMap::new()
        };
        Ok(Self {
            path,
            durable: Mutex::new(durable),
            session: Mutex::new(HashMap::new()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn slots(&self, scope: StorageScope) -> &Mutex<HashMap<String, String>> {
        match scope {
            StorageScope::Durable => &self.durable,
            StorageScope::Session => &self.session,
        }
    }

    fn update<F>(&self, scope: StorageScope, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let mut slots = self
            .slots(scope)
            .lock()
            .map_err(|_| Error::Storage(format!("{scope} storage lock poisoned")))?;
        if scope == StorageScope::Durable {
            let mut next = slots.clone();
            f(&mut next);
            write_atomic(&self.path, &next)?;
            *slots = next;
        } else {
            f(&mut *slots);
        }
        Ok(())
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>, Error> {
        let slots = self
            .slots(scope)
            .lock()
            .map_err(|_| Error::Storage(format!("{scope} storage lock poisoned")))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<(), Error> {
        self.update(scope, |slots| {
            slots.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, scope: StorageScope, key: &str) -> Result<(), Error> {
        self.update(scope, |slots| {
            slots.remove(key);
        })
    }
}

fn write_atomic(path: &Path, data: &HashMap<String, String>) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(data)?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tokens".into());
    let tmp_path = dir.join(format!(".{name}.{}.tmp", Uuid::new_v4()));

    if let Err(err) = write_private(&tmp_path, json.as_bytes()) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err);
    }
    if let Err(err) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    debug!(path = %path.display(), "persisted durable token storage");
    Ok(())
}

fn write_private(tmp_path: &Path, bytes: &[u8]) -> Result<(), Error> {
    std::fs::write(tmp_path, bytes)?;

    // Owner read/write only; the file holds bearer credentials.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
