//! Client-side session storage
//!
//! The only state the client keeps between views is the opaque session token
//! issued at login. Each front-end picks a [`SessionStore`]: browser local
//! storage on the web, a small file for the terminal client.

use crate::error::ClientError;

/// Opaque token issued by `/login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey(String);

impl SessionKey {
    /// Returns `None` for a blank token.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            None
        } else {
            Some(SessionKey(key.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait SessionStore {
    fn load(&self) -> Option<SessionKey>;
    fn save(&self, key: &SessionKey) -> Result<(), ClientError>;
    fn clear(&self);
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    key: std::cell::RefCell<Option<SessionKey>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_key(key: &str) -> Self {
        MemoryStore {
            key: std::cell::RefCell::new(SessionKey::new(key)),
        }
    }
}

#[cfg(test)]
impl SessionStore for MemoryStore {
    fn load(&self) -> Option<SessionKey> {
        self.key.borrow().clone()
    }

    fn save(&self, key: &SessionKey) -> Result<(), ClientError> {
        *self.key.borrow_mut() = Some(key.clone());
        Ok(())
    }

    fn clear(&self) {
        self.key.borrow_mut().take();
    }
}

#[cfg(feature = "web")]
/// `window.localStorage`, under [`SESSION_STORAGE_KEY`](crate::config::SESSION_STORAGE_KEY).
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(feature = "web")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(feature = "web")]
impl SessionStore for LocalStorageStore {
    fn load(&self) -> Option<SessionKey> {
        let storage = Self::storage()?;
        let value = storage
            .get_item(crate::config::SESSION_STORAGE_KEY)
            .ok()
            .flatten()?;
        SessionKey::new(value)
    }

    fn save(&self, key: &SessionKey) -> Result<(), ClientError> {
        let storage =
            Self::storage().ok_or_else(|| ClientError::Storage("localStorage is disabled".into()))?;
        storage
            .set_item(crate::config::SESSION_STORAGE_KEY, key.as_str())
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.remove_item(crate::config::SESSION_STORAGE_KEY) {
                log::error!("Could not remove session key: {:?}", e);
            }
        }
    }
}

#[cfg(feature = "cli")]
/// Keeps the token in a single file so the terminal client survives restarts.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(feature = "cli")]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        FileStore { path: path.into() }
    }
}

#[cfg(feature = "cli")]
impl SessionStore for FileStore {
    fn load(&self) -> Option<SessionKey> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        SessionKey::new(content)
    }

    fn save(&self, key: &SessionKey) -> Result<(), ClientError> {
        std::fs::write(&self.path, key.as_str()).map_err(|e| {
            ClientError::Storage(format!("{}: {}", self.path.display(), e))
        })
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed session file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::error!("Could not remove {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_rejected() {
        assert_eq!(SessionKey::new("   "), None);
        assert_eq!(SessionKey::new(" abc \n").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_memory_store_save_and_clear() {
        let store = MemoryStore::new();
        assert_eq!(store.load(), None);
        let key = SessionKey::new("k-1").unwrap();
        store.save(&key).unwrap();
        assert_eq!(store.load(), Some(key));
        store.clear();
        assert_eq!(store.load(), None);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_file_store_survives_reopen() {
        let path = std::env::temp_dir().join(format!("bonus-session-{}", std::process::id()));
        let store = FileStore::new(&path);
        store.save(&SessionKey::new("persisted").unwrap()).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.load().unwrap().as_str(), "persisted");

        reopened.clear();
        assert_eq!(store.load(), None);
        // clearing twice is fine
        reopened.clear();
    }
}
