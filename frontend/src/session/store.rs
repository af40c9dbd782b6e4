//! The persisted session record: the encoded token plus the role label.
//!
//! Every read and write of the pair goes through [`SessionStore`], which keeps
//! the two keys in lockstep. Nothing else in the crate touches these keys.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::utils::storage as storage_utils;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read `{key}`")]
    Read { key: String },
    #[error("failed to write `{key}`")]
    Write { key: String },
    #[error("failed to remove `{key}`")]
    Remove { key: String },
}

/// String-keyed, string-valued storage medium.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl KeyValueStorage for web_sys::Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        web_sys::Storage::get_item(self, key).map_err(|_| StorageError::Read { key: key.into() })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        web_sys::Storage::set_item(self, key, value)
            .map_err(|_| StorageError::Write { key: key.into() })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        web_sys::Storage::remove_item(self, key)
            .map_err(|_| StorageError::Remove { key: key.into() })
    }
}

/// In-process storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionKeys {
    pub token: &'static str,
    pub role: &'static str,
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self {
            token: "token",
            role: "role",
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
    pub role: String,
}

impl SessionRecord {
    pub fn new(token: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            role: role.into(),
        }
    }
}

// Keeps the raw token out of log lines.
impl fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRecord")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    backend: Rc<dyn KeyValueStorage>,
    keys: SessionKeys,
}

impl SessionStore {
    pub fn new(backend: Rc<dyn KeyValueStorage>, keys: SessionKeys) -> Self {
        Self { backend, keys }
    }

    pub fn in_memory(storage: MemoryStorage) -> Self {
        Self::new(Rc::new(storage), SessionKeys::default())
    }

    /// Store backed by the browser's `localStorage`.
    pub fn local(keys: SessionKeys) -> Result<Self, StorageError> {
        let storage = storage_utils::local_storage().map_err(StorageError::Unavailable)?;
        Ok(Self::new(Rc::new(storage), keys))
    }

    pub fn keys(&self) -> SessionKeys {
        self.keys
    }

    pub fn token(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .backend
            .get_item(self.keys.token)?
            .filter(|token| !token.trim().is_empty()))
    }

    pub fn get(&self) -> Result<Option<SessionRecord>, StorageError> {
        let Some(token) = self.token()? else {
            return Ok(None);
        };
        let role = self.backend.get_item(self.keys.role)?.unwrap_or_default();
        Ok(Some(SessionRecord { token, role }))
    }

    /// Writes the pair. A failed role write rolls the token back so the store
    /// never holds one half of a session.
    pub fn set(&self, record: &SessionRecord) -> Result<(), StorageError> {
        self.backend.set_item(self.keys.token, &record.token)?;
        if let Err(err) = self.backend.set_item(self.keys.role, &record.role) {
            if let Err(rollback) = self.backend.remove_item(self.keys.token) {
                log::warn!("token left without a role after failed write: {}", rollback);
            }
            return Err(err);
        }
        Ok(())
    }

    /// Removes both keys, attempting the second even when the first fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.backend.remove_item(self.keys.token);
        let role = self.backend.remove_item(self.keys.role);
        token.and(role)
    }
}
