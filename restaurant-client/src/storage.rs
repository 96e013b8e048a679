//! Persisted key/value contract shared by the browser and the CLI.
//!
//! Browser builds back this with `localStorage`, the CLI with a JSON file.
//! Values are raw strings, exactly as `localStorage` holds them.

use crate::error::StorageError;
use std::cell::RefCell;
use std::collections::BTreeMap;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const FAVORITES_KEY: &str = "favorites";
pub const AVATAR_KEY: &str = "user-avatar";

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// In-process store, used by tests and as a scratch store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Reads a JSON value; a missing or undecodable entry reads as `None`.
pub fn read_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: serde::de::DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = store.get_item(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring undecodable '{}' entry: {}", key, e);
            None
        }
    }
}

pub fn write_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: serde::Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set_item(key, &raw)
}
