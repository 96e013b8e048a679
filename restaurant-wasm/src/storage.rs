use gloo_storage::{LocalStorage, Storage};
use restaurant_client::error::StorageError;
use restaurant_client::storage::KeyValueStore;

/// `window.localStorage`, accessed as raw strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .remove_item(key)
            .map_err(|e| StorageError::Remove {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}
