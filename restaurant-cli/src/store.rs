use anyhow::{Context, Result};
use restaurant_client::error::StorageError;
use restaurant_client::storage::KeyValueStore;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const DEFAULT_FILE_NAME: &str = ".restaurant_session.json";

/// JSON object file holding the same keys the browser keeps in `localStorage`.
/// Every write goes straight to disk.
pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(custom_path: Option<PathBuf>) -> Result<Self> {
        let path = match custom_path {
            Some(path) => path,
            None => {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                home.join(DEFAULT_FILE_NAME)
            }
        };

        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Store file {:?} is not a JSON object of strings", path))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e).with_context(|| format!("Failed to read store {:?}", path)),
        };

        tracing::debug!("Opened store {:?} with {} entries", path, entries.len());

        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> std::io::Result<()> {
        let raw = serde_json::to_string_pretty(&*self.entries.borrow())?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // `mode` only applies on create; tighten files left by older runs
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(raw.as_bytes())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush().map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.entries.borrow_mut().remove(key).is_none() {
            return Ok(());
        }
        self.flush().map_err(|e| StorageError::Remove {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}
