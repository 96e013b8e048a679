use crate::error::StorageError;
use crate::models::User;
use crate::storage::{read_json, write_json, KeyValueStore, AVATAR_KEY, TOKEN_KEY, USER_KEY};

/// Persisted session: the bearer token and the cached user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Writes token and user. No rollback if the second write fails.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        store.set_item(TOKEN_KEY, &self.token)?;
        write_json(store, USER_KEY, &self.user)
    }
}

pub fn load_token<S: KeyValueStore + ?Sized>(store: &S) -> Option<String> {
    store.get_item(TOKEN_KEY).filter(|token| !token.is_empty())
}

/// The cached user. Its presence alone decides whether the UI is logged in.
pub fn current_user<S: KeyValueStore + ?Sized>(store: &S) -> Option<User> {
    read_json(store, USER_KEY)
}

pub fn is_authenticated<S: KeyValueStore + ?Sized>(store: &S) -> bool {
    current_user(store).is_some()
}

pub fn save_user<S: KeyValueStore + ?Sized>(store: &S, user: &User) -> Result<(), StorageError> {
    write_json(store, USER_KEY, user)
}

/// Logout clears token and user only; favorites and avatar stay.
pub fn clear<S: KeyValueStore + ?Sized>(store: &S) -> Result<(), StorageError> {
    store.remove_item(TOKEN_KEY)?;
    store.remove_item(USER_KEY)
}

pub fn load_avatar<S: KeyValueStore + ?Sized>(store: &S) -> Option<String> {
    store.get_item(AVATAR_KEY).filter(|url| !url.is_empty())
}

pub fn save_avatar<S: KeyValueStore + ?Sized>(store: &S, data_url: &str) -> Result<(), StorageError> {
    store.set_item(AVATAR_KEY, data_url)
}
