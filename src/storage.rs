//! Durable key-value backends that record stores write through to.
//!
//! Every backend stores plain strings under string keys, mirroring the
//! browser's `localStorage` contract. Handles are cheap to clone and clones
//! share the same underlying data.

use crate::error::StorageError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Key holding the review collection.
pub const REVIEWS_KEY: &str = "reviews";
/// Key holding the plagiarism scan results.
pub const PLAGIARISM_RESULTS_KEY: &str = "plagiarismResults";
/// Key holding violation reports.
pub const REPORTS_KEY: &str = "reports";
/// Key holding the cached session of the current viewer.
pub const SESSION_KEY: &str = "user";
/// Key holding the user directory. Read-only from this crate's point of view.
pub const USERS_KEY: &str = "users";

pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage. Used for tests and for server-side rendering, where
/// no browser storage exists.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::KeyValueStorage;
    use crate::error::StorageError;
    use leptos::logging::warn;

    /// `window.localStorage`. When the browser refuses access (private mode,
    /// sandboxed iframe) reads behave as empty and writes fail.
    #[derive(Debug, Clone)]
    pub struct BrowserStorage {
        storage: Option<web_sys::Storage>,
    }

    impl BrowserStorage {
        pub fn new() -> Self {
            let storage = match gloo_utils::window().local_storage() {
                Ok(Some(storage)) => Some(storage),
                Ok(None) => {
                    warn!("[STORAGE] localStorage is not available in this window");
                    None
                }
                Err(err) => {
                    warn!("[STORAGE] localStorage access denied: {:?}", err);
                    None
                }
            };
            Self { storage }
        }

        fn storage(&self) -> Result<&web_sys::Storage, StorageError> {
            self.storage
                .as_ref()
                .ok_or_else(|| StorageError::Unavailable("localStorage is not available".into()))
        }
    }

    impl Default for BrowserStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    impl KeyValueStorage for BrowserStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            match &self.storage {
                Some(storage) => storage
                    .get_item(key)
                    .map_err(|err| StorageError::Unavailable(format!("{:?}", err))),
                None => Ok(None),
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.storage()?
                .set_item(key, value)
                .map_err(|err| StorageError::WriteRejected {
                    key: key.to_string(),
                    reason: format!("{:?}", err),
                })
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.storage()?
                .remove_item(key)
                .map_err(|err| StorageError::WriteRejected {
                    key: key.to_string(),
                    reason: format!("{:?}", err),
                })
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;

/// Storage used by the client-side app shell.
#[cfg(target_arch = "wasm32")]
pub type ClientStorage = BrowserStorage;
#[cfg(not(target_arch = "wasm32"))]
pub type ClientStorage = MemoryStorage;

pub fn client_storage() -> ClientStorage {
    ClientStorage::default()
}
