use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("storage access failed: {0}")]
    Access(String),
    #[error("stored join record is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Minimal key/value persistence the page needs.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// `window.localStorage`.
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or(StoreError::Unavailable)?;
        let storage = window
            .local_storage()
            .map_err(|e| StoreError::Access(format!("{:?}", e)))?
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl SessionStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Access(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Access(format!("{:?}", e)))
    }
}

/// In-memory store, used when localStorage is blocked and in tests.
#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Marker written once the visitor has completed the signup form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRecord {
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

impl JoinRecord {
    pub fn new(name: impl Into<String>, joined_at: DateTime<Utc>) -> Self {
        Self { name: name.into(), joined_at }
    }

    /// Presence of the key alone gates the signup prompt.
    pub fn exists(store: &dyn SessionStore) -> Result<bool, StoreError> {
        Ok(store.get(config::JOIN_RECORD_KEY)?.is_some())
    }

    pub fn load(store: &dyn SessionStore) -> Result<Option<Self>, StoreError> {
        match store.get(config::JOIN_RECORD_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save(&self, store: &dyn SessionStore) -> Result<(), StoreError> {
        let raw = serde_json::to_string(self)?;
        store.set(config::JOIN_RECORD_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_serializes_with_camel_case_iso_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let raw = serde_json::to_string(&JoinRecord::new("Asha", at)).unwrap();
        assert_eq!(raw, r#"{"name":"Asha","joinedAt":"2024-03-01T12:30:00Z"}"#);
    }

    #[test]
    fn save_then_load_through_store() {
        let store = MemoryStore::new();
        assert!(!JoinRecord::exists(&store).unwrap());
        assert_eq!(JoinRecord::load(&store).unwrap(), None);

        let record = JoinRecord::new("Ravi", Utc::now());
        record.save(&store).unwrap();

        assert!(JoinRecord::exists(&store).unwrap());
        assert_eq!(JoinRecord::load(&store).unwrap(), Some(record));
    }

    #[test]
    fn malformed_record_still_counts_as_present() {
        let store = MemoryStore::new();
        store.set(config::JOIN_RECORD_KEY, "not json").unwrap();
        assert!(JoinRecord::exists(&store).unwrap());
        assert!(matches!(JoinRecord::load(&store), Err(StoreError::Malformed(_))));
    }
}
