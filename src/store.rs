//! Append-only record store mirrored to durable key-value storage.
//!
//! A store owns the in-memory collection for one entity type. Every append
//! re-serializes the whole collection under the store's key; queries only look
//! at memory.

use crate::error::{AppError, AppResult, StorageError};
use crate::storage::KeyValueStorage;
use chrono::{DateTime, Utc};
use leptos::logging::{error, log, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// An entity kept in a [`RecordStore`].
///
/// `Draft` is the caller-supplied part of the record; the store stamps the id
/// and creation time.
pub trait Record: Serialize + DeserializeOwned + Clone {
    type Draft;

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn assemble(id: String, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;
}

#[derive(Debug)]
pub struct RecordStore<T, S> {
    key: String,
    storage: S,
    records: Vec<T>,
    last_created_at: Option<DateTime<Utc>>,
    /// Off when the saved value could not be set aside; appends then stay in
    /// memory so that value is never replaced.
    write_through: bool,
}

impl<T: Record, S: KeyValueStorage> RecordStore<T, S> {
    /// Store with no records that will write to `key` on the first append.
    pub fn empty(storage: S, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            storage,
            records: Vec::new(),
            last_created_at: None,
            write_through: true,
        }
    }

    /// Empty store that never writes to `key`.
    pub fn detached(storage: S, key: impl Into<String>) -> Self {
        Self {
            write_through: false,
            ..Self::empty(storage, key)
        }
    }

    /// Hydrates the collection stored under `key`. A missing key is an empty
    /// collection, a value that does not parse is a [`AppError::CorruptCollection`].
    pub fn load(storage: S, key: impl Into<String>) -> AppResult<Self> {
        let key = key.into();
        let records: Vec<T> = match storage.get(&key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| AppError::CorruptCollection {
                key: key.clone(),
                source,
            })?,
            None => Vec::new(),
        };
        log!("[STORE] Loaded {} records from '{}'", records.len(), key);

        let last_created_at = records.iter().map(T::created_at).max();
        Ok(Self {
            key,
            storage,
            records,
            last_created_at,
            write_through: true,
        })
    }

    /// Appends a record built from `draft` and writes the collection through.
    ///
    /// A failed durable write is logged; the in-memory append still stands.
    pub fn append(&mut self, draft: T::Draft) -> T {
        let id = self.fresh_id();
        let created_at = self.next_timestamp();
        let record = T::assemble(id, created_at, draft);

        self.records.push(record.clone());
        self.last_created_at = Some(created_at);

        if !self.write_through {
            warn!("[STORE] '{}' is detached, keeping record {} in memory only", self.key, record.id());
        } else if let Err(err) = self.persist() {
            error!("[STORE] Write-through to '{}' failed: {}", self.key, err);
        }
        record
    }

    /// Serializes the full collection under the store's key.
    pub fn persist(&self) -> AppResult<()> {
        if !self.write_through {
            return Err(StorageError::Unavailable(format!("'{}' is detached from storage", self.key)).into());
        }
        let raw = serde_json::to_string(&self.records)?;
        self.storage.set(&self.key, &raw)?;
        Ok(())
    }

    pub fn query_by<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a T> + 'a
    where
        P: Fn(&T) -> bool + 'a,
    {
        self.records.iter().filter(move |record| predicate(*record))
    }

    /// Mean of `field` over the records matching `predicate`; `None` when
    /// nothing matches.
    pub fn mean_by<P, F>(&self, predicate: P, field: F) -> Option<f64>
    where
        P: Fn(&T) -> bool,
        F: Fn(&T) -> f64,
    {
        let (sum, count) = self
            .records
            .iter()
            .filter(|record| predicate(*record))
            .fold((0.0, 0usize), |(sum, count), record| (sum + field(record), count + 1));

        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_write_through(&self) -> bool {
        self.write_through
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    // Wall clocks can step backwards; creation times must not.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        }
    }
}

impl<T: Record, S: KeyValueStorage + Clone> RecordStore<T, S> {
    /// Startup variant of [`RecordStore::load`] that survives corrupt data.
    ///
    /// A corrupt value is copied to `<key>.corrupt` and the store starts empty.
    /// When that copy cannot be made the key is left alone and the store is
    /// [detached](RecordStore::detached). Storage read errors are returned.
    pub fn load_or_quarantine(storage: S, key: impl Into<String>) -> AppResult<Self> {
        let key = key.into();
        match Self::load(storage.clone(), key.clone()) {
            Err(AppError::CorruptCollection { key, source }) => {
                warn!("[STORE] Quarantining corrupt collection '{}': {}", key, source);
                let quarantine_key = format!("{key}.corrupt");
                let raw = match storage.get(&key)? {
                    Some(raw) => raw,
                    None => return Ok(Self::empty(storage, key)),
                };
                if let Err(err) = storage.set(&quarantine_key, &raw) {
                    error!("[STORE] Could not quarantine '{}', leaving it untouched: {}", key, err);
                    return Ok(Self::detached(storage, key));
                }
                // The copy is safe, so a leftover value may be overwritten later.
                if let Err(err) = storage.remove(&key) {
                    error!("[STORE] Could not clear '{}': {}", key, err);
                }
                Ok(Self::empty(storage, key))
            }
            other => other,
        }
    }
}

/// Presentation order: newest `createdAt` first.
pub fn newest_first<'a, T, I>(records: I) -> Vec<&'a T>
where
    T: Record + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut sorted: Vec<&T> = records.into_iter().collect();
    sorted.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde::Deserialize;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Note {
        id: String,
        owner_id: String,
        score: u8,
        created_at: DateTime<Utc>,
    }

    struct NoteDraft {
        owner_id: &'static str,
        score: u8,
    }

    impl Record for Note {
        type Draft = NoteDraft;

        fn id(&self) -> &str {
            &self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn assemble(id: String, created_at: DateTime<Utc>, draft: NoteDraft) -> Self {
            Note {
                id,
                owner_id: draft.owner_id.to_string(),
                score: draft.score,
                created_at,
            }
        }
    }

    struct ReadOnlyStorage;

    impl KeyValueStorage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteRejected {
                key: key.to_string(),
                reason: "quota exceeded".into(),
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    /// Memory storage with switchable faults.
    #[derive(Clone, Default)]
    struct FaultyStorage {
        inner: MemoryStorage,
        reads: Arc<AtomicUsize>,
        /// Zero-based index of the read that fails.
        fail_read_at: Option<usize>,
        reject_set_suffix: Option<&'static str>,
        reject_remove: bool,
    }

    impl KeyValueStorage for FaultyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            let read = self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_read_at == Some(read) {
                return Err(StorageError::Unavailable("database is locked".into()));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.reject_set_suffix.is_some_and(|suffix| key.ends_with(suffix)) {
                return Err(StorageError::WriteRejected {
                    key: key.to_string(),
                    reason: "quota exceeded".into(),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            if self.reject_remove {
                return Err(StorageError::Unavailable("remove refused".into()));
            }
            self.inner.remove(key)
        }
    }

    fn seeded_notes(storage: &MemoryStorage, count: u8) -> String {
        let mut store = RecordStore::<Note, _>::empty(storage.clone(), "notes");
        for score in 0..count {
            store.append(draft("owner", score));
        }
        storage.get("notes").unwrap().unwrap()
    }

    fn draft(owner_id: &'static str, score: u8) -> NoteDraft {
        NoteDraft { owner_id, score }
    }

    #[test]
    fn missing_key_loads_empty() {
        let store: RecordStore<Note, _> = RecordStore::load(MemoryStorage::new(), "notes").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn append_assigns_unique_ids_and_ordered_timestamps() {
        log!("[TEST] Starting append_assigns_unique_ids_and_ordered_timestamps");
        let mut store = RecordStore::<Note, _>::empty(MemoryStorage::new(), "notes");

        let notes: Vec<Note> = (0..50).map(|i| store.append(draft("owner", i))).collect();

        let ids: HashSet<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), notes.len());
        assert!(notes.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let mut store = RecordStore::<Note, _>::empty(MemoryStorage::new(), "notes");
        let future = Utc::now() + chrono::Duration::hours(1);
        store.last_created_at = Some(future);

        let note = store.append(draft("owner", 1));
        assert_eq!(note.created_at, future);
    }

    #[test]
    fn collection_round_trips_through_storage() {
        log!("[TEST] Starting collection_round_trips_through_storage");
        let storage = MemoryStorage::new();
        let mut store = RecordStore::<Note, _>::empty(storage.clone(), "notes");
        store.append(draft("a", 1));
        store.append(draft("b", 2));
        store.append(draft("a", 3));

        let reloaded: RecordStore<Note, _> = RecordStore::load(storage, "notes").unwrap();
        assert_eq!(reloaded.records(), store.records());
        log!("[TEST] Round trip - PASSED");
    }

    #[test]
    fn every_append_rewrites_the_whole_collection() {
        let storage = MemoryStorage::new();
        let mut store = RecordStore::<Note, _>::empty(storage.clone(), "notes");
        store.append(draft("a", 1));
        store.append(draft("b", 2));

        let raw = storage.get("notes").unwrap().unwrap();
        let persisted: Vec<Note> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.len(), 2);
        assert!(raw.contains("\"ownerId\""));
        assert!(raw.contains("\"createdAt\""));
    }

    #[test]
    fn corrupt_collection_is_a_typed_error() {
        let storage = MemoryStorage::new();
        storage.set("notes", "{not json").unwrap();

        let result = RecordStore::<Note, _>::load(storage, "notes");
        assert!(matches!(result, Err(AppError::CorruptCollection { ref key, .. }) if key == "notes"));
    }

    #[test]
    fn corrupt_collection_is_quarantined_on_startup() {
        let storage = MemoryStorage::new();
        storage.set("notes", "{not json").unwrap();

        let store = RecordStore::<Note, _>::load_or_quarantine(storage.clone(), "notes").unwrap();
        assert!(store.is_empty());
        assert!(store.is_write_through());
        assert_eq!(storage.get("notes.corrupt").unwrap().as_deref(), Some("{not json"));
        assert_eq!(storage.get("notes").unwrap(), None);
    }

    #[test]
    fn startup_read_error_is_returned_and_data_survives() {
        log!("[TEST] Starting startup_read_error_is_returned_and_data_survives");
        let storage = FaultyStorage {
            fail_read_at: Some(0),
            ..Default::default()
        };
        let saved = seeded_notes(&storage.inner, 5);

        let result = RecordStore::<Note, _>::load_or_quarantine(storage.clone(), "notes");
        assert!(matches!(result, Err(AppError::Storage(StorageError::Unavailable(_)))));
        assert_eq!(storage.inner.get("notes").unwrap(), Some(saved));

        // Once the backend recovers, nothing was lost.
        let mut store = RecordStore::<Note, _>::load_or_quarantine(storage.clone(), "notes").unwrap();
        store.append(draft("owner", 9));
        let persisted: Vec<Note> = serde_json::from_str(&storage.inner.get("notes").unwrap().unwrap()).unwrap();
        assert_eq!(persisted.len(), 6);
    }

    #[test]
    fn failed_quarantine_copy_detaches_the_store() {
        let storage = FaultyStorage {
            reject_set_suffix: Some(".corrupt"),
            ..Default::default()
        };
        storage.inner.set("notes", "{not json").unwrap();

        let mut store = RecordStore::<Note, _>::load_or_quarantine(storage.clone(), "notes").unwrap();
        assert!(!store.is_write_through());

        let note = store.append(draft("a", 2));
        assert_eq!(store.get(&note.id), Some(&note));
        assert!(store.persist().is_err());
        assert_eq!(storage.inner.get("notes").unwrap().as_deref(), Some("{not json"));
        assert_eq!(storage.inner.get("notes.corrupt").unwrap(), None);
    }

    #[test]
    fn failed_clear_after_quarantine_keeps_write_through() {
        let storage = FaultyStorage {
            reject_remove: true,
            ..Default::default()
        };
        storage.inner.set("notes", "{not json").unwrap();

        let mut store = RecordStore::<Note, _>::load_or_quarantine(storage.clone(), "notes").unwrap();
        assert!(store.is_empty());
        assert!(store.is_write_through());
        assert_eq!(storage.inner.get("notes.corrupt").unwrap().as_deref(), Some("{not json"));

        store.append(draft("a", 3));
        let persisted: Vec<Note> = serde_json::from_str(&storage.inner.get("notes").unwrap().unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);
    }

    #[test]
    fn failed_reread_during_quarantine_is_returned() {
        // The load sees the corrupt value; the quarantine re-read fails.
        let storage = FaultyStorage {
            fail_read_at: Some(1),
            ..Default::default()
        };
        storage.inner.set("notes", "{not json").unwrap();

        let result = RecordStore::<Note, _>::load_or_quarantine(storage.clone(), "notes");
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(storage.inner.get("notes").unwrap().as_deref(), Some("{not json"));
        assert_eq!(storage.inner.get("notes.corrupt").unwrap(), None);
    }

    #[test]
    fn failed_write_keeps_the_in_memory_append() {
        let mut store = RecordStore::<Note, _>::empty(ReadOnlyStorage, "notes");
        let note = store.append(draft("a", 4));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&note.id), Some(&note));
        assert!(store.persist().is_err());
    }

    #[test]
    fn query_and_mean_only_see_matching_records() {
        let mut store = RecordStore::<Note, _>::empty(MemoryStorage::new(), "notes");
        store.append(draft("a", 5));
        store.append(draft("b", 1));
        store.append(draft("a", 3));

        assert_eq!(store.query_by(|n| n.owner_id == "a").count(), 2);
        assert_eq!(store.mean_by(|n| n.owner_id == "a", |n| n.score as f64), Some(4.0));
        assert_eq!(store.mean_by(|n| n.owner_id == "zzz", |n| n.score as f64), None);
    }

    #[test]
    fn newest_first_sorts_descending() {
        let mut store = RecordStore::<Note, _>::empty(MemoryStorage::new(), "notes");
        let first = store.append(draft("a", 1));
        store.last_created_at = Some(first.created_at + chrono::Duration::seconds(5));
        let second = store.append(draft("a", 2));

        let sorted = newest_first(store.records());
        assert_eq!(sorted[0].id, second.id);
        assert_eq!(sorted[1].id, first.id);
    }
}
