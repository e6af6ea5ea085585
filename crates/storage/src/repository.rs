use async_trait::async_trait;
use drill_core::model::ItemId;
use drill_core::stats::{StatsBook, StatsRecord};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Storage key for the persisted seen set (JSON array of identifiers).
pub const SEEN_KEY: &str = "seen_images";
/// Storage key for the persisted stats aggregate (JSON object).
pub const STATS_KEY: &str = "practice_stats";

/// Errors surfaced by storage adapters.
///
/// Unparseable persisted JSON is deliberately NOT an error: the adapters fall
/// back to empty defaults and log a warning instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── STORE CONTRACTS ───────────────────────────────────────────────────────────
//

/// Persistence contract for the seen-identifier set.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Load the stored set; absent or corrupt data yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures, never for bad data.
    async fn load_seen(&self) -> Result<HashSet<ItemId>, StorageError>;

    /// Union the given identifiers into the stored set. Never removes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the union cannot be persisted.
    async fn save_seen(&self, ids: &[ItemId]) -> Result<(), StorageError>;

    /// Clear the stored set entirely (coverage-cycle rollover).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the clear cannot be persisted.
    async fn reset_seen(&self) -> Result<(), StorageError>;
}

/// Persistence contract for the accuracy statistics aggregate.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Load the stored book, migrating a legacy flat record in place.
    ///
    /// A legacy record (flat counters, no `overall` key) is lifted into the
    /// per-tier shape, persisted in its migrated form, and then returned.
    /// Absent or corrupt data yields a zeroed book.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures.
    async fn load_stats(&self) -> Result<StatsBook, StorageError>;

    /// Overwrite the stored aggregate with the given full book.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the book cannot be persisted.
    async fn save_stats(&self, book: &StatsBook) -> Result<(), StorageError>;
}

//
// ─── SHARED DECODING ───────────────────────────────────────────────────────────
//

/// Result of decoding the stats value, noting whether a legacy record was
/// lifted (and therefore needs persisting).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodedStats {
    pub book: StatsBook,
    pub migrated: bool,
}

/// Decode the raw seen-set value. `None` and corrupt values become empty.
pub(crate) fn decode_seen(raw: Option<&str>) -> HashSet<ItemId> {
    let Some(raw) = raw else {
        return HashSet::new();
    };
    match serde_json::from_str(raw) {
        Ok(ids) => ids,
        Err(err) => {
            tracing::warn!(%err, "ignoring corrupt seen set");
            HashSet::new()
        }
    }
}

/// Decode the raw stats value: current shape first, then the legacy flat
/// shape (migrated), then a zeroed default for anything else.
pub(crate) fn decode_stats(raw: Option<&str>) -> DecodedStats {
    let Some(raw) = raw else {
        return DecodedStats {
            book: StatsBook::default(),
            migrated: false,
        };
    };
    if let Ok(book) = serde_json::from_str::<StatsBook>(raw) {
        return DecodedStats {
            book,
            migrated: false,
        };
    }
    match serde_json::from_str::<StatsRecord>(raw) {
        Ok(legacy) => DecodedStats {
            book: StatsBook::from_legacy(legacy),
            migrated: true,
        },
        Err(err) => {
            tracing::warn!(%err, "ignoring corrupt stats record");
            DecodedStats {
                book: StatsBook::default(),
                migrated: false,
            }
        }
    }
}

pub(crate) fn encode_seen(ids: &HashSet<ItemId>) -> Result<String, StorageError> {
    // Stable order keeps the stored array diff-friendly.
    let mut sorted: Vec<&ItemId> = ids.iter().collect();
    sorted.sort();
    serde_json::to_string(&sorted).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn encode_stats(book: &StatsBook) -> Result<String, StorageError> {
    serde_json::to_string(book).map_err(|e| StorageError::Serialization(e.to_string()))
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

/// Simple in-memory backend for testing and prototyping.
///
/// Holds the same raw JSON strings the SQLite backend stores, so both go
/// through the identical decode/migrate path.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }

    /// Plant a raw value under a key, bypassing encoding. Test hook for
    /// exercising the corrupt/legacy decode paths.
    pub fn put_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.put(key, value.to_string())
    }

    /// Raw stored value under a key, if any. Test hook.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store is poisoned.
    pub fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.get(key)
    }
}

#[async_trait]
impl SeenStore for InMemoryStore {
    async fn load_seen(&self) -> Result<HashSet<ItemId>, StorageError> {
        Ok(decode_seen(self.get(SEEN_KEY)?.as_deref()))
    }

    async fn save_seen(&self, ids: &[ItemId]) -> Result<(), StorageError> {
        let mut stored = decode_seen(self.get(SEEN_KEY)?.as_deref());
        stored.extend(ids.iter().cloned());
        self.put(SEEN_KEY, encode_seen(&stored)?)
    }

    async fn reset_seen(&self) -> Result<(), StorageError> {
        self.delete(SEEN_KEY)
    }
}

#[async_trait]
impl StatsStore for InMemoryStore {
    async fn load_stats(&self) -> Result<StatsBook, StorageError> {
        let decoded = decode_stats(self.get(STATS_KEY)?.as_deref());
        if decoded.migrated {
            tracing::info!("migrated legacy stats record to per-tier shape");
            self.put(STATS_KEY, encode_stats(&decoded.book)?)?;
        }
        Ok(decoded.book)
    }

    async fn save_stats(&self, book: &StatsBook) -> Result<(), StorageError> {
        self.put(STATS_KEY, encode_stats(book)?)
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates both stores behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub seen: Arc<dyn SeenStore>,
    pub stats: Arc<dyn StatsStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        let seen: Arc<dyn SeenStore> = Arc::new(store.clone());
        let stats: Arc<dyn StatsStore> = Arc::new(store);
        Self { seen, stats }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
