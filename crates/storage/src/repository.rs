use async_trait::async_trait;
use fasttrack_core::model::ProgressState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Slot holding the serialized progress snapshot.
pub const PROGRESS_KEY: &str = "ft_progress";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable string-to-string slots, the storage model of the planner.
#[async_trait]
pub trait KeyValueRepository: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Progress snapshot persistence on top of a key-value slot.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the persisted snapshot.
    ///
    /// Returns `Ok(None)` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for unreadable snapshots and other
    /// storage errors for backend failures.
    async fn load_progress(&self) -> Result<Option<ProgressState>, StorageError>;

    /// Persist the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or writing fails.
    async fn save_progress(&self, state: &ProgressState) -> Result<(), StorageError>;
}

#[async_trait]
impl<T> ProgressRepository for T
where
    T: KeyValueRepository,
{
    async fn load_progress(&self) -> Result<Option<ProgressState>, StorageError> {
        let Some(raw) = self.get(PROGRESS_KEY).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_progress(&self, state: &ProgressState) -> Result<(), StorageError> {
        let raw = serde_json::to_string(state)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.put(PROGRESS_KEY, &raw).await
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueRepository for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_backend(InMemoryRepository::new())
    }

    pub(crate) fn from_backend<B>(backend: B) -> Self
    where
        B: KeyValueRepository + 'static,
    {
        Self {
            progress: Arc::new(backend),
        }
    }
}
