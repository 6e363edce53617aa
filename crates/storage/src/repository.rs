use async_trait::async_trait;
use codeblue_core::model::{ProgressSnapshot, TrialId, User};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key holding the signed-in user.
pub const USER_KEY: &str = "userData";

/// Key holding a trial's timeline progress.
#[must_use]
pub fn progress_key(trial_id: &TrialId) -> String {
    format!("timeline_progress:{trial_id}")
}

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Device-local string store, the shape every backend provides.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
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
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Repository contract for per-trial timeline progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the saved snapshot for a trial, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for an unreadable record, or
    /// other storage errors.
    async fn load_progress(
        &self,
        trial_id: &TrialId,
    ) -> Result<Option<ProgressSnapshot>, StorageError>;

    /// Persist the snapshot for a trial.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save_progress(
        &self,
        trial_id: &TrialId,
        snapshot: &ProgressSnapshot,
    ) -> Result<(), StorageError>;
}

/// Repository contract for the signed-in user record.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be read or decoded.
    async fn load_user(&self) -> Result<Option<User>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_user(&self, user: &User) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be removed.
    async fn clear_user(&self) -> Result<(), StorageError>;
}

fn encode<T: Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|err| StorageError::Serialization(err.to_string()))
}

fn decode<T: DeserializeOwned>(raw: Option<String>) -> Result<Option<T>, StorageError> {
    raw.map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(|err| StorageError::Serialization(err.to_string()))
}

#[async_trait]
impl<S> ProgressRepository for S
where
    S: KeyValueStore + ?Sized,
{
    async fn load_progress(
        &self,
        trial_id: &TrialId,
    ) -> Result<Option<ProgressSnapshot>, StorageError> {
        decode(self.get(&progress_key(trial_id)).await?)
    }

    async fn save_progress(
        &self,
        trial_id: &TrialId,
        snapshot: &ProgressSnapshot,
    ) -> Result<(), StorageError> {
        self.set(&progress_key(trial_id), &encode(snapshot)?).await
    }
}

#[async_trait]
impl<S> SessionRepository for S
where
    S: KeyValueStore + ?Sized,
{
    async fn load_user(&self) -> Result<Option<User>, StorageError> {
        decode(self.get(USER_KEY).await?)
    }

    async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.set(USER_KEY, &encode(user)?).await
    }

    async fn clear_user(&self) -> Result<(), StorageError> {
        self.remove(USER_KEY).await
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub session: Arc<dyn SessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_store(InMemoryRepository::new())
    }

    /// Wires both repositories to one key-value backend.
    #[must_use]
    pub fn from_store<S>(store: S) -> Self
    where
        S: KeyValueStore + Clone + 'static,
    {
        let progress: Arc<dyn ProgressRepository> = Arc::new(store.clone());
        let session: Arc<dyn SessionRepository> = Arc::new(store);
        Self { progress, session }
    }
}
