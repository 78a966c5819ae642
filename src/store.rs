//! # Buoy Record Store
//!
//! This module defines the record store that the rest of the service talks
//! to: a small create/read/update/delete/list surface over buoy records plus
//! the append operation the wave feed depends on, all keyed by a string
//! identifier.
//!
//! ## Trait Boundary
//!
//! [`BuoyStore`] is the seam between the monitors and whatever actually
//! holds the records. Monitors hold `Arc<dyn BuoyStore>`, so tests swap in
//! recording or failure-injecting doubles without touching the loop code.
//!
//! ## Append Semantics
//!
//! `append_wave_sample` must be atomic: either the sample becomes visible at
//! the end of the buoy's wave history or the call fails with a
//! [`StoreError`] and the history is untouched. [`MemoryStore`] pushes in
//! place while holding its write lock, so concurrent appends from multiple
//! monitors serialize instead of overwriting each other. Reading the whole
//! history, appending in memory, and writing the array back is not an
//! acceptable implementation of this contract.

use crate::{BuoyRecord, WaveSample};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors surfaced by store operations.
///
/// Monitors recover from every variant locally: a failed append is logged
/// and superseded by the next scheduled attempt.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The identifier does not resolve to an existing record
    #[error("buoy not found: {0}")]
    NotFound(String),

    /// The identifier is not a valid record key
    #[error("malformed buoy id: {0:?}")]
    MalformedId(String),

    /// A record with this identifier already exists
    #[error("buoy already exists: {0}")]
    AlreadyExists(String),

    /// The store could not be reached; the condition may be transient
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Record store surface for buoy telemetry.
///
/// All operations are keyed by the record identifier. Implementations must
/// tolerate concurrent callers: multiple monitor loops and client calls may
/// touch the same record at once, and `append_wave_sample` in particular
/// must be atomic with respect to other appends.
#[async_trait]
pub trait BuoyStore: Send + Sync {
    /// Insert a new record under its own `id`.
    async fn create_buoy(&self, record: BuoyRecord) -> Result<(), StoreError>;

    /// Fetch a snapshot of the record with the given id.
    async fn get_buoy(&self, id: &str) -> Result<BuoyRecord, StoreError>;

    /// Replace the fields of an existing record and return the result.
    ///
    /// Mirrors the service's edit operation: every field, including the wave
    /// history, comes from the caller. The stored id wins over whatever id
    /// the replacement carries.
    async fn update_buoy(&self, id: &str, record: BuoyRecord) -> Result<BuoyRecord, StoreError>;

    /// Remove the record with the given id.
    async fn delete_buoy(&self, id: &str) -> Result<(), StoreError>;

    /// Snapshot all records.
    async fn list_buoys(&self) -> Result<Vec<BuoyRecord>, StoreError>;

    /// Atomically append one sample to the named buoy's wave history.
    async fn append_wave_sample(&self, id: &str, sample: WaveSample) -> Result<(), StoreError>;
}

/// Check that an identifier is usable as a record key.
///
/// Keys are opaque: non-empty ASCII alphanumerics plus `-` and `_`.
fn validate_id(id: &str) -> Result<(), StoreError> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(StoreError::MalformedId(id.to_string()));
    }
    Ok(())
}

/// In-process store backed by a `HashMap` behind an async `RwLock`.
///
/// Suitable for the service's current single-process deployment and for
/// tests. Every mutation happens under the write lock, which is what makes
/// the append path atomic.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, BuoyRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            records: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl BuoyStore for MemoryStore {
    async fn create_buoy(&self, record: BuoyRecord) -> Result<(), StoreError> {
        validate_id(&record.id)?;
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id));
        }
        records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get_buoy(&self, id: &str) -> Result<BuoyRecord, StoreError> {
        validate_id(id)?;
        let records = self.records.read().await;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update_buoy(&self, id: &str, mut record: BuoyRecord) -> Result<BuoyRecord, StoreError> {
        validate_id(id)?;
        let mut records = self.records.write().await;
        let existing = records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.id = existing.id.clone();
        *existing = record;
        Ok(existing.clone())
    }

    async fn delete_buoy(&self, id: &str) -> Result<(), StoreError> {
        validate_id(id)?;
        let mut records = self.records.write().await;
        records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_buoys(&self) -> Result<Vec<BuoyRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn append_wave_sample(&self, id: &str, sample: WaveSample) -> Result<(), StoreError> {
        validate_id(id)?;
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        // In-place push under the write lock: concurrent appends serialize
        // and none are lost.
        record.waves.push(sample);
        Ok(())
    }
}
