//! In-memory record store
//!
//! Keeps records in fixed slots addressed by record id and tracks a high-water
//! mark the way an append-only store file would. Each write that lands beyond
//! the mark counts as an *extension*.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::access::{RecordLoader, RecordStore};
use crate::record::Record;
use crate::status::{AccessError, Result};

struct StoreInner<R> {
    records: BTreeMap<u64, R>,
    /// Highest id ever written
    highest: Option<u64>,
    extensions: u64,
    writes: u64,
}

/// In-memory fixed-slot record store.
///
/// Clones share the same underlying records, so one handle can be given to
/// the access cache as its store while another backs a loader or is kept for
/// inspection.
pub struct MemoryRecordStore<R> {
    inner: Arc<RwLock<StoreInner<R>>>,
}

impl<R> Clone for MemoryRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> Default for MemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> MemoryRecordStore<R> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                records: BTreeMap::new(),
                highest: None,
                extensions: 0,
                writes: 0,
            })),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Check if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }

    /// One past the highest id written so far.
    ///
    /// Saturates at `u64::MAX` once that id has been written.
    pub fn high_id(&self) -> u64 {
        self.inner
            .read()
            .highest
            .map_or(0, |id| id.saturating_add(1))
    }

    /// Number of writes that grew the store
    pub fn extensions(&self) -> u64 {
        self.inner.read().extensions
    }

    /// Total number of `update_record` calls
    pub fn writes(&self) -> u64 {
        self.inner.read().writes
    }
}

impl<R: Clone> MemoryRecordStore<R> {
    /// Read a copy of the record in slot `id`
    pub fn read(&self, id: u64) -> Option<R> {
        self.inner.read().records.get(&id).cloned()
    }
}

impl<R: Record + Clone> MemoryRecordStore<R> {
    /// Seed the store with records, bypassing write accounting.
    pub fn preload(&self, records: impl IntoIterator<Item = R>) {
        let mut inner = self.inner.write();
        for record in records {
            let id = record.id();
            inner.highest = Some(inner.highest.map_or(id, |highest| highest.max(id)));
            inner.records.insert(id, record);
        }
    }
}

impl<R: Record + Clone> RecordStore<R> for MemoryRecordStore<R> {
    fn update_record(&mut self, record: &R) -> Result<()> {
        let id = record.id();
        let mut inner = self.inner.write();
        inner.writes += 1;
        if inner.highest.map_or(true, |highest| id > highest) {
            inner.highest = Some(id);
            inner.extensions += 1;
        }
        inner.records.insert(id, record.clone());
        Ok(())
    }
}

/// Loader backed by a [`MemoryRecordStore`].
///
/// Existing records are cloned out of the store; new ones are fabricated by
/// the factory. In-memory records are always heavy.
pub struct MemoryRecordLoader<R, F> {
    store: MemoryRecordStore<R>,
    factory: F,
}

impl<R, F> MemoryRecordLoader<R, F>
where
    F: Fn(u64) -> R,
{
    /// Create a loader over `store` that builds unused records with `factory`
    pub fn new(store: MemoryRecordStore<R>, factory: F) -> Self {
        Self { store, factory }
    }

    /// Get the backing store
    pub fn store(&self) -> &MemoryRecordStore<R> {
        &self.store
    }
}

impl<R, F, A> RecordLoader<u64, R, A> for MemoryRecordLoader<R, F>
where
    R: Clone,
    F: Fn(u64) -> R,
{
    fn load(&self, key: &u64, _additional: &A) -> Result<R> {
        self.store
            .read(*key)
            .ok_or(AccessError::NotFound { id: *key })
    }

    fn new_unused(&self, key: &u64, _additional: &A) -> Result<R> {
        Ok((self.factory)(*key))
    }

    fn ensure_heavy(&self, _record: &mut R) -> Result<()> {
        Ok(())
    }
}
