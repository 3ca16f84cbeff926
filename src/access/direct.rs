//! Direct record access
//!
//! [`DirectRecordAccess`] batches record reads and writes for bulk loading.
//! Each key is loaded at most once per batch, changes accumulate in memory,
//! and nothing reaches the store until [`commit`](DirectRecordAccess::commit)
//! (or [`close`](DirectRecordAccess::close)) is called.
//!
//! # Example
//!
//! ```rust
//! use oxirecord::access::DirectRecordAccess;
//! use oxirecord::store::{MemoryRecordLoader, MemoryRecordStore};
//! use oxirecord::Record;
//!
//! #[derive(Debug, Clone)]
//! struct Node { id: u64, next: u64 }
//!
//! impl Record for Node {
//!     fn id(&self) -> u64 { self.id }
//! }
//!
//! let store = MemoryRecordStore::new();
//! let loader = MemoryRecordLoader::new(store.clone(), |id| Node { id, next: 0 });
//! let mut access: DirectRecordAccess<u64, Node, (), _, _> =
//!     DirectRecordAccess::new(loader, store.clone());
//!
//! access.create(1, ())?.for_changing_linkage().next = 2;
//! access.create(2, ())?;
//! assert_eq!(access.change_size(), 2);
//!
//! access.commit()?;
//! assert_eq!(store.read(1).map(|n| n.next), Some(2));
//! # Ok::<(), oxirecord::AccessError>(())
//! ```

use std::fmt;
use std::time::Instant;

use crate::access::batch::BatchIndex;
use crate::access::config::AccessConfig;
use crate::access::pool::ProxyPool;
use crate::access::proxy::{ChangeCounter, ChangeView, ProxyHandle, RecordProxy};
use crate::access::stats::AccessStats;
use crate::access::traits::{RecordLoader, RecordStore};
use crate::record::Record;
use crate::status::{AccessError, Result};

/// Deferred write-back cache over a record store.
///
/// The cache has a single owner and is not meant to be shared across threads.
/// Proxies returned by lookups borrow the cache mutably, so at most one proxy
/// is live at a time outside of [`changes_mut`](Self::changes_mut).
pub struct DirectRecordAccess<K, R, A, L, S> {
    loader: L,
    store: S,
    batch: BatchIndex<K, R, A>,
    pool: ProxyPool<K, R, A>,
    changes: ChangeCounter,
    next_generation: u64,
    stats: AccessStats,
    config: AccessConfig,
}

impl<K, R, A, L, S> DirectRecordAccess<K, R, A, L, S>
where
    K: Ord + Clone + fmt::Debug,
    R: Record,
    L: RecordLoader<K, R, A>,
    S: RecordStore<R>,
{
    /// Create a cache with the default configuration
    pub fn new(loader: L, store: S) -> Self {
        Self::with_config(loader, store, AccessConfig::default())
    }

    /// Create a cache with an explicit configuration
    pub fn with_config(loader: L, store: S, config: AccessConfig) -> Self {
        let pool = ProxyPool::new(config.pool_capacity, config.prefill());
        Self {
            loader,
            store,
            batch: BatchIndex::new(),
            pool,
            changes: ChangeCounter::new(),
            next_generation: 1,
            stats: AccessStats::new(),
            config,
        }
    }

    /// Get the proxy for `key`, loading the record on first access.
    ///
    /// A key already in the batch is returned as-is without consulting the
    /// loader. Missing records are reported by the loader, not by the cache.
    pub fn get_or_load(&mut self, key: K, additional: A) -> Result<RecordProxy<'_, K, R, A, L>> {
        if self.batch.contains(&key) {
            self.count(AccessStats::record_hit);
            return self.bound_proxy(&key).ok_or(AccessError::UnboundProxy);
        }

        self.count(AccessStats::record_miss);
        let record = self.loader.load(&key, &additional)?;
        self.put_in_batch(key, record, additional, false)
    }

    /// Create a new record for `key`; the binding starts out dirty.
    ///
    /// Fails with [`AccessError::DuplicateKey`] if the key is already in the
    /// batch, without calling the loader.
    pub fn create(&mut self, key: K, additional: A) -> Result<RecordProxy<'_, K, R, A, L>> {
        if self.batch.contains(&key) {
            return Err(AccessError::DuplicateKey(format!("{key:?}")));
        }

        let record = self.loader.new_unused(&key, &additional)?;
        self.count(AccessStats::record_create);
        self.put_in_batch(key, record, additional, true)
    }

    /// Get the proxy for `key` if it is already in the batch.
    pub fn get_if_loaded(&mut self, key: &K) -> Option<RecordProxy<'_, K, R, A, L>> {
        self.bound_proxy(key)
    }

    /// Read-only view of `key` if it is already in the batch.
    pub fn peek(&self, key: &K) -> Option<ChangeView<'_, K, R, A>> {
        self.batch.get(key).and_then(ChangeView::from_slot)
    }

    /// Re-resolve a handle obtained earlier in this batch.
    pub fn proxy(&mut self, handle: &ProxyHandle<K>) -> Result<RecordProxy<'_, K, R, A, L>> {
        let stats = self.config.track_stats.then_some(&self.stats);
        let slot = self
            .batch
            .get_mut(handle.key())
            .ok_or(AccessError::StaleHandle)?;
        if slot.generation() != handle.generation() {
            return Err(AccessError::StaleHandle);
        }
        RecordProxy::from_slot(slot, &self.loader, &self.changes, stats)
            .ok_or(AccessError::StaleHandle)
    }

    /// Replacing a record wholesale is not supported by this cache.
    pub fn set_to(&mut self, _key: K, _record: R, _additional: A) -> Result<()> {
        Err(AccessError::Unsupported("set_to"))
    }

    /// Number of dirty records waiting for commit
    pub fn change_size(&self) -> usize {
        self.changes.value()
    }

    /// Every bound record in commit order (descending key).
    ///
    /// The iterator is lazy; calling `changes` again after further lookups
    /// reflects the batch as it is then.
    pub fn changes(&self) -> impl Iterator<Item = ChangeView<'_, K, R, A>> + '_ {
        self.batch.iter().filter_map(ChangeView::from_slot)
    }

    /// Every bound record in commit order, as mutable proxies.
    pub fn changes_mut(&mut self) -> impl Iterator<Item = RecordProxy<'_, K, R, A, L>> + '_ {
        let stats = self.config.track_stats.then_some(&self.stats);
        let loader = &self.loader;
        let changes = &self.changes;
        self.batch
            .iter_mut()
            .filter_map(move |slot| RecordProxy::from_slot(slot, loader, changes, stats))
    }

    /// Write every dirty record to the store and start a new batch.
    ///
    /// Records are written in descending key order. If nothing is dirty this
    /// is a no-op: the store is not touched and the batch is kept. If the store
    /// fails, the error is returned and the batch is left exactly as it was
    /// (including records already written), so a later commit retries the
    /// whole batch.
    pub fn commit(&mut self) -> Result<()> {
        let dirty = self.changes.value();
        if dirty == 0 {
            self.count(AccessStats::record_empty_commit);
            return Ok(());
        }

        let start = Instant::now();
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(dirty, batch = self.batch.len(), "commit start");
        }

        let mut written = 0u64;
        for slot in self.batch.iter() {
            let Some(binding) = slot.binding() else {
                continue;
            };
            if !binding.changed {
                continue;
            }
            if let Err(err) = self.store.update_record(&binding.record) {
                if self.config.track_stats {
                    self.stats.record_failed_commit();
                }
                if tracing::enabled!(tracing::Level::WARN) {
                    tracing::warn!(
                        key = ?binding.key,
                        id = binding.record.id(),
                        written,
                        error = %err,
                        "commit aborted, batch preserved"
                    );
                }
                return Err(err);
            }
            written += 1;
        }

        let skipped = self.batch.len() as u64 - written;
        self.release_batch();

        self.count(|stats| stats.record_commit(written, skipped));
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                written,
                skipped,
                duration_us = start.elapsed().as_micros() as u64,
                "commit complete"
            );
        }
        Ok(())
    }

    /// Same as [`commit`](Self::commit).
    pub fn close(&mut self) -> Result<()> {
        self.commit()
    }

    /// Return every slot to the pool and reset the change counter.
    fn release_batch(&mut self) {
        for slot in self.batch.drain() {
            self.pool.release(slot);
        }
        self.changes.clear();
    }

    fn put_in_batch(
        &mut self,
        key: K,
        record: R,
        additional: A,
        created: bool,
    ) -> Result<RecordProxy<'_, K, R, A, L>> {
        let generation = self.next_generation;
        self.next_generation += 1;

        let mut slot = self.pool.acquire();
        slot.bind(key.clone(), record, additional, created, generation, &self.changes);

        let slot = self.batch.insert(key, slot);
        let stats = self.config.track_stats.then_some(&self.stats);
        RecordProxy::from_slot(slot, &self.loader, &self.changes, stats)
            .ok_or(AccessError::UnboundProxy)
    }

    fn bound_proxy(&mut self, key: &K) -> Option<RecordProxy<'_, K, R, A, L>> {
        let stats = self.config.track_stats.then_some(&self.stats);
        let slot = self.batch.get_mut(key)?;
        RecordProxy::from_slot(slot, &self.loader, &self.changes, stats)
    }

    #[inline]
    fn count(&self, record: impl FnOnce(&AccessStats)) {
        if self.config.track_stats {
            record(&self.stats);
        }
    }
}

impl<K, R, A, L, S> DirectRecordAccess<K, R, A, L, S>
where
    K: Ord,
{
    /// Number of records in the batch
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    /// Check if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Check if `key` is in the batch
    pub fn contains(&self, key: &K) -> bool {
        self.batch.contains(key)
    }

    /// Get the loader
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Get the store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the store mutably
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Get the statistics
    pub fn stats(&self) -> &AccessStats {
        &self.stats
    }

    /// Get the configuration
    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Number of idle proxy slots in the pool
    pub fn pool_available(&self) -> usize {
        self.pool.available()
    }

    /// Total proxy slots allocated over the cache's lifetime
    pub fn pool_allocated(&self) -> u64 {
        self.pool.allocated()
    }
}

impl<K, R, A, L, S> Drop for DirectRecordAccess<K, R, A, L, S> {
    fn drop(&mut self) {
        let pending = self.changes.value();
        if pending > 0 && tracing::enabled!(tracing::Level::WARN) {
            tracing::warn!(pending, "record access dropped with uncommitted changes");
        }
    }
}
