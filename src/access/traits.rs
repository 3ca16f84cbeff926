//! Collaborator traits for the access cache
//!
//! The cache never touches persistent storage directly: records are
//! materialized through a [`RecordLoader`] and written back through a
//! [`RecordStore`].

use crate::status::Result;

/// Materializes records for the cache.
///
/// Implementations decide what a missing key means; the cache only forwards
/// whatever error they return.
pub trait RecordLoader<K, R, A> {
    /// Fetch an existing record, possibly in its light form.
    fn load(&self, key: &K, additional: &A) -> Result<R>;

    /// Fabricate a record for a key that has not been persisted yet.
    fn new_unused(&self, key: &K, additional: &A) -> Result<R>;

    /// Upgrade a light record to its heavy form in place.
    ///
    /// Must be idempotent: calling it on a heavy record is a no-op.
    fn ensure_heavy(&self, record: &mut R) -> Result<()>;
}

/// Persists records written back by the cache.
pub trait RecordStore<R> {
    /// Write one record to its slot.
    fn update_record(&mut self, record: &R) -> Result<()>;
}
