//! Record proxies
//!
//! A [`ProxySlot`] is the pooled container for one binding of
//! (key, record, additional data). While the slot sits in the batch index the
//! caller reaches it through a [`RecordProxy`], which borrows the binding
//! together with the loader and the shared change counter.

use std::cell::Cell;
use std::fmt;

use crate::access::stats::AccessStats;
use crate::access::traits::RecordLoader;
use crate::record::Record;
use crate::status::Result;

/// Number of dirty bindings in the current batch.
#[derive(Debug, Default)]
pub(crate) struct ChangeCounter {
    value: Cell<usize>,
}

impl ChangeCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn increment(&self) {
        self.value.set(self.value.get() + 1);
    }

    #[inline]
    pub(crate) fn value(&self) -> usize {
        self.value.get()
    }

    #[inline]
    pub(crate) fn clear(&self) {
        self.value.set(0);
    }
}

/// One key bound to its record for the lifetime of a batch.
pub(crate) struct Binding<K, R, A> {
    pub(crate) key: K,
    pub(crate) record: R,
    pub(crate) additional: A,
    pub(crate) changed: bool,
    pub(crate) created: bool,
}

impl<K, R, A> Binding<K, R, A> {
    /// Flip to dirty, counting the transition once per binding.
    #[inline]
    fn prepare_change(&mut self, changes: &ChangeCounter) {
        if !self.changed {
            self.changed = true;
            changes.increment();
        }
    }
}

/// Reusable container for a binding.
///
/// Slots are owned either by the [`ProxyPool`](crate::access::ProxyPool)
/// (unbound) or by the batch index (bound), never both.
pub struct ProxySlot<K, R, A> {
    generation: u64,
    binding: Option<Binding<K, R, A>>,
}

impl<K, R, A> ProxySlot<K, R, A> {
    pub(crate) fn new() -> Self {
        Self {
            generation: 0,
            binding: None,
        }
    }

    /// Bind the slot to a record. Created records start out dirty.
    pub(crate) fn bind(
        &mut self,
        key: K,
        record: R,
        additional: A,
        created: bool,
        generation: u64,
        changes: &ChangeCounter,
    ) {
        debug_assert!(self.binding.is_none(), "slot bound twice");
        self.generation = generation;
        let binding = self.binding.insert(Binding {
            key,
            record,
            additional,
            changed: false,
            created,
        });
        if created {
            binding.prepare_change(changes);
        }
    }

    /// Drop the current binding, leaving the slot ready for reuse.
    pub(crate) fn unbind(&mut self) -> Option<Binding<K, R, A>> {
        self.binding.take()
    }

    /// Whether the slot currently holds a binding
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Generation of the current (or most recent) binding
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn binding(&self) -> Option<&Binding<K, R, A>> {
        self.binding.as_ref()
    }
}

/// Retained reference to a binding.
///
/// Handles outlive the borrow of a [`RecordProxy`] and can be resolved again
/// through [`DirectRecordAccess::proxy`](crate::access::DirectRecordAccess::proxy).
/// Once the batch is committed the handle goes stale, even if the same key is
/// loaded again later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyHandle<K> {
    key: K,
    generation: u64,
}

impl<K> ProxyHandle<K> {
    /// Key the handle was issued for
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Binding generation the handle was issued for
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Mutable view of one bound record.
///
/// Reads come in two strengths: *linkage* access works on whatever the loader
/// produced, while *data* access first asks the loader to make the record
/// heavy. The `for_changing_*` variants additionally mark the binding dirty so
/// that the next commit writes it back.
pub struct RecordProxy<'a, K, R, A, L> {
    binding: &'a mut Binding<K, R, A>,
    generation: u64,
    loader: &'a L,
    changes: &'a ChangeCounter,
    stats: Option<&'a AccessStats>,
}

impl<'a, K, R, A, L> RecordProxy<'a, K, R, A, L> {
    pub(crate) fn from_slot(
        slot: &'a mut ProxySlot<K, R, A>,
        loader: &'a L,
        changes: &'a ChangeCounter,
        stats: Option<&'a AccessStats>,
    ) -> Option<Self> {
        let generation = slot.generation;
        slot.binding.as_mut().map(|binding| Self {
            binding,
            generation,
            loader,
            changes,
            stats,
        })
    }

    /// Key of the bound record
    pub fn key(&self) -> &K {
        &self.binding.key
    }

    /// Additional data supplied when the record entered the batch
    pub fn additional_data(&self) -> &A {
        &self.binding.additional
    }

    /// Whether the record will be written on commit
    pub fn is_changed(&self) -> bool {
        self.binding.changed
    }

    /// Whether the record was fabricated by `create`
    pub fn is_created(&self) -> bool {
        self.binding.created
    }

    /// Handle that can re-resolve this binding later
    pub fn handle(&self) -> ProxyHandle<K>
    where
        K: Clone,
    {
        ProxyHandle {
            key: self.binding.key.clone(),
            generation: self.generation,
        }
    }

    /// Read access without forcing a heavy load.
    pub fn for_reading_linkage(&self) -> &R {
        &self.binding.record
    }

    /// Write access to linkage fields; marks dirty without a heavy load.
    pub fn for_changing_linkage(&mut self) -> &mut R {
        self.binding.prepare_change(self.changes);
        &mut self.binding.record
    }
}

impl<'a, K, R, A, L> RecordProxy<'a, K, R, A, L>
where
    R: Record,
    L: RecordLoader<K, R, A>,
{
    /// Only a successful light-to-heavy upgrade counts as a heavy load.
    fn ensure_heavy(&mut self) -> Result<()> {
        let was_light = !self.binding.record.is_heavy();
        self.loader.ensure_heavy(&mut self.binding.record)?;
        if was_light {
            if let Some(stats) = self.stats {
                stats.record_heavy_load();
            }
        }
        Ok(())
    }

    /// Read access to the full record content.
    pub fn for_reading_data(&mut self) -> Result<&R> {
        self.ensure_heavy()?;
        Ok(&self.binding.record)
    }

    /// Write access to the full record content; marks dirty.
    pub fn for_changing_data(&mut self) -> Result<&mut R> {
        self.ensure_heavy()?;
        self.binding.prepare_change(self.changes);
        Ok(&mut self.binding.record)
    }

    /// Fresh copy of the record as it currently sits in the store.
    ///
    /// Reloads through the loader; the binding itself is left untouched.
    pub fn before(&self) -> Result<R> {
        self.loader
            .load(&self.binding.key, &self.binding.additional)
    }
}

impl<K, R: fmt::Debug, A, L> fmt::Debug for RecordProxy<'_, K, R, A, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.binding.record, f)
    }
}

/// Read-only view of one bound record, as yielded by
/// [`DirectRecordAccess::changes`](crate::access::DirectRecordAccess::changes).
pub struct ChangeView<'a, K, R, A> {
    binding: &'a Binding<K, R, A>,
    generation: u64,
}

impl<'a, K, R, A> ChangeView<'a, K, R, A> {
    pub(crate) fn from_slot(slot: &'a ProxySlot<K, R, A>) -> Option<Self> {
        slot.binding().map(|binding| Self {
            binding,
            generation: slot.generation,
        })
    }

    /// Key of the bound record
    pub fn key(&self) -> &'a K {
        &self.binding.key
    }

    /// Additional data supplied with the key
    pub fn additional_data(&self) -> &'a A {
        &self.binding.additional
    }

    /// Bound record, as loaded (no heavy upgrade)
    pub fn record(&self) -> &'a R {
        &self.binding.record
    }

    /// Whether the record will be written on commit
    pub fn is_changed(&self) -> bool {
        self.binding.changed
    }

    /// Whether the record was fabricated by `create`
    pub fn is_created(&self) -> bool {
        self.binding.created
    }

    /// Handle that can re-resolve this binding later
    pub fn handle(&self) -> ProxyHandle<K>
    where
        K: Clone,
    {
        ProxyHandle {
            key: self.binding.key.clone(),
            generation: self.generation,
        }
    }
}

impl<K, R: fmt::Debug, A> fmt::Debug for ChangeView<'_, K, R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.binding.record, f)
    }
}
