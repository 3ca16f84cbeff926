//! Shared test utilities: a light/heavy test record, a counting loader and a
//! fault-injection store.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};

use oxirecord::access::{DirectRecordAccess, RecordLoader, RecordStore};
use oxirecord::store::MemoryRecordStore;
use oxirecord::{Record, Result};

/// Record with cheap linkage fields and an expensive payload.
///
/// Loaded light, the payload is left empty until `ensure_heavy` fills it in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestRecord {
    pub id: u64,
    pub in_use: bool,
    pub heavy: bool,
    pub next: u64,
    pub payload: Vec<u8>,
}

impl TestRecord {
    pub fn stored(id: u64, next: u64, payload: &[u8]) -> Self {
        Self {
            id,
            in_use: true,
            heavy: true,
            next,
            payload: payload.to_vec(),
        }
    }
}

impl Record for TestRecord {
    fn id(&self) -> u64 {
        self.id
    }

    fn is_heavy(&self) -> bool {
        self.heavy
    }
}

/// Loader over a [`MemoryRecordStore`] that hands out light records and counts
/// every collaborator call.
pub struct CountingLoader {
    store: MemoryRecordStore<TestRecord>,
    loads: Cell<usize>,
    new_unused: Cell<usize>,
    ensure_heavy: Cell<usize>,
    /// Additional data passed to each `load` / `new_unused`, in call order.
    seen_additional: RefCell<Vec<u64>>,
}

impl CountingLoader {
    pub fn new(store: MemoryRecordStore<TestRecord>) -> Self {
        Self {
            store,
            loads: Cell::new(0),
            new_unused: Cell::new(0),
            ensure_heavy: Cell::new(0),
            seen_additional: RefCell::new(Vec::new()),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.get()
    }

    pub fn new_unused_calls(&self) -> usize {
        self.new_unused.get()
    }

    pub fn ensure_heavy_calls(&self) -> usize {
        self.ensure_heavy.get()
    }

    pub fn seen_additional(&self) -> Vec<u64> {
        self.seen_additional.borrow().clone()
    }
}

impl RecordLoader<u64, TestRecord, u64> for CountingLoader {
    fn load(&self, key: &u64, additional: &u64) -> Result<TestRecord> {
        self.loads.set(self.loads.get() + 1);
        self.seen_additional.borrow_mut().push(*additional);
        // Records missing from the store come back as unused slots
        let mut record = self.store.read(*key).unwrap_or(TestRecord {
            id: *key,
            ..TestRecord::default()
        });
        record.heavy = false;
        record.payload.clear();
        Ok(record)
    }

    fn new_unused(&self, key: &u64, additional: &u64) -> Result<TestRecord> {
        self.new_unused.set(self.new_unused.get() + 1);
        self.seen_additional.borrow_mut().push(*additional);
        Ok(TestRecord {
            id: *key,
            in_use: true,
            heavy: true,
            next: 0,
            payload: Vec::new(),
        })
    }

    fn ensure_heavy(&self, record: &mut TestRecord) -> Result<()> {
        self.ensure_heavy.set(self.ensure_heavy.get() + 1);
        if !record.heavy {
            if let Some(stored) = self.store.read(record.id) {
                record.payload = stored.payload;
            }
            record.heavy = true;
        }
        Ok(())
    }
}

/// A fault-injection wrapper around a [`MemoryRecordStore`].
///
/// Records every id passed to `update_record` and can fail the Nth write.
pub struct FaultInjectionStore {
    inner: MemoryRecordStore<TestRecord>,
    /// Total number of update_record calls observed so far.
    write_count: AtomicU64,
    /// When non-zero, the Nth write (1-based) will return an I/O error.
    fail_write_at: AtomicU64,
    written_ids: Vec<u64>,
}

impl FaultInjectionStore {
    pub fn new(inner: MemoryRecordStore<TestRecord>) -> Self {
        Self {
            inner,
            write_count: AtomicU64::new(0),
            fail_write_at: AtomicU64::new(0),
            written_ids: Vec::new(),
        }
    }

    /// Make the Nth write (1-based, counted from now on) return an I/O error.
    pub fn inject_write_error_at(&self, operation_n: u64) {
        let base = self.write_count.load(Ordering::SeqCst);
        self.fail_write_at.store(base + operation_n, Ordering::SeqCst);
    }

    /// Return the total number of update_record calls observed.
    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Ids successfully written, in write order.
    pub fn written_ids(&self) -> &[u64] {
        &self.written_ids
    }

    pub fn inner(&self) -> &MemoryRecordStore<TestRecord> {
        &self.inner
    }
}

impl RecordStore<TestRecord> for FaultInjectionStore {
    fn update_record(&mut self, record: &TestRecord) -> Result<()> {
        let n = self.write_count.fetch_add(1, Ordering::SeqCst) + 1;

        let target = self.fail_write_at.load(Ordering::SeqCst);
        if target != 0 && n == target {
            return Err(io::Error::other(format!("injected write error at operation {n}")).into());
        }

        self.inner.update_record(record)?;
        self.written_ids.push(record.id);
        Ok(())
    }
}

pub type TestAccess = DirectRecordAccess<u64, TestRecord, u64, CountingLoader, FaultInjectionStore>;

/// Build an access cache over a shared memory store.
pub fn create_access() -> (TestAccess, MemoryRecordStore<TestRecord>) {
    let backing = MemoryRecordStore::new();
    let access = DirectRecordAccess::new(
        CountingLoader::new(backing.clone()),
        FaultInjectionStore::new(backing.clone()),
    );
    (access, backing)
}
