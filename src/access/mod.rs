//! Batched record access for bulk loading
//!
//! This module provides a deferred write-back cache over a fixed-size record
//! store. Records are loaded at most once per batch, changes accumulate in
//! memory, and dirty records are written back in descending id order when the
//! batch is committed.

mod batch;
mod config;
mod direct;
mod pool;
mod proxy;
mod stats;
mod traits;

pub use batch::BatchIndex;
pub use config::{AccessConfig, DEFAULT_POOL_CAPACITY};
pub use direct::DirectRecordAccess;
pub use pool::ProxyPool;
pub use proxy::{ChangeView, ProxyHandle, ProxySlot, RecordProxy};
pub use stats::{AccessStats, AccessStatsSummary};
pub use traits::{RecordLoader, RecordStore};
