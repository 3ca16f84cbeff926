//! oxirecord - A deferred write-back record cache for bulk loading
//!
//! `oxirecord` sits between a bulk-loading client and a store of fixed-size
//! records, providing:
//! - **Single materialization**: each record is loaded at most once per batch
//! - **Deferred writes**: changes accumulate in memory until commit
//! - **Clean skipping**: records that were only read are never written back
//! - **Slot reuse**: proxy slots are pooled across batches
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use oxirecord::access::DirectRecordAccess;
//!
//! let mut access = DirectRecordAccess::new(loader, store);
//!
//! // Load (or fabricate) records and change them through their proxies
//! access.get_or_load(node_id, ())?.for_changing_linkage().next_rel = rel_id;
//! access.create(rel_id, node_id)?.for_changing_data()?.first_node = node_id;
//!
//! // Write dirty records back, highest id first
//! access.commit()?;
//! ```

#![warn(missing_docs)]

pub mod access;
pub mod config;
pub mod record;
pub mod status;
pub mod store;

// Re-exports for convenience
pub use access::{DirectRecordAccess, RecordLoader, RecordProxy, RecordStore};
pub use record::Record;
pub use status::{AccessError, Result, Status};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::access::{
        AccessConfig, ChangeView, DirectRecordAccess, ProxyHandle, RecordLoader, RecordProxy,
        RecordStore,
    };
    pub use crate::record::Record;
    pub use crate::status::{AccessError, Result, Status};
}
