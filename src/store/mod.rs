//! Reference record stores
//!
//! This module provides an in-memory, fixed-slot record store that implements
//! the collaborator traits of the access cache. It is useful for testing and
//! benchmarking without a real storage backend.

mod memory;

pub use memory::{MemoryRecordLoader, MemoryRecordStore};
