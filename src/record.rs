//! Record abstraction.
//!
//! Records held by the cache are fixed-identity store entries. A record may be
//! loaded *light* (linkage fields only) and upgraded to *heavy* (full content)
//! on demand by the loader.

/// A store record managed by the access cache.
pub trait Record {
    /// Stable identity of the record (its slot in the store).
    fn id(&self) -> u64;

    /// Whether the full content has been materialized.
    ///
    /// Stores without a light form can keep the default.
    fn is_heavy(&self) -> bool {
        true
    }
}
