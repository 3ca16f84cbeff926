//! Access cache configuration

/// Default soft cap on idle proxy slots kept by the pool.
pub const DEFAULT_POOL_CAPACITY: usize = 100;

/// Configuration for [`DirectRecordAccess`](crate::access::DirectRecordAccess)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessConfig {
    /// Maximum number of idle proxy slots retained between batches
    pub pool_capacity: usize,
    /// Number of proxy slots allocated up front
    pub initial_pool_size: usize,
    /// Whether to maintain access statistics
    pub track_stats: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            pool_capacity: DEFAULT_POOL_CAPACITY,
            initial_pool_size: 0,
            track_stats: true,
        }
    }
}

impl AccessConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the idle slot cap (at least one slot is always retained)
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity.max(1);
        self
    }

    /// Set the number of slots allocated up front
    pub fn with_initial_pool_size(mut self, size: usize) -> Self {
        self.initial_pool_size = size;
        self
    }

    /// Enable or disable statistics tracking
    pub fn with_stats(mut self, enabled: bool) -> Self {
        self.track_stats = enabled;
        self
    }

    /// Slots to pre-allocate, never exceeding the idle cap
    pub(crate) fn prefill(&self) -> usize {
        self.initial_pool_size.min(self.pool_capacity)
    }
}
