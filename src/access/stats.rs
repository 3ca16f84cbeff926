//! Access cache statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for record access operations
pub struct AccessStats {
    /// Number of `get_or_load` calls
    lookups: AtomicU64,
    /// Lookups answered from the batch
    hits: AtomicU64,
    /// Lookups that went to the loader
    misses: AtomicU64,
    /// Records created through `new_unused`
    creates: AtomicU64,
    /// Heavy upgrades requested from the loader
    heavy_loads: AtomicU64,
    /// Commits that wrote at least one record
    commits: AtomicU64,
    /// Commits skipped because nothing was dirty
    empty_commits: AtomicU64,
    /// Commits aborted by a store error
    failed_commits: AtomicU64,
    /// Records passed to the store
    records_written: AtomicU64,
    /// Clean records released without a write
    records_skipped: AtomicU64,
}

impl AccessStats {
    /// Create new statistics
    pub fn new() -> Self {
        Self {
            lookups: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            creates: AtomicU64::new(0),
            heavy_loads: AtomicU64::new(0),
            commits: AtomicU64::new(0),
            empty_commits: AtomicU64::new(0),
            failed_commits: AtomicU64::new(0),
            records_written: AtomicU64::new(0),
            records_skipped: AtomicU64::new(0),
        }
    }

    /// Record a lookup that found the key in the batch
    pub fn record_hit(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that had to load the record
    pub fn record_miss(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a created record
    pub fn record_create(&self) {
        self.creates.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a heavy upgrade request
    pub fn record_heavy_load(&self) {
        self.heavy_loads.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed commit
    pub fn record_commit(&self, written: u64, skipped: u64) {
        self.commits.fetch_add(1, Ordering::Relaxed);
        self.records_written.fetch_add(written, Ordering::Relaxed);
        self.records_skipped.fetch_add(skipped, Ordering::Relaxed);
    }

    /// Record a commit with nothing to write
    pub fn record_empty_commit(&self) {
        self.empty_commits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a commit aborted by the store
    pub fn record_failed_commit(&self) {
        self.failed_commits.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the number of lookups
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Get the number of batch hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get the number of loader round-trips
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get the hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.lookups.load(Ordering::Relaxed);
        if lookups == 0 {
            return 0.0;
        }
        self.hits.load(Ordering::Relaxed) as f64 / lookups as f64
    }

    /// Get the number of created records
    pub fn creates(&self) -> u64 {
        self.creates.load(Ordering::Relaxed)
    }

    /// Get the number of heavy upgrades
    pub fn heavy_loads(&self) -> u64 {
        self.heavy_loads.load(Ordering::Relaxed)
    }

    /// Get the number of completed commits
    pub fn commits(&self) -> u64 {
        self.commits.load(Ordering::Relaxed)
    }

    /// Get the number of empty commits
    pub fn empty_commits(&self) -> u64 {
        self.empty_commits.load(Ordering::Relaxed)
    }

    /// Get the number of failed commits
    pub fn failed_commits(&self) -> u64 {
        self.failed_commits.load(Ordering::Relaxed)
    }

    /// Get the number of records written
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    /// Get the number of clean records released without a write
    pub fn records_skipped(&self) -> u64 {
        self.records_skipped.load(Ordering::Relaxed)
    }

    /// Reset all statistics
    pub fn reset(&self) {
        self.lookups.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.creates.store(0, Ordering::Relaxed);
        self.heavy_loads.store(0, Ordering::Relaxed);
        self.commits.store(0, Ordering::Relaxed);
        self.empty_commits.store(0, Ordering::Relaxed);
        self.failed_commits.store(0, Ordering::Relaxed);
        self.records_written.store(0, Ordering::Relaxed);
        self.records_skipped.store(0, Ordering::Relaxed);
    }

    /// Get a summary of all statistics
    pub fn summary(&self) -> AccessStatsSummary {
        AccessStatsSummary {
            lookups: self.lookups(),
            hits: self.hits(),
            misses: self.misses(),
            hit_rate: self.hit_rate(),
            creates: self.creates(),
            heavy_loads: self.heavy_loads(),
            commits: self.commits(),
            empty_commits: self.empty_commits(),
            failed_commits: self.failed_commits(),
            records_written: self.records_written(),
            records_skipped: self.records_skipped(),
        }
    }
}

impl Default for AccessStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of access statistics
#[derive(Debug, Clone, PartialEq)]
pub struct AccessStatsSummary {
    /// Number of lookups
    pub lookups: u64,
    /// Lookups answered from the batch
    pub hits: u64,
    /// Lookups that went to the loader
    pub misses: u64,
    /// Batch hit rate
    pub hit_rate: f64,
    /// Created records
    pub creates: u64,
    /// Heavy upgrades requested
    pub heavy_loads: u64,
    /// Completed commits
    pub commits: u64,
    /// Commits with nothing to write
    pub empty_commits: u64,
    /// Commits aborted by the store
    pub failed_commits: u64,
    /// Records written
    pub records_written: u64,
    /// Clean records skipped
    pub records_skipped: u64,
}
