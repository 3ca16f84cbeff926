//! Proxy slot pool
//!
//! Hands out boxed [`ProxySlot`]s and takes them back after commit so that a
//! long bulk load reuses the same slot allocations batch after batch.

use crate::access::proxy::ProxySlot;

/// Pool of reusable proxy slots.
///
/// The capacity is a soft cap on *idle* slots: `acquire` allocates a fresh slot
/// whenever the pool is empty, and `release` drops slots that would push the
/// idle count past the cap.
pub struct ProxyPool<K, R, A> {
    idle: Vec<Box<ProxySlot<K, R, A>>>,
    capacity: usize,
    allocated: u64,
}

impl<K, R, A> ProxyPool<K, R, A> {
    /// Create a new pool
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of idle slots to keep
    /// * `initial_count` - Number of slots to pre-allocate (capped at `capacity`)
    pub fn new(capacity: usize, initial_count: usize) -> Self {
        let initial_count = initial_count.min(capacity);
        let mut idle = Vec::with_capacity(initial_count);
        for _ in 0..initial_count {
            idle.push(Box::new(ProxySlot::new()));
        }

        Self {
            idle,
            capacity,
            allocated: initial_count as u64,
        }
    }

    /// Take an unbound slot from the pool, allocating if empty
    pub fn acquire(&mut self) -> Box<ProxySlot<K, R, A>> {
        match self.idle.pop() {
            Some(slot) => slot,
            None => {
                self.allocated += 1;
                if tracing::enabled!(tracing::Level::TRACE) {
                    tracing::trace!(allocated = self.allocated, "proxy pool empty, allocating slot");
                }
                Box::new(ProxySlot::new())
            }
        }
    }

    /// Return a slot to the pool, dropping its binding
    pub fn release(&mut self, mut slot: Box<ProxySlot<K, R, A>>) {
        slot.unbind();
        if self.idle.len() < self.capacity {
            self.idle.push(slot);
        }
        // Otherwise just drop it
    }

    /// Get the number of idle slots
    pub fn available(&self) -> usize {
        self.idle.len()
    }

    /// Get the idle slot cap
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the total number of slots ever allocated by this pool
    pub fn allocated(&self) -> u64 {
        self.allocated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::proxy::ChangeCounter;

    type Pool = ProxyPool<u64, String, ()>;

    #[test]
    fn test_pool_creation() {
        let pool = Pool::new(8, 4);
        assert_eq!(pool.available(), 4);
        assert_eq!(pool.capacity(), 8);
        assert_eq!(pool.allocated(), 4);
    }

    #[test]
    fn test_prefill_capped_at_capacity() {
        let pool = Pool::new(2, 10);
        assert_eq!(pool.available(), 2);
        assert_eq!(pool.allocated(), 2);
    }

    #[test]
    fn test_pool_acquire_and_release() {
        let mut pool = Pool::new(4, 2);

        let slot = pool.acquire();
        assert!(!slot.is_bound());
        assert_eq!(pool.available(), 1);

        pool.release(slot);
        assert_eq!(pool.available(), 2);
        assert_eq!(pool.allocated(), 2);
    }

    #[test]
    fn test_pool_exhaustion_and_allocation() {
        let mut pool = Pool::new(4, 1);

        let _slot1 = pool.acquire();
        assert_eq!(pool.available(), 0);

        // Should still be able to get a slot (allocates new one)
        let _slot2 = pool.acquire();
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.allocated(), 2);
    }

    #[test]
    fn test_pool_max_limit() {
        let mut pool = Pool::new(2, 0);

        let slots: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        assert_eq!(pool.available(), 0);

        for slot in slots {
            pool.release(slot);
        }
        // Only capacity (2) should be retained
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn test_release_unbinds() {
        let mut pool = Pool::new(2, 0);
        let changes = ChangeCounter::new();

        let mut slot = pool.acquire();
        slot.bind(3, "three".to_string(), (), true, 1, &changes);
        assert!(slot.is_bound());

        pool.release(slot);
        let slot = pool.acquire();
        assert!(!slot.is_bound());
        assert_eq!(pool.allocated(), 1);
    }
}
