//! Per-run resource availability with all-or-nothing reservation.

use crate::interner::IdIndex;

/// Available units per resource, indexed like the catalog's resources.
///
/// Invariant: `available[r] <= capacity[r]` for every resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourcePool {
    capacity: Vec<u32>,
    available: Vec<u32>,
}

impl ResourcePool {
    /// Create a pool with every resource at full capacity.
    pub fn new(capacity: &[u32]) -> Self {
        Self {
            capacity: capacity.to_vec(),
            available: capacity.to_vec(),
        }
    }

    /// Reserve every requirement, or nothing.
    ///
    /// Returns `false` without touching any counter if some resource is short.
    pub fn reserve(&mut self, requirements: &[(IdIndex, u32)]) -> bool {
        if !self.can_reserve(requirements) {
            return false;
        }
        for &(resource, units) in requirements {
            self.available[resource] -= units;
        }
        true
    }

    /// Whether `reserve` would succeed right now.
    pub fn can_reserve(&self, requirements: &[(IdIndex, u32)]) -> bool {
        requirements
            .iter()
            .all(|&(resource, units)| self.available[resource] >= units)
    }

    /// Return reserved units to the pool.
    ///
    /// Releasing more than was reserved is a scheduler bug: it panics in
    /// debug builds and clamps to capacity otherwise.
    pub fn release(&mut self, requirements: &[(IdIndex, u32)]) {
        for &(resource, units) in requirements {
            let restored = self.available[resource].saturating_add(units);
            debug_assert!(
                restored <= self.capacity[resource],
                "release of {} units overflows resource {} ({} available, capacity {})",
                units,
                resource,
                self.available[resource],
                self.capacity[resource]
            );
            self.available[resource] = restored.min(self.capacity[resource]);
        }
    }

    #[inline]
    pub fn available(&self, resource: IdIndex) -> u32 {
        self.available[resource]
    }

    /// Units currently held by running tasks.
    #[inline]
    pub fn in_use(&self, resource: IdIndex) -> u32 {
        self.capacity[resource] - self.available[resource]
    }

    pub fn available_counts(&self) -> &[u32] {
        &self.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_full() {
        let pool = ResourcePool::new(&[2, 1]);
        assert_eq!(pool.available_counts(), &[2, 1]);
        assert_eq!(pool.in_use(0), 0);
    }

    #[test]
    fn test_reserve_and_release() {
        let mut pool = ResourcePool::new(&[2, 1]);
        assert!(pool.reserve(&[(0, 1), (1, 1)]));
        assert_eq!(pool.available_counts(), &[1, 0]);
        assert_eq!(pool.in_use(1), 1);

        pool.release(&[(0, 1), (1, 1)]);
        assert_eq!(pool.available_counts(), &[2, 1]);
    }

    #[test]
    fn test_failed_reserve_changes_nothing() {
        let mut pool = ResourcePool::new(&[2, 1]);
        assert!(pool.reserve(&[(1, 1)]));

        // First resource would fit, second does not
        assert!(!pool.reserve(&[(0, 2), (1, 1)]));
        assert_eq!(pool.available_counts(), &[2, 0]);
    }

    #[test]
    fn test_empty_and_zero_unit_requirements() {
        let mut pool = ResourcePool::new(&[1]);
        assert!(pool.reserve(&[]));
        assert!(pool.reserve(&[(0, 0)]));
        assert_eq!(pool.available(0), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "overflows resource")]
    fn test_over_release_panics_in_debug() {
        let mut pool = ResourcePool::new(&[1]);
        pool.release(&[(0, 1)]);
    }
}
