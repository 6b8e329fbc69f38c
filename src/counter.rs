//! A counter whose every operation uses relaxed ordering.
//!
//! Suited to statistics read by whoever is curious, never to values that
//! publish other memory.

use crate::sync::{AtomicUsize, Ordering};

/// An atomic `usize` with relaxed-only operations.
#[repr(transparent)]
pub struct RelaxedCounter {
    inner: AtomicUsize,
}

impl RelaxedCounter {
    /// Creates a counter starting at `value`.
    #[inline]
    pub fn new(value: usize) -> Self {
        Self {
            inner: AtomicUsize::new(value),
        }
    }

    /// Loads the current value.
    #[inline(always)]
    pub fn get(&self) -> usize {
        self.inner.load(Ordering::Relaxed)
    }

    /// Stores `value`.
    #[inline(always)]
    pub fn set(&self, value: usize) {
        self.inner.store(value, Ordering::Relaxed);
    }

    /// Adds `value`, returning the previous value.
    #[inline(always)]
    pub fn fetch_add(&self, value: usize) -> usize {
        self.inner.fetch_add(value, Ordering::Relaxed)
    }

    /// Subtracts `value`, returning the previous value.
    #[inline(always)]
    pub fn fetch_sub(&self, value: usize) -> usize {
        self.inner.fetch_sub(value, Ordering::Relaxed)
    }

    /// Adds one, returning the previous value.
    #[inline(always)]
    pub fn increment(&self) -> usize {
        self.fetch_add(1)
    }

    /// Replaces the value, returning the previous one.
    #[inline(always)]
    pub fn exchange(&self, value: usize) -> usize {
        self.inner.swap(value, Ordering::Relaxed)
    }

    /// Stores `new` if the current value equals `current`.
    ///
    /// Returns `Ok(previous)` on success, `Err(actual)` otherwise.
    #[inline]
    pub fn compare_and_swap(&self, current: usize, new: usize) -> Result<usize, usize> {
        self.inner
            .compare_exchange(current, new, Ordering::Relaxed, Ordering::Relaxed)
    }
}

impl Default for RelaxedCounter {
    fn default() -> Self {
        Self::new(0)
    }
}

impl core::fmt::Debug for RelaxedCounter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("RelaxedCounter").field(&self.get()).finish()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn test_counter_arithmetic() {
        let c = RelaxedCounter::default();
        assert_eq!(c.increment(), 0);
        assert_eq!(c.fetch_add(4), 1);
        assert_eq!(c.fetch_sub(2), 5);
        assert_eq!(c.get(), 3);
        assert_eq!(c.exchange(10), 3);
        assert_eq!(c.compare_and_swap(9, 0), Err(10));
        assert_eq!(c.compare_and_swap(10, 0), Ok(10));
        assert_eq!(c.get(), 0);
    }

    #[test]
    fn test_counter_concurrent_increments() {
        let c = RelaxedCounter::new(0);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..1000 {
                        c.increment();
                    }
                });
            }
        });
        assert_eq!(c.get(), 4000);
    }
}
