//! # Capacity Arithmetic
//!
//! Pure functions deciding the next capacity for each [`GrowthPolicy`].
//! They never allocate; the buffer applies the answer. `None` means the
//! current storage is kept as is.
//!
//! Sums saturate instead of wrapping. A saturated capacity can never be
//! allocated, so the buffer reports an allocation error before its length
//! is touched.

use crate::config::GrowthPolicy;

/// Smallest capacity the doubling policy grows to.
pub const MIN_DOUBLING_CAPACITY: usize = 4;

impl GrowthPolicy {
    /// Capacity needed before one more element is appended or inserted.
    #[must_use]
    pub fn grow_for_one(self, length: usize, capacity: usize) -> Option<usize> {
        match self {
            Self::Exact => (length == capacity).then_some(capacity.saturating_add(1)),
            Self::Doubling => doubled(length.saturating_add(1), capacity),
        }
    }

    /// Capacity needed before `count` elements are reserved in one step.
    ///
    /// The exact policy grows whenever `length + count >= capacity`, so a
    /// request that fits exactly still reallocates to `capacity + count`.
    #[must_use]
    pub fn grow_for_many(self, length: usize, capacity: usize, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let required = length.saturating_add(count);
        match self {
            Self::Exact => (required >= capacity).then_some(capacity.saturating_add(count)),
            Self::Doubling => doubled(required, capacity),
        }
    }

    /// Capacity to shrink to once a removal has brought the buffer to `length`.
    #[must_use]
    pub fn shrink_after_removal(self, length: usize, capacity: usize) -> Option<usize> {
        let target = match self {
            Self::Exact => (length <= capacity / 2).then_some(length)?,
            Self::Doubling => (length <= capacity / 4).then_some((capacity / 2).max(length))?,
        };
        (target != capacity).then_some(target)
    }
}

fn doubled(required: usize, capacity: usize) -> Option<usize> {
    if required <= capacity {
        return None;
    }
    Some(
        required
            .max(capacity.saturating_mul(2))
            .max(MIN_DOUBLING_CAPACITY),
    )
}
