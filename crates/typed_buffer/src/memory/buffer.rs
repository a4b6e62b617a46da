//! # Typed Buffer
//!
//! A resizable array of fixed-size elements whose type is opaque to the
//! container. Storage is one contiguous byte region; element `i` lives at
//! byte offset `i * element_size`.
//!
//! Mutating operations return logical indices rather than references, so a
//! reallocation can never leave a caller holding a dangling pointer. The
//! borrowed views (`get_ref`, `get_mut`, `elements_mut`, `as_bytes`) are
//! tied to the buffer by the borrow checker and end at the next mutation.

use crate::config::{BufferConfig, GrowthPolicy};
use crate::error::{BufferError, BufferResult};
use crate::format::Bracketed;
use std::fmt;

/// A type-erased resizable array.
///
/// # Thread Safety
///
/// This buffer is NOT synchronized. Wrap it in a mutex to share it.
///
/// # Example
///
/// ```rust
/// use typed_buffer::TypedBuffer;
///
/// let mut buffer = TypedBuffer::new(4, 0)?;
/// buffer.push(&7_i32.to_ne_bytes())?;
///
/// let mut out = [0u8; 4];
/// buffer.pop(Some(&mut out))?;
/// assert_eq!(i32::from_ne_bytes(out), 7);
/// # Ok::<(), typed_buffer::BufferError>(())
/// ```
pub struct TypedBuffer {
    /// Backing bytes. Always exactly `capacity * element_size` long.
    storage: Vec<u8>,
    /// Bytes per logical element. Never zero, never changed.
    element_size: usize,
    /// Element slots the storage holds.
    capacity: usize,
    /// Logically valid elements.
    length: usize,
    /// Capacity policy fixed at creation.
    policy: GrowthPolicy,
}

impl TypedBuffer {
    /// Creates a buffer with room for `initial_capacity` elements and the
    /// exact growth policy.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ZeroElementSize`] if `element_size` is zero, or
    /// [`BufferError::Allocation`] if the storage cannot be allocated.
    pub fn new(element_size: usize, initial_capacity: usize) -> BufferResult<Self> {
        Self::with_config(element_size, &BufferConfig::with_capacity(initial_capacity))
    }

    /// Creates a buffer from a [`BufferConfig`].
    ///
    /// # Errors
    ///
    /// Same as [`TypedBuffer::new`].
    pub fn with_config(element_size: usize, config: &BufferConfig) -> BufferResult<Self> {
        if element_size == 0 {
            return Err(BufferError::ZeroElementSize);
        }

        let mut buffer = Self {
            storage: Vec::new(),
            element_size,
            capacity: 0,
            length: 0,
            policy: config.growth,
        };
        buffer.reallocate(config.initial_capacity)?;

        tracing::debug!(
            element_size,
            capacity = buffer.capacity,
            policy = ?buffer.policy,
            "typed buffer created"
        );
        Ok(buffer)
    }

    /// Bytes per logical element.
    #[inline]
    #[must_use]
    pub const fn element_size(&self) -> usize {
        self.element_size
    }

    /// Number of elements the current storage holds without reallocating.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of valid elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the buffer holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Growth policy chosen at creation.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Appends a copy of `element` and returns its index.
    ///
    /// # Errors
    ///
    /// [`BufferError::ElementSizeMismatch`] if `element` is not exactly one
    /// element long, [`BufferError::Allocation`] if growth fails.
    pub fn push(&mut self, element: &[u8]) -> BufferResult<usize> {
        self.check_element(element.len())?;
        if let Some(capacity) = self.policy.grow_for_one(self.length, self.capacity) {
            self.grow(capacity, self.length + 1)?;
        }

        let index = self.length;
        let start = self.offset(index);
        self.storage[start..start + self.element_size].copy_from_slice(element);
        self.length += 1;
        Ok(index)
    }

    /// Removes the last element, copying it into `output` if given.
    ///
    /// # Errors
    ///
    /// [`BufferError::EmptyBuffer`] if there is nothing to pop,
    /// [`BufferError::ElementSizeMismatch`] if `output` has the wrong length.
    pub fn pop(&mut self, output: Option<&mut [u8]>) -> BufferResult<()> {
        if self.length == 0 {
            return Err(BufferError::EmptyBuffer);
        }
        self.remove(self.length - 1, output)
    }

    /// Extends the buffer by `count` zero-filled elements and returns the
    /// index of the first one.
    ///
    /// Fill the new slots through [`TypedBuffer::elements_mut`].
    ///
    /// # Errors
    ///
    /// [`BufferError::Allocation`] if growth fails.
    pub fn add_elements(&mut self, count: usize) -> BufferResult<usize> {
        self.insert_elements(self.length, count)
    }

    /// Inserts a copy of `element` at `index`, shifting later elements one
    /// slot to the right. Returns `index`.
    ///
    /// # Errors
    ///
    /// [`BufferError::IndexOutOfRange`] if `index > len()`,
    /// [`BufferError::ElementSizeMismatch`] if `element` has the wrong length,
    /// [`BufferError::Allocation`] if growth fails.
    pub fn insert(&mut self, index: usize, element: &[u8]) -> BufferResult<usize> {
        self.check_insert_index(index)?;
        self.check_element(element.len())?;
        if let Some(capacity) = self.policy.grow_for_one(self.length, self.capacity) {
            self.grow(capacity, self.length + 1)?;
        }

        let start = self.offset(index);
        let end = self.offset(self.length);
        self.storage.copy_within(start..end, start + self.element_size);
        self.storage[start..start + self.element_size].copy_from_slice(element);
        self.length += 1;
        Ok(index)
    }

    /// Removes the element at `index`, copying it into `output` if given,
    /// and shifts later elements one slot to the left.
    ///
    /// May shrink the storage according to the growth policy.
    ///
    /// # Errors
    ///
    /// [`BufferError::EmptyBuffer`] if the buffer is empty,
    /// [`BufferError::IndexOutOfRange`] if `index >= len()`,
    /// [`BufferError::ElementSizeMismatch`] if `output` has the wrong length.
    pub fn remove(&mut self, index: usize, output: Option<&mut [u8]>) -> BufferResult<()> {
        if self.length == 0 {
            return Err(BufferError::EmptyBuffer);
        }
        self.check_index(index)?;

        let start = self.offset(index);
        let next = start + self.element_size;
        if let Some(output) = output {
            self.check_element(output.len())?;
            output.copy_from_slice(&self.storage[start..next]);
        }

        let end = self.offset(self.length);
        self.storage.copy_within(next..end, start);
        self.length -= 1;

        if let Some(capacity) = self.policy.shrink_after_removal(self.length, self.capacity) {
            self.shrink(capacity);
        }
        Ok(())
    }

    /// Opens a gap of `count` zero-filled elements at `index`, shifting
    /// later elements right by `count` slots. Returns `index`.
    ///
    /// # Errors
    ///
    /// [`BufferError::IndexOutOfRange`] if `index > len()`,
    /// [`BufferError::Allocation`] if growth fails.
    pub fn insert_elements(&mut self, index: usize, count: usize) -> BufferResult<usize> {
        self.check_insert_index(index)?;
        if let Some(capacity) = self.policy.grow_for_many(self.length, self.capacity, count) {
            self.grow(capacity, self.length.saturating_add(count))?;
        }

        let start = self.offset(index);
        let end = self.offset(self.length);
        let gap = count * self.element_size;
        self.storage.copy_within(start..end, start + gap);
        self.storage[start..start + gap].fill(0);
        self.length += count;
        Ok(index)
    }

    /// Copies the element at `index` into `output`.
    ///
    /// # Errors
    ///
    /// [`BufferError::IndexOutOfRange`] if `index >= len()`,
    /// [`BufferError::ElementSizeMismatch`] if `output` has the wrong length.
    pub fn get(&self, index: usize, output: &mut [u8]) -> BufferResult<()> {
        self.check_element(output.len())?;
        output.copy_from_slice(self.get_ref(index)?);
        Ok(())
    }

    /// Borrows the bytes of the element at `index`.
    ///
    /// # Errors
    ///
    /// [`BufferError::IndexOutOfRange`] if `index >= len()`.
    pub fn get_ref(&self, index: usize) -> BufferResult<&[u8]> {
        self.check_index(index)?;
        let start = self.offset(index);
        Ok(&self.storage[start..start + self.element_size])
    }

    /// Mutably borrows the bytes of the element at `index`.
    ///
    /// # Errors
    ///
    /// [`BufferError::IndexOutOfRange`] if `index >= len()`.
    pub fn get_mut(&mut self, index: usize) -> BufferResult<&mut [u8]> {
        self.check_index(index)?;
        let start = self.offset(index);
        Ok(&mut self.storage[start..start + self.element_size])
    }

    /// Overwrites the element at `index` with a copy of `element`.
    ///
    /// # Errors
    ///
    /// [`BufferError::IndexOutOfRange`] if `index >= len()`,
    /// [`BufferError::ElementSizeMismatch`] if `element` has the wrong length.
    pub fn set(&mut self, index: usize, element: &[u8]) -> BufferResult<()> {
        self.check_element(element.len())?;
        self.get_mut(index)?.copy_from_slice(element);
        Ok(())
    }

    /// Mutably borrows `count` consecutive elements starting at `start`.
    ///
    /// # Errors
    ///
    /// [`BufferError::IndexOutOfRange`] if the run extends past `len()`.
    pub fn elements_mut(&mut self, start: usize, count: usize) -> BufferResult<&mut [u8]> {
        let end = start
            .checked_add(count)
            .filter(|&end| end <= self.length)
            .ok_or(BufferError::IndexOutOfRange {
                index: start.saturating_add(count),
                length: self.length,
            })?;
        let (from, to) = (self.offset(start), self.offset(end));
        Ok(&mut self.storage[from..to])
    }

    /// The bytes of all valid elements, in order.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.offset(self.length)]
    }

    /// Releases the storage. The buffer stays usable with zero capacity.
    pub fn clear(&mut self) {
        self.storage = Vec::new();
        self.capacity = 0;
        self.length = 0;
        tracing::debug!(element_size = self.element_size, "typed buffer cleared");
    }

    /// Formats the buffer as `[e0, e1, ...]`, rendering each element's bytes
    /// with `render`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use typed_buffer::{format::render_i32, TypedBuffer};
    ///
    /// let mut buffer = TypedBuffer::new(4, 0)?;
    /// for value in [1_i32, 2, 3] {
    ///     buffer.push(&value.to_ne_bytes())?;
    /// }
    /// assert_eq!(buffer.display_with(render_i32).to_string(), "[1, 2, 3]");
    /// # Ok::<(), typed_buffer::BufferError>(())
    /// ```
    #[must_use]
    pub fn display_with<F>(&self, render: F) -> Bracketed<'_, F>
    where
        F: Fn(&[u8], &mut fmt::Formatter<'_>) -> fmt::Result,
    {
        Bracketed::new(self.as_bytes(), self.element_size, render)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    #[inline]
    const fn offset(&self, index: usize) -> usize {
        index * self.element_size
    }

    fn check_index(&self, index: usize) -> BufferResult<()> {
        if index < self.length {
            Ok(())
        } else {
            Err(BufferError::IndexOutOfRange {
                index,
                length: self.length,
            })
        }
    }

    fn check_insert_index(&self, index: usize) -> BufferResult<()> {
        if index <= self.length {
            Ok(())
        } else {
            Err(BufferError::IndexOutOfRange {
                index,
                length: self.length,
            })
        }
    }

    fn check_element(&self, actual: usize) -> BufferResult<()> {
        if actual == self.element_size {
            Ok(())
        } else {
            Err(BufferError::ElementSizeMismatch {
                expected: self.element_size,
                actual,
            })
        }
    }

    /// Grows to `capacity` slots, which must cover `required` elements.
    fn grow(&mut self, capacity: usize, required: usize) -> BufferResult<()> {
        if capacity < required {
            return Err(BufferError::Allocation {
                requested_bytes: usize::MAX,
            });
        }
        self.reallocate(capacity)
    }

    fn shrink(&mut self, capacity: usize) {
        let old = self.capacity;
        self.storage.truncate(self.offset(capacity));
        self.storage.shrink_to_fit();
        self.capacity = capacity;
        tracing::trace!(old, new = capacity, "typed buffer shrunk");
    }

    /// Resizes the storage to exactly `capacity` slots.
    ///
    /// Nothing is modified unless the allocation succeeds.
    fn reallocate(&mut self, capacity: usize) -> BufferResult<()> {
        if capacity <= self.capacity {
            if capacity < self.capacity {
                self.shrink(capacity);
            }
            return Ok(());
        }

        let bytes = capacity
            .checked_mul(self.element_size)
            .ok_or(BufferError::Allocation {
                requested_bytes: usize::MAX,
            })?;
        self.storage
            .try_reserve_exact(bytes - self.storage.len())
            .map_err(|_| BufferError::Allocation {
                requested_bytes: bytes,
            })?;
        self.storage.resize(bytes, 0);

        let old = self.capacity;
        self.capacity = capacity;
        tracing::trace!(old, new = capacity, "typed buffer grown");
        Ok(())
    }
}

impl fmt::Debug for TypedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedBuffer")
            .field("element_size", &self.element_size)
            .field("length", &self.length)
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i32]) -> TypedBuffer {
        let mut buffer = TypedBuffer::new(4, 0).unwrap();
        for value in values {
            buffer.push(&value.to_ne_bytes()).unwrap();
        }
        buffer
    }

    fn contents(buffer: &TypedBuffer) -> Vec<i32> {
        buffer
            .as_bytes()
            .chunks_exact(4)
            .map(|chunk| i32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    #[test]
    fn test_buffer_creation() {
        let buffer = TypedBuffer::new(8, 10).unwrap();
        assert_eq!(buffer.element_size(), 8);
        assert_eq!(buffer.capacity(), 10);
        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.policy(), GrowthPolicy::Exact);
    }

    #[test]
    fn test_zero_capacity_is_legal() {
        let buffer = TypedBuffer::new(4, 0).unwrap();
        assert_eq!(buffer.capacity(), 0);
        assert!(buffer.as_bytes().is_empty());
    }

    #[test]
    fn test_zero_element_size_rejected() {
        assert_eq!(TypedBuffer::new(0, 4).unwrap_err(), BufferError::ZeroElementSize);
    }

    #[test]
    fn test_oversized_creation_reports_allocation_error() {
        let result = TypedBuffer::new(8, usize::MAX / 4);
        assert!(matches!(result, Err(BufferError::Allocation { .. })));

        // Fits in usize but exceeds isize::MAX: rejected by the allocator.
        let result = TypedBuffer::new(1, usize::MAX / 2 + 1);
        assert!(matches!(result, Err(BufferError::Allocation { .. })));
    }

    #[test]
    fn test_push_grows_one_slot_at_a_time() {
        let mut buffer = TypedBuffer::new(4, 0).unwrap();
        for expected in 1..=5 {
            buffer.push(&[0; 4]).unwrap();
            assert_eq!(buffer.capacity(), expected);
        }
    }

    #[test]
    fn test_push_returns_index() {
        let mut buffer = ints(&[10, 20]);
        assert_eq!(buffer.push(&30_i32.to_ne_bytes()).unwrap(), 2);
    }

    #[test]
    fn test_push_wrong_size_rejected() {
        let mut buffer = ints(&[1]);
        let err = buffer.push(&[0; 3]).unwrap_err();
        assert_eq!(err, BufferError::ElementSizeMismatch { expected: 4, actual: 3 });
        assert_eq!(contents(&buffer), vec![1]);
    }

    #[test]
    fn test_pop_shrinks_to_fit_at_half() {
        let mut buffer = ints(&[1, 2, 3, 4]);
        assert_eq!(buffer.capacity(), 4);

        buffer.pop(None).unwrap();
        assert_eq!(buffer.capacity(), 4);

        buffer.pop(None).unwrap();
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.capacity(), 2);
    }

    #[test]
    fn test_pop_empty_is_error() {
        let mut buffer = TypedBuffer::new(4, 2).unwrap();
        assert_eq!(buffer.pop(None).unwrap_err(), BufferError::EmptyBuffer);
        assert_eq!(buffer.capacity(), 2);
    }

    #[test]
    fn test_pop_bad_output_leaves_buffer_untouched() {
        let mut buffer = ints(&[1, 2]);
        let mut out = [0u8; 2];
        assert!(buffer.pop(Some(&mut out)).is_err());
        assert_eq!(contents(&buffer), vec![1, 2]);
    }

    #[test]
    fn test_insert_shifts_right() {
        let mut buffer = ints(&[1, 2, 3]);
        assert_eq!(buffer.insert(1, &99_i32.to_ne_bytes()).unwrap(), 1);
        assert_eq!(contents(&buffer), vec![1, 99, 2, 3]);

        buffer.insert(4, &7_i32.to_ne_bytes()).unwrap();
        buffer.insert(0, &0_i32.to_ne_bytes()).unwrap();
        assert_eq!(contents(&buffer), vec![0, 1, 99, 2, 3, 7]);
    }

    #[test]
    fn test_insert_past_end_rejected() {
        let mut buffer = ints(&[1, 2]);
        let err = buffer.insert(3, &0_i32.to_ne_bytes()).unwrap_err();
        assert_eq!(err, BufferError::IndexOutOfRange { index: 3, length: 2 });
        assert_eq!(buffer.capacity(), 2);
    }

    #[test]
    fn test_remove_shifts_left() {
        let mut buffer = ints(&[1, 2, 3, 4, 5]);
        let mut out = [0u8; 4];
        buffer.remove(1, Some(&mut out)).unwrap();
        assert_eq!(i32::from_ne_bytes(out), 2);
        assert_eq!(contents(&buffer), vec![1, 3, 4, 5]);
    }

    #[test]
    fn test_remove_errors() {
        let mut empty = TypedBuffer::new(4, 0).unwrap();
        assert_eq!(empty.remove(0, None).unwrap_err(), BufferError::EmptyBuffer);

        let mut buffer = ints(&[1]);
        assert_eq!(
            buffer.remove(1, None).unwrap_err(),
            BufferError::IndexOutOfRange { index: 1, length: 1 }
        );
    }

    #[test]
    fn test_add_elements_returns_first_new_slot() {
        let mut buffer = ints(&[1, 2]);
        let first = buffer.add_elements(3).unwrap();
        assert_eq!(first, 2);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.capacity(), 5);

        buffer.elements_mut(first, 3).unwrap().copy_from_slice(&[9; 12]);
        assert_eq!(&contents(&buffer)[..2], &[1, 2]);
    }

    #[test]
    fn test_add_elements_grows_on_exact_fit() {
        let mut buffer = TypedBuffer::new(4, 3).unwrap();
        buffer.add_elements(3).unwrap();
        // length + count == capacity still triggers growth.
        assert_eq!(buffer.capacity(), 6);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_add_zero_elements_is_noop() {
        let mut buffer = ints(&[1, 2]);
        assert_eq!(buffer.add_elements(0).unwrap(), 2);
        assert_eq!(buffer.capacity(), 2);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_insert_elements_opens_zeroed_gap() {
        let mut buffer = ints(&[1, 2, 3]);
        assert_eq!(buffer.insert_elements(1, 2).unwrap(), 1);
        assert_eq!(contents(&buffer), vec![1, 0, 0, 2, 3]);
        assert_eq!(buffer.capacity(), 5);
    }

    #[test]
    fn test_insert_elements_past_end_rejected() {
        let mut buffer = ints(&[1]);
        assert!(matches!(
            buffer.insert_elements(2, 1),
            Err(BufferError::IndexOutOfRange { index: 2, length: 1 })
        ));
    }

    #[test]
    fn test_get_and_get_ref() {
        let buffer = ints(&[5, 6, 7]);
        let mut out = [0u8; 4];
        buffer.get(2, &mut out).unwrap();
        assert_eq!(i32::from_ne_bytes(out), 7);
        assert_eq!(buffer.get_ref(0).unwrap(), &5_i32.to_ne_bytes());
        assert!(buffer.get_ref(3).is_err());
    }

    #[test]
    fn test_get_checks_output_size() {
        let buffer = ints(&[5]);
        let mut out = [0u8; 8];
        assert!(matches!(
            buffer.get(0, &mut out),
            Err(BufferError::ElementSizeMismatch { expected: 4, actual: 8 })
        ));
    }

    #[test]
    fn test_set_and_get_mut() {
        let mut buffer = ints(&[1, 2]);
        buffer.set(0, &10_i32.to_ne_bytes()).unwrap();
        buffer.get_mut(1).unwrap().copy_from_slice(&20_i32.to_ne_bytes());
        assert_eq!(contents(&buffer), vec![10, 20]);
        assert!(buffer.set(2, &0_i32.to_ne_bytes()).is_err());
    }

    #[test]
    fn test_elements_mut_bounds() {
        let mut buffer = ints(&[1, 2, 3]);
        assert_eq!(buffer.elements_mut(1, 2).unwrap().len(), 8);
        assert!(buffer.elements_mut(2, 2).is_err());
        assert!(buffer.elements_mut(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_clear_releases_storage() {
        let mut buffer = ints(&[1, 2, 3]);
        buffer.clear();
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 0);
        buffer.push(&4_i32.to_ne_bytes()).unwrap();
        assert_eq!(contents(&buffer), vec![4]);
    }

    #[test]
    fn test_failed_growth_leaves_buffer_untouched() {
        let mut buffer = ints(&[1, 2]);
        let result = buffer.add_elements(usize::MAX / 2);
        assert!(matches!(result, Err(BufferError::Allocation { .. })));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.capacity(), 2);
        assert_eq!(contents(&buffer), vec![1, 2]);
    }

    #[test]
    fn test_doubling_policy() {
        let mut buffer = TypedBuffer::with_config(4, &BufferConfig::bulk()).unwrap();
        assert_eq!(buffer.capacity(), 16);
        for value in 0..17_i32 {
            buffer.push(&value.to_ne_bytes()).unwrap();
        }
        assert_eq!(buffer.capacity(), 32);
        while buffer.len() > 8 {
            buffer.pop(None).unwrap();
        }
        assert_eq!(buffer.capacity(), 16);
        assert_eq!(contents(&buffer), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_debug_output() {
        let buffer = ints(&[1]);
        let text = format!("{buffer:?}");
        assert!(text.contains("element_size: 4"));
        assert!(text.contains("length: 1"));
    }
}
