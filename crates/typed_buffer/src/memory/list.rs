//! # Typed List
//!
//! Compile-time generic facade over [`TypedBuffer`]. The element size comes
//! from `T`, so the size checks of the erased API can never fail here.
//! Values are copied in and out with `bytemuck`; the byte storage is not
//! aligned for `T`, so nothing hands out `&T`.

use super::buffer::TypedBuffer;
use crate::config::{BufferConfig, GrowthPolicy};
use crate::error::BufferResult;
use crate::format::{Bracketed, RenderFn};
use bytemuck::Pod;
use std::fmt;
use std::marker::PhantomData;

/// A resizable array of `T` stored in a [`TypedBuffer`].
///
/// # Example
///
/// ```rust
/// use typed_buffer::TypedList;
///
/// let mut list: TypedList<u64> = TypedList::new(0)?;
/// list.push(1)?;
/// list.push(3)?;
/// list.insert(1, 2)?;
/// assert_eq!(list.to_vec(), vec![1, 2, 3]);
/// assert_eq!(list.display().to_string(), "[1, 2, 3]");
/// # Ok::<(), typed_buffer::BufferError>(())
/// ```
pub struct TypedList<T: Pod> {
    buffer: TypedBuffer,
    _phantom: PhantomData<T>,
}

impl<T: Pod> TypedList<T> {
    /// Creates a list with room for `initial_capacity` values.
    ///
    /// # Errors
    ///
    /// [`BufferError::ZeroElementSize`](crate::BufferError::ZeroElementSize)
    /// for zero-sized `T`, or an allocation error.
    pub fn new(initial_capacity: usize) -> BufferResult<Self> {
        Self::with_config(&BufferConfig::with_capacity(initial_capacity))
    }

    /// Creates a list from a [`BufferConfig`].
    ///
    /// # Errors
    ///
    /// Same as [`TypedList::new`].
    pub fn with_config(config: &BufferConfig) -> BufferResult<Self> {
        Ok(Self {
            buffer: TypedBuffer::with_config(std::mem::size_of::<T>(), config)?,
            _phantom: PhantomData,
        })
    }

    /// Bytes per value (`size_of::<T>()`).
    #[inline]
    #[must_use]
    pub const fn element_size(&self) -> usize {
        self.buffer.element_size()
    }

    /// Number of values the current storage holds without reallocating.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Number of values.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if the list holds no values.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Growth policy chosen at creation.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> GrowthPolicy {
        self.buffer.policy()
    }

    /// Appends `value` and returns its index.
    ///
    /// # Errors
    ///
    /// Allocation failure.
    pub fn push(&mut self, value: T) -> BufferResult<usize> {
        self.buffer.push(bytemuck::bytes_of(&value))
    }

    /// Removes and returns the last value.
    ///
    /// # Errors
    ///
    /// [`BufferError::EmptyBuffer`](crate::BufferError::EmptyBuffer) on an
    /// empty list.
    pub fn pop(&mut self) -> BufferResult<T> {
        let mut value = T::zeroed();
        self.buffer.pop(Some(bytemuck::bytes_of_mut(&mut value)))?;
        Ok(value)
    }

    /// Inserts `value` at `index`, shifting later values right.
    ///
    /// # Errors
    ///
    /// Index out of range or allocation failure.
    pub fn insert(&mut self, index: usize, value: T) -> BufferResult<usize> {
        self.buffer.insert(index, bytemuck::bytes_of(&value))
    }

    /// Removes and returns the value at `index`, shifting later values left.
    ///
    /// # Errors
    ///
    /// Empty list or index out of range.
    pub fn remove(&mut self, index: usize) -> BufferResult<T> {
        let mut value = T::zeroed();
        self.buffer.remove(index, Some(bytemuck::bytes_of_mut(&mut value)))?;
        Ok(value)
    }

    /// Appends `count` zeroed values and returns the index of the first.
    ///
    /// # Errors
    ///
    /// Allocation failure.
    pub fn add_elements(&mut self, count: usize) -> BufferResult<usize> {
        self.buffer.add_elements(count)
    }

    /// Opens a gap of `count` zeroed values at `index`.
    ///
    /// # Errors
    ///
    /// Index out of range or allocation failure.
    pub fn insert_elements(&mut self, index: usize, count: usize) -> BufferResult<usize> {
        self.buffer.insert_elements(index, count)
    }

    /// Returns a copy of the value at `index`.
    ///
    /// # Errors
    ///
    /// Index out of range.
    pub fn get(&self, index: usize) -> BufferResult<T> {
        Ok(bytemuck::pod_read_unaligned(self.buffer.get_ref(index)?))
    }

    /// Overwrites the value at `index`.
    ///
    /// # Errors
    ///
    /// Index out of range.
    pub fn set(&mut self, index: usize, value: T) -> BufferResult<()> {
        self.buffer.set(index, bytemuck::bytes_of(&value))
    }

    /// Copies every value into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.buffer
            .as_bytes()
            .chunks_exact(self.element_size())
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }

    /// The type-erased buffer underneath.
    #[inline]
    #[must_use]
    pub const fn as_buffer(&self) -> &TypedBuffer {
        &self.buffer
    }

    /// Consumes the list, returning the type-erased buffer.
    #[must_use]
    pub fn into_buffer(self) -> TypedBuffer {
        self.buffer
    }
}

impl<T: Pod + fmt::Display> TypedList<T> {
    /// Formats the list as `[v0, v1, ...]` using `T`'s `Display`.
    #[must_use]
    pub fn display(&self) -> Bracketed<'_, RenderFn> {
        self.buffer.display_with(render_display::<T> as RenderFn)
    }
}

impl<T: Pod + fmt::Debug> fmt::Debug for TypedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}

fn render_display<T: Pod + fmt::Display>(
    bytes: &[u8],
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    fmt::Display::fmt(&bytemuck::pod_read_unaligned::<T>(bytes), f)
}
