//! # Buffer Error Types
//!
//! All errors that can occur while operating on a buffer. Every error is
//! reported before any byte of the buffer is touched, so a failed call
//! leaves the buffer exactly as it was.

use thiserror::Error;

/// Errors that can occur in buffer operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The allocator could not satisfy a growth or creation request, or the
    /// requested byte size does not fit in `usize`.
    #[error("allocation of {requested_bytes} bytes failed")]
    Allocation {
        /// Total storage size in bytes that was requested.
        ///
        /// Saturates at `usize::MAX` when the size computation overflowed.
        requested_bytes: usize,
    },

    /// An index-based operation was given an index outside its legal range.
    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Buffer length at the time of the call.
        length: usize,
    },

    /// Pop or remove requested on a buffer with no elements.
    #[error("buffer is empty")]
    EmptyBuffer,

    /// A buffer cannot be created with zero bytes per element.
    #[error("element size must be greater than zero")]
    ZeroElementSize,

    /// An input or output slice does not hold exactly one element.
    #[error("element size mismatch: buffer stores {expected} bytes per element, got {actual}")]
    ElementSizeMismatch {
        /// The buffer's element size.
        expected: usize,
        /// Length of the slice supplied by the caller.
        actual: usize,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;
