//! # Memory Management
//!
//! Contiguous storage for fixed-size elements.
//!
//! ## Layout
//!
//! One byte region per buffer. Element `i` starts at byte
//! `i * element_size`; the region is exactly `capacity * element_size`
//! bytes long and is reallocated whenever capacity changes.
//!
//! ## Shifting
//!
//! Insert and remove move the tail of the region with `copy_within`, which
//! handles overlapping source and destination ranges.

mod buffer;
mod growth;
mod list;

pub use buffer::TypedBuffer;
pub use growth::MIN_DOUBLING_CAPACITY;
pub use list::TypedList;
