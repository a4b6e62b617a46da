//! # Typed Buffer
//!
//! A resizable array of fixed-size elements whose type is opaque to the
//! container, plus a generic facade for `Pod` types.
//!
//! ## Guarantees
//!
//! 1. **Byte-exact addressing** - element `i` lives at `i * element_size`
//! 2. **Predictable capacity** - the default policy grows by exactly what is
//!    needed and shrinks to fit once half empty
//! 3. **All-or-nothing** - a failed call leaves the buffer untouched
//! 4. **Checked preconditions** - bad indices, empty pops and size
//!    mismatches are errors, never undefined behavior
//!
//! ## Example
//!
//! ```rust
//! use typed_buffer::{format::render_i32, TypedBuffer};
//!
//! let mut buffer = TypedBuffer::new(4, 0)?;
//! for value in [1_i32, 2, 3] {
//!     buffer.push(&value.to_ne_bytes())?;
//! }
//! buffer.insert(1, &99_i32.to_ne_bytes())?;
//!
//! let mut removed = [0u8; 4];
//! buffer.remove(0, Some(&mut removed))?;
//! assert_eq!(i32::from_ne_bytes(removed), 1);
//! assert_eq!(buffer.display_with(render_i32).to_string(), "[99, 2, 3]");
//! # Ok::<(), typed_buffer::BufferError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod format;
pub mod memory;

pub use config::{BufferConfig, GrowthPolicy};
pub use error::{BufferError, BufferResult};
pub use format::Bracketed;
pub use memory::{TypedBuffer, TypedList};
