//! # Debug Formatting
//!
//! Renders a buffer as a bracketed, comma-separated list: `[a, b, c]`.
//! The container does not know its element type, so the caller supplies a
//! renderer that turns one element's bytes into text, either one of the
//! plain functions here or a closure capturing whatever the bytes refer to.

use std::fmt;

/// Signature shared by the element renderers in this module.
pub type RenderFn = fn(&[u8], &mut fmt::Formatter<'_>) -> fmt::Result;

/// `Display` adapter over a run of fixed-size elements.
///
/// Created by [`TypedBuffer::display_with`](crate::TypedBuffer::display_with)
/// and [`TypedList::display`](crate::TypedList::display).
pub struct Bracketed<'a, F> {
    bytes: &'a [u8],
    element_size: usize,
    render: F,
}

impl<'a, F> Bracketed<'a, F>
where
    F: Fn(&[u8], &mut fmt::Formatter<'_>) -> fmt::Result,
{
    /// Wraps `bytes`, split into elements of `element_size` bytes.
    ///
    /// Trailing bytes that do not fill a whole element are ignored.
    #[must_use]
    pub fn new(bytes: &'a [u8], element_size: usize, render: F) -> Self {
        Self {
            bytes,
            element_size,
            render,
        }
    }
}

impl<F> fmt::Display for Bracketed<'_, F>
where
    F: Fn(&[u8], &mut fmt::Formatter<'_>) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if self.element_size > 0 {
            for (i, element) in self.bytes.chunks_exact(self.element_size).enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                (self.render)(element, f)?;
            }
        }
        f.write_str("]")
    }
}

/// Renders a native-endian 32-bit signed integer.
///
/// Elements of any other width fall back to [`render_hex`].
pub fn render_i32(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match bytemuck::try_pod_read_unaligned::<i32>(bytes) {
        Ok(value) => write!(f, "{value}"),
        Err(_) => render_hex(bytes, f),
    }
}

/// Renders a native-endian 64-bit signed integer.
///
/// Elements of any other width fall back to [`render_hex`].
pub fn render_i64(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match bytemuck::try_pod_read_unaligned::<i64>(bytes) {
        Ok(value) => write!(f, "{value}"),
        Err(_) => render_hex(bytes, f),
    }
}

/// Renders a null-terminated byte string stored inline in the element.
///
/// Stops at the first NUL (or the end of the element). Invalid UTF-8 is
/// replaced with U+FFFD.
pub fn render_cstr(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    f.write_str(&String::from_utf8_lossy(&bytes[..end]))
}

/// Builds a renderer for 64-bit string handles.
///
/// Each element holds a native-endian `u64` index into `table`; the element
/// renders as the string it names. Elements of another width, or handles
/// past the end of `table`, fall back to [`render_hex`].
///
/// ```rust
/// use typed_buffer::{format::render_handles, TypedBuffer};
///
/// let names = ["s1", "s2"];
/// let mut buffer = TypedBuffer::new(8, 0)?;
/// buffer.push(&1_u64.to_ne_bytes())?;
/// buffer.push(&0_u64.to_ne_bytes())?;
/// assert_eq!(buffer.display_with(render_handles(&names)).to_string(), "[s2, s1]");
/// # Ok::<(), typed_buffer::BufferError>(())
/// ```
pub fn render_handles<'t>(
    table: &'t [&'t str],
) -> impl Fn(&[u8], &mut fmt::Formatter<'_>) -> fmt::Result + 't {
    move |bytes: &[u8], f: &mut fmt::Formatter<'_>| {
        let text = bytemuck::try_pod_read_unaligned::<u64>(bytes)
            .ok()
            .and_then(|handle| usize::try_from(handle).ok())
            .and_then(|index| table.get(index));
        match text {
            Some(text) => f.write_str(text),
            None => render_hex(bytes, f),
        }
    }
}

/// Renders raw bytes as `0x` followed by two hex digits per byte, in
/// storage order.
pub fn render_hex(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("0x")?;
    for byte in bytes {
        write!(f, "{byte:02x}")?;
    }
    Ok(())
}
