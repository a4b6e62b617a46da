//! # Buffer Configuration
//!
//! Construction-time parameters for a buffer. Values are immutable once the
//! buffer exists. Configurations can be built in code or loaded once from a
//! TOML document:
//!
//! ```toml
//! initial_capacity = 64
//! growth = "doubling"
//! ```

use crate::error::{BufferError, BufferResult};
use serde::Deserialize;

/// How capacity changes when a buffer grows or shrinks.
///
/// Both policies produce identical lengths and contents for any sequence of
/// operations. They differ only in the capacity left behind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// Grow by exactly the number of slots needed; after a removal that
    /// leaves `length <= capacity / 2`, shrink to exactly `length`.
    ///
    /// Memory use is fully predictable, but every push past capacity
    /// reallocates, and push/pop pairs around the half-full threshold
    /// reallocate on every call.
    #[default]
    Exact,
    /// Grow to at least twice the current capacity; shrink to half capacity
    /// only once `length <= capacity / 4`.
    Doubling,
}

/// Configuration for a buffer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BufferConfig {
    /// Number of element slots allocated at creation. Zero is legal.
    pub initial_capacity: usize,
    /// Capacity policy applied on growth and shrink.
    pub growth: GrowthPolicy,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            growth: GrowthPolicy::Exact,
        }
    }
}

impl BufferConfig {
    /// Bulk-loading config: amortized doubling from a modest head start.
    #[must_use]
    pub const fn bulk() -> Self {
        Self {
            initial_capacity: 16,
            growth: GrowthPolicy::Doubling,
        }
    }

    /// Creates a config with the given initial capacity and the exact policy.
    #[must_use]
    pub const fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            growth: GrowthPolicy::Exact,
        }
    }

    /// Parses a config from a TOML document.
    ///
    /// Missing keys fall back to [`BufferConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidConfig`] if the document is malformed
    /// or contains unknown keys.
    pub fn from_toml_str(source: &str) -> BufferResult<Self> {
        toml::from_str(source).map_err(|e| BufferError::InvalidConfig(e.to_string()))
    }
}
