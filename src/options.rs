//! Configuration of the recognized tag conventions.
//!
//! A single namespace-like tag key doubles as the "participate in processing"
//! flag and as the source of override names. Both the key and the string that
//! counts as "true" are configurable; the defaults are exposed as constants.
//!
//! ## Examples
//!
//! ```rust
//! use structmeta::{MetaOptions, IDENTITY_KEY, TRUTH_SENTINEL};
//!
//! let options = MetaOptions::default();
//! assert_eq!(options.identity_key, IDENTITY_KEY);
//! assert_eq!(options.truth_sentinel, TRUTH_SENTINEL);
//!
//! let options = MetaOptions::new()
//!     .with_identity_key("db")
//!     .with_truth_sentinel("yes");
//! assert!(options.is_truthy("yes"));
//! ```

/// Default tag key used for identifiers and processing flags.
pub const IDENTITY_KEY: &str = "vm";

/// Default tag value that counts as "true" for flag-style tags.
pub const TRUTH_SENTINEL: &str = "true";

/// Tag conventions used by identifier lookups and truthy-tag filters.
///
/// # Examples
///
/// ```rust
/// use structmeta::MetaOptions;
///
/// let options = MetaOptions::new().with_identity_key("json");
/// assert_eq!(options.identity_key, "json");
/// assert_eq!(options.truth_sentinel, "true");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaOptions {
    pub identity_key: String,
    pub truth_sentinel: String,
}

impl Default for MetaOptions {
    fn default() -> Self {
        MetaOptions {
            identity_key: IDENTITY_KEY.to_string(),
            truth_sentinel: TRUTH_SENTINEL.to_string(),
        }
    }
}

impl MetaOptions {
    /// Creates the default conventions (`vm` key, `"true"` sentinel).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tag key consulted for identifiers.
    #[must_use]
    pub fn with_identity_key(mut self, key: impl Into<String>) -> Self {
        self.identity_key = key.into();
        self
    }

    /// Sets the literal tag value treated as "true".
    #[must_use]
    pub fn with_truth_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.truth_sentinel = sentinel.into();
        self
    }

    /// Returns `true` if `value` equals the configured sentinel exactly.
    #[inline]
    #[must_use]
    pub fn is_truthy(&self, value: &str) -> bool {
        value == self.truth_sentinel
    }
}
