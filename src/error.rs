//! Error types for struct introspection.
//!
//! Almost every operation in this crate is total: missing tags, unmatched
//! names and nil pointers are represented as empty results, not errors.
//! The only failures are shape mismatches and the serde bridge rejecting a
//! value it cannot model.
//!
//! ## Error Categories
//!
//! - **Not a struct**: a value handed to [`to_struct`](crate::to_struct) did not
//!   resolve to a struct after normalization
//! - **Collection**: one element of a batch was not a struct, so the whole batch
//!   was rejected
//! - **Unsupported type**: the serde bridge met a shape it cannot represent
//!
//! ## Examples
//!
//! ```rust
//! use structmeta::{to_struct, Error};
//!
//! let err = to_struct(&42i64).unwrap_err();
//! assert!(err.is_not_a_struct());
//! assert!(err.to_string().contains("int"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The input does not resolve to a struct
    #[error("Not a struct: value resolves to {found}")]
    NotAStruct { found: String },

    /// An element of a collection is not a struct; the collection is rejected
    #[error("Element {index} of collection rejected: {source}")]
    Collection {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// Unsupported type for conversion into a value
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a not-a-struct error naming the type that was found instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structmeta::{Error, Type};
    ///
    /// let err = Error::not_a_struct(&Type::String);
    /// assert!(err.to_string().contains("string"));
    /// ```
    pub fn not_a_struct<T: fmt::Display>(found: T) -> Self {
        Error::NotAStruct {
            found: found.to_string(),
        }
    }

    /// Wraps an element failure with its position in the rejected collection.
    pub fn collection(index: usize, source: Error) -> Self {
        Error::Collection {
            index,
            source: Box::new(source),
        }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns `true` if this error (or the element error it wraps) is a
    /// shape mismatch.
    #[must_use]
    pub fn is_not_a_struct(&self) -> bool {
        match self {
            Error::NotAStruct { .. } => true,
            Error::Collection { source, .. } => source.is_not_a_struct(),
            _ => false,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
