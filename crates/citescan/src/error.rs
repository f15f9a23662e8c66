//! Error types for citescan.
//!
//! Scoring itself is total over well-formed input, so the taxonomy is small:
//!
//! - `InvalidArgument` - caller broke the scoring contract (priority out of range,
//!   negative length bound, non-finite or out-of-range confidence). Log and skip;
//!   retrying with the same input cannot succeed.
//! - `OutOfMemory` - the result record could not be allocated. Propagates to the
//!   capture pipeline, which owns retry policy.
//! - `Validation` - configuration or city table files that fail to load or check.
//! - `Serialization` - JSON encoding of results and telemetry.
//! - `Io` - file system errors, always bubbled up unchanged.
//!
//! # Example
//!
//! ```rust
//! use citescan::{CitescanError, Result};
//!
//! fn checked_priority(priority: i32) -> Result<i32> {
//!     if !(0..=4).contains(&priority) {
//!         return Err(CitescanError::invalid_argument(format!(
//!             "pattern priority {} is outside 0..=4",
//!             priority
//!         )));
//!     }
//!     Ok(priority)
//! }
//!
//! assert!(checked_priority(5).is_err());
//! ```
use thiserror::Error;

/// Result type alias using `CitescanError`.
pub type Result<T> = std::result::Result<T, CitescanError>;

/// Main error type for all citescan operations.
///
/// A scoring call either returns a complete result or one of these errors,
/// never a partially populated result.
#[derive(Debug, Error)]
pub enum CitescanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {message}")]
    InvalidArgument {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for CitescanError {
    fn from(err: serde_json::Error) -> Self {
        CitescanError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<std::collections::TryReserveError> for CitescanError {
    fn from(err: std::collections::TryReserveError) -> Self {
        CitescanError::OutOfMemory(err.to_string())
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl CitescanError {
    error_constructor!(invalid_argument, InvalidArgument);
    error_constructor!(validation, Validation);
    error_constructor!(serialization, Serialization);

    /// True for contract violations the caller should log and skip.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
