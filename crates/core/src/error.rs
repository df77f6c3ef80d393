//! Caller errors.
//!
//! These are raised before any network call is made. Provider-side failures
//! are never errors; they come back as a failed [`crate::Response`].

use thiserror::Error;

/// A request that cannot be sent as given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// A required field was absent or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field was present but unusable.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}
