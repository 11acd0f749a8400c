//! Local validation errors, raised before any backend call is made.

use thiserror::Error;

/// A caller-supplied parameter failed a precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An update call supplied none of the updatable fields.
    #[error("at least one of {fields} must be provided")]
    NothingToUpdate {
        /// Human readable list of the accepted fields
        fields: &'static str,
    },

    /// A required argument was present but empty.
    #[error("{0} must not be empty")]
    EmptyArgument(&'static str),

    /// `page` was outside `1..=MAX_PAGE`.
    #[error("page must be between 1 and {max} (got {got})")]
    InvalidPage {
        /// Rejected value
        got: u32,
        /// Largest accepted value
        max: u32,
    },

    /// `limit` was outside `1..=100`.
    #[error("limit must be between 1 and {max} (got {got})")]
    InvalidLimit {
        /// Rejected value
        got: u32,
        /// Largest accepted value
        max: u32,
    },

    /// An attachment payload was not valid base64.
    #[error("data_base64 is not valid base64: {0}")]
    InvalidBase64(String),

    /// A caller-supplied MIME type did not parse as `type/subtype`.
    #[error("mime is not a valid MIME type: {0}")]
    InvalidMime(String),
}
