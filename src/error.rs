//! Validation errors raised when constructing domain values.

use thiserror::Error;

/// A value was rejected at construction time.
///
/// These are never recovered inside the engine; they surface to whoever
/// tried to build the value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("hour must be between 0 and 23, got {0}")]
    HourOutOfRange(i64),

    #[error("price band index must be between 0 and 2, got {0}")]
    BandOutOfRange(i64),

    #[error("malformed endpoint url \"{url}\": {reason}")]
    MalformedUrl { url: String, reason: String },
}
