use thiserror::Error;

/// Errors returned synchronously by the interaction primitives.
///
/// Apart from [`InteractionError::SubmissionInFlight`] they indicate an
/// integration bug in the view that drives the primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// A timing, threshold or item count the primitive cannot work with
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `go_to` target outside `[0, len)`
    #[error("Index {target} out of range for {len} items")]
    OutOfRange {
        /// Requested index, as given by the caller
        target: String,
        /// Number of items
        len: usize,
    },

    /// Mutating call on a disposed primitive; carries the operation name
    #[error("{0} used after dispose")]
    UseAfterDispose(&'static str),

    /// Contact form submitted again before the previous send completed
    #[error("A submission is already in flight")]
    SubmissionInFlight,
}

/// Result alias for the interaction primitives
pub type Result<T> = std::result::Result<T, InteractionError>;
