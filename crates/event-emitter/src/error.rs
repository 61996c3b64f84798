use thiserror::Error;

// ---------------------------------------------------------------------------
// EmitterError
// ---------------------------------------------------------------------------

/// Failures raised by the argument helpers.
///
/// Dispatch itself never fails: emitting with no listeners or removing an
/// unknown callback are no-ops, and listener panics propagate untouched.
#[derive(Debug, Error)]
pub enum EmitterError {
    #[error("Failed to encode emit arguments: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Argument {index} has an unexpected type: {source}")]
    Decode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, EmitterError>;
