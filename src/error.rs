//! Error types for bit buffers and the arithmetic coder.

use thiserror::Error;

/// Error variants surfaced by buffer and coder operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// An argument failed validation (zero size, empty slice).
    #[error("invalid argument: {0}")]
    InvalidArg(&'static str),

    /// Backing storage could not be allocated.
    #[error("out of memory")]
    OutOfMemory,

    /// A write would carry the cursor past the buffer capacity.
    /// The buffer is unchanged and the write may be retried.
    #[error("capacity limit reached")]
    CapacityLimit,

    /// A resource was exhausted or unfit for the requested operation.
    #[error("invalid resource: {0}")]
    InvalidResource(&'static str),

    /// A sub-operation failed mid-session; the session must be reset.
    #[error("execution failure: {0}")]
    ExecutionFailure(&'static str),

    /// The operation is declared but not provided.
    #[error("not implemented")]
    NotImpl,
}

/// A specialized Result type for buffer and coder operations.
pub type Result<T> = std::result::Result<T, Error>;
