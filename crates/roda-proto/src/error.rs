//! Error type for the request/response model and wire codec.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Caller supplied a value that violates a method contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Caller invoked an operation in a state where it is meaningless.
    #[error("logic error: {0}")]
    LogicError(String),
    /// Transient or protocol failure.
    #[error("runtime error: {0}")]
    RuntimeError(String),
    /// A value did not fit its target range.
    #[error("value out of range: {0}")]
    OutOfRange(String),
    /// Failed to serialize or deserialize a wire value.
    #[error("wire codec error: {0}")]
    Codec(#[from] binrw::Error),
    /// A data-type codec failure propagated from `roda-dtyp`.
    #[error(transparent)]
    DataType(#[from] roda_dtyp::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
