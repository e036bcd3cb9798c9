//! Error type for the data-type codec.

use crate::DataType;

/// Errors raised while converting between CANopen wire values and their
/// textual representation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Caller supplied a value that violates a method contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Caller invoked an operation in a state where it is meaningless.
    #[error("logic error: {0}")]
    LogicError(String),
    /// A value did not fit the type's valid range.
    #[error("value out of range: {0}")]
    OutOfRange(String),
    /// The codec does not implement conversions for this data type.
    #[error("data type not supported: {0:?}")]
    DataTypeNotSupported(DataType),
}

pub type Result<T> = std::result::Result<T, Error>;
