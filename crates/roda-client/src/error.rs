//! Error type for the client session engine.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Caller supplied a value that violates a method contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Caller invoked an operation in a state where it is meaningless, e.g.
    /// issuing a request before `connect` or after `disconnect`.
    #[error("logic error: {0}")]
    LogicError(String),
    /// The endpoint has not completed readiness negotiation.
    #[error("RODA endpoint is not ready")]
    NotReady,
    /// No response arrived within the caller's deadline.
    #[error("request timed out waiting for a response")]
    Timeout,
    /// The responder reported a non-`Ok` abort code.
    #[error("request aborted: {0}")]
    Aborted(roda_proto::AbortCode),
    /// Propagated from the transport layer.
    #[error(transparent)]
    Transport(#[from] roda_transport::Error),
    /// Propagated from the protocol layer (wire codec failures, etc).
    #[error(transparent)]
    Proto(#[from] roda_proto::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
