//! Error type for transport registration and delivery.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("owner {0} is already registered on this endpoint")]
    AlreadyRegistered(u32),
    #[error("owner {0} is not registered on this endpoint")]
    NotRegistered(u32),
    #[error("this endpoint only supports two registered peers")]
    TooManyPeers,
    #[error("no peer is registered to receive this message")]
    NoPeer,
}

pub type Result<T> = std::result::Result<T, Error>;
