pub mod endpoint;
pub mod error;
pub mod loopback;

pub use endpoint::{MessageCallback, Readiness, RodaEndpoint};
pub use error::{Error, Result};
pub use loopback::LoopbackEndpoint;
