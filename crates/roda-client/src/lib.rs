//! Client session engine for remote object-dictionary access: connection
//! lifecycle, request correlation, timeouts, and fragment reassembly on top
//! of a [`roda_transport::RodaEndpoint`].

pub mod engine;
pub mod error;
pub mod state;

pub use engine::RodaClient;
pub use error::{Error, Result};
pub use state::{NullNotifiable, RodaClientNotifiable, RodaClientState};
