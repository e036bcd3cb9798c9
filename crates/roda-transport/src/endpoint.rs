//! The transport seam a RODA client or server sits on top of.
//!
//! The protocol itself (`roda-proto`) and the session engine (`roda-client`)
//! are transport-agnostic: how bytes actually travel between client and
//! object-dictionary server is deliberately left to the integrator. This
//! trait is the minimal contract a concrete transport has to uphold; see
//! [`crate::loopback::LoopbackEndpoint`] for the trivial in-process one used
//! for testing and the demo CLI.

use std::sync::Arc;

use crate::error::Result;

/// Invoked once per inbound message addressed to a registered owner.
pub type MessageCallback = Arc<dyn Fn(Vec<u8>) + Send + Sync>;

/// The request/response size budget a registrant proposes, and the budget
/// the transport actually grants. The transport may clamp either value down
/// (e.g. to a frame-size limit) but never raise it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub max_request_size: u32,
    pub max_response_size: u32,
}

impl Readiness {
    pub fn clamp_to(self, cap: u32) -> Self {
        Self {
            max_request_size: self.max_request_size.min(cap),
            max_response_size: self.max_response_size.min(cap),
        }
    }
}

/// A bidirectional byte-message channel, addressed by small integer owner
/// IDs rather than endpoints/sockets. A RODA client registers under its own
/// owner ID before issuing requests, and unregisters when it disconnects.
pub trait RodaEndpoint: Send + Sync {
    /// Registers `owner_id` to receive messages via `on_message`, proposing
    /// `proposed` as the sizes it would like to use. Returns the sizes the
    /// transport actually grants, which may be clamped down but never
    /// raised. Fails if `owner_id` is already registered.
    fn register(
        &self,
        owner_id: u32,
        proposed: Readiness,
        on_message: MessageCallback,
    ) -> Result<Readiness>;

    /// Removes `owner_id`'s registration. Fails if it was never registered.
    fn unregister(&self, owner_id: u32) -> Result<()>;

    /// Sends `payload` as if originating from `owner_id`. Delivery is
    /// asynchronous with respect to the caller: `send` returning `Ok` means
    /// the transport accepted the payload, not that a peer has processed it.
    fn send(&self, owner_id: u32, payload: Vec<u8>) -> Result<()>;
}
