//! Connection state machine and the notification interface clients observe
//! it through.

use roda_proto::Response;
use roda_transport::Readiness;

/// The three states a [`crate::RodaClient`] can be in.
///
/// Transitions: `NotRegistered -> NotReady -> Ready` on a successful
/// `connect`, and straight back to `NotRegistered` on `disconnect`. There is
/// no direct `NotRegistered -> Ready` transition; readiness is always
/// negotiated with the transport first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RodaClientState {
    NotRegistered,
    NotReady,
    Ready,
}

/// Callbacks a [`crate::RodaClient`] invokes as it moves through its
/// lifecycle and processes requests. All methods have a default no-op
/// implementation; implement only the ones relevant to your use case.
///
/// Implementations must not panic in response to a callback invoked in a
/// state that violates the state machine (e.g. `on_ready` called twice
/// without an intervening `on_disconnected`) without reporting it loudly:
/// the engine itself treats that situation as a programming error and
/// panics rather than silently continuing.
pub trait RodaClientNotifiable: Send + Sync {
    /// The client finished readiness negotiation and is ready to serve
    /// requests. `granted` is what the transport actually agreed to, which
    /// may be smaller than what was proposed to `connect`.
    fn on_ready(&self, granted: Readiness) {
        let _ = granted;
    }

    /// The client was disconnected, either by a caller-initiated
    /// `disconnect` or because the transport tore down the registration out
    /// from under it.
    fn on_disconnected(&self) {}

    /// A response matching an in-flight request was received and matched to
    /// its caller. Fired for every completed request/response exchange,
    /// including those the caller's own call returned the result of
    /// directly; existing purely as an observation hook (e.g. for metrics).
    fn on_request_processed(&self, response: &Response) {
        let _ = response;
    }

    /// Lends an execution context to run `work` on. The default runs it
    /// inline on the calling thread (almost always the transport's delivery
    /// thread); override to hand it to a worker pool or task queue instead,
    /// if inline work on that thread would be unsafe or too slow.
    fn loan_execution_context(&self, work: Box<dyn FnOnce() + Send>) {
        work();
    }
}

/// A [`RodaClientNotifiable`] that does nothing, for callers with no
/// interest in lifecycle events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifiable;

impl RodaClientNotifiable for NullNotifiable {}
