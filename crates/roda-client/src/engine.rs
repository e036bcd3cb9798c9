//! The client session engine: connection lifecycle, request correlation,
//! and the per-operation request/response exchanges built on top of it.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use roda_proto::fragment::DEFAULT_MAX_FRAGMENTS;
use roda_proto::{
    AccessKind, Attributes, ObjectEnumRequestBody, ObjectInfoRequestBody, PingRequestBody,
    ReadRequestBody, Request, RequestPayload, Response, ResponsePayload, ReturnStackItem,
    SubIndexInfo, WriteRequestBody,
};
use roda_transport::{MessageCallback, Readiness, RodaEndpoint};

use crate::error::{Error, Result};
use crate::state::{RodaClientNotifiable, RodaClientState};

#[derive(Default)]
struct Internal {
    session_count: u32,
    granted: Option<Readiness>,
    inbox: Option<Response>,
    /// Set when a response arrives while the slot is already occupied. A
    /// diagnostic, not itself fatal: at most one request is ever in flight
    /// per client, so this indicates a responder that replied twice.
    overflow: bool,
}

/// A RODA client session bound to one transport owner ID.
///
/// Two locks guard disjoint state, always acquired in this order when both
/// are needed: `connect_state` (the `NotRegistered`/`NotReady`/`Ready`
/// machine) before `internal` (the correlation counter and single-slot
/// inbox). Each has its own condition variable: `state_change_convar` for
/// state transitions, `resp_received_convar` for inbound responses.
pub struct RodaClient {
    endpoint: Arc<dyn RodaEndpoint>,
    owner_id: u32,
    notifiable: Arc<dyn RodaClientNotifiable>,
    max_fragments: u32,

    connect_state: Mutex<RodaClientState>,
    state_change_convar: Condvar,

    internal: Mutex<Internal>,
    resp_received_convar: Condvar,
}

impl RodaClient {
    /// Registers `owner_id` with `endpoint`, negotiating the request/
    /// response size budget proposed in `proposed`. On success the returned
    /// client is in the `Ready` state. On registration failure, the client
    /// rolls back to `NotRegistered` and the error is returned.
    pub fn connect(
        endpoint: Arc<dyn RodaEndpoint>,
        owner_id: u32,
        notifiable: Arc<dyn RodaClientNotifiable>,
        proposed: Readiness,
    ) -> Result<Arc<Self>> {
        let client = Arc::new(Self {
            endpoint,
            owner_id,
            notifiable,
            max_fragments: DEFAULT_MAX_FRAGMENTS,
            connect_state: Mutex::new(RodaClientState::NotRegistered),
            state_change_convar: Condvar::new(),
            internal: Mutex::new(Internal::default()),
            resp_received_convar: Condvar::new(),
        });

        {
            let mut state = client.connect_state.lock().expect("connect_state poisoned");
            *state = RodaClientState::NotReady;
        }

        let weak = Arc::downgrade(&client);
        let callback: MessageCallback = Arc::new(move |bytes| {
            if let Some(client) = weak.upgrade() {
                client.on_message(bytes);
            }
        });

        let granted = match client.endpoint.register(owner_id, proposed, callback) {
            Ok(granted) => granted,
            Err(e) => {
                log::error!("RODA registration failed for owner {owner_id}: {e}");
                let mut state = client.connect_state.lock().expect("connect_state poisoned");
                *state = RodaClientState::NotRegistered;
                return Err(e.into());
            }
        };
        log::debug!(
            "RODA owner {owner_id} registered; granted max_request_size={} max_response_size={}",
            granted.max_request_size,
            granted.max_response_size
        );

        {
            let mut internal = client.internal.lock().expect("internal poisoned");
            internal.granted = Some(granted);
        }
        {
            let mut state = client.connect_state.lock().expect("connect_state poisoned");
            *state = RodaClientState::Ready;
            client.state_change_convar.notify_all();
        }
        client.notifiable.on_ready(granted);
        Ok(client)
    }

    /// Tears the connection down: unregisters from the transport and
    /// returns to `NotRegistered`. A no-op if already `NotRegistered`.
    ///
    /// A transport that cannot honor an unregister request leaves the
    /// client in an unrecoverable state, so that failure panics rather
    /// than being reported as an `Err`.
    pub fn disconnect(&self) {
        let mut state = self.connect_state.lock().expect("connect_state poisoned");
        if *state == RodaClientState::NotRegistered {
            return;
        }
        if let Err(e) = self.endpoint.unregister(self.owner_id) {
            panic!("failed to unregister RODA owner {}: {e}", self.owner_id);
        }
        *state = RodaClientState::NotRegistered;
        self.state_change_convar.notify_all();
        drop(state);
        self.notifiable.on_disconnected();
    }

    pub fn state(&self) -> RodaClientState {
        *self.connect_state.lock().expect("connect_state poisoned")
    }

    pub fn granted(&self) -> Option<Readiness> {
        self.internal.lock().expect("internal poisoned").granted
    }

    /// Blocks the calling thread until the client leaves `NotReady`, or
    /// `timeout` elapses.
    pub fn wait_for_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut state = self.connect_state.lock().expect("connect_state poisoned");
        while *state == RodaClientState::NotReady {
            let now = Instant::now();
            if now >= deadline {
                return Err(Error::Timeout);
            }
            let (guard, result) = self
                .state_change_convar
                .wait_timeout(state, deadline - now)
                .expect("connect_state poisoned");
            state = guard;
            if result.timed_out() && *state == RodaClientState::NotReady {
                return Err(Error::Timeout);
            }
        }
        Ok(())
    }

    /// Discards any unconsumed inbound response without tearing down the
    /// connection. Used to recover after a timeout before issuing a fresh
    /// request.
    pub fn reset(&self) {
        let mut internal = self.internal.lock().expect("internal poisoned");
        internal.inbox = None;
        internal.overflow = false;
    }

    fn on_message(&self, bytes: Vec<u8>) {
        let response = match Response::from_binary(&bytes) {
            Ok(response) => response,
            Err(e) => {
                log::error!("failed to decode an inbound RODA response: {e}");
                return;
            }
        };

        let mut return_stack = response.return_stack().clone();
        let item = match return_stack.pop() {
            Ok(item) => item,
            Err(_) => {
                log::warn!("dropping a response with an empty return stack");
                return;
            }
        };
        if item.owner_id != self.owner_id {
            log::trace!("dropping a response addressed to a different owner");
            return;
        }

        let mut internal = self.internal.lock().expect("internal poisoned");
        if item.info != internal.session_count {
            log::debug!(
                "dropping a late or stale response (session {} while expecting {})",
                item.info,
                internal.session_count
            );
            return;
        }
        if internal.inbox.is_some() {
            internal.overflow = true;
            log::warn!("inbox overflow: a second response arrived before the first was consumed");
            return;
        }
        internal.inbox = Some(response.clone());
        drop(internal);
        self.resp_received_convar.notify_all();

        let notifiable = self.notifiable.clone();
        let notifiable_for_work = notifiable.clone();
        notifiable.loan_execution_context(Box::new(move || {
            notifiable_for_work.on_request_processed(&response);
        }));
    }

    fn begin_request(&self, payload: RequestPayload) -> Result<(Vec<u8>, u32)> {
        if self.state() != RodaClientState::Ready {
            return Err(Error::NotReady);
        }

        let session_count = {
            let mut internal = self.internal.lock().expect("internal poisoned");
            internal.session_count = internal.session_count.wrapping_add(1);
            internal.inbox = None;
            internal.overflow = false;
            internal.session_count
        };

        let mut request = Request::new(payload)?;
        request.push_return_stack_item(ReturnStackItem::new(self.owner_id, session_count));
        Ok((request.to_binary()?, session_count))
    }

    /// Sends `payload` and blocks for its matching response, up to
    /// `timeout`. The absolute deadline is computed once from
    /// [`Instant::now`], so it never jumps with wall-clock adjustments.
    pub fn send_and_receive(&self, payload: RequestPayload, timeout: Duration) -> Result<Response> {
        let (bytes, session_count) = self.begin_request(payload)?;
        let deadline = Instant::now() + timeout;
        log::trace!(
            "RODA owner {} sending session {session_count} ({} bytes)",
            self.owner_id,
            bytes.len()
        );
        self.endpoint.send(self.owner_id, bytes)?;

        let mut internal = self.internal.lock().expect("internal poisoned");
        loop {
            if let Some(response) = internal.inbox.take() {
                return Ok(response);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(Error::Timeout);
            }
            let (guard, result) = self
                .resp_received_convar
                .wait_timeout(internal, deadline - now)
                .expect("internal poisoned");
            internal = guard;
            if result.timed_out() && internal.inbox.is_none() {
                return Err(Error::Timeout);
            }
        }
    }

    pub fn ping(&self, max_response_size: u32, timeout: Duration) -> Result<()> {
        let response = self.send_and_receive(
            RequestPayload::Ping(PingRequestBody { max_response_size }),
            timeout,
        )?;
        match response.payload() {
            ResponsePayload::Ping(_) => Ok(()),
            other => Err(Error::LogicError(format!(
                "expected a ping response, got {other:?}"
            ))),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn read(
        &self,
        access: AccessKind,
        index: u16,
        subindex: u8,
        permissions: Attributes,
        max_response_size: u32,
        timeout: Duration,
    ) -> Result<Vec<u8>> {
        let response = self.send_and_receive(
            RequestPayload::Read(ReadRequestBody {
                max_response_size,
                access,
                index,
                subindex,
                permissions,
            }),
            timeout,
        )?;
        match response.payload() {
            ResponsePayload::Read(r) if r.result().is_ok() => Ok(r.get_data()?.to_vec()),
            ResponsePayload::Read(r) => Err(Error::Aborted(r.result())),
            other => Err(Error::LogicError(format!(
                "expected a read response, got {other:?}"
            ))),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn write(
        &self,
        access: AccessKind,
        index: u16,
        subindex: u8,
        permissions: Attributes,
        size_in_bit: u32,
        data: Vec<u8>,
        max_response_size: u32,
        timeout: Duration,
    ) -> Result<()> {
        let response = self.send_and_receive(
            RequestPayload::Write(WriteRequestBody {
                max_response_size,
                access,
                index,
                subindex,
                permissions,
                size_in_bit,
                data,
            }),
            timeout,
        )?;
        match response.payload() {
            ResponsePayload::Write(r) if r.result().is_ok() => Ok(()),
            ResponsePayload::Write(r) => Err(Error::Aborted(r.result())),
            other => Err(Error::LogicError(format!(
                "expected a write response, got {other:?}"
            ))),
        }
    }

    /// Enumerates every index in `first_index..=last_index` matching
    /// `attr_filter`, issuing follow-up requests as long as the responder
    /// marks its reply incomplete, up to this client's fragment limit.
    pub fn enumerate_objects(
        &self,
        first_index: u16,
        last_index: u16,
        attr_filter: u16,
        max_response_size: u32,
        timeout: Duration,
    ) -> Result<Vec<u16>> {
        let mut acc = self.enum_fragment(
            first_index,
            last_index,
            attr_filter,
            max_response_size,
            timeout,
        )?;
        let mut fragments = 1u32;
        while !acc.is_complete() {
            let next_first = match acc.indices()?.last() {
                Some(&last) if last < u16::MAX => last + 1,
                _ => break,
            };
            if next_first > last_index {
                break;
            }
            let next = self.enum_fragment(
                next_first,
                last_index,
                attr_filter,
                max_response_size,
                timeout,
            )?;
            acc.add_fragment(next, fragments, self.max_fragments)?;
            fragments += 1;
        }
        Ok(acc.indices()?.to_vec())
    }

    fn enum_fragment(
        &self,
        first_index: u16,
        last_index: u16,
        attr_filter: u16,
        max_response_size: u32,
        timeout: Duration,
    ) -> Result<roda_proto::ObjectEnumResponse> {
        let response = self.send_and_receive(
            RequestPayload::ObjectEnum(ObjectEnumRequestBody {
                max_response_size,
                first_index,
                last_index,
                attr_filter,
            }),
            timeout,
        )?;
        match response.payload() {
            ResponsePayload::ObjectEnum(r) if r.result().is_ok() => Ok(r.clone()),
            ResponsePayload::ObjectEnum(r) => Err(Error::Aborted(r.result())),
            other => Err(Error::LogicError(format!(
                "expected an object-enum response, got {other:?}"
            ))),
        }
    }

    /// Fetches subindex descriptions for `index` over
    /// `first_subindex..=last_subindex`, reassembling fragments the same way
    /// [`Self::enumerate_objects`] does.
    #[allow(clippy::too_many_arguments)]
    pub fn object_info(
        &self,
        index: u16,
        first_subindex: u8,
        last_subindex: u8,
        incl_names: bool,
        incl_asm: bool,
        max_response_size: u32,
        timeout: Duration,
    ) -> Result<Vec<SubIndexInfo>> {
        let mut acc = self.object_info_fragment(
            index,
            first_subindex,
            last_subindex,
            incl_names,
            incl_asm,
            max_response_size,
            timeout,
        )?;
        let mut fragments = 1u32;
        while !acc.is_complete() {
            let next_first = match acc.subindices()?.last() {
                Some(last) if last.subindex < u8::MAX => last.subindex + 1,
                _ => break,
            };
            if next_first > last_subindex {
                break;
            }
            let next = self.object_info_fragment(
                index,
                next_first,
                last_subindex,
                incl_names,
                incl_asm,
                max_response_size,
                timeout,
            )?;
            acc.add_fragment(next, fragments, self.max_fragments)?;
            fragments += 1;
        }
        Ok(acc.subindices()?.to_vec())
    }

    #[allow(clippy::too_many_arguments)]
    fn object_info_fragment(
        &self,
        index: u16,
        first_subindex: u8,
        last_subindex: u8,
        incl_names: bool,
        incl_asm: bool,
        max_response_size: u32,
        timeout: Duration,
    ) -> Result<roda_proto::ObjectInfoResponse> {
        let response = self.send_and_receive(
            RequestPayload::ObjectInfo(ObjectInfoRequestBody {
                max_response_size,
                index,
                first_subindex,
                last_subindex,
                incl_names,
                incl_asm,
            }),
            timeout,
        )?;
        match response.payload() {
            ResponsePayload::ObjectInfo(r) if r.result().is_ok() => Ok(r.clone()),
            ResponsePayload::ObjectInfo(r) => Err(Error::Aborted(r.result())),
            other => Err(Error::LogicError(format!(
                "expected an object-info response, got {other:?}"
            ))),
        }
    }
}

impl Drop for RodaClient {
    fn drop(&mut self) {
        let state = *self.connect_state.lock().expect("connect_state poisoned");
        if state != RodaClientState::NotRegistered {
            if let Err(e) = self.endpoint.unregister(self.owner_id) {
                panic!(
                    "failed to unregister RODA owner {} while dropping: {e}",
                    self.owner_id
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roda_proto::{AbortCode, ObjectInfoResponse};
    use roda_transport::LoopbackEndpoint;

    use crate::state::NullNotifiable;

    const GENEROUS: Readiness = Readiness {
        max_request_size: 65536,
        max_response_size: 65536,
    };

    /// Registers a second owner on `endpoint` that answers every inbound
    /// request with whatever `responder` returns, preserving the request's
    /// return stack verbatim (there being only one hop in these tests).
    fn spawn_echo_server<F>(endpoint: Arc<dyn RodaEndpoint>, server_owner_id: u32, responder: F)
    where
        F: Fn(&Request) -> ResponsePayload + Send + Sync + 'static,
    {
        let endpoint_for_cb = endpoint.clone();
        let callback: MessageCallback = Arc::new(move |bytes| {
            let request = match Request::from_binary(&bytes) {
                Ok(request) => request,
                Err(_) => return,
            };
            let payload = responder(&request);
            let response = Response::new(request.return_stack().clone(), payload);
            let _ = endpoint_for_cb.send(server_owner_id, response.to_binary().unwrap());
        });
        endpoint
            .register(server_owner_id, GENEROUS, callback)
            .unwrap();
    }

    #[test]
    fn connect_transitions_to_ready_and_disconnect_returns_to_not_registered() {
        let endpoint: Arc<dyn RodaEndpoint> = Arc::new(LoopbackEndpoint::new());
        spawn_echo_server(endpoint.clone(), 2, |_| {
            ResponsePayload::Ping(roda_proto::PingResponse)
        });

        let client = RodaClient::connect(endpoint, 1, Arc::new(NullNotifiable), GENEROUS).unwrap();
        assert_eq!(client.state(), RodaClientState::Ready);
        assert!(client.granted().is_some());

        client.disconnect();
        assert_eq!(client.state(), RodaClientState::NotRegistered);
    }

    #[test]
    fn write_round_trips_through_an_echo_server() {
        let endpoint: Arc<dyn RodaEndpoint> = Arc::new(LoopbackEndpoint::new());
        spawn_echo_server(endpoint.clone(), 2, |request| match request.payload() {
            RequestPayload::Write(_) => {
                ResponsePayload::Write(roda_proto::WriteResponse::new(AbortCode::Ok))
            }
            other => panic!("unexpected request {other:?}"),
        });
        let client = RodaClient::connect(endpoint, 1, Arc::new(NullNotifiable), GENEROUS).unwrap();

        client
            .write(
                AccessKind::SingleSubindex,
                0x1018,
                1,
                Attributes::new().with_writable(true),
                16,
                vec![0x34, 0x12],
                64,
                Duration::from_secs(1),
            )
            .unwrap();
    }

    #[test]
    fn write_surfaces_an_abort_code_as_an_error() {
        let endpoint: Arc<dyn RodaEndpoint> = Arc::new(LoopbackEndpoint::new());
        spawn_echo_server(endpoint.clone(), 2, |_| {
            ResponsePayload::Write(roda_proto::WriteResponse::new(
                AbortCode::ObjectDoesNotExist,
            ))
        });
        let client = RodaClient::connect(endpoint, 1, Arc::new(NullNotifiable), GENEROUS).unwrap();

        let err = client
            .write(
                AccessKind::SingleSubindex,
                0x1018,
                1,
                Attributes::new().with_writable(true),
                16,
                vec![0, 0],
                64,
                Duration::from_secs(1),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Aborted(AbortCode::ObjectDoesNotExist)));
    }

    #[test]
    fn requests_after_disconnect_are_rejected() {
        let endpoint: Arc<dyn RodaEndpoint> = Arc::new(LoopbackEndpoint::new());
        spawn_echo_server(endpoint.clone(), 2, |_| {
            ResponsePayload::Ping(roda_proto::PingResponse)
        });
        let client = RodaClient::connect(endpoint, 1, Arc::new(NullNotifiable), GENEROUS).unwrap();
        client.disconnect();

        let err = client.ping(64, Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, Error::NotReady));
    }

    #[test]
    fn object_info_reassembles_fragments() {
        let endpoint: Arc<dyn RodaEndpoint> = Arc::new(LoopbackEndpoint::new());
        let entries: Vec<SubIndexInfo> = (0..3)
            .map(|subindex| SubIndexInfo {
                subindex,
                data_type: roda_dtyp::DataType::Unsigned8,
                attributes: Attributes::new().with_readable(true),
                max_size: 8,
                name: None,
                app_specific_meta: None,
            })
            .collect();
        let for_server = entries.clone();
        spawn_echo_server(endpoint.clone(), 2, move |request| {
            match request.payload() {
                RequestPayload::ObjectInfo(body) => {
                    let remaining: Vec<SubIndexInfo> = for_server
                        .iter()
                        .filter(|e| {
                            e.subindex >= body.first_subindex && e.subindex <= body.last_subindex
                        })
                        .cloned()
                        .collect();
                    let chunk: Vec<SubIndexInfo> = remaining.iter().take(1).cloned().collect();
                    let complete = chunk.len() == remaining.len();
                    ResponsePayload::ObjectInfo(ObjectInfoResponse::new_fragment(chunk, complete))
                }
                other => panic!("unexpected request {other:?}"),
            }
        });
        let client = RodaClient::connect(endpoint, 1, Arc::new(NullNotifiable), GENEROUS).unwrap();

        let fetched = client
            .object_info(0x1018, 0, u8::MAX, false, false, 64, Duration::from_secs(1))
            .unwrap();
        assert_eq!(fetched, entries);
    }
}
