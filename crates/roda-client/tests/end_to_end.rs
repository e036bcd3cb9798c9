//! End-to-end scenarios driven through the public API only, over the
//! loopback transport: a ping round-trip, a single read, a fragmented
//! enumeration, a timeout, and a late reply getting dropped.

use std::sync::Arc;
use std::time::Duration;

use roda_client::{NullNotifiable, RodaClient};
use roda_proto::{
    AccessKind, Attributes, ObjectEnumResponse, PingResponse, ReadResponse, Request,
    RequestPayload, Response, ResponsePayload, ReturnStack, ReturnStackItem,
};
use roda_transport::{LoopbackEndpoint, MessageCallback, Readiness, RodaEndpoint};

const GENEROUS: Readiness = Readiness {
    max_request_size: 65536,
    max_response_size: 65536,
};

/// Registers a second owner on `endpoint` that answers every inbound request
/// with whatever `responder` returns, preserving the request's return stack
/// verbatim (there being only one hop in these tests).
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
fn ping_round_trip() {
    let endpoint: Arc<dyn RodaEndpoint> = Arc::new(LoopbackEndpoint::new());
    spawn_echo_server(endpoint.clone(), 2, |_| ResponsePayload::Ping(PingResponse));
    let client = RodaClient::connect(endpoint, 1, Arc::new(NullNotifiable), GENEROUS).unwrap();

    client.ping(64, Duration::from_secs(1)).unwrap();
}

#[test]
fn single_read() {
    let endpoint: Arc<dyn RodaEndpoint> = Arc::new(LoopbackEndpoint::new());
    spawn_echo_server(endpoint.clone(), 2, |request| match request.payload() {
        RequestPayload::Read(_) => {
            ResponsePayload::Read(ReadResponse::new_data(vec![0x2A, 0x00, 0x00, 0x00], 32).unwrap())
        }
        other => panic!("unexpected request {other:?}"),
    });
    let client = RodaClient::connect(endpoint, 1, Arc::new(NullNotifiable), GENEROUS).unwrap();

    let data = client
        .read(
            AccessKind::SingleSubindex,
            0x1018,
            1,
            Attributes::new().with_readable(true),
            64,
            Duration::from_secs(1),
        )
        .unwrap();
    assert_eq!(data, vec![0x2A, 0x00, 0x00, 0x00]);
}

#[test]
fn fragmented_enumeration() {
    let endpoint: Arc<dyn RodaEndpoint> = Arc::new(LoopbackEndpoint::new());
    let all_indices = [0x1000u16, 0x1001, 0x1017, 0x1018];
    spawn_echo_server(endpoint.clone(), 2, move |request| {
        match request.payload() {
            RequestPayload::ObjectEnum(body) => {
                let remaining: Vec<u16> = all_indices
                    .iter()
                    .copied()
                    .filter(|i| *i >= body.first_index && *i <= body.last_index)
                    .collect();
                let chunk: Vec<u16> = remaining.iter().copied().take(2).collect();
                let complete = chunk.len() == remaining.len();
                ResponsePayload::ObjectEnum(
                    ObjectEnumResponse::new_fragment(chunk, complete).unwrap(),
                )
            }
            other => panic!("unexpected request {other:?}"),
        }
    });
    let client = RodaClient::connect(endpoint, 1, Arc::new(NullNotifiable), GENEROUS).unwrap();

    let indices = client
        .enumerate_objects(0, u16::MAX, 0, 64, Duration::from_secs(1))
        .unwrap();
    assert_eq!(indices, vec![0x1000, 0x1001, 0x1017, 0x1018]);
}

#[test]
fn request_without_a_responding_peer_times_out() {
    let endpoint: Arc<dyn RodaEndpoint> = Arc::new(LoopbackEndpoint::new());
    endpoint.register(2, GENEROUS, Arc::new(|_| {})).unwrap();
    let client = RodaClient::connect(endpoint, 1, Arc::new(NullNotifiable), GENEROUS).unwrap();

    let err = client.ping(64, Duration::from_millis(200)).unwrap_err();
    assert!(matches!(err, roda_client::Error::Timeout));
}

#[test]
fn a_reply_to_an_earlier_session_is_dropped_not_mistaken_for_the_current_one() {
    let endpoint: Arc<dyn RodaEndpoint> = Arc::new(LoopbackEndpoint::new());
    spawn_echo_server(endpoint.clone(), 2, |_| ResponsePayload::Ping(PingResponse));
    const OWNER_ID: u32 = 1;
    let client = RodaClient::connect(
        endpoint.clone(),
        OWNER_ID,
        Arc::new(NullNotifiable),
        GENEROUS,
    )
    .unwrap();

    // Session counters start at 1, so a reply claiming session 0 can only be
    // a stray: on_message must discard it rather than satisfy the next
    // caller waiting on the real reply.
    let mut stale_stack = ReturnStack::new();
    stale_stack.push(ReturnStackItem::new(OWNER_ID, 0));
    let stale = Response::new(stale_stack, ResponsePayload::Ping(PingResponse));
    endpoint.send(2, stale.to_binary().unwrap()).unwrap();

    client.ping(64, Duration::from_secs(1)).unwrap();
}
