//! A toy in-memory object dictionary served over the loopback transport,
//! standing in for a real CANopen device for this demo.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use roda_dtyp::DataType;
use roda_proto::{
    AbortCode, Attributes, ObjectEnumResponse, ObjectInfoResponse, PingResponse, ReadResponse,
    Request, RequestPayload, Response, ResponsePayload, SubIndexInfo, WriteResponse,
};
use roda_transport::{MessageCallback, Readiness, RodaEndpoint};

/// Owner ID the dictionary server registers under. The demo CLI's client
/// always registers as owner 1, so this just needs to be distinct.
pub const SERVER_OWNER_ID: u32 = 2;

struct Entry {
    data_type: DataType,
    attributes: Attributes,
    name: &'static str,
    data: Vec<u8>,
}

type Store = BTreeMap<(u16, u8), Entry>;

fn fixture() -> Store {
    let mut entries = Store::new();
    entries.insert(
        (0x1000, 0),
        Entry {
            data_type: DataType::Unsigned32,
            attributes: Attributes::new().with_readable(true),
            name: "Device Type",
            data: 0x0000_0191u32.to_le_bytes().to_vec(),
        },
    );
    entries.insert(
        (0x1018, 0),
        Entry {
            data_type: DataType::Unsigned8,
            attributes: Attributes::new().with_readable(true),
            name: "highest sub-index supported",
            data: vec![3],
        },
    );
    entries.insert(
        (0x1018, 1),
        Entry {
            data_type: DataType::Unsigned32,
            attributes: Attributes::new().with_readable(true),
            name: "Vendor-ID",
            data: 0x0000_002Au32.to_le_bytes().to_vec(),
        },
    );
    entries.insert(
        (0x1018, 2),
        Entry {
            data_type: DataType::Unsigned32,
            attributes: Attributes::new().with_readable(true),
            name: "Product code",
            data: 0x0000_0001u32.to_le_bytes().to_vec(),
        },
    );
    entries.insert(
        (0x1018, 3),
        Entry {
            data_type: DataType::Unsigned32,
            attributes: Attributes::new().with_readable(true),
            name: "Revision number",
            data: 0x0001_0000u32.to_le_bytes().to_vec(),
        },
    );
    entries.insert(
        (0x2000, 0),
        Entry {
            data_type: DataType::VisibleString,
            attributes: Attributes::new().with_readable(true).with_writable(true),
            name: "Manufacturer device name",
            data: b"roda-demo-device".to_vec(),
        },
    );
    entries
}

/// Registers the fixture dictionary as [`SERVER_OWNER_ID`] on `endpoint`,
/// answering `Read`/`Write`/`ObjectEnum`/`ObjectInfo`/`Ping` requests for as
/// long as `endpoint` lives.
pub fn spawn(endpoint: Arc<dyn RodaEndpoint>) {
    let entries = Arc::new(Mutex::new(fixture()));
    let endpoint_for_cb = endpoint.clone();
    let callback: MessageCallback = Arc::new(move |bytes| {
        let request = match Request::from_binary(&bytes) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("dictionary server ignoring an undecodable request: {e}");
                return;
            }
        };
        let payload = handle(&entries, &request);
        let response = Response::new(request.return_stack().clone(), payload);
        let bytes = response
            .to_binary()
            .expect("a constructed response always encodes");
        if let Err(e) = endpoint_for_cb.send(SERVER_OWNER_ID, bytes) {
            log::warn!("dictionary server failed to reply: {e}");
        }
    });
    endpoint
        .register(
            SERVER_OWNER_ID,
            Readiness {
                max_request_size: 64 * 1024,
                max_response_size: 64 * 1024,
            },
            callback,
        )
        .expect("the demo registers the dictionary server exactly once");
}

fn handle(entries: &Arc<Mutex<Store>>, request: &Request) -> ResponsePayload {
    match request.payload() {
        RequestPayload::Ping(_) => ResponsePayload::Ping(PingResponse),

        RequestPayload::Read(body) => {
            let entries = entries.lock().unwrap();
            match entries.get(&(body.index, body.subindex)) {
                Some(entry) if entry.attributes.readable() => ResponsePayload::Read(
                    ReadResponse::new_data(entry.data.clone(), entry.data.len() * 8)
                        .expect("fixture data length always matches its own bit size"),
                ),
                Some(_) => ResponsePayload::Read(
                    ReadResponse::new_error(AbortCode::AttemptToReadWriteOnlyObject).unwrap(),
                ),
                None => ResponsePayload::Read(
                    ReadResponse::new_error(AbortCode::ObjectDoesNotExist).unwrap(),
                ),
            }
        }

        RequestPayload::Write(body) => {
            let mut entries = entries.lock().unwrap();
            match entries.get_mut(&(body.index, body.subindex)) {
                Some(entry) if entry.attributes.writable() => {
                    entry.data = body.data.clone();
                    ResponsePayload::Write(WriteResponse::new(AbortCode::Ok))
                }
                Some(_) => ResponsePayload::Write(WriteResponse::new(
                    AbortCode::AttemptToWriteReadOnlyObject,
                )),
                None => ResponsePayload::Write(WriteResponse::new(AbortCode::ObjectDoesNotExist)),
            }
        }

        RequestPayload::ObjectEnum(body) => {
            let entries = entries.lock().unwrap();
            let mut indices: Vec<u16> = entries
                .keys()
                .map(|(index, _)| *index)
                .filter(|index| *index >= body.first_index && *index <= body.last_index)
                .collect();
            indices.dedup();
            let budget = (roda_proto::size::calc_max_nb_of_indices(body.max_response_size, 0)
                as usize)
                .max(1);
            let complete = indices.len() <= budget;
            indices.truncate(budget);
            ResponsePayload::ObjectEnum(
                ObjectEnumResponse::new_fragment(indices, complete)
                    .expect("fixture index list always satisfies the fragment invariants"),
            )
        }

        RequestPayload::ObjectInfo(body) => {
            let entries = entries.lock().unwrap();
            let mut subindices: Vec<SubIndexInfo> = entries
                .iter()
                .filter(|((index, subindex), _)| {
                    *index == body.index
                        && *subindex >= body.first_subindex
                        && *subindex <= body.last_subindex
                })
                .map(|((_, subindex), entry)| SubIndexInfo {
                    subindex: *subindex,
                    data_type: entry.data_type,
                    attributes: entry.attributes,
                    max_size: entry.data.len() as u32 * 8,
                    name: body.incl_names.then(|| entry.name.to_string()),
                    app_specific_meta: None,
                })
                .collect();
            subindices.sort_by_key(|s| s.subindex);
            // One subindex per fragment, so even this small a fixture
            // exercises the client's reassembly loop.
            let complete = subindices.len() <= 1;
            subindices.truncate(1);
            ResponsePayload::ObjectInfo(ObjectInfoResponse::new_fragment(subindices, complete))
        }
    }
}
