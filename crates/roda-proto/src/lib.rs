pub mod abort_code;
pub mod access;
pub mod error;
pub mod fragment;
pub mod header;
pub mod request;
pub mod response;
pub mod size;

pub use abort_code::AbortCode;
pub use access::{AccessKind, Attributes};
pub use error::{Error, Result};
pub use header::{CommonHeader, LATEST_VERSION, ReturnStack, ReturnStackItem, TypeCode};
pub use request::{
    ObjectEnumRequestBody, ObjectInfoRequestBody, PingRequestBody, ReadRequestBody, Request,
    RequestPayload, WriteRequestBody,
};
pub use response::{
    ObjectEnumResponse, ObjectInfoResponse, PingResponse, ReadResponse, Response, ResponsePayload,
    SubIndexInfo, WriteResponse,
};
