//! Request object model: the five request kinds and their common framing.

use binrw::prelude::*;
use std::io::Cursor;

use crate::access::{AccessKind, Attributes};
use crate::error::{Error, Result};
use crate::header::{LATEST_VERSION, ReturnStack, ReturnStackItem, TypeCode};
use crate::size::MIN_USEFUL_RESPONSE_SIZE;

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct ReadRequestBody {
    pub max_response_size: u32,
    pub access: AccessKind,
    pub index: u16,
    pub subindex: u8,
    pub permissions: Attributes,
}

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct WriteRequestBody {
    pub max_response_size: u32,
    pub access: AccessKind,
    pub index: u16,
    pub subindex: u8,
    pub permissions: Attributes,
    pub size_in_bit: u32,
    #[br(count = (size_in_bit as usize).div_ceil(8))]
    pub data: Vec<u8>,
}

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct ObjectEnumRequestBody {
    pub max_response_size: u32,
    pub first_index: u16,
    pub last_index: u16,
    pub attr_filter: u16,
}

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct ObjectInfoRequestBody {
    pub max_response_size: u32,
    pub index: u16,
    pub first_subindex: u8,
    pub last_subindex: u8,
    #[br(map = |x: u8| x != 0)]
    #[bw(map = |x: &bool| *x as u8)]
    pub incl_names: bool,
    #[br(map = |x: u8| x != 0)]
    #[bw(map = |x: &bool| *x as u8)]
    pub incl_asm: bool,
}

#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[brw(little)]
pub struct PingRequestBody {
    pub max_response_size: u32,
}

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
#[brw(little)]
#[brw(import(type_code: TypeCode))]
pub enum RequestPayload {
    #[br(pre_assert(matches!(type_code, TypeCode::Read)))]
    Read(ReadRequestBody),
    #[br(pre_assert(matches!(type_code, TypeCode::Write)))]
    Write(WriteRequestBody),
    #[br(pre_assert(matches!(type_code, TypeCode::ObjectEnum)))]
    ObjectEnum(ObjectEnumRequestBody),
    #[br(pre_assert(matches!(type_code, TypeCode::ObjectInfo)))]
    ObjectInfo(ObjectInfoRequestBody),
    #[br(pre_assert(matches!(type_code, TypeCode::Ping)))]
    Ping(PingRequestBody),
}

impl RequestPayload {
    pub fn type_code(&self) -> TypeCode {
        match self {
            RequestPayload::Read(_) => TypeCode::Read,
            RequestPayload::Write(_) => TypeCode::Write,
            RequestPayload::ObjectEnum(_) => TypeCode::ObjectEnum,
            RequestPayload::ObjectInfo(_) => TypeCode::ObjectInfo,
            RequestPayload::Ping(_) => TypeCode::Ping,
        }
    }

    pub fn max_response_size(&self) -> u32 {
        match self {
            RequestPayload::Read(b) => b.max_response_size,
            RequestPayload::Write(b) => b.max_response_size,
            RequestPayload::ObjectEnum(b) => b.max_response_size,
            RequestPayload::ObjectInfo(b) => b.max_response_size,
            RequestPayload::Ping(b) => b.max_response_size,
        }
    }

    /// The exact serialized length of the payload alone, in bytes.
    pub fn binary_size(&self) -> usize {
        match self {
            RequestPayload::Read(_) => 4 + 1 + 2 + 1 + 2,
            RequestPayload::Write(b) => 4 + 1 + 2 + 1 + 2 + 4 + b.data.len(),
            RequestPayload::ObjectEnum(_) => 4 + 2 + 2 + 2,
            RequestPayload::ObjectInfo(_) => 4 + 2 + 1 + 1 + 1 + 1,
            RequestPayload::Ping(_) => 4,
        }
    }
}

/// A RODA request: a return stack and a typed payload.
///
/// Constructable either from its primary fields (the originator's case, via
/// [`Request::new`]) or by deserializing a wire-format buffer (the
/// transport's case, via [`Request::from_binary`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    return_stack: ReturnStack,
    payload: RequestPayload,
}

impl Request {
    pub fn new(payload: RequestPayload) -> Result<Self> {
        if payload.max_response_size() < MIN_USEFUL_RESPONSE_SIZE {
            return Err(Error::InvalidArgument(format!(
                "maxResponseSize must be at least {MIN_USEFUL_RESPONSE_SIZE}, got {}",
                payload.max_response_size()
            )));
        }
        Ok(Self {
            return_stack: ReturnStack::new(),
            payload,
        })
    }

    pub fn payload(&self) -> &RequestPayload {
        &self.payload
    }

    pub fn return_stack(&self) -> &ReturnStack {
        &self.return_stack
    }

    pub fn return_stack_mut(&mut self) -> &mut ReturnStack {
        &mut self.return_stack
    }

    pub fn push_return_stack_item(&mut self, item: ReturnStackItem) {
        self.return_stack.push(item);
    }

    /// Exact serialized size, including the common header and return stack.
    pub fn binary_size(&self) -> usize {
        3 + self.return_stack.wire_size() + self.payload.binary_size()
    }

    pub fn to_binary(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.binary_size());
        {
            let mut cursor = Cursor::new(&mut buf);
            let type_code = self.payload.type_code();
            type_code.write_le(&mut cursor)?;
            LATEST_VERSION.write_le(&mut cursor)?;
            (self.return_stack.items().len() as u8).write_le(&mut cursor)?;
            for item in self.return_stack.items() {
                item.write_le(&mut cursor)?;
            }
            self.payload.write_le_args(&mut cursor, (type_code,))?;
        }
        Ok(buf)
    }

    /// Deserializes a request from a complete wire-format buffer.
    ///
    /// Rejects unknown type codes and versions newer than
    /// [`LATEST_VERSION`]. On failure, the caller must construct a fresh
    /// reader to retry; this function never rewinds a partially-consumed
    /// stream.
    pub fn from_binary(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 3 {
            return Err(Error::RuntimeError(
                "buffer shorter than common header".into(),
            ));
        }
        let type_code = TypeCode::try_from(bytes[0])?;
        let version = bytes[1];
        if version > LATEST_VERSION {
            return Err(Error::RuntimeError(format!(
                "unsupported request version {version}, latest known is {LATEST_VERSION}"
            )));
        }
        let return_stack_len = bytes[2] as usize;
        let mut cursor = Cursor::new(&bytes[3..]);
        let mut items = Vec::with_capacity(return_stack_len);
        for _ in 0..return_stack_len {
            items.push(ReturnStackItem::read_le(&mut cursor)?);
        }
        let payload = RequestPayload::read_le_args(&mut cursor, (type_code,))?;
        Ok(Self {
            return_stack: ReturnStack::from_items(items),
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_round_trips_through_binary() {
        let mut req = Request::new(RequestPayload::Ping(PingRequestBody {
            max_response_size: 32,
        }))
        .unwrap();
        req.push_return_stack_item(ReturnStackItem::new(7, 1));

        let bytes = req.to_binary().unwrap();
        assert_eq!(bytes.len(), req.binary_size());

        let decoded = Request::from_binary(&bytes).unwrap();
        assert_eq!(decoded.payload(), req.payload());
        assert_eq!(decoded.return_stack().len(), 1);
    }

    #[test]
    fn rejects_response_size_below_minimum() {
        let err = Request::new(RequestPayload::Ping(PingRequestBody {
            max_response_size: 4,
        }))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn write_request_data_length_follows_size_in_bit() {
        let req = Request::new(RequestPayload::Write(WriteRequestBody {
            max_response_size: 64,
            access: AccessKind::SingleSubindex,
            index: 0x1000,
            subindex: 0,
            permissions: Attributes::new().with_readable(true).with_writable(true),
            size_in_bit: 16,
            data: vec![0x34, 0x12],
        }))
        .unwrap();
        let bytes = req.to_binary().unwrap();
        let decoded = Request::from_binary(&bytes).unwrap();
        match decoded.payload() {
            RequestPayload::Write(body) => assert_eq!(body.data, vec![0x34, 0x12]),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_type_code() {
        let bytes = [0xFFu8, LATEST_VERSION, 0];
        assert!(Request::from_binary(&bytes).is_err());
    }

    #[test]
    fn rejects_future_version() {
        let bytes = [0u8, LATEST_VERSION + 1, 0];
        assert!(Request::from_binary(&bytes).is_err());
    }
}
