//! Response object model: the five response kinds, one of which
//! (`ReadResponse`) is an explicit error/ok state machine, and two of which
//! (`ObjectEnumResponse`, `ObjectInfoResponse`) may arrive as a sequence of
//! fragments that the caller reassembles (see [`crate::fragment`]).

use binrw::prelude::*;
use std::io::Cursor;

use crate::abort_code::AbortCode;
use crate::access::Attributes;
use crate::error::{Error, Result};
use crate::header::{LATEST_VERSION, ReturnStack, ReturnStackItem, TypeCode};
use roda_dtyp::DataType;

/// A single `subindex` entry returned by an `ObjectInfo` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubIndexInfo {
    pub subindex: u8,
    pub data_type: DataType,
    pub attributes: Attributes,
    pub max_size: u32,
    pub name: Option<String>,
    pub app_specific_meta: Option<Vec<u8>>,
}

impl SubIndexInfo {
    fn binary_size(&self) -> usize {
        1 + 2
            + 2
            + 4
            + 1
            + self.name.as_ref().map_or(0, |n| n.len())
            + 2
            + self.app_specific_meta.as_ref().map_or(0, |a| a.len())
    }

    fn write(&self, cursor: &mut Cursor<&mut Vec<u8>>) -> Result<()> {
        self.subindex.write_le(cursor)?;
        (self.data_type as u16).write_le(cursor)?;
        self.attributes.write_le(cursor)?;
        self.max_size.write_le(cursor)?;
        let name_bytes = self.name.as_deref().unwrap_or("").as_bytes();
        (name_bytes.len() as u8).write_le(cursor)?;
        std::io::Write::write_all(cursor, name_bytes)
            .map_err(|e| Error::RuntimeError(e.to_string()))?;
        let asm = self.app_specific_meta.as_deref().unwrap_or(&[]);
        (asm.len() as u16).write_le(cursor)?;
        std::io::Write::write_all(cursor, asm).map_err(|e| Error::RuntimeError(e.to_string()))?;
        Ok(())
    }

    fn read(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        let subindex = u8::read_le(cursor)?;
        let data_type_raw = u16::read_le(cursor)?;
        let data_type = DataType::try_from(data_type_raw)
            .map_err(|_| Error::InvalidArgument(format!("unknown data type {data_type_raw}")))?;
        let attributes = Attributes::read_le(cursor)?;
        let max_size = u32::read_le(cursor)?;
        let name_len = u8::read_le(cursor)? as usize;
        let mut name_buf = vec![0u8; name_len];
        std::io::Read::read_exact(cursor, &mut name_buf)
            .map_err(|e| Error::RuntimeError(e.to_string()))?;
        let name = if name_len == 0 {
            None
        } else {
            Some(String::from_utf8(name_buf).map_err(|e| Error::RuntimeError(e.to_string()))?)
        };
        let asm_len = u16::read_le(cursor)? as usize;
        let mut asm_buf = vec![0u8; asm_len];
        std::io::Read::read_exact(cursor, &mut asm_buf)
            .map_err(|e| Error::RuntimeError(e.to_string()))?;
        let app_specific_meta = if asm_len == 0 { None } else { Some(asm_buf) };
        Ok(Self {
            subindex,
            data_type,
            attributes,
            max_size,
            name,
            app_specific_meta,
        })
    }
}

/// Outcome of a `Read` request: either a terminal error or a successful
/// payload. Constructing with an `Ok` result and no data, or a non-`Ok`
/// result with data, is not representable through the public API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResponse {
    result: AbortCode,
    data: Option<Vec<u8>>,
    size_in_bit: usize,
}

impl ReadResponse {
    pub fn new_error(result: AbortCode) -> Result<Self> {
        if result.is_ok() {
            return Err(Error::InvalidArgument(
                "new_error requires a non-Ok abort code".into(),
            ));
        }
        Ok(Self {
            result,
            data: None,
            size_in_bit: 0,
        })
    }

    pub fn new_data(data: Vec<u8>, size_in_bit: usize) -> Result<Self> {
        check_data_matches_size(&data, size_in_bit)?;
        Ok(Self {
            result: AbortCode::Ok,
            data: Some(data),
            size_in_bit,
        })
    }

    pub fn set_error(&mut self, result: AbortCode) -> Result<()> {
        if result.is_ok() {
            return Err(Error::InvalidArgument(
                "set_error requires a non-Ok abort code".into(),
            ));
        }
        self.result = result;
        self.data = None;
        self.size_in_bit = 0;
        Ok(())
    }

    pub fn set_data(&mut self, data: Vec<u8>, size_in_bit: usize) -> Result<()> {
        check_data_matches_size(&data, size_in_bit)?;
        self.result = AbortCode::Ok;
        self.data = Some(data);
        self.size_in_bit = size_in_bit;
        Ok(())
    }

    pub fn result(&self) -> AbortCode {
        self.result
    }

    pub fn get_data(&self) -> Result<&[u8]> {
        match (&self.data, self.result.is_ok()) {
            (Some(data), true) => Ok(data),
            _ => Err(Error::LogicError(
                "get_data called on a response without a successful result".into(),
            )),
        }
    }

    /// Size of the encapsulated data, in bit.
    pub fn get_data_size(&self) -> Result<usize> {
        if !self.result.is_ok() {
            return Err(Error::LogicError(
                "get_data_size called on a response without a successful result".into(),
            ));
        }
        Ok(self.size_in_bit)
    }

    fn binary_size(&self) -> usize {
        4 + if self.result.is_ok() {
            3 + self.data.as_ref().map_or(0, Vec::len)
        } else {
            0
        }
    }

    fn write(&self, cursor: &mut Cursor<&mut Vec<u8>>) -> Result<()> {
        self.result.write_le(cursor)?;
        if let Some(data) = &self.data {
            (data.len() as u16).write_le(cursor)?;
            let bits_in_last_byte: u8 = if data.is_empty() {
                0
            } else {
                match (self.size_in_bit % 8) as u8 {
                    0 => 8,
                    b => b,
                }
            };
            bits_in_last_byte.write_le(cursor)?;
            std::io::Write::write_all(cursor, data)
                .map_err(|e| Error::RuntimeError(e.to_string()))?;
        }
        Ok(())
    }

    fn read(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        let result = AbortCode::read_le(cursor)?;
        if !result.is_ok() {
            return Ok(Self {
                result,
                data: None,
                size_in_bit: 0,
            });
        }
        let nb_bytes = u16::read_le(cursor)? as usize;
        let bits_in_last_byte = u8::read_le(cursor)?;
        if nb_bytes == 0 {
            if bits_in_last_byte != 0 {
                return Err(Error::RuntimeError(
                    "read response carries no data but a non-zero bit count".into(),
                ));
            }
            return Ok(Self {
                result,
                data: Some(Vec::new()),
                size_in_bit: 0,
            });
        }
        if !(1..=8).contains(&bits_in_last_byte) {
            return Err(Error::RuntimeError(format!(
                "read response bits-in-last-byte out of range: {bits_in_last_byte}"
            )));
        }
        let mut data = vec![0u8; nb_bytes];
        std::io::Read::read_exact(cursor, &mut data)
            .map_err(|e| Error::RuntimeError(e.to_string()))?;
        let size_in_bit = (nb_bytes - 1) * 8 + bits_in_last_byte as usize;
        Ok(Self {
            result,
            data: Some(data),
            size_in_bit,
        })
    }
}

fn check_data_matches_size(data: &[u8], size_in_bit: usize) -> Result<()> {
    if data.len() > u16::MAX as usize {
        return Err(Error::InvalidArgument(
            "data exceeds the maximum representable read response size".into(),
        ));
    }
    if data.len() != size_in_bit.div_ceil(8) {
        return Err(Error::InvalidArgument(
            "data length does not match size_in_bit".into(),
        ));
    }
    Ok(())
}

/// Outcome of a `Write` request: a plain abort code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResponse {
    result: AbortCode,
}

impl WriteResponse {
    pub fn new(result: AbortCode) -> Self {
        Self { result }
    }

    pub fn set_result(&mut self, result: AbortCode) {
        self.result = result;
    }

    pub fn result(&self) -> AbortCode {
        self.result
    }

    fn binary_size(&self) -> usize {
        4
    }

    fn write(&self, cursor: &mut Cursor<&mut Vec<u8>>) -> Result<()> {
        self.result.write_le(cursor)?;
        Ok(())
    }

    fn read(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        Ok(Self {
            result: AbortCode::read_le(cursor)?,
        })
    }
}

/// A (possibly partial) listing of an object dictionary's indices. See
/// [`crate::fragment`] for how successive fragments are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEnumResponse {
    result: AbortCode,
    indices: Vec<u16>,
    complete: bool,
}

impl ObjectEnumResponse {
    pub fn new_error(result: AbortCode) -> Result<Self> {
        if result.is_ok() {
            return Err(Error::InvalidArgument(
                "new_error requires a non-Ok abort code".into(),
            ));
        }
        Ok(Self {
            result,
            indices: Vec::new(),
            complete: true,
        })
    }

    pub fn new_fragment(indices: Vec<u16>, complete: bool) -> Result<Self> {
        if indices.len() > crate::size::MAX_INDEX_CAPACITY as usize {
            return Err(Error::InvalidArgument("indices is too large".into()));
        }
        if !complete {
            match indices.last() {
                None => {
                    return Err(Error::InvalidArgument(
                        "incomplete enumeration fragment has no items".into(),
                    ));
                }
                Some(0xFFFF) => {
                    return Err(Error::InvalidArgument(
                        "incomplete enumeration fragment includes 0xFFFF".into(),
                    ));
                }
                _ => {}
            }
            if indices.len() == crate::size::MAX_INDEX_CAPACITY as usize {
                return Err(Error::InvalidArgument(
                    "incomplete enumeration fragment already includes every index".into(),
                ));
            }
        }
        let mut prev: i32 = -1;
        for &index in &indices {
            if i32::from(index) <= prev {
                return Err(Error::InvalidArgument(
                    "indices are not strictly ascending".into(),
                ));
            }
            prev = i32::from(index);
        }
        Ok(Self {
            result: AbortCode::Ok,
            indices,
            complete,
        })
    }

    pub fn result(&self) -> AbortCode {
        self.result
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn indices(&self) -> Result<&[u16]> {
        if !self.result.is_ok() {
            return Err(Error::LogicError(
                "indices called on a non-Ok enumeration response".into(),
            ));
        }
        Ok(&self.indices)
    }

    pub(crate) fn extend_with(&mut self, mut more: Vec<u16>, complete: bool) {
        self.indices.append(&mut more);
        self.complete = complete;
    }

    fn binary_size(&self) -> usize {
        4 + if self.result.is_ok() {
            1 + self.indices.len() * 2
        } else {
            0
        }
    }

    fn write(&self, cursor: &mut Cursor<&mut Vec<u8>>) -> Result<()> {
        self.result.write_le(cursor)?;
        if self.result.is_ok() {
            (!self.complete as u8).write_le(cursor)?;
            for index in &self.indices {
                index.write_le(cursor)?;
            }
        }
        Ok(())
    }

    fn read(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        let result = AbortCode::read_le(cursor)?;
        if !result.is_ok() {
            return Ok(Self {
                result,
                indices: Vec::new(),
                complete: true,
            });
        }
        let more_fragments = u8::read_le(cursor)? != 0;
        let mut indices = Vec::new();
        loop {
            match u16::read_le(cursor) {
                Ok(index) => indices.push(index),
                Err(binrw::Error::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(Self {
            result,
            indices,
            complete: !more_fragments,
        })
    }
}

/// A (possibly partial) description of a single object's subindices. See
/// [`crate::fragment`] for how successive fragments are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfoResponse {
    result: AbortCode,
    subindices: Vec<SubIndexInfo>,
    complete: bool,
}

impl ObjectInfoResponse {
    pub fn new_error(result: AbortCode) -> Result<Self> {
        if result.is_ok() {
            return Err(Error::InvalidArgument(
                "new_error requires a non-Ok abort code".into(),
            ));
        }
        Ok(Self {
            result,
            subindices: Vec::new(),
            complete: true,
        })
    }

    pub fn new_fragment(subindices: Vec<SubIndexInfo>, complete: bool) -> Self {
        Self {
            result: AbortCode::Ok,
            subindices,
            complete,
        }
    }

    pub fn result(&self) -> AbortCode {
        self.result
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn subindices(&self) -> Result<&[SubIndexInfo]> {
        if !self.result.is_ok() {
            return Err(Error::LogicError(
                "subindices called on a non-Ok object-info response".into(),
            ));
        }
        Ok(&self.subindices)
    }

    pub(crate) fn extend_with(&mut self, mut more: Vec<SubIndexInfo>, complete: bool) {
        self.subindices.append(&mut more);
        self.complete = complete;
    }

    fn binary_size(&self) -> usize {
        4 + if self.result.is_ok() {
            1 + 1
                + self
                    .subindices
                    .iter()
                    .map(SubIndexInfo::binary_size)
                    .sum::<usize>()
        } else {
            0
        }
    }

    fn write(&self, cursor: &mut Cursor<&mut Vec<u8>>) -> Result<()> {
        self.result.write_le(cursor)?;
        if self.result.is_ok() {
            (self.subindices.len() as u8).write_le(cursor)?;
            (!self.complete as u8).write_le(cursor)?;
            for entry in &self.subindices {
                entry.write(cursor)?;
            }
        }
        Ok(())
    }

    fn read(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        let result = AbortCode::read_le(cursor)?;
        if !result.is_ok() {
            return Ok(Self {
                result,
                subindices: Vec::new(),
                complete: true,
            });
        }
        let count = u8::read_le(cursor)? as usize;
        let more_fragments = u8::read_le(cursor)? != 0;
        let mut subindices = Vec::with_capacity(count);
        for _ in 0..count {
            subindices.push(SubIndexInfo::read(cursor)?);
        }
        Ok(Self {
            result,
            subindices,
            complete: !more_fragments,
        })
    }
}

/// Outcome of a `Ping` request: liveness only, no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PingResponse;

impl PingResponse {
    fn binary_size(&self) -> usize {
        0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePayload {
    Read(ReadResponse),
    Write(WriteResponse),
    ObjectEnum(ObjectEnumResponse),
    ObjectInfo(ObjectInfoResponse),
    Ping(PingResponse),
}

impl ResponsePayload {
    pub fn type_code(&self) -> TypeCode {
        match self {
            ResponsePayload::Read(_) => TypeCode::Read,
            ResponsePayload::Write(_) => TypeCode::Write,
            ResponsePayload::ObjectEnum(_) => TypeCode::ObjectEnum,
            ResponsePayload::ObjectInfo(_) => TypeCode::ObjectInfo,
            ResponsePayload::Ping(_) => TypeCode::Ping,
        }
    }

    pub fn binary_size(&self) -> usize {
        match self {
            ResponsePayload::Read(r) => r.binary_size(),
            ResponsePayload::Write(r) => r.binary_size(),
            ResponsePayload::ObjectEnum(r) => r.binary_size(),
            ResponsePayload::ObjectInfo(r) => r.binary_size(),
            ResponsePayload::Ping(r) => r.binary_size(),
        }
    }

    fn write(&self, cursor: &mut Cursor<&mut Vec<u8>>) -> Result<()> {
        match self {
            ResponsePayload::Read(r) => r.write(cursor),
            ResponsePayload::Write(r) => r.write(cursor),
            ResponsePayload::ObjectEnum(r) => r.write(cursor),
            ResponsePayload::ObjectInfo(r) => r.write(cursor),
            ResponsePayload::Ping(_) => Ok(()),
        }
    }

    fn read(type_code: TypeCode, cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        Ok(match type_code {
            TypeCode::Read => ResponsePayload::Read(ReadResponse::read(cursor)?),
            TypeCode::Write => ResponsePayload::Write(WriteResponse::read(cursor)?),
            TypeCode::ObjectEnum => ResponsePayload::ObjectEnum(ObjectEnumResponse::read(cursor)?),
            TypeCode::ObjectInfo => ResponsePayload::ObjectInfo(ObjectInfoResponse::read(cursor)?),
            TypeCode::Ping => ResponsePayload::Ping(PingResponse),
        })
    }
}

/// A RODA response: the return stack copied from its request, and a typed
/// payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    return_stack: ReturnStack,
    payload: ResponsePayload,
}

impl Response {
    pub fn new(return_stack: ReturnStack, payload: ResponsePayload) -> Self {
        Self {
            return_stack,
            payload,
        }
    }

    pub fn payload(&self) -> &ResponsePayload {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut ResponsePayload {
        &mut self.payload
    }

    pub fn return_stack(&self) -> &ReturnStack {
        &self.return_stack
    }

    pub fn return_stack_mut(&mut self) -> &mut ReturnStack {
        &mut self.return_stack
    }

    pub fn binary_size(&self) -> usize {
        3 + self.return_stack.wire_size() + self.payload.binary_size()
    }

    pub fn to_binary(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.binary_size());
        {
            let mut cursor = Cursor::new(&mut buf);
            self.payload.type_code().write_le(&mut cursor)?;
            LATEST_VERSION.write_le(&mut cursor)?;
            (self.return_stack.items().len() as u8).write_le(&mut cursor)?;
            for item in self.return_stack.items() {
                item.write_le(&mut cursor)?;
            }
            self.payload.write(&mut cursor)?;
        }
        Ok(buf)
    }

    /// Deserializes a response from a complete wire-format buffer. Acts as
    /// the sole entry point into the per-variant reader constructors,
    /// which are otherwise private to this crate.
    ///
    /// Rejects unknown type codes and versions newer than
    /// [`LATEST_VERSION`].
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
                "unsupported response version {version}, latest known is {LATEST_VERSION}"
            )));
        }
        let return_stack_len = bytes[2] as usize;
        let mut cursor = Cursor::new(&bytes[3..]);
        let mut items = Vec::with_capacity(return_stack_len);
        for _ in 0..return_stack_len {
            items.push(ReturnStackItem::read_le(&mut cursor)?);
        }
        let payload = ResponsePayload::read(type_code, &mut cursor)?;
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
    fn read_response_round_trips_ok_data() {
        let resp = Response::new(
            ReturnStack::new(),
            ResponsePayload::Read(ReadResponse::new_data(vec![1, 2, 3, 4], 32).unwrap()),
        );
        let bytes = resp.to_binary().unwrap();
        assert_eq!(bytes.len(), resp.binary_size());
        let decoded = Response::from_binary(&bytes).unwrap();
        match decoded.payload() {
            ResponsePayload::Read(r) => {
                assert_eq!(r.get_data().unwrap(), &[1, 2, 3, 4]);
                assert_eq!(r.get_data_size().unwrap(), 32);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn read_response_carries_a_partial_last_byte() {
        let resp = Response::new(
            ReturnStack::new(),
            ResponsePayload::Read(ReadResponse::new_data(vec![0xFF, 0x1F], 13).unwrap()),
        );
        let bytes = resp.to_binary().unwrap();
        let decoded = Response::from_binary(&bytes).unwrap();
        match decoded.payload() {
            ResponsePayload::Read(r) => {
                assert_eq!(r.get_data().unwrap(), &[0xFF, 0x1F]);
                assert_eq!(r.get_data_size().unwrap(), 13);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn read_response_rejects_data_len_mismatched_with_size_in_bit() {
        assert!(ReadResponse::new_data(vec![1, 2, 3, 4], 24).is_err());
    }

    #[test]
    fn read_response_round_trips_error() {
        let resp = Response::new(
            ReturnStack::new(),
            ResponsePayload::Read(ReadResponse::new_error(AbortCode::ObjectDoesNotExist).unwrap()),
        );
        let bytes = resp.to_binary().unwrap();
        let decoded = Response::from_binary(&bytes).unwrap();
        match decoded.payload() {
            ResponsePayload::Read(r) => {
                assert_eq!(r.result(), AbortCode::ObjectDoesNotExist);
                assert!(r.get_data().is_err());
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn read_response_rejects_ok_with_no_data_constructed_as_error() {
        assert!(ReadResponse::new_error(AbortCode::Ok).is_err());
    }

    #[test]
    fn object_enum_response_round_trips_with_more_fragments() {
        let resp = Response::new(
            ReturnStack::new(),
            ResponsePayload::ObjectEnum(
                ObjectEnumResponse::new_fragment(vec![0x1000, 0x1001, 0x1018], false).unwrap(),
            ),
        );
        let bytes = resp.to_binary().unwrap();
        let decoded = Response::from_binary(&bytes).unwrap();
        match decoded.payload() {
            ResponsePayload::ObjectEnum(r) => {
                assert!(!r.is_complete());
                assert_eq!(r.indices().unwrap(), &[0x1000, 0x1001, 0x1018]);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn object_enum_fragment_rejects_unsorted_indices() {
        assert!(ObjectEnumResponse::new_fragment(vec![0x1001, 0x1000], true).is_err());
    }

    #[test]
    fn object_enum_fragment_rejects_empty_incomplete_listing() {
        assert!(ObjectEnumResponse::new_fragment(Vec::new(), false).is_err());
    }

    #[test]
    fn object_enum_fragment_rejects_incomplete_listing_ending_in_0xffff() {
        assert!(ObjectEnumResponse::new_fragment(vec![0x1000, 0xFFFF], false).is_err());
    }

    #[test]
    fn object_info_response_round_trips_subindices() {
        let entry = SubIndexInfo {
            subindex: 0,
            data_type: DataType::Unsigned32,
            attributes: Attributes::new().with_readable(true),
            max_size: 32,
            name: Some("highest sub-index supported".into()),
            app_specific_meta: None,
        };
        let resp = Response::new(
            ReturnStack::new(),
            ResponsePayload::ObjectInfo(ObjectInfoResponse::new_fragment(
                vec![entry.clone()],
                true,
            )),
        );
        let bytes = resp.to_binary().unwrap();
        let decoded = Response::from_binary(&bytes).unwrap();
        match decoded.payload() {
            ResponsePayload::ObjectInfo(r) => {
                assert!(r.is_complete());
                assert_eq!(r.subindices().unwrap(), &[entry]);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn ping_response_has_no_payload_bytes() {
        let resp = Response::new(ReturnStack::new(), ResponsePayload::Ping(PingResponse));
        let bytes = resp.to_binary().unwrap();
        assert_eq!(bytes.len(), 3);
        let decoded = Response::from_binary(&bytes).unwrap();
        assert_eq!(decoded.payload(), &ResponsePayload::Ping(PingResponse));
    }
}
