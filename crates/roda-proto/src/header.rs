//! Common framing header and return-stack plumbing.

use binrw::prelude::*;

use crate::error::{Error, Result};

/// The latest common-header version this crate produces.
///
/// Decoders accept this version and any earlier version they know; there
/// are no earlier versions defined yet, so `1` is the only accepted value.
pub const LATEST_VERSION: u8 = 1;

/// Discriminates which request/response payload follows the common header.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
#[brw(repr(u8))]
pub enum TypeCode {
    Read = 0,
    Write = 1,
    ObjectEnum = 2,
    ObjectInfo = 3,
    Ping = 4,
}

impl TryFrom<u8> for TypeCode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(TypeCode::Read),
            1 => Ok(TypeCode::Write),
            2 => Ok(TypeCode::ObjectEnum),
            3 => Ok(TypeCode::ObjectInfo),
            4 => Ok(TypeCode::Ping),
            other => Err(Error::RuntimeError(format!("unknown type code {other}"))),
        }
    }
}

/// The 3-byte header common to every serialized request and response.
#[derive(BinRead, BinWrite, Debug, Clone, Copy)]
pub struct CommonHeader {
    pub type_code: u8,
    pub version: u8,
    pub return_stack_len: u8,
}

/// One routing breadcrumb pushed by a transport hop on the way to the
/// server, popped on the matching hop back.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
#[brw(little)]
pub struct ReturnStackItem {
    pub owner_id: u32,
    pub info: u32,
}

impl ReturnStackItem {
    pub const WIRE_SIZE: usize = 8;

    pub fn new(owner_id: u32, info: u32) -> Self {
        Self { owner_id, info }
    }
}

/// An ordered stack of [`ReturnStackItem`]s, bottom first. Only
/// push/pop/is-empty are exposed; random-index access is deliberately not
/// provided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnStack(Vec<ReturnStackItem>);

impl ReturnStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<ReturnStackItem>) -> Self {
        Self(items)
    }

    pub fn push(&mut self, item: ReturnStackItem) {
        self.0.push(item);
    }

    /// Removes and returns the top (innermost) item. Fails if the stack is
    /// empty.
    pub fn pop(&mut self) -> Result<ReturnStackItem> {
        self.0
            .pop()
            .ok_or_else(|| Error::LogicError("return stack is empty".into()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Replaces the stack wholesale, as used when moving it from a request
    /// to its response.
    pub fn set(&mut self, items: Vec<ReturnStackItem>) {
        self.0 = items;
    }

    pub fn wire_size(&self) -> usize {
        self.0.len() * ReturnStackItem::WIRE_SIZE
    }

    pub(crate) fn items(&self) -> &[ReturnStackItem] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_returns_innermost_item_first() {
        let mut stack = ReturnStack::new();
        stack.push(ReturnStackItem::new(1, 10));
        stack.push(ReturnStackItem::new(2, 20));
        assert_eq!(stack.pop().unwrap(), ReturnStackItem::new(2, 20));
        assert_eq!(stack.pop().unwrap(), ReturnStackItem::new(1, 10));
        assert!(stack.pop().is_err());
    }

    #[test]
    fn set_replaces_stack_wholesale() {
        let mut stack = ReturnStack::new();
        stack.push(ReturnStackItem::new(1, 10));
        stack.set(vec![ReturnStackItem::new(9, 90)]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop().unwrap(), ReturnStackItem::new(9, 90));
    }
}
