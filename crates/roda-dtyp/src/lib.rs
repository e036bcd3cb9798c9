//! CANopen data-type codec for the RODA remote object-dictionary protocol.
//!
//! This crate is the leaf layer: it knows nothing about requests,
//! responses, or transports. It only knows how to convert between a
//! CANopen wire value (a run of bits) and its textual rendering.

pub mod bitio;
mod codec;
mod data_type;
pub mod error;

pub use bitio::{BitReader, BitWriter};
pub use codec::{decode, encode};
pub use data_type::DataType;
pub use error::{Error, Result};
