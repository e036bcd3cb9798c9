//! Access-kind discriminator and object attribute bitset.
//!
//! `modular_bitfield`'s generated accessors trip `unused_parens` on stable
//! today; allowed at module scope rather than papering over it per field.
#![allow(unused_parens)]

use binrw::prelude::*;
use modular_bitfield::prelude::*;

/// How a `Read`/`Write` request addresses a composite object.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
#[brw(repr(u8))]
pub enum AccessKind {
    SingleSubindex = 0,
    /// Reads/writes the whole object atomically; subindex 0 is an 8-bit
    /// highest-subindex marker.
    CompleteAccessSi0_8Bit = 1,
    /// As above, but subindex 0 is a 16-bit highest-subindex marker.
    CompleteAccessSi0_16Bit = 2,
}

/// CANopen-style object attribute flags, carried as `permissions` on
/// `Read`/`Write` requests, as `attrFilter` on `ObjectEnum`, and as
/// per-subindex `attributes` on `ObjectInfo` responses.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attributes {
    pub readable: bool,
    pub writable: bool,
    pub rpdo_mappable: bool,
    pub tpdo_mappable: bool,
    pub backup: bool,
    pub settable: bool,
    #[skip]
    __: B10,
}

impl BinRead for Attributes {
    type Args<'a> = ();

    fn read_options<R: std::io::Read + std::io::Seek>(
        reader: &mut R,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> binrw::BinResult<Self> {
        let raw = u16::read_options(reader, endian, ())?;
        Ok(Attributes::from_bytes(raw.to_le_bytes()))
    }
}

impl BinWrite for Attributes {
    type Args<'a> = ();

    fn write_options<W: std::io::Write + std::io::Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> binrw::BinResult<()> {
        let raw = u16::from_le_bytes(self.into_bytes());
        raw.write_options(writer, endian, ())
    }
}
