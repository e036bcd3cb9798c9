//! CANopen data-type enumeration and bit-width lookup tables.

/// The closed set of CANopen data types a RODA object dictionary subindex
/// can carry, tagged by its 16-bit object-dictionary code.
///
/// Reference: CiA 301, table "Data type entry usage".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DataType {
    Boolean = 0x0001,
    Integer8 = 0x0002,
    Integer16 = 0x0003,
    Integer32 = 0x0004,
    Unsigned8 = 0x0005,
    Unsigned16 = 0x0006,
    Unsigned32 = 0x0007,
    Real32 = 0x0008,
    VisibleString = 0x0009,
    OctetString = 0x000A,
    UnicodeString = 0x000B,
    Integer24 = 0x0010,
    Real64 = 0x0011,
    Integer40 = 0x0012,
    Integer48 = 0x0013,
    Integer56 = 0x0014,
    Integer64 = 0x0015,
    Unsigned24 = 0x0016,
    Unsigned40 = 0x0018,
    Unsigned48 = 0x0019,
    Unsigned56 = 0x001A,
    Unsigned64 = 0x001B,

    /// Structural marker: gap subindex. Carries no payload of its own, but
    /// consumes bits in a bit-stuffed run of adjacent subindices.
    Null = 0x0000,
    /// Meta-only marker: identity object record.
    Identity = 0x0023,
    /// Meta-only marker: PDO mapping record.
    PdoMapping = 0x0021,
    /// Meta-only marker: generic record object.
    Record = 0x0022,

    Bit1 = 0x0030,
    Bit2 = 0x0031,
    Bit3 = 0x0032,
    Bit4 = 0x0033,
    Bit5 = 0x0034,
    Bit6 = 0x0035,
    Bit7 = 0x0036,
    Bit8 = 0x0037,

    /// Alternative native representation of [`DataType::Boolean`] that packs
    /// into a single bit natively instead of occupying a full byte.
    /// Canonically reported as [`DataType::Boolean`].
    BooleanNativeBit1 = 0x0040,
}

impl TryFrom<u16> for DataType {
    type Error = crate::Error;

    fn try_from(value: u16) -> crate::Result<Self> {
        use DataType::*;
        Ok(match value {
            0x0000 => Null,
            0x0001 => Boolean,
            0x0002 => Integer8,
            0x0003 => Integer16,
            0x0004 => Integer32,
            0x0005 => Unsigned8,
            0x0006 => Unsigned16,
            0x0007 => Unsigned32,
            0x0008 => Real32,
            0x0009 => VisibleString,
            0x000A => OctetString,
            0x000B => UnicodeString,
            0x0010 => Integer24,
            0x0011 => Real64,
            0x0012 => Integer40,
            0x0013 => Integer48,
            0x0014 => Integer56,
            0x0015 => Integer64,
            0x0016 => Unsigned24,
            0x0018 => Unsigned40,
            0x0019 => Unsigned48,
            0x001A => Unsigned56,
            0x001B => Unsigned64,
            0x0021 => PdoMapping,
            0x0022 => Record,
            0x0023 => Identity,
            0x0030 => Bit1,
            0x0031 => Bit2,
            0x0032 => Bit3,
            0x0033 => Bit4,
            0x0034 => Bit5,
            0x0035 => Bit6,
            0x0036 => Bit7,
            0x0037 => Bit8,
            0x0040 => BooleanNativeBit1,
            other => {
                return Err(crate::Error::InvalidArgument(format!(
                    "unknown data type code {other:#06x}"
                )));
            }
        })
    }
}

impl DataType {
    /// The CANopen wire width, in bits, for a single instance of this type.
    ///
    /// `0` for structural marker types that carry no payload by themselves.
    pub fn wire_bit_width(self) -> u32 {
        use DataType::*;
        match self {
            Null => 0,
            Boolean | BooleanNativeBit1 => 1,
            Bit1 => 1,
            Bit2 => 2,
            Bit3 => 3,
            Bit4 => 4,
            Bit5 => 5,
            Bit6 => 6,
            Bit7 => 7,
            Bit8 => 8,
            Integer8 | Unsigned8 => 8,
            Integer16 | Unsigned16 => 16,
            Integer24 | Unsigned24 => 24,
            Integer32 | Unsigned32 | Real32 => 32,
            Integer40 | Unsigned40 => 40,
            Integer48 | Unsigned48 => 48,
            Integer56 | Unsigned56 => 56,
            Integer64 | Unsigned64 | Real64 => 64,
            VisibleString | OctetString | UnicodeString => 0,
            Identity | PdoMapping | Record => 0,
        }
    }

    /// The native (in-memory) representation width, in bits.
    ///
    /// Differs from [`Self::wire_bit_width`] for [`DataType::Boolean`],
    /// whose native form is a full byte.
    pub fn native_bit_width(self) -> u32 {
        match self {
            DataType::Boolean => 8,
            other => other.wire_bit_width(),
        }
    }

    /// True for types whose wire form occupies fewer than 8 bits and is
    /// addressed bit-by-bit rather than byte-by-byte.
    pub fn is_bit_based(self) -> bool {
        use DataType::*;
        matches!(
            self,
            Null | Boolean
                | BooleanNativeBit1
                | Bit1
                | Bit2
                | Bit3
                | Bit4
                | Bit5
                | Bit6
                | Bit7
                | Bit8
        )
    }

    /// True for types whose *native* representation permits cross-byte bit
    /// packing of adjacent subindices (i.e. everything bit-based except
    /// [`DataType::Boolean`], which always occupies a full native byte).
    pub fn is_native_stuffed(self) -> bool {
        use DataType::*;
        matches!(
            self,
            Null | BooleanNativeBit1 | Bit1 | Bit2 | Bit3 | Bit4 | Bit5 | Bit6 | Bit7 | Bit8
        )
    }

    /// Collapses "alternative" types that differ only in native
    /// representation to their canonical CANopen type. All other types map
    /// to themselves.
    pub fn map_to_canonical(self) -> DataType {
        match self {
            DataType::BooleanNativeBit1 => DataType::Boolean,
            other => other,
        }
    }

    /// True for the reserved byte widths that are not supported for textual
    /// conversion (24/40/48/56-bit integers).
    pub fn is_unsupported_width(self) -> bool {
        use DataType::*;
        matches!(
            self,
            Integer24
                | Unsigned24
                | Integer40
                | Unsigned40
                | Integer48
                | Unsigned48
                | Integer56
                | Unsigned56
        )
    }
}
