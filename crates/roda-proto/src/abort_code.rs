//! SDO-style abort codes.
//!
//! A macro generates the enum, its `Display` impl, and a `U32_*` constant
//! per variant, plus a `TryFrom<u32>` that rejects unknown values.

use binrw::prelude::*;

macro_rules! make_abort_code {
    ( $($name:ident = $value:literal : $description:literal, )+ ) => {

/// SDO-style abort code. `OK` is the unique success value; every other
/// value is an error outcome.
///
/// Reference: CiA 301, table "SDO abort codes".
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
#[brw(repr(u32))]
#[repr(u32)]
pub enum AbortCode {
    $(
        #[doc = concat!($description, " (", stringify!($value), ")")]
        $name = $value,
    )+
}

impl std::fmt::Display for AbortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            $( AbortCode::$name => $description, )+
        };
        write!(f, "{text} ({:#010x})", *self as u32)
    }
}

impl AbortCode {
    pastey::paste! {
        $(
            #[doc = concat!("[`", stringify!($name), "`][Self::", stringify!($name), "] as u32")]
            pub const [<U32_ $name:snake:upper>]: u32 = $value;
        )+
    }

    /// True for the unique success value.
    pub fn is_ok(self) -> bool {
        matches!(self, AbortCode::Ok)
    }
}

impl TryFrom<u32> for AbortCode {
    type Error = crate::Error;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        use std::io::Cursor;
        AbortCode::read_le(&mut Cursor::new(value.to_le_bytes()))
            .map_err(|_| crate::Error::InvalidArgument(format!("unknown abort code {value:#010x}")))
    }
}

impl From<AbortCode> for u32 {
    fn from(value: AbortCode) -> Self {
        value as u32
    }
}
    };
}

make_abort_code! {
    Ok = 0x0000_0000: "Success",
    ToggleBitNotAlternated = 0x0503_0000: "Toggle bit not alternated",
    SdoProtocolTimedOut = 0x0504_0000: "SDO protocol timed out",
    CommandSpecifierInvalid = 0x0504_0001: "Client/server command specifier not valid or unknown",
    OutOfMemory = 0x0504_0005: "Out of memory",
    UnsupportedAccess = 0x0601_0000: "Unsupported access to an object",
    AttemptToReadWriteOnlyObject = 0x0601_0001: "Attempt to read a write-only object",
    AttemptToWriteReadOnlyObject = 0x0601_0002: "Attempt to write a read-only object",
    ObjectDoesNotExist = 0x0602_0000: "Object does not exist in the object dictionary",
    ObjectCannotBeMappedToPdo = 0x0604_0041: "Object cannot be mapped to the PDO",
    PdoLengthExceeded = 0x0604_0042: "The number and length of the objects to be mapped would exceed PDO length",
    GeneralParameterIncompatibility = 0x0604_0043: "General parameter incompatibility reason",
    GeneralInternalIncompatibility = 0x0604_0047: "General internal incompatibility in the device",
    AccessFailedDueToHardwareError = 0x0606_0000: "Access failed due to a hardware error",
    DataTypeMismatchLengthError = 0x0607_0010: "Data type does not match, length of service parameter does not match",
    DataTypeMismatchTooLong = 0x0607_0012: "Data type does not match, length of service parameter too high",
    DataTypeMismatchTooShort = 0x0607_0013: "Data type does not match, length of service parameter too low",
    SubindexDoesNotExist = 0x0609_0011: "Sub-index does not exist",
    ValueRangeExceeded = 0x0609_0030: "Value range of parameter exceeded",
    ValueTooHigh = 0x0609_0031: "Value of parameter written too high",
    ValueTooLow = 0x0609_0032: "Value of parameter written too low",
    GeneralError = 0x0800_0000: "General error",
    DataTransferOrStoreFailed = 0x0800_0020: "Data cannot be transferred or stored to the application",
    DataTransferLocalControlFailed = 0x0800_0021: "Data cannot be transferred or stored due to local control",
    DataTransferDeviceStateFailed = 0x0800_0022: "Data cannot be transferred or stored due to the present device state",
    NoDataAvailable = 0x0800_0023: "No data available",

    // RODA-specific, non-CANopen outcomes carried over the same code space.
    RequestTooLarge = 0xF000_0001: "Request exceeds the negotiated request-size budget",
    ResponseTooLargeForBudget = 0xF000_0002: "No response fits within the requested maxResponseSize",
    NotReady = 0xF000_0003: "The RODA endpoint is not ready",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_round_trips() {
        let code = AbortCode::try_from(0u32).unwrap();
        assert!(code.is_ok());
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(AbortCode::try_from(0xDEAD_BEEF).is_err());
    }

    #[test]
    fn display_includes_hex_value() {
        let text = format!("{}", AbortCode::ObjectDoesNotExist);
        assert!(text.contains("0x06020000"));
    }
}
