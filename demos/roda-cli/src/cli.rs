use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// How long to wait for a response before giving up, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Upper bound on the response size this client is willing to receive.
    #[arg(long, default_value_t = 4096)]
    pub max_response_size: u32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Checks that the dictionary server is alive.
    Ping(PingCmd),
    /// Reads a single subindex.
    Read(ReadCmd),
    /// Writes a single subindex.
    Write(WriteCmd),
    /// Lists the object indices in a range.
    Enumerate(EnumerateCmd),
    /// Describes the subindices of a single object.
    Info(InfoCmd),
}

#[derive(Parser)]
pub struct PingCmd;

#[derive(Parser)]
pub struct ReadCmd {
    /// Object index, e.g. 0x1018.
    #[arg(value_parser = parse_u16)]
    pub index: u16,
    /// Subindex within the object.
    pub subindex: u8,
}

#[derive(Parser)]
pub struct WriteCmd {
    /// Object index, e.g. 0x2000.
    #[arg(value_parser = parse_u16)]
    pub index: u16,
    /// Subindex within the object.
    pub subindex: u8,
    /// Data to write, as raw bytes of a UTF-8 string.
    pub value: String,
}

#[derive(Parser)]
pub struct EnumerateCmd {
    /// First index of the range to list, inclusive.
    #[arg(value_parser = parse_u16, default_value = "0x0000")]
    pub first_index: u16,
    /// Last index of the range to list, inclusive.
    #[arg(value_parser = parse_u16, default_value = "0xFFFF")]
    pub last_index: u16,
}

#[derive(Parser)]
pub struct InfoCmd {
    /// Object index to describe.
    #[arg(value_parser = parse_u16)]
    pub index: u16,
    /// First subindex of the range to describe, inclusive.
    #[arg(default_value_t = 0)]
    pub first_subindex: u8,
    /// Last subindex of the range to describe, inclusive.
    #[arg(default_value_t = 255)]
    pub last_subindex: u8,
}

fn parse_u16(s: &str) -> Result<u16, std::num::ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
}
