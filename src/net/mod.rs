//! # Network Module
//!
//! The computer reaches the drive through a dialect of TFTP.  A request names a file,
//! optionally prefixed by the unit, e.g. `9/GAME`.  The transfer then proceeds in numbered
//! blocks of 256 bytes, each answered by an acknowledgment, until a short block ends it.
//!
//! * `packet` encodes and decodes datagrams
//! * `session` runs one transfer as a state machine over a `Transport`
//! * `server` owns the UDP endpoint and runs sessions one after another

pub mod packet;
pub mod session;
pub mod server;

#[cfg(test)]
mod packet_test;

/// Default UDP port, 53280 is the border color register of the C64 ($D020)
pub const DEFAULT_PORT: u16 = 53280;
/// Block size of every transfer, a `blksize` option does not change it
pub const DEFAULT_BLOCK_SIZE: usize = 256;

/// Enumerates protocol errors.  The `Display` trait will print equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("packet is too short")]
    Truncated,
    #[error("unknown opcode")]
    UnknownOpcode,
    #[error("string field is not terminated")]
    Unterminated,
    #[error("server is not bound")]
    NotBound
}
