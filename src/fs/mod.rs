//! # File System Module
//!
//! File system modules handle interactions with directories and files on a mounted unit.
//! There is a sub-module for each supported kind of storage.
//!
//! A mounted unit is represented by the `Device` trait.  The trait object owns whatever
//! storage it needs (a host folder, or a disk image loaded into memory) and at most one
//! open file.  A session opens one file, streams it in or out, and closes it.
//!
//! Names passed to a `Device` are always native byte strings, decoding of the wire form
//! is done beforehand with `names::decode`.  The special name `$` is the directory listing,
//! which every device synthesizes on the fly, see `listing`.

pub mod names;
pub mod listing;
pub mod registry;
pub mod pc64;
pub mod d64;

#[cfg(test)]
mod names_test;
#[cfg(test)]
mod listing_test;

use std::fmt;
use std::io::Read;
use std::str::FromStr;
use num_derive::FromPrimitive;
use crate::{STDRESULT,DYNERR};

/// The native name that requests the directory listing
pub const DIRECTORY_NAME: &[u8] = b"$";

/// Enumerates file system errors.  The `Display` trait will print equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("file not found")]
    FileNotFound,
    #[error("no device at this unit")]
    DeviceNotPresent,
    #[error("write protected")]
    WriteProtected,
    #[error("no free local name for this file")]
    StorageExhausted,
    #[error("file is not open")]
    FileNotOpen,
    #[error("file is open in the wrong mode")]
    ModeMismatch,
    #[error("directory or file chain is damaged")]
    Damaged,
    #[error("directory listing is malformed")]
    ListingFormat,
    #[error("unknown kind of device")]
    UnknownDeviceKind,
    #[error("device must be given as UNIT:KIND:PATH")]
    DeviceSyntax
}

/// Direction of an open file
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum Mode {
    Read,
    Write
}

/// Kind of storage behind a unit
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum DeviceKind {
    /// folder of PC64 wrapped files
    Folder,
    /// D64 disk image
    Image
}

impl FromStr for DeviceKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "dir" => Ok(Self::Folder),
            "d64" => Ok(Self::Image),
            _ => Err(Error::UnknownDeviceKind)
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder => write!(f,"dir"),
            Self::Image => write!(f,"d64")
        }
    }
}

/// Enumerates the CBM DOS file types, the value is the low nibble of the directory type byte.
/// * u8 to FileType: `FileType::from_u8` (use FromPrimitive trait)
#[derive(FromPrimitive,PartialEq,Eq,Clone,Copy,Debug)]
pub enum FileType {
    Deleted = 0,
    Sequential = 1,
    Program = 2,
    User = 3,
    Relative = 4
}

impl FileType {
    /// Three letter mnemonic shown in listings
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Deleted => "DEL",
            Self::Sequential => "SEQ",
            Self::Program => "PRG",
            Self::User => "USR",
            Self::Relative => "REL"
        }
    }
}

/// A mounted drive unit.  Each session mounts its own instance.
pub trait Device {
    /// Open a file by native name.  The name `$` opens the directory listing for reading.
    fn open(&mut self,name: &[u8],mode: Mode) -> STDRESULT;
    /// Read up to `max_len` bytes, fewer are returned only at the end of the file.
    fn read(&mut self,max_len: usize) -> Result<Vec<u8>,DYNERR>;
    /// Append bytes to a file that is open for writing.
    fn write(&mut self,dat: &[u8]) -> STDRESULT;
    /// Close the open file, if any.
    fn close(&mut self) -> STDRESULT;
    /// Whether the native name would open for reading.
    fn exists(&mut self,name: &[u8]) -> bool;
    /// True when no bytes remain to be read.
    fn eof(&self) -> bool;
    /// Build the BASIC encoded directory listing.
    fn directory(&mut self) -> Result<Vec<u8>,DYNERR>;
}

/// Read until `max_len` bytes are gathered or the source is exhausted.
pub fn read_up_to<R: Read>(src: &mut R,max_len: usize) -> Result<Vec<u8>,DYNERR> {
    let mut ans: Vec<u8> = Vec::new();
    src.take(max_len as u64).read_to_end(&mut ans)?;
    Ok(ans)
}
