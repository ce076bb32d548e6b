//! # Disk Image Module
//!
//! Disk images are represented by objects implementing the `DiskImage` trait.
//! The object type is named for the disk image type that it handles, e.g., `D64`.
//!
//! ## Basic Functions
//!
//! The trait includes reading and writing sectors addressed by track and sector,
//! using the numbering printed on the drive's own error channel: tracks start at 1,
//! sectors start at 0.  The number of sectors in a track depends on the zone the
//! track lies in, so a sector address cannot be computed without the geometry table.
//!
//! ## Relation to File Systems
//!
//! The `DiskImage` trait object serves as the underlying storage for `fs::d64`.
//! The file system works by reading sectors from the disk image.  The disk image
//! never interprets the sectors, and refuses any address outside its geometry.

pub mod d64;

use crate::{STDRESULT,DYNERR};
use a2kit_macro::DiskStructError;

/// Enumerates disk image errors.  The `Display` trait will print equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("track count did not match request")]
    TrackCountMismatch,
    #[error("image size did not match the request")]
    ImageSizeMismatch,
    #[error("unable to access sector")]
    SectorAccess
}

/// The main trait for working with any kind of disk image.
pub trait DiskImage {
    fn track_count(&self) -> usize;
    /// Total sectors on the disk, this bounds any chain of sectors
    fn sector_count(&self) -> usize;
    fn byte_capacity(&self) -> usize;
    fn read_sector(&self,track: usize,sector: usize) -> Result<Vec<u8>,DYNERR>;
    fn write_sector(&mut self,track: usize,sector: usize,dat: &[u8]) -> STDRESULT;
    fn from_bytes(data: &[u8]) -> Result<Self,DiskStructError> where Self: Sized;
    fn to_bytes(&self) -> Vec<u8>;
}

/// Pad or truncate data to the sector size.
pub fn quantize_block(src: &[u8],block_size: usize) -> Vec<u8> {
    let mut padded: Vec<u8> = Vec::new();
    for i in 0..block_size {
        if i<src.len() {
            padded.push(src[i])
        } else {
            padded.push(0);
        }
    }
    return padded;
}
