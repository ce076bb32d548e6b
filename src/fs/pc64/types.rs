use a2kit_macro::DiskStruct;
use a2kit_macro_derive::DiskStruct;
use crate::fs::names;
use crate::fs::FileType;

pub const MAGIC: [u8;8] = *b"C64File\0";
pub const HEADER_SIZE: usize = 26;
/// bytes of payload per block when counting blocks in listings
pub const BLOCK_SIZE: usize = 256;

/// Header that precedes the payload of every PC64 wrapped file
#[derive(DiskStruct)]
pub struct Header {
    pub magic: [u8;8],
    /// native name, padded with NUL
    pub name: [u8;16],
    /// record length for REL files, otherwise 0
    pub reserved: [u8;2]
}

impl Header {
    pub fn create(native: &[u8]) -> Self {
        let mut ans = Self::new();
        ans.magic = MAGIC;
        let truncated = names::truncate(native);
        ans.name[0..truncated.len()].copy_from_slice(truncated);
        ans
    }
    /// Parse the start of a file, None if it is too short or lacks the magic.
    pub fn from_file_start(dat: &[u8]) -> Option<Self> {
        if dat.len() < HEADER_SIZE {
            return None;
        }
        match Self::from_bytes(&dat[0..HEADER_SIZE]) {
            Ok(h) if h.magic==MAGIC => Some(h),
            _ => None
        }
    }
    /// Native name without padding
    pub fn native_name(&self) -> Vec<u8> {
        names::strip_padding(&self.name).0.to_vec()
    }
}

/// File type implied by a PC64 extension such as `p00` or `S01`
pub fn type_from_extension(ext: &str) -> Option<FileType> {
    match ext.to_lowercase().chars().next() {
        Some('p') => Some(FileType::Program),
        Some('s') => Some(FileType::Sequential),
        Some('u') => Some(FileType::User),
        Some('r') => Some(FileType::Relative),
        _ => None
    }
}

#[test]
fn test_header() {
    let h = Header::create(b"ABCDEFGHIJKLMNOPQRS");
    let bytes = h.to_bytes();
    assert_eq!(h.len(),HEADER_SIZE);
    assert_eq!(bytes[0..8],*b"C64File\0");
    assert_eq!(bytes[8..24],*b"ABCDEFGHIJKLMNOP");
    assert_eq!(Header::from_bytes(&bytes).expect("bad header").native_name(),b"ABCDEFGHIJKLMNOP".to_vec());
    assert!(Header::from_file_start(&bytes[0..25]).is_none());
    let short = Header::create(b"GAME");
    assert_eq!(short.native_name(),b"GAME".to_vec());
    assert_eq!(short.to_bytes()[12..24],[0;12]);
}
