use a2kit_macro::{DiskStructError,DiskStruct};
use a2kit_macro_derive::DiskStruct;
use num_traits::FromPrimitive;
use crate::fs::FileType;

pub const DIR_TRACK: usize = 18;
pub const BAM_SECTOR: usize = 0;
pub const FIRST_DIR_SECTOR: usize = 1;
pub const ENTRY_SIZE: usize = 32;
pub const ENTRIES_PER_SECTOR: usize = 8;
/// Payload bytes in a sector that is followed by another
pub const CHAIN_PAYLOAD: usize = 254;
/// The directory track has 19 sectors, allow a generous multiple for odd images
pub const MAX_DIRECTORY_REPS: usize = 144;
/// Tracks counted toward free blocks, the directory track is excluded
pub const BAM_TRACKS: usize = 35;

const LOCKED_BIT: u8 = 0x40;
const CLOSED_BIT: u8 = 0x80;

#[derive(DiskStruct)]
pub struct DirectoryEntry {
    /// only meaningful in the first entry of a sector
    pub link: [u8;2],
    pub file_type: u8,
    pub track: u8,
    pub sector: u8,
    /// padded with 0xA0
    pub name: [u8;16],
    pub side_track: u8,
    pub side_sector: u8,
    pub record_len: u8,
    pub unused: [u8;6],
    pub blocks: [u8;2]
}

impl DirectoryEntry {
    /// An empty slot has a zero type byte
    pub fn is_empty(&self) -> bool {
        self.file_type==0
    }
    /// File type, None if the low nibble is not a CBM DOS type
    pub fn typ(&self) -> Option<FileType> {
        FileType::from_u8(self.file_type & 0x0f)
    }
    pub fn closed(&self) -> bool {
        self.file_type & CLOSED_BIT > 0
    }
    pub fn locked(&self) -> bool {
        self.file_type & LOCKED_BIT > 0
    }
    pub fn block_count(&self) -> u16 {
        u16::from_le_bytes(self.blocks)
    }
}

/// One sector of the directory chain, the chain pointer overlays the first entry.
pub struct DirectorySector {
    pub entries: Vec<DirectoryEntry>
}

impl DirectorySector {
    /// Next sector in the chain, None if this is the last
    pub fn next(&self) -> Option<(usize,usize)> {
        match self.entries[0].link {
            [0,_] => None,
            [t,s] => Some((t as usize,s as usize))
        }
    }
}

impl DiskStruct for DirectorySector {
    fn new() -> Self {
        let mut entries: Vec<DirectoryEntry> = Vec::new();
        for _i in 0..ENTRIES_PER_SECTOR {
            entries.push(DirectoryEntry::new());
        }
        Self {
            entries
        }
    }
    fn from_bytes(dat: &[u8]) -> Result<Self,DiskStructError> {
        let mut ans = Self::new();
        ans.update_from_bytes(dat)?;
        Ok(ans)
    }
    fn to_bytes(&self) -> Vec<u8> {
        let mut ans: Vec<u8> = Vec::new();
        for entry in &self.entries {
            ans.append(&mut entry.to_bytes());
        }
        return ans;
    }
    fn update_from_bytes(&mut self,dat: &[u8]) -> Result<(),DiskStructError> {
        if dat.len() < ENTRY_SIZE*ENTRIES_PER_SECTOR {
            return Err(DiskStructError::UnexpectedSize);
        }
        self.entries = Vec::new();
        for i in 0..ENTRIES_PER_SECTOR {
            self.entries.push(DirectoryEntry::from_bytes(&dat[i*ENTRY_SIZE..(i+1)*ENTRY_SIZE])?);
        }
        Ok(())
    }
    fn len(&self) -> usize {
        ENTRY_SIZE*ENTRIES_PER_SECTOR
    }
}

/// Block availability map, found at track 18 sector 0.  Also holds the disk label.
#[derive(DiskStruct)]
pub struct BAM {
    pub dir_track: u8,
    pub dir_sector: u8,
    pub dos_version: u8,
    pub pad1: u8,
    /// 4 bytes per track: free count, then a bitmap of 3 bytes
    pub track_maps: [u8;140],
    /// padded with 0xA0
    pub label: [u8;16],
    pub pad2: [u8;2],
    pub id: [u8;2],
    pub pad3: u8,
    pub dos_type: [u8;2],
    pub pad4: [u8;89]
}

impl BAM {
    /// Sum of the free counts of tracks 1 through 35, skipping the directory track.
    pub fn free_blocks(&self) -> u16 {
        let mut ans: u16 = 0;
        for track in 1..=BAM_TRACKS {
            if track!=DIR_TRACK {
                ans += self.track_maps[4*(track-1)] as u16;
            }
        }
        ans
    }
    /// Label shown in listings, shifted spaces become spaces so the 16 columns are kept.
    pub fn label(&self) -> Vec<u8> {
        self.label.iter().map(|b| match *b {
            0xa0 => 0x20,
            x => x
        }).collect()
    }
    /// Text after the quoted label, e.g. ` ID 2A`
    pub fn id_suffix(&self) -> Vec<u8> {
        let mut ans = vec![b' '];
        ans.extend_from_slice(&self.id);
        ans.push(b' ');
        ans.extend_from_slice(&self.dos_type);
        ans.iter().map(|b| match *b {
            0xa0 => 0x20,
            x => x
        }).collect()
    }
}
