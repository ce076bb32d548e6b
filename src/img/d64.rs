//! ## Support for D64 disk images
//!
//! D64 images are a sequential dump of the decoded 256 byte sectors of a 1541 disk,
//! track 1 first.  The tracks are in four speed zones with 21, 19, 18 and 17 sectors.
//! Some images append one error byte per sector, these bytes are kept but not interpreted.

use std::path::Path;
use crate::img;
use a2kit_macro::DiskStructError;
use log::{trace,debug,error};
use crate::{STDRESULT,DYNERR};

pub const SECTOR_SIZE: usize = 256;
/// Sectors per track for tracks 1 through 40
pub const SECTORS_PER_TRACK: [usize;40] = [
    21,21,21,21,21,21,21,21,21,21,21,21,21,21,21,21,21,
    19,19,19,19,19,19,19,
    18,18,18,18,18,18,
    17,17,17,17,17,17,17,17,17,17
];
/// Image sizes that are accepted, and the track count each implies
pub const IMAGE_SIZES: [(usize,usize);4] = [
    (174848,35),
    (175531,35),
    (196608,40),
    (197376,40)
];

/// Sectors in all tracks before the given one, tracks count from 1.
fn sectors_before(track: usize) -> usize {
    SECTORS_PER_TRACK[0..track-1].iter().sum()
}

/// Wrapper for D64 data
pub struct D64 {
    tracks: usize,
    data: Vec<u8>
}

impl D64 {
    /// Blank image with 35 or 40 tracks, all sectors zero.
    pub fn create(tracks: usize) -> Result<Self,DYNERR> {
        if tracks!=35 && tracks!=40 {
            error!("D64 images have 35 or 40 tracks, not {}",tracks);
            return Err(Box::new(img::Error::TrackCountMismatch));
        }
        Ok(Self {
            tracks,
            data: vec![0;sectors_before(tracks+1)*SECTOR_SIZE]
        })
    }
    pub fn from_file(path: &Path) -> Result<Self,DYNERR> {
        let dat = std::fs::read(path)?;
        match <Self as img::DiskImage>::from_bytes(&dat) {
            Ok(img) => Ok(img),
            Err(_) => {
                error!("{} has size {}, not a D64 image",path.display(),dat.len());
                Err(Box::new(img::Error::ImageSizeMismatch))
            }
        }
    }
    /// Sectors in a track, or None if the track is outside the image.
    pub fn sectors_in_track(&self,track: usize) -> Option<usize> {
        match track {
            t if t>=1 && t<=self.tracks => Some(SECTORS_PER_TRACK[t-1]),
            _ => None
        }
    }
    fn offset(&self,track: usize,sector: usize) -> Result<usize,DYNERR> {
        match self.sectors_in_track(track) {
            Some(n) if sector<n => Ok((sectors_before(track)+sector)*SECTOR_SIZE),
            _ => {
                debug!("track {} sector {} is outside a {} track image",track,sector,self.tracks);
                Err(Box::new(img::Error::SectorAccess))
            }
        }
    }
}

impl img::DiskImage for D64 {
    fn track_count(&self) -> usize {
        self.tracks
    }
    fn sector_count(&self) -> usize {
        sectors_before(self.tracks+1)
    }
    fn byte_capacity(&self) -> usize {
        self.sector_count()*SECTOR_SIZE
    }
    fn read_sector(&self,track: usize,sector: usize) -> Result<Vec<u8>,DYNERR> {
        trace!("read track {} sector {}",track,sector);
        let offset = self.offset(track,sector)?;
        Ok(self.data[offset..offset+SECTOR_SIZE].to_vec())
    }
    fn write_sector(&mut self,track: usize,sector: usize,dat: &[u8]) -> STDRESULT {
        trace!("write track {} sector {}",track,sector);
        let offset = self.offset(track,sector)?;
        let padded = img::quantize_block(dat,SECTOR_SIZE);
        self.data[offset..offset+SECTOR_SIZE].copy_from_slice(&padded);
        Ok(())
    }
    fn from_bytes(data: &[u8]) -> Result<Self,DiskStructError> {
        for (size,tracks) in IMAGE_SIZES {
            if data.len()==size {
                return Ok(Self {
                    tracks,
                    data: data.to_vec()
                });
            }
        }
        Err(DiskStructError::UnexpectedSize)
    }
    fn to_bytes(&self) -> Vec<u8> {
        return self.data.clone();
    }
}

#[test]
fn test_geometry() {
    use img::DiskImage;
    assert_eq!(sectors_before(18),357);
    assert_eq!(sectors_before(36),683);
    assert_eq!(sectors_before(41),768);
    let mut disk = D64::create(35).expect("create failed");
    assert_eq!(disk.byte_capacity(),174848);
    assert_eq!(disk.to_bytes().len(),IMAGE_SIZES[0].0);
    disk.write_sector(18,0,&[1,2,3]).expect("write failed");
    assert_eq!(disk.to_bytes()[357*256..357*256+4],[1,2,3,0]);
    assert_eq!(disk.read_sector(18,0).expect("read failed")[0..3],[1,2,3]);
    assert!(disk.read_sector(18,19).is_err());
    assert!(disk.read_sector(36,0).is_err());
    assert!(disk.read_sector(0,0).is_err());
    assert!(D64::from_bytes(&vec![0;175531]).is_ok());
    assert!(D64::from_bytes(&vec![0;174847]).is_err());
    assert_eq!(D64::from_bytes(&vec![0;196608]).expect("bad size").track_count(),40);
}
