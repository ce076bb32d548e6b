//! # CBM DOS module
//!
//! A unit backed by a D64 disk image, read only.  The whole image is loaded when the unit
//! is mounted.  Files are located through the directory chain that starts at track 18
//! sector 1, and read by following the chain of data sectors.
//!
//! Every sector in a chain starts with the track and sector of the next one.  A track of 0
//! marks the last sector, in which case the second byte is the index of the last valid byte.
//! Chains are walked with a bound, so a looping or broken chain is an error rather than a hang.

pub mod types;

use std::io::Cursor;
use std::path::Path;
use log::{trace,debug,error};
use a2kit_macro::DiskStruct;
use types::*;
use super::{Device,Error,FileType,Mode,DIRECTORY_NAME};
use super::{names,listing};
use crate::img::DiskImage;
use crate::img::d64::D64;
use crate::{STDRESULT,DYNERR};

/// The primary interface for disk operations.
pub struct Disk {
    img: D64,
    bam: BAM,
    stream: Option<Cursor<Vec<u8>>>
}

impl Disk {
    /// Use an image as storage, the BAM is read immediately.
    pub fn from_img(img: D64) -> Result<Self,DYNERR> {
        let buf = img.read_sector(DIR_TRACK,BAM_SECTOR)?;
        let bam = BAM::from_bytes(&buf)?;
        Ok(Self {
            img,
            bam,
            stream: None
        })
    }
    pub fn from_file(path: &Path) -> Result<Self,DYNERR> {
        Self::from_img(D64::from_file(path)?)
    }
    fn read_chain_sector(&self,track: usize,sector: usize) -> Result<Vec<u8>,DYNERR> {
        match self.img.read_sector(track,sector) {
            Ok(buf) => Ok(buf),
            Err(_) => {
                error!("chain points to track {} sector {}, outside the image",track,sector);
                Err(Box::new(Error::Damaged))
            }
        }
    }
    /// Every entry in the directory chain, including empty slots.
    pub fn entries(&self) -> Result<Vec<DirectoryEntry>,DYNERR> {
        let mut ans: Vec<DirectoryEntry> = Vec::new();
        let mut ts = (DIR_TRACK,FIRST_DIR_SECTOR);
        for _try in 0..MAX_DIRECTORY_REPS {
            let buf = self.read_chain_sector(ts.0,ts.1)?;
            let dir = DirectorySector::from_bytes(&buf)?;
            let next = dir.next();
            ans.extend(dir.entries);
            match next {
                Some(t_s) => ts = t_s,
                None => return Ok(ans)
            }
        }
        error!("directory chain exceeds {} sectors",MAX_DIRECTORY_REPS);
        Err(Box::new(Error::Damaged))
    }
    /// Find a program by native name, padding is ignored on both sides.
    pub fn find(&self,name: &[u8]) -> Result<Option<DirectoryEntry>,DYNERR> {
        let (wanted,_) = names::strip_padding(names::truncate(name));
        for entry in self.entries()? {
            if entry.typ()==Some(FileType::Program) && names::strip_padding(&entry.name).0==wanted {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }
    /// Gather the payload of the chain starting at the given sector.
    pub fn read_chain(&self,track: usize,sector: usize) -> Result<Vec<u8>,DYNERR> {
        let mut ans: Vec<u8> = Vec::new();
        let mut ts = (track,sector);
        for _try in 0..self.img.sector_count() {
            let buf = self.read_chain_sector(ts.0,ts.1)?;
            trace!("chain at track {} sector {}",ts.0,ts.1);
            if buf[0]==0 {
                let last = buf[1] as usize;
                if last >= 2 {
                    ans.extend_from_slice(&buf[2..=last]);
                }
                return Ok(ans);
            }
            ans.extend_from_slice(&buf[2..2+CHAIN_PAYLOAD]);
            ts = (buf[0] as usize,buf[1] as usize);
        }
        error!("file chain exceeds {} sectors",self.img.sector_count());
        Err(Box::new(Error::Damaged))
    }
    /// Read a whole program by native name.
    pub fn read_file(&self,name: &[u8]) -> Result<Vec<u8>,DYNERR> {
        match self.find(name)? {
            Some(entry) => self.read_chain(entry.track as usize,entry.sector as usize),
            None => Err(Box::new(Error::FileNotFound))
        }
    }
    pub fn free_blocks(&self) -> u16 {
        self.bam.free_blocks()
    }
}

impl Device for Disk {
    fn open(&mut self,name: &[u8],mode: Mode) -> STDRESULT {
        self.stream = None;
        if mode==Mode::Write {
            error!("disk images are write protected");
            return Err(Box::new(Error::WriteProtected));
        }
        let dat = match name {
            DIRECTORY_NAME => self.directory()?,
            _ => self.read_file(name)?
        };
        debug!("opened {} bytes",dat.len());
        self.stream = Some(Cursor::new(dat));
        Ok(())
    }
    fn read(&mut self,max_len: usize) -> Result<Vec<u8>,DYNERR> {
        match &mut self.stream {
            Some(cursor) => super::read_up_to(cursor,max_len),
            None => Err(Box::new(Error::FileNotOpen))
        }
    }
    fn write(&mut self,_dat: &[u8]) -> STDRESULT {
        Err(Box::new(Error::WriteProtected))
    }
    fn close(&mut self) -> STDRESULT {
        self.stream = None;
        Ok(())
    }
    fn exists(&mut self,name: &[u8]) -> bool {
        if name==DIRECTORY_NAME {
            return true;
        }
        match self.find(name) {
            Ok(Some(_)) => true,
            _ => false
        }
    }
    fn eof(&self) -> bool {
        match &self.stream {
            Some(cursor) => cursor.position() >= cursor.get_ref().len() as u64,
            None => true
        }
    }
    fn directory(&mut self) -> Result<Vec<u8>,DYNERR> {
        let mut dir = listing::Listing::new(&self.bam.label(),&self.bam.id_suffix());
        for entry in self.entries()? {
            if entry.is_empty() {
                continue;
            }
            let tag = listing::type_tag(entry.typ(),entry.closed(),entry.locked());
            dir.add_entry(entry.block_count(),&entry.name,&tag);
        }
        let free = self.free_blocks();
        debug!("listing {} files with {} blocks free",dir.entries(),free);
        Ok(dir.finish(free))
    }
}
