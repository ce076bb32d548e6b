//! # PC64 folder module
//!
//! A unit backed by a host folder.  Every file is stored in its own PC64 wrapper, which is
//! a 26 byte header holding the native name, followed by the payload.  The local name is
//! derived from the native name with `names::to_local_name`, so the native name is only
//! known after reading the header.
//!
//! Wrapped programs use the extension `.pNN`.  The sibling extensions `.sNN`, `.uNN`, `.rNN`
//! hold SEQ, USR, and REL files, these can be read and are listed, new files are always `.pNN`.

pub mod types;

use std::fs::File;
use std::io::{Cursor,Read,Write};
use std::path::{Path,PathBuf};
use log::{trace,debug,info,warn};
use regex::Regex;
use a2kit_macro::DiskStruct;
use types::{Header,HEADER_SIZE,BLOCK_SIZE};
use super::{Device,Error,FileType,Mode,DIRECTORY_NAME};
use super::{names,listing};
use crate::{STDRESULT,DYNERR};

const FOLDER_LABEL: &[u8] = b"DIRECTORY";

/// A wrapped file found in the folder
pub struct WrappedFile {
    pub path: PathBuf,
    pub header: Header,
    pub typ: Option<FileType>,
    /// size of the payload in bytes
    pub size: u64
}

enum Stream {
    Closed,
    Listing(Cursor<Vec<u8>>),
    Reading {
        file: File,
        remaining: u64
    },
    Writing(File)
}

/// The primary interface for folder operations.
pub struct Folder {
    path: PathBuf,
    stream: Stream
}

/// All wrapped files in a folder, sorted by local name.  A missing folder is empty.
/// Files with a PC64 extension that lack the header are skipped.
pub fn wrapped_files(dir: &Path) -> Result<Vec<WrappedFile>,DYNERR> {
    let ext_patt = Regex::new(r"^(?i)[psur][0-9][0-9]$").expect("unreachable");
    let mut ans: Vec<WrappedFile> = Vec::new();
    if !dir.is_dir() {
        debug!("{} is not a folder, listing is empty",dir.display());
        return Ok(ans);
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = match path.extension() {
            Some(e) => e.to_string_lossy().to_string(),
            None => continue
        };
        if !ext_patt.is_match(&ext) {
            continue;
        }
        let mut start: Vec<u8> = Vec::new();
        File::open(&path)?.take(HEADER_SIZE as u64).read_to_end(&mut start)?;
        match Header::from_file_start(&start) {
            Some(header) => {
                let size = std::fs::metadata(&path)?.len().saturating_sub(HEADER_SIZE as u64);
                ans.push(WrappedFile {
                    typ: types::type_from_extension(&ext),
                    path,
                    header,
                    size
                });
            },
            None => warn!("{} has no PC64 header, skipping",path.display())
        }
    }
    ans.sort_by(|a,b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(ans)
}

impl Folder {
    /// Create the device, the folder need not exist until a file is written.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            stream: Stream::Closed
        }
    }
    /// Find the wrapped file whose stored name, with padding removed, equals the first
    /// 16 bytes of the native name exactly.
    pub fn find(&self,name: &[u8]) -> Result<Option<WrappedFile>,DYNERR> {
        let wanted = names::truncate(name);
        for wrapped in wrapped_files(&self.path)? {
            if wrapped.header.native_name()==wanted {
                return Ok(Some(wrapped));
            }
        }
        Ok(None)
    }
    fn open_read(&mut self,name: &[u8]) -> STDRESULT {
        if name==DIRECTORY_NAME {
            self.stream = Stream::Listing(Cursor::new(self.directory()?));
            return Ok(());
        }
        match self.find(name)? {
            Some(wrapped) => {
                debug!("reading {}",wrapped.path.display());
                let mut file = File::open(&wrapped.path)?;
                let mut header: [u8;HEADER_SIZE] = [0;HEADER_SIZE];
                file.read_exact(&mut header)?;
                self.stream = Stream::Reading {
                    file,
                    remaining: wrapped.size
                };
                Ok(())
            },
            None => Err(Box::new(Error::FileNotFound))
        }
    }
    fn open_write(&mut self,name: &[u8]) -> STDRESULT {
        if name==DIRECTORY_NAME {
            warn!("refusing to write the directory");
            return Err(Box::new(Error::WriteProtected));
        }
        std::fs::create_dir_all(&self.path)?;
        if let Some(old) = self.find(name)? {
            info!("replacing {}",old.path.display());
            std::fs::remove_file(&old.path)?;
        }
        let local = match names::to_local_name(name,&self.path) {
            Some(n) => n,
            None => return Err(Box::new(Error::StorageExhausted))
        };
        let path = self.path.join(&local);
        debug!("writing {}",path.display());
        let mut file = File::create(&path)?;
        file.write_all(&Header::create(name).to_bytes())?;
        self.stream = Stream::Writing(file);
        Ok(())
    }
}

impl Device for Folder {
    fn open(&mut self,name: &[u8],mode: Mode) -> STDRESULT {
        self.close()?;
        match mode {
            Mode::Read => self.open_read(name),
            Mode::Write => self.open_write(name)
        }
    }
    fn read(&mut self,max_len: usize) -> Result<Vec<u8>,DYNERR> {
        match &mut self.stream {
            Stream::Listing(cursor) => super::read_up_to(cursor,max_len),
            Stream::Reading { file, remaining } => {
                let ans = super::read_up_to(file,max_len.min(*remaining as usize))?;
                *remaining -= ans.len() as u64;
                trace!("read {} bytes, {} remain",ans.len(),remaining);
                Ok(ans)
            },
            Stream::Writing(_) => Err(Box::new(Error::ModeMismatch)),
            Stream::Closed => Err(Box::new(Error::FileNotOpen))
        }
    }
    fn write(&mut self,dat: &[u8]) -> STDRESULT {
        match &mut self.stream {
            Stream::Writing(file) => {
                trace!("write {} bytes",dat.len());
                file.write_all(dat)?;
                Ok(())
            },
            Stream::Closed => Err(Box::new(Error::FileNotOpen)),
            _ => Err(Box::new(Error::ModeMismatch))
        }
    }
    fn close(&mut self) -> STDRESULT {
        if let Stream::Writing(file) = &mut self.stream {
            file.flush()?;
        }
        self.stream = Stream::Closed;
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
            Stream::Listing(cursor) => cursor.position() >= cursor.get_ref().len() as u64,
            Stream::Reading { file: _, remaining } => *remaining==0,
            _ => true
        }
    }
    fn directory(&mut self) -> Result<Vec<u8>,DYNERR> {
        let mut dir = listing::Listing::new(FOLDER_LABEL,b"");
        let mut used: usize = 0;
        for wrapped in wrapped_files(&self.path)? {
            let blocks = wrapped.size as usize / BLOCK_SIZE;
            used += blocks;
            let tag = listing::type_tag(wrapped.typ,true,false);
            dir.add_entry(u16::try_from(blocks).unwrap_or(u16::MAX),&wrapped.header.native_name(),&tag);
        }
        let free = (listing::BLANK_DISK_BLOCKS as usize).saturating_sub(used) as u16;
        debug!("listing {} files with {} blocks free",dir.entries(),free);
        Ok(dir.finish(free))
    }
}
