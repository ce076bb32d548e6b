//! # Directory listing synthesizer
//!
//! When the computer loads `$` the drive answers with a BASIC program whose lines are the
//! directory.  Line numbers carry the block counts and the text carries the quoted names and
//! file types.  This module builds that program for any device, and turns one back into text.
//!
//! The program is laid out as
//! * load address 0x0801, little endian
//! * header line: number 0, reverse-on control code, quoted label
//! * one line per file
//! * footer line: number is the free block count, text `BLOCKS FREE.`
//! * end of program marker 0x0000
//!
//! Every line starts with the address of the line that follows it, counted from the load address.

use super::{Error,FileType};
use super::names;
use crate::DYNERR;

pub const LOAD_ADDRESS: u16 = 0x0801;
/// Free blocks on a freshly formatted 1541 disk
pub const BLANK_DISK_BLOCKS: u16 = 664;
/// PETSCII control code that turns on reverse video
pub const REVERSE_ON: u8 = 0x12;
pub const FOOTER_TEXT: &[u8] = b"BLOCKS FREE.";
/// Bound on lines when walking a listing that came from elsewhere
const MAX_LINES: usize = 4096;
/// Link, number, text and terminator of the footer, plus the end of program marker
const FOOTER_SIZE: usize = 2 + 2 + FOOTER_TEXT.len() + 1 + 2;

/// One line of a listing after parsing
pub struct Line {
    pub link: u16,
    pub number: u16,
    pub text: Vec<u8>
}

/// Accumulates the lines of a listing.  Links are computed once the footer is added.
pub struct Listing {
    /// each element is line number and text, including the terminating 0
    lines: Vec<Vec<u8>>,
    /// address just past the last line so far
    end_addr: usize
}

/// Bytes below 0x20 would end or garble a BASIC line, they are shown as `?`.
fn printable(text: &[u8]) -> Vec<u8> {
    text.iter().map(|b| match *b {
        x if x < 0x20 => b'?',
        x => x
    }).collect()
}

/// Build the 5 byte type column, e.g. ` PRG `, `*SEQ `, ` PRG<`.
/// Unknown types are shown as `???`.
pub fn type_tag(typ: Option<FileType>,closed: bool,locked: bool) -> [u8;5] {
    let mnemonic: &[u8] = match typ {
        Some(t) => t.mnemonic().as_bytes(),
        None => b"???"
    };
    let mut ans = [b' ';5];
    ans[1..4].copy_from_slice(mnemonic);
    if !closed {
        ans[0] = b'*';
    }
    if locked {
        ans[4] = b'<';
    }
    ans
}

impl Listing {
    /// Start a listing with the header line.  The label is placed in quotes as given,
    /// `suffix` follows the closing quote, e.g. ` ID 2A` for a disk image.
    pub fn new(label: &[u8],suffix: &[u8]) -> Self {
        let mut header: Vec<u8> = vec![0,0,REVERSE_ON,b'"'];
        header.extend_from_slice(&printable(names::truncate(label)));
        header.push(b'"');
        header.extend_from_slice(&printable(suffix));
        header.push(0);
        Self {
            end_addr: LOAD_ADDRESS as usize + 2 + header.len(),
            lines: vec![header]
        }
    }
    /// Add a file.  The name is stripped of padding and the type column aligned to 16 name columns.
    /// Returns false if the entry was left out because the program would not fit in memory.
    pub fn add_entry(&mut self,blocks: u16,name: &[u8],tag: &[u8;5]) -> bool {
        let (trimmed,pad) = names::strip_padding(name);
        let mut line: Vec<u8> = u16::to_le_bytes(blocks).to_vec();
        let mut indent = 1;
        if blocks < 100 {
            indent += 1;
        }
        if blocks < 10 {
            indent += 1;
        }
        line.append(&mut vec![b' ';indent]);
        line.push(b'"');
        line.extend_from_slice(&printable(trimmed));
        line.push(b'"');
        line.extend_from_slice(&pad);
        line.extend_from_slice(tag);
        line.push(0);
        let end_addr = self.end_addr + 2 + line.len();
        if end_addr + FOOTER_SIZE > u16::MAX as usize {
            log::warn!("listing is full after {} entries",self.entries());
            return false;
        }
        self.end_addr = end_addr;
        self.lines.push(line);
        true
    }
    /// Number of file entries so far
    pub fn entries(&self) -> usize {
        self.lines.len() - 1
    }
    /// Add the footer and produce the bytes, starting with the load address.
    pub fn finish(mut self,free: u16) -> Vec<u8> {
        let mut footer: Vec<u8> = u16::to_le_bytes(free).to_vec();
        footer.extend_from_slice(FOOTER_TEXT);
        footer.push(0);
        self.lines.push(footer);
        let mut ans: Vec<u8> = u16::to_le_bytes(LOAD_ADDRESS).to_vec();
        let mut addr = LOAD_ADDRESS as usize;
        for line in &self.lines {
            addr += 2 + line.len();
            ans.extend_from_slice(&u16::to_le_bytes(addr as u16));
            ans.extend_from_slice(line);
        }
        ans.append(&mut vec![0,0]);
        return ans;
    }
}

/// Split a listing into lines by following the links.  Every link must point forward
/// to the byte just after its line's terminator.
pub fn parse(listing: &[u8]) -> Result<Vec<Line>,DYNERR> {
    if listing.len() < 4 {
        return Err(Box::new(Error::ListingFormat));
    }
    let load_addr = u16::from_le_bytes([listing[0],listing[1]]) as usize;
    let prog = &listing[2..];
    let mut ans: Vec<Line> = Vec::new();
    let mut ptr = 0;
    for _try in 0..MAX_LINES {
        if ptr+2 > prog.len() {
            log::error!("listing ends without end marker");
            return Err(Box::new(Error::ListingFormat));
        }
        let link = u16::from_le_bytes([prog[ptr],prog[ptr+1]]);
        if link==0 {
            return Ok(ans);
        }
        if ptr+4 > prog.len() {
            return Err(Box::new(Error::ListingFormat));
        }
        let number = u16::from_le_bytes([prog[ptr+2],prog[ptr+3]]);
        let text_start = ptr + 4;
        let text_end = match prog[text_start..].iter().position(|b| *b==0) {
            Some(p) => text_start + p,
            None => return Err(Box::new(Error::ListingFormat))
        };
        if link as usize != load_addr + text_end + 1 {
            log::error!("bad link {:04X} in line {}",link,number);
            return Err(Box::new(Error::ListingFormat));
        }
        ans.push(Line {
            link,
            number,
            text: prog[text_start..text_end].to_vec()
        });
        ptr = text_end + 1;
    }
    log::error!("listing exceeds {} lines",MAX_LINES);
    Err(Box::new(Error::ListingFormat))
}

/// Render a listing as the text the computer prints after `LIST`, one line per row.
pub fn detokenize(listing: &[u8]) -> Result<String,DYNERR> {
    let mut ans = String::new();
    for line in parse(listing)? {
        let text: Vec<u8> = line.text.into_iter().filter(|b| *b!=REVERSE_ON).collect();
        let row = format!("{} {}",line.number,crate::escaped_ascii_from_bytes(&text));
        ans += row.trim_end();
        ans += "\n";
    }
    Ok(ans)
}
