//! # `c64iecd` main library
//!
//! This library serves C64 disk drives over the network.  The computer talks to the server
//! with a dialect of TFTP instead of the serial IEC bus, and the server answers the way a
//! 1541 would, including the BASIC encoded directory listing returned for `$`.
//!
//! ## Architecture
//!
//! Drive operations are built around a trait object and a session engine:
//! * `fs::Device` is one mounted drive unit, with `open`, `read`, `write`, `close`, `eof`, `exists`
//! * `fs::registry::Registry` maps unit numbers to device descriptors and mounts them on demand
//! * `net::session::Session` runs one transfer against a `Device` through a `net::session::Transport`
//! * `net::server::Server` owns the UDP endpoint and runs sessions one after another
//!
//! ## Devices
//!
//! As of this writing `c64iecd` supports
//! * folders of PC64 wrapped files (`*.P00`), read and write
//! * D64 disk images, read only
//!
//! ## Names
//!
//! Filenames exist in three forms.  The wire form is percent escaped and may carry a unit
//! prefix like `9/`.  The native form is the raw byte string the computer uses.  The local
//! form is the name of the wrapped file on the host.  Conversions are in `fs::names`.

pub mod fs;
pub mod img;
pub mod net;
pub mod config;
pub mod commands;

use std::fmt::Write;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Display binary to stdout in columns of hex, +ascii, and PETSCII shifted ascii
pub fn display_block(start_addr: u16,block: &[u8]) {
    let mut slice_start = 0;
    loop {
        let row_label = start_addr as usize + slice_start;
        let mut slice_end = slice_start + 16;
        if slice_end > block.len() {
            slice_end = block.len();
        }
        let slice = block[slice_start..slice_end].to_vec();
        let txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x<32 => '.' as u8,
            x if x<127 => x,
            _ => '.' as u8
        }).collect();
        let shifted_txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x>=0xc1 && x<=0xda => x - 0x80,
            x if x>=0x41 && x<=0x5a => x + 0x20,
            x if x>=0x20 && x<0x41 => x,
            _ => 46
        }).collect();
        print!("{:04X} : ",row_label);
        for byte in slice {
            print!("{:02X} ",byte);
        }
        for _blank in slice_end..slice_start+16 {
            print!("   ");
        }
        print!("|+| {} ",String::from_utf8_lossy(&txt));
        for _blank in slice_end..slice_start+16 {
            print!(" ");
        }
        println!("|P| {}",String::from_utf8_lossy(&shifted_txt));
        slice_start += 16;
        if slice_end>=block.len() {
            break;
        }
    }
}

/// This takes any bytes and makes an ascii friendly string
/// by using hex escapes, e.g., `\xFF`.
/// Shifted space (0xA0) is shown as a space since it is how the drive pads names.
/// This is intended for native filenames in log messages and console output.
pub fn escaped_ascii_from_bytes(bytes: &[u8]) -> String {
    let mut result = String::new();
    for b in bytes {
        match *b {
            0xa0 => result.push(' '),
            x if x>=0x20 && x<=0x7e && x!=b'\\' => result.push(x as char),
            x => write!(&mut result,"\\x{:02X}",x).expect("unreachable")
        }
    }
    return result;
}

#[test]
fn test_escaped_ascii() {
    assert_eq!(escaped_ascii_from_bytes(b"GAME"),"GAME");
    assert_eq!(escaped_ascii_from_bytes(&[0x41,0xa0,0x00,0x5c]),"A \\x00\\x5C");
}
