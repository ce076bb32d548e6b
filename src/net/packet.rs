//! ## Packet codec
//!
//! All packets begin with a big endian opcode.  Requests carry NUL terminated strings: the
//! filename, then a sequence that holds the transfer mode and any option pairs.  A mode word
//! (`octet` or `netascii`, any case) may appear anywhere in that sequence and has no value.
//! Every other string is a key followed by its value.
//!
//! Malformed option lists are not an error, the options are dropped and the request proceeds.

use std::fmt;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use super::Error;
use crate::DYNERR;

pub const ERR_NOT_DEFINED: u16 = 0;
pub const ERR_FILE_NOT_FOUND: u16 = 1;
pub const MSG_FILE_NOT_FOUND: &str = "File not found";

#[derive(FromPrimitive,PartialEq,Eq,Clone,Copy,Debug)]
pub enum Opcode {
    ReadRequest = 1,
    WriteRequest = 2,
    Data = 3,
    Ack = 4,
    Error = 5,
    OptionAck = 6
}

impl fmt::Display for Opcode {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadRequest => write!(f,"RRQ"),
            Self::WriteRequest => write!(f,"WRQ"),
            Self::Data => write!(f,"DATA"),
            Self::Ack => write!(f,"ACK"),
            Self::Error => write!(f,"ERR"),
            Self::OptionAck => write!(f,"OACK")
        }
    }
}

/// Transfer mode named in a request.  It is recorded and logged, data is never converted.
#[derive(PartialEq,Eq,Clone,Copy,Debug,Default)]
pub enum TransferMode {
    Octet,
    #[default]
    Netascii
}

impl TransferMode {
    fn from_word(word: &[u8]) -> Option<Self> {
        match word.to_ascii_lowercase().as_slice() {
            b"octet" => Some(Self::Octet),
            b"netascii" => Some(Self::Netascii),
            _ => None
        }
    }
}

/// Read or write request
#[derive(Clone,Debug,PartialEq)]
pub struct Request {
    pub opcode: Opcode,
    /// wire form of the name, may include unit prefix and escapes
    pub filename: Vec<u8>,
    pub mode: TransferMode,
    /// option pairs in the order received
    pub options: Vec<(String,String)>
}

#[derive(Clone,Debug,PartialEq)]
pub enum Packet {
    Request(Request),
    Data {
        block: u16,
        payload: Vec<u8>
    },
    Ack {
        block: u16
    },
    Error {
        code: u16,
        message: String
    },
    OptionAck(Vec<(String,String)>)
}

/// Find the next NUL at or after `start`
pub fn find_zero(buf: &[u8],start: usize) -> Option<usize> {
    buf[start..].iter().position(|b| *b==0).map(|pos| start + pos)
}

/// Parse everything after the filename.  Returns the mode, and the options unless they are malformed.
fn parse_mode_and_options(buf: &[u8],start: usize) -> (TransferMode,Vec<(String,String)>) {
    let mut mode = TransferMode::default();
    let mut options: Vec<(String,String)> = Vec::new();
    let mut malformed = false;
    let mut ptr = start;
    while ptr < buf.len() {
        let key_end = match find_zero(buf,ptr) {
            Some(end) => end,
            None => {
                malformed = true;
                break;
            }
        };
        let key = &buf[ptr..key_end];
        ptr = key_end + 1;
        if let Some(m) = TransferMode::from_word(key) {
            mode = m;
            continue;
        }
        if ptr >= buf.len() {
            malformed = true;
            break;
        }
        let val_end = match find_zero(buf,ptr) {
            Some(end) => end,
            None => {
                malformed = true;
                break;
            }
        };
        options.push((String::from_utf8_lossy(key).to_string(),String::from_utf8_lossy(&buf[ptr..val_end]).to_string()));
        ptr = val_end + 1;
    }
    if malformed {
        log::debug!("malformed option list, options are ignored");
        options = Vec::new();
    }
    (mode,options)
}

impl Packet {
    pub fn parse(buf: &[u8]) -> Result<Self,DYNERR> {
        if buf.len() < 2 {
            return Err(Box::new(Error::Truncated));
        }
        let opcode = match Opcode::from_u16(u16::from_be_bytes([buf[0],buf[1]])) {
            Some(op) => op,
            None => return Err(Box::new(Error::UnknownOpcode))
        };
        match opcode {
            Opcode::ReadRequest | Opcode::WriteRequest => {
                let name_end = match find_zero(buf,2) {
                    Some(end) => end,
                    None => return Err(Box::new(Error::Unterminated))
                };
                let (mode,options) = parse_mode_and_options(buf,name_end+1);
                Ok(Self::Request(Request {
                    opcode,
                    filename: buf[2..name_end].to_vec(),
                    mode,
                    options
                }))
            },
            Opcode::OptionAck => {
                let (_,options) = parse_mode_and_options(buf,2);
                Ok(Self::OptionAck(options))
            },
            _ if buf.len() < 4 => Err(Box::new(Error::Truncated)),
            Opcode::Data => Ok(Self::Data {
                block: u16::from_be_bytes([buf[2],buf[3]]),
                payload: buf[4..].to_vec()
            }),
            Opcode::Ack => Ok(Self::Ack {
                block: u16::from_be_bytes([buf[2],buf[3]])
            }),
            Opcode::Error => {
                let end = find_zero(buf,4).unwrap_or(buf.len());
                Ok(Self::Error {
                    code: u16::from_be_bytes([buf[2],buf[3]]),
                    message: String::from_utf8_lossy(&buf[4..end]).to_string()
                })
            }
        }
    }
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Request(req) => req.opcode,
            Self::Data { block: _, payload: _ } => Opcode::Data,
            Self::Ack { block: _ } => Opcode::Ack,
            Self::Error { code: _, message: _ } => Opcode::Error,
            Self::OptionAck(_) => Opcode::OptionAck
        }
    }
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut ans: Vec<u8> = u16::to_be_bytes(self.opcode() as u16).to_vec();
        match self {
            Self::Request(req) => {
                ans.extend_from_slice(&req.filename);
                ans.push(0);
                let mode: &[u8] = match req.mode {
                    TransferMode::Octet => b"octet",
                    TransferMode::Netascii => b"netascii"
                };
                ans.extend_from_slice(mode);
                ans.push(0);
                for (key,val) in &req.options {
                    ans.extend_from_slice(key.as_bytes());
                    ans.push(0);
                    ans.extend_from_slice(val.as_bytes());
                    ans.push(0);
                }
            },
            Self::Data { block, payload } => {
                ans.extend_from_slice(&u16::to_be_bytes(*block));
                ans.extend_from_slice(payload);
            },
            Self::Ack { block } => {
                ans.extend_from_slice(&u16::to_be_bytes(*block));
            },
            Self::Error { code, message } => {
                ans.extend_from_slice(&u16::to_be_bytes(*code));
                ans.extend_from_slice(message.as_bytes());
                ans.push(0);
            },
            Self::OptionAck(options) => {
                for (key,val) in options {
                    ans.extend_from_slice(key.as_bytes());
                    ans.push(0);
                    ans.extend_from_slice(val.as_bytes());
                    ans.push(0);
                }
            }
        }
        return ans;
    }
}

impl fmt::Display for Packet {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(req) => write!(f,"{} {} {:?} {:?}",req.opcode,crate::escaped_ascii_from_bytes(&req.filename),req.mode,req.options),
            Self::Data { block, payload } => write!(f,"DATA {} ({} bytes)",block,payload.len()),
            Self::Ack { block } => write!(f,"ACK {}",block),
            Self::Error { code, message } => write!(f,"ERR {} {}",code,message),
            Self::OptionAck(options) => write!(f,"OACK {:?}",options)
        }
    }
}
