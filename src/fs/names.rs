//! # Filename codec
//!
//! Converts between the three forms a filename takes:
//! * wire form: the request string, percent escaped, optionally prefixed by `<unit>/`
//! * native form: raw bytes as the computer would send them on the serial bus
//! * local form: the name of the wrapped file in a host folder, e.g. `game.p00`
//!
//! Everything here works on byte strings, native names need not be valid UTF8.

use std::path::Path;
use regex::bytes::Regex;

/// Unit used when the request has no `<unit>/` prefix
pub const DEFAULT_UNIT: u16 = 8;
/// Width of a native name in directory structures
pub const NAME_LEN: usize = 16;
/// Number of `.pNN` suffixes available for one stem
pub const MAX_SUFFIX: usize = 100;

/// Decode a wire name into a native name.  Percent escapes (`%41`, hex digits of either case)
/// become the byte they encode, then a leading drive prefix like `@0:` is removed.
pub fn decode(wire: &[u8]) -> Vec<u8> {
    let escape = Regex::new(r"(?-u)%([0-9A-Fa-f]{2})").expect("unreachable");
    let drive = Regex::new(r"(?-u)^@[0-9]:").expect("unreachable");
    let unescaped = escape.replace_all(wire,|caps: &regex::bytes::Captures| {
        match hex::decode(&caps[1]) {
            Ok(v) => v,
            Err(_) => caps[0].to_vec()
        }
    });
    match drive.find(&unescaped) {
        Some(m) => unescaped[m.end()..].to_vec(),
        None => unescaped.to_vec()
    }
}

/// Encode a native name for the wire.  Every byte outside printable ASCII, and the bytes
/// `%`, `/`, `@` and `:`, are written as `%XX`.
pub fn encode(native: &[u8]) -> Vec<u8> {
    let mut ans: Vec<u8> = Vec::new();
    for b in native {
        match *b {
            b'%' | b'/' | b'@' | b':' => ans.append(&mut format!("%{:02X}",b).into_bytes()),
            x if x>=0x20 && x<0x7f => ans.push(x),
            x => ans.append(&mut format!("%{:02X}",x).into_bytes())
        }
    }
    return ans;
}

/// Split off a `<digits>/` unit prefix.  Without a prefix, or if the digits do not fit
/// a unit number, the default unit is returned along with the unchanged name.
pub fn split_unit_prefix(wire: &[u8]) -> (u16,&[u8]) {
    let patt = Regex::new(r"(?-u)^([0-9]+)/").expect("unreachable");
    if let Some(caps) = patt.captures(wire) {
        let digits = String::from_utf8_lossy(&caps[1]).to_string();
        if let Ok(unit) = u16::from_str_radix(&digits,10) {
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            return (unit,&wire[end..]);
        }
        log::debug!("unit prefix {} is out of range",digits);
    }
    (DEFAULT_UNIT,wire)
}

/// Lower case stem of the local name, only `[0-9a-z_.-]` survive.
/// If nothing survives the stem is `_`.
pub fn local_stem(native: &[u8]) -> String {
    let mut ans = String::new();
    for b in native {
        let c = b.to_ascii_lowercase();
        if c.is_ascii_digit() || c.is_ascii_lowercase() || c==b'_' || c==b'.' || c==b'-' {
            ans.push(c as char);
        }
    }
    if ans.len()==0 {
        ans.push('_');
    }
    return ans;
}

/// Find the first `<stem>.pNN` that does not exist in `dir`, or None if all are taken.
pub fn to_local_name(native: &[u8],dir: &Path) -> Option<String> {
    let stem = local_stem(native);
    for suffix in 0..MAX_SUFFIX {
        let candidate = format!("{}.p{:02}",stem,suffix);
        if !dir.join(&candidate).exists() {
            return Some(candidate);
        }
    }
    log::warn!("all {} suffixes for {} are taken",MAX_SUFFIX,stem);
    None
}

/// Remove trailing padding (space, shifted space, NUL) from a name.
/// Also returns the spaces that restore the name to 16 columns, used in listings.
pub fn strip_padding(name: &[u8]) -> (&[u8],Vec<u8>) {
    let mut end = name.len();
    while end>0 && [0x20,0xa0,0x00].contains(&name[end-1]) {
        end -= 1;
    }
    let trimmed = &name[0..end];
    let pad = vec![0x20;NAME_LEN.saturating_sub(trimmed.len())];
    (trimmed,pad)
}

/// Native name truncated to the width stored in headers and directory entries.
pub fn truncate(native: &[u8]) -> &[u8] {
    match native.len() > NAME_LEN {
        true => &native[0..NAME_LEN],
        false => native
    }
}
