use std::io::Write;
use log::error;
use super::CommandError;
use crate::fs::{names,Mode};
use crate::STDRESULT;

/// Maximum reads of one file, 65535 blocks of 256 bytes is more than a block number can count
const MAX_READS: usize = 0x10000;

/// Read a file through the same path a request would take and write it to stdout.
/// On a console the bytes are shown as a hex dump, starting at the load address if there is one.
pub fn get(cmd: &clap::ArgMatches) -> STDRESULT {
    let config = super::config_from_matches(cmd)?;
    let wire = match cmd.get_one::<String>("file") {
        Some(f) => f.as_bytes().to_vec(),
        None => return Err(Box::new(CommandError::InvalidCommand))
    };
    let (unit,native) = match cmd.get_one::<u16>("unit") {
        Some(u) => (*u,names::decode(&wire)),
        None => {
            let (u,rest) = names::split_unit_prefix(&wire);
            (u,names::decode(rest))
        }
    };
    let registry = config.registry();
    if registry.get(unit).is_none() {
        error!("unit {} is not one of {:?}",unit,registry.units());
        return Err(Box::new(CommandError::NoDevice));
    }
    let mut device = registry.mount(unit)?;
    if !device.exists(&native) {
        error!("{} not found on unit {}",crate::escaped_ascii_from_bytes(&native),unit);
        return Err(Box::new(CommandError::FileNotFound));
    }
    device.open(&native,Mode::Read)?;
    let mut object: Vec<u8> = Vec::new();
    for _try in 0..MAX_READS {
        if device.eof() {
            break;
        }
        object.append(&mut device.read(crate::net::DEFAULT_BLOCK_SIZE)?);
    }
    device.close()?;
    if atty::is(atty::Stream::Stdout) {
        let start_addr = match object.len() {
            n if n>=2 => u16::from_le_bytes([object[0],object[1]]),
            _ => 0
        };
        match object.len() {
            n if n>2 => crate::display_block(start_addr,&object[2..]),
            _ => crate::display_block(0,&object)
        }
    } else {
        std::io::stdout().write_all(&object)?;
    }
    Ok(())
}
