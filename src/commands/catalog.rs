use log::error;
use super::CommandError;
use crate::fs::{names,listing,DIRECTORY_NAME};
use crate::STDRESULT;

/// Print the listing of a unit the way the computer shows it after `LOAD"$",8` and `LIST`.
pub fn catalog(cmd: &clap::ArgMatches) -> STDRESULT {
    let config = super::config_from_matches(cmd)?;
    let unit = match cmd.get_one::<u16>("unit") {
        Some(u) => *u,
        None => names::DEFAULT_UNIT
    };
    let registry = config.registry();
    if registry.get(unit).is_none() {
        error!("unit {} is not one of {:?}",unit,registry.units());
        return Err(Box::new(CommandError::NoDevice));
    }
    let mut device = registry.mount(unit)?;
    device.open(DIRECTORY_NAME,crate::fs::Mode::Read)?;
    let mut dat: Vec<u8> = Vec::new();
    while !device.eof() {
        dat.append(&mut device.read(crate::net::DEFAULT_BLOCK_SIZE)?);
    }
    device.close()?;
    print!("{}",listing::detokenize(&dat)?);
    Ok(())
}
