//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.
//! Every subcommand builds the same device table, from a configuration file and `--device` arguments.

pub mod serve;
pub mod catalog;
pub mod get;
pub mod completions;

use std::path::Path;
use std::str::FromStr;
use log::debug;
use crate::config::Config;
use crate::fs::registry::DeviceSpec;
use crate::DYNERR;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("No device is mounted at this unit")]
    NoDevice,
    #[error("File not found")]
    FileNotFound
}

/// Build the configuration from `--config` and any `--device` arguments.
pub fn config_from_matches(cmd: &clap::ArgMatches) -> Result<Config,DYNERR> {
    let mut config = match cmd.get_one::<String>("config") {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::default()
    };
    let mut devices: Vec<DeviceSpec> = Vec::new();
    if let Some(vals) = cmd.get_many::<String>("device") {
        for val in vals {
            devices.push(DeviceSpec::from_str(val)?);
        }
    }
    if devices.len() > 0 {
        debug!("{} devices from the command line",devices.len());
        config.override_devices(devices);
    }
    Ok(config)
}
