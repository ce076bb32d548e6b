//! # Configuration
//!
//! Server settings and the device table.  These come from built in defaults, optionally
//! overlaid by a JSON file, optionally overlaid by the command line.  The JSON file looks like
//! ```json
//! {
//!     "port": 53280,
//!     "bind": "0.0.0.0",
//!     "block_size": 256,
//!     "devices": [
//!         { "unit": 8, "kind": "dir", "path": "/var/tmp/c64iecd/8", "read_only": false },
//!         { "unit": 9, "kind": "d64", "path": "games.d64" }
//!     ]
//! }
//! ```
//! Every key is optional.

use std::path::{Path,PathBuf};
use std::str::FromStr;
use log::{debug,error};
use crate::fs::DeviceKind;
use crate::fs::registry::{DeviceSpec,Registry};
use crate::net::{DEFAULT_PORT,DEFAULT_BLOCK_SIZE};
use crate::net::server::ServerConfig;
use crate::DYNERR;

/// Folder under which the default units are stored
pub const DEFAULT_STORAGE: &str = "/var/tmp/c64iecd";
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Enumerates configuration errors.  The `Display` trait will print equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("configuration must be a JSON object")]
    NotAnObject,
    #[error("configuration key has the wrong type")]
    KeyType,
    #[error("configuration value is out of range")]
    OutOfRange,
    #[error("device entry is missing a key")]
    MissingKey
}

#[derive(Clone,Debug)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub block_size: usize,
    pub devices: Vec<DeviceSpec>
}

/// Units 8 and 9 as folders under the default storage
pub fn default_devices() -> Vec<DeviceSpec> {
    [8,9].iter().map(|unit| {
        DeviceSpec::new(*unit,DeviceKind::Folder,Path::new(DEFAULT_STORAGE).join(unit.to_string()),false)
    }).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            block_size: DEFAULT_BLOCK_SIZE,
            devices: default_devices()
        }
    }
}

fn get_u16(obj: &json::JsonValue,key: &str) -> Result<Option<u16>,Error> {
    if obj[key].is_null() {
        return Ok(None);
    }
    match obj[key].as_u16() {
        Some(v) => Ok(Some(v)),
        None => {
            error!("`{}` should be an integer from 0 to 65535",key);
            Err(Error::OutOfRange)
        }
    }
}

fn get_str(obj: &json::JsonValue,key: &str) -> Result<Option<String>,Error> {
    if obj[key].is_null() {
        return Ok(None);
    }
    match obj[key].as_str() {
        Some(s) => Ok(Some(s.to_string())),
        None => {
            error!("`{}` should be a string",key);
            Err(Error::KeyType)
        }
    }
}

fn parse_device(obj: &json::JsonValue) -> Result<DeviceSpec,DYNERR> {
    if !obj.is_object() {
        return Err(Box::new(Error::NotAnObject));
    }
    let unit = get_u16(obj,"unit")?.ok_or(Error::MissingKey)?;
    let kind = DeviceKind::from_str(&get_str(obj,"kind")?.unwrap_or("dir".to_string()))?;
    let path = get_str(obj,"path")?.ok_or(Error::MissingKey)?;
    let read_only = match obj["read_only"].is_null() {
        true => false,
        false => obj["read_only"].as_bool().ok_or(Error::KeyType)?
    };
    Ok(DeviceSpec::new(unit,kind,PathBuf::from(path),read_only))
}

impl Config {
    /// Overlay the settings in a JSON string on the defaults.
    /// If the JSON has a device list it replaces the default devices.
    pub fn from_json(json_str: &str) -> Result<Self,DYNERR> {
        let parsed = json::parse(json_str)?;
        if !parsed.is_object() {
            return Err(Box::new(Error::NotAnObject));
        }
        let mut ans = Self::default();
        if let Some(port) = get_u16(&parsed,"port")? {
            ans.port = port;
        }
        if let Some(bind) = get_str(&parsed,"bind")? {
            ans.bind = bind;
        }
        if let Some(block_size) = get_u16(&parsed,"block_size")? {
            if block_size==0 {
                return Err(Box::new(Error::OutOfRange));
            }
            ans.block_size = block_size as usize;
        }
        if !parsed["devices"].is_null() {
            if !parsed["devices"].is_array() {
                return Err(Box::new(Error::KeyType));
            }
            ans.devices = Vec::new();
            for dev in parsed["devices"].members() {
                ans.devices.push(parse_device(dev)?);
            }
        }
        debug!("configuration has {} devices",ans.devices.len());
        Ok(ans)
    }
    pub fn from_file(path: &Path) -> Result<Self,DYNERR> {
        let json_str = std::fs::read_to_string(path)?;
        Self::from_json(&json_str)
    }
    /// Add devices from the command line, these replace any device with the same unit.
    pub fn override_devices(&mut self,devices: Vec<DeviceSpec>) {
        for dev in devices {
            self.devices.retain(|d| d.unit!=dev.unit);
            self.devices.push(dev);
        }
    }
    pub fn registry(&self) -> Registry {
        Registry::from_specs(self.devices.clone())
    }
    pub fn server_config(&self) -> ServerConfig {
        let mut ans = ServerConfig::default();
        ans.bind = self.bind.clone();
        ans.port = self.port;
        ans.settings.block_size = self.block_size;
        ans
    }
}

#[test]
fn test_json_config() {
    let cfg = Config::from_json(r#"{"port": 6464, "devices": [
        {"unit": 8, "kind": "dir", "path": "/x"},
        {"unit": 10, "kind": "d64", "path": "a.d64", "read_only": false}
    ]}"#).expect("parse failed");
    assert_eq!(cfg.port,6464);
    assert_eq!(cfg.bind,"0.0.0.0");
    assert_eq!(cfg.block_size,256);
    assert_eq!(cfg.devices.len(),2);
    assert!(cfg.devices[1].read_only);
    assert_eq!(cfg.registry().units(),vec![8,10]);
    assert!(Config::from_json("[1,2]").is_err());
    assert!(Config::from_json(r#"{"port": 70000}"#).is_err());
    assert!(Config::from_json(r#"{"devices": [{"unit": 8}]}"#).is_err());
    assert!(Config::from_json(r#"{"devices": [{"unit": 8, "kind": "tap", "path": "x"}]}"#).is_err());
}

#[test]
fn test_default_config() {
    let mut cfg = Config::from_json("{}").expect("parse failed");
    assert_eq!(cfg.port,53280);
    assert_eq!(cfg.devices[1].path,PathBuf::from("/var/tmp/c64iecd/9"));
    cfg.override_devices(vec![DeviceSpec::new(9,DeviceKind::Image,PathBuf::from("b.d64"),false)]);
    let reg = cfg.registry();
    assert_eq!(reg.units(),vec![8,9]);
    assert_eq!(reg.get(9).expect("no unit 9").kind,DeviceKind::Image);
}
