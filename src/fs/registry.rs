//! # Device registry
//!
//! Maps unit numbers to device descriptors.  The registry is built once at startup and never
//! changes, each session mounts a fresh device from the descriptor so no state leaks from
//! one transfer to the next.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use log::{debug,warn};
use super::{Device,DeviceKind,Error};
use super::pc64::Folder;
use super::d64::Disk;
use crate::DYNERR;

/// Describes the storage behind one unit
#[derive(Clone,Debug,PartialEq)]
pub struct DeviceSpec {
    pub unit: u16,
    pub kind: DeviceKind,
    pub path: PathBuf,
    pub read_only: bool
}

impl DeviceSpec {
    /// Disk images are always read only.
    pub fn new(unit: u16,kind: DeviceKind,path: PathBuf,read_only: bool) -> Self {
        Self {
            unit,
            kind,
            path,
            read_only: read_only || kind==DeviceKind::Image
        }
    }
}

/// Parse `UNIT:KIND:PATH`, e.g. `8:dir:/var/tmp/c64iecd/8` or `9:d64:games.d64`.
/// The path is everything after the second colon.
impl FromStr for DeviceSpec {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        let fields: Vec<&str> = s.splitn(3,':').collect();
        if fields.len()!=3 || fields[2].len()==0 {
            return Err(Error::DeviceSyntax);
        }
        let unit = match u16::from_str(fields[0]) {
            Ok(u) => u,
            Err(_) => return Err(Error::DeviceSyntax)
        };
        let kind = DeviceKind::from_str(fields[1])?;
        Ok(Self::new(unit,kind,PathBuf::from(fields[2]),false))
    }
}

/// Immutable table of units
pub struct Registry {
    devices: BTreeMap<u16,DeviceSpec>
}

impl Registry {
    /// Build the table, a later spec for the same unit replaces an earlier one.
    pub fn from_specs(specs: Vec<DeviceSpec>) -> Self {
        let mut devices = BTreeMap::new();
        for spec in specs {
            if let Some(old) = devices.insert(spec.unit,spec) {
                debug!("unit {} at {} was replaced",old.unit,old.path.display());
            }
        }
        Self {
            devices
        }
    }
    pub fn get(&self,unit: u16) -> Option<&DeviceSpec> {
        self.devices.get(&unit)
    }
    pub fn units(&self) -> Vec<u16> {
        self.devices.keys().copied().collect()
    }
    /// Create a device for one session.  Disk images are loaded here, so a bad image
    /// is reported when the unit is used rather than at startup.
    pub fn mount(&self,unit: u16) -> Result<Box<dyn Device>,DYNERR> {
        let spec = match self.get(unit) {
            Some(s) => s,
            None => {
                warn!("no device at unit {}",unit);
                return Err(Box::new(Error::DeviceNotPresent));
            }
        };
        debug!("mount unit {} as {} at {}",unit,spec.kind,spec.path.display());
        match spec.kind {
            DeviceKind::Folder => Ok(Box::new(Folder::new(&spec.path))),
            DeviceKind::Image => Ok(Box::new(Disk::from_file(&spec.path)?))
        }
    }
}

#[test]
fn test_device_spec() {
    let spec = DeviceSpec::from_str("9:d64:/tmp/a:b.d64").expect("parse failed");
    assert_eq!(spec.unit,9);
    assert_eq!(spec.kind,DeviceKind::Image);
    assert_eq!(spec.path,PathBuf::from("/tmp/a:b.d64"));
    assert!(spec.read_only);
    let spec = DeviceSpec::from_str("8:dir:store").expect("parse failed");
    assert!(!spec.read_only);
    assert!(DeviceSpec::from_str("8:tap:store").is_err());
    assert!(DeviceSpec::from_str("x:dir:store").is_err());
    assert!(DeviceSpec::from_str("8:dir").is_err());
    assert!(DeviceSpec::from_str("8:dir:").is_err());
    let reg = Registry::from_specs(vec![spec.clone(),DeviceSpec::new(8,DeviceKind::Folder,PathBuf::from("other"),true)]);
    assert_eq!(reg.units(),vec![8]);
    assert!(reg.get(8).expect("missing unit").read_only);
    assert!(reg.mount(10).is_err());
}
