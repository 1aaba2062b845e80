//! Device inventory loading and selection.
//!
//! Expected `devices.yaml` layout:
//!
//! ```yaml
//! devices:
//!   - name: R1
//!     ip: 192.168.50.10
//!     username: admin
//!     device_type: cisco_ios
//! ```

use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::console::Console;
use crate::error::{InventoryError, Result};

/// Platform assumed when an entry has no `device_type`.
pub const DEFAULT_DEVICE_TYPE: &str = "cisco_ios";

/// A managed device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub ip: String,
    pub username: String,
    pub device_type: String,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.ip)
    }
}

/// YAML scalar accepted for any device field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct DeviceEntry {
    name: Option<Scalar>,
    ip: Option<Scalar>,
    username: Option<Scalar>,
    device_type: Option<Scalar>,
}

impl DeviceEntry {
    fn into_device(self) -> Option<Device> {
        let required = |field: Option<Scalar>| {
            field
                .map(|value| value.into_string().trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Some(Device {
            name: required(self.name)?,
            ip: required(self.ip)?,
            username: required(self.username)?,
            device_type: required(self.device_type)
                .unwrap_or_else(|| DEFAULT_DEVICE_TYPE.to_string()),
        })
    }
}

/// Load every usable device from an inventory file.
pub fn load_devices(path: &Path) -> std::result::Result<Vec<Device>, InventoryError> {
    if !path.exists() {
        return Err(InventoryError::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = serde_yaml::from_str(&text).map_err(|source| InventoryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    parse_devices(document)
}

/// Extract devices from a parsed inventory document.
///
/// Malformed entries are skipped with a warning; an inventory with no usable
/// entry is an error.
pub fn parse_devices(
    document: serde_yaml::Value,
) -> std::result::Result<Vec<Device>, InventoryError> {
    let root = match document {
        serde_yaml::Value::Null => return Err(InventoryError::Empty),
        serde_yaml::Value::Mapping(root) => root,
        _ => return Err(InventoryError::NotAMapping),
    };

    let entries = match root.get("devices") {
        Some(serde_yaml::Value::Sequence(entries)) => entries,
        _ => return Err(InventoryError::MissingDevices),
    };

    let mut devices = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if !entry.is_mapping() {
            warn!("Skipping malformed device entry #{} (not a mapping)", index + 1);
            continue;
        }
        match serde_yaml::from_value::<DeviceEntry>(entry.clone())
            .ok()
            .and_then(DeviceEntry::into_device)
        {
            Some(device) => devices.push(device),
            None => warn!(
                "Skipping device entry #{}; required keys 'name', 'ip', 'username' are mandatory",
                index + 1
            ),
        }
    }

    if devices.is_empty() {
        return Err(InventoryError::NoDevices);
    }
    Ok(devices)
}

/// Pick the device to work on.
///
/// A single device is used without asking. Otherwise the operator picks a
/// number from the list until the answer is in range.
pub fn choose_device<'a, R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    devices: &'a [Device],
) -> Result<&'a Device> {
    if let [only] = devices {
        console.say(format!("Only one device available. Using {only}."))?;
        info!("Auto-selected sole device: {}", only);
        return Ok(only);
    }

    loop {
        console.say("\nAvailable devices:")?;
        for (number, device) in devices.iter().enumerate() {
            console.say(format!("  {}) {}", number + 1, device))?;
        }

        let answer = console.prompt("Select a device number: ")?;
        let Ok(number) = answer.parse::<usize>() else {
            console.say("Please enter a valid number.")?;
            continue;
        };

        match number.checked_sub(1).and_then(|i| devices.get(i)) {
            Some(device) => {
                info!("User selected device: {}", device);
                return Ok(device);
            }
            None => console.say("Selection out of range. Try again.")?,
        }
    }
}

/// Find a device by name (case-insensitive).
pub fn find_device<'a>(devices: &'a [Device], name: &str) -> Option<&'a Device> {
    devices
        .iter()
        .find(|device| device.name.eq_ignore_ascii_case(name.trim()))
}
