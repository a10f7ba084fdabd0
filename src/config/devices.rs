use crate::error::ConfigError;
use crate::protocol::DeviceAddress;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Units this controller ships with
pub const BUILTIN_DEVICES: [(&str, &str); 2] = [
    ("office", "111000001111100001101110000111111110011"),
    ("bedroom", "111110011101011011111010010011000011110"),
];

/// On-disk layout: `{ "devices": { "office": "1110..." } }`
#[derive(Debug, Default, Serialize, Deserialize)]
struct DeviceFile {
    #[serde(default)]
    devices: BTreeMap<String, String>,
}

/// Named device addresses
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: BTreeMap<String, DeviceAddress>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, bits) in BUILTIN_DEVICES {
            // built-in table is covered by tests
            if let Ok(addr) = DeviceAddress::parse(bits) {
                registry.insert(name, addr);
            }
        }
        registry
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: DeviceFile = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for (name, bits) in file.devices {
            let addr = DeviceAddress::parse(&bits).map_err(|source| {
                ConfigError::Address {
                    name: name.clone(),
                    source,
                }
            })?;
            registry.insert(name, addr);
        }
        Ok(registry)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let registry = Self::from_json_str(&json)?;
        info!(
            "Loaded {} devices from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Entries of `other` replace entries with the same name.
    pub fn merge(&mut self, other: DeviceRegistry) {
        for (name, addr) in other.devices {
            debug!("Device {} -> {}", name, addr);
            self.devices.insert(name, addr);
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, address: DeviceAddress) {
        self.devices.insert(name.into(), address);
    }

    pub fn get(&self, name: &str) -> Result<&DeviceAddress, ConfigError> {
        self.devices
            .get(name)
            .ok_or_else(|| ConfigError::UnknownDevice(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceAddress)> {
        self.devices
            .iter()
            .map(|(name, addr)| (name.as_str(), addr))
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        let file = DeviceFile {
            devices: self
                .devices
                .iter()
                .map(|(name, addr)| (name.clone(), addr.to_string()))
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}
