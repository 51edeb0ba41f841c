use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Power-on settings for the bus. Every field is optional in JSON form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BusConfig {
    /// Byte returned by every read of the unmapped page.
    pub open_bus_value: u8,
    pub ram_fill: u8,
    /// Primary slot register value applied when the bus is built or reset.
    pub slot_config: u8,
    pub controller_1: u8,
    pub controller_2: u8,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            open_bus_value: 0xFF,
            ram_fill: 0xFF,
            slot_config: 0x00,
            // Active low, nothing pressed
            controller_1: 0xFF,
            controller_2: 0xFF,
        }
    }
}

impl BusConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
