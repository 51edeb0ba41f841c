use serde::{Deserialize, Serialize};

use crate::{
    error::{MapperError, Result},
    peripheral::SoundUnit,
};

/// PSG register 14, read by the BIOS to sample the joystick ports.
pub const IO_PORT_A: u8 = 0x0E;
/// PSG register 15. Bit 6 picks which joystick port is sampled.
pub const IO_PORT_B: u8 = 0x0F;

const PORT_SELECT: u8 = 0x40;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ControllerPort {
    One,
    Two,
}

impl TryFrom<u8> for ControllerPort {
    type Error = MapperError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(ControllerPort::One),
            2 => Ok(ControllerPort::Two),
            n => Err(MapperError::InvalidControllerPort(n)),
        }
    }
}

/// Latest state of both joystick ports, supplied by the frontend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControllerPorts {
    port_1: u8,
    port_2: u8,
}

impl ControllerPorts {
    pub fn new(port_1: u8, port_2: u8) -> Self {
        Self { port_1, port_2 }
    }

    pub fn get(&self, port: ControllerPort) -> u8 {
        match port {
            ControllerPort::One => self.port_1,
            ControllerPort::Two => self.port_2,
        }
    }

    pub fn set(&mut self, port: ControllerPort, value: u8) {
        match port {
            ControllerPort::One => self.port_1 = value,
            ControllerPort::Two => self.port_2 = value,
        }
    }

    /// Runs after every write through port 0xA1. When the write landed in
    /// register 15, register 14 is refreshed with the port that bit 6 of
    /// register 15 now selects.
    pub fn after_sound_write<S: SoundUnit + ?Sized>(&self, psg: &mut S) {
        if psg.selected_register() != IO_PORT_B {
            return;
        }

        let port = if psg.register(IO_PORT_B) & PORT_SELECT != 0 {
            ControllerPort::Two
        } else {
            ControllerPort::One
        };
        let value = self.get(port);

        tracing::trace!("[PSG] Joystick {:?} latched into R14 = {:02X}", port, value);
        psg.set_register(IO_PORT_A, value);
    }
}

impl Default for ControllerPorts {
    fn default() -> Self {
        Self::new(0xFF, 0xFF)
    }
}
