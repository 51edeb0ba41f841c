use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::peripheral::SoundUnit;

/// AY-3-8910 register file and select latch. Tone, noise and envelope
/// generation live elsewhere; this is only what the CPU can see.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AY38910 {
    registers: [u8; 16],
    selected_register: u8,
}

impl AY38910 {
    pub fn new() -> Self {
        Self {
            registers: [0; 16],
            selected_register: 0,
        }
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.registers
    }
}

impl SoundUnit for AY38910 {
    fn read_selected_register(&self) -> u8 {
        let value = self.registers[self.selected_register as usize];
        trace!(
            "[PSG] Reading {:02X} from register {:02X}",
            value,
            self.selected_register
        );
        value
    }

    fn set_select(&mut self, register: u8) {
        trace!("[PSG] Selecting register {:02X}", register);
        self.selected_register = register & 0x0F;
    }

    fn write_selected_register(&mut self, value: u8) {
        trace!(
            "[PSG] Writing {:02X} to register {:02X}",
            value,
            self.selected_register
        );
        self.registers[self.selected_register as usize] = value;
    }

    fn selected_register(&self) -> u8 {
        self.selected_register
    }

    fn register(&self, index: u8) -> u8 {
        self.registers[(index & 0x0F) as usize]
    }

    fn set_register(&mut self, index: u8, value: u8) {
        self.registers[(index & 0x0F) as usize] = value;
    }

    fn reset(&mut self) {
        self.registers = [0; 16];
        self.selected_register = 0;
    }
}
