use derivative::Derivative;
use tracing::{trace, warn};

use crate::peripheral::VideoUnit;

const VRAM_SIZE: usize = 0x4000;
const ADDRESS_MASK: u16 = 0x3FFF;

/// TMS9918 port interface: VRAM access through port 0x98, registers and
/// status through port 0x99. Rendering is not part of this model.
#[derive(Derivative, Clone, PartialEq)]
#[derivative(Debug)]
pub struct TMS9918 {
    #[derivative(Debug = "ignore")]
    pub vram: [u8; VRAM_SIZE],
    pub registers: [u8; 8],
    /// Read-ahead buffer returned by the next data read.
    pub data_pre_read: u8,
    pub address: u16,
    /// First byte of a two-byte control sequence.
    pub first_write: Option<u8>,
    /// Frame flag, bit 7 of the status register.
    pub f: bool,
    pub sprites_collided: bool,
    pub fifth_sprite: Option<u8>,
}

impl TMS9918 {
    pub fn new() -> Self {
        Self {
            vram: [0; VRAM_SIZE],
            registers: [0; 8],
            data_pre_read: 0,
            address: 0,
            first_write: None,
            f: false,
            sprites_collided: false,
            fifth_sprite: None,
        }
    }

    pub fn address_wrapping_inc(&mut self) {
        self.address = (self.address + 1) & ADDRESS_MASK;
    }

    pub fn set_vblank(&mut self, active: bool) {
        if active {
            self.f = true;
        }
    }

    pub fn set_sprite_collision(&mut self) {
        self.sprites_collided = true;
    }

    pub fn set_fifth_sprite(&mut self, sprite: u8) {
        if self.fifth_sprite.is_none() {
            self.fifth_sprite = Some(sprite & 0x1F);
        }
    }

    pub fn is_interrupt_enabled(&self) -> bool {
        self.registers[1] & 0x20 != 0
    }

    pub fn interrupt_pending(&self) -> bool {
        self.f && self.is_interrupt_enabled()
    }

    fn write_register(&mut self, reg: u8, value: u8) {
        trace!("[VDP] Register {} = {:02X}", reg, value);
        self.registers[reg as usize] = value;
    }
}

impl Default for TMS9918 {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoUnit for TMS9918 {
    fn read_data(&mut self) -> u8 {
        self.first_write = None;
        let data = self.data_pre_read;
        self.data_pre_read = self.vram[self.address as usize];
        self.address_wrapping_inc();
        data
    }

    fn read_status(&mut self) -> u8 {
        self.first_write = None;

        let mut res = 0;
        if self.f {
            res |= 0x80;
            self.f = false;
        }
        if self.sprites_collided {
            res |= 0x20;
            self.sprites_collided = false;
        }
        if let Some(sprite) = self.fifth_sprite.take() {
            res |= 0x40 | sprite;
        }
        res
    }

    fn write_data(&mut self, value: u8) {
        self.first_write = None;
        self.vram[self.address as usize] = value;
        self.data_pre_read = value;
        self.address_wrapping_inc();
    }

    fn write_control(&mut self, value: u8) {
        let Some(first) = self.first_write.take() else {
            self.first_write = Some(value);
            self.address = (self.address & 0x3F00) | value as u16;
            return;
        };

        if value & 0x80 != 0 {
            if value & 0x78 != 0 {
                warn!("[VDP] Register write with stray bits: {:02X}", value);
            }
            self.write_register(value & 0x07, first);
        } else {
            self.address = (((value & 0x3F) as u16) << 8) | first as u16;
            if value & 0x40 == 0 {
                // Read setup prefetches the first byte
                self.data_pre_read = self.vram[self.address as usize];
                self.address_wrapping_inc();
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_write_address(vdp: &mut TMS9918, address: u16) {
        vdp.write_control(address as u8);
        vdp.write_control(0x40 | (address >> 8) as u8);
    }

    fn set_read_address(vdp: &mut TMS9918, address: u16) {
        vdp.write_control(address as u8);
        vdp.write_control((address >> 8) as u8 & 0x3F);
    }

    #[test]
    fn test_vram_write_and_read_back() {
        let mut vdp = TMS9918::new();
        set_write_address(&mut vdp, 0x1800);
        for b in [0x41, 0x42, 0x43] {
            vdp.write_data(b);
        }
        assert_eq!(&vdp.vram[0x1800..0x1803], &[0x41, 0x42, 0x43]);

        set_read_address(&mut vdp, 0x1800);
        assert_eq!(vdp.read_data(), 0x41);
        assert_eq!(vdp.read_data(), 0x42);
        assert_eq!(vdp.read_data(), 0x43);
    }

    #[test]
    fn test_address_wraps_at_16k() {
        let mut vdp = TMS9918::new();
        set_write_address(&mut vdp, 0x3FFF);
        vdp.write_data(0x01);
        vdp.write_data(0x02);
        assert_eq!(vdp.vram[0x3FFF], 0x01);
        assert_eq!(vdp.vram[0x0000], 0x02);
    }

    #[test]
    fn test_register_write() {
        let mut vdp = TMS9918::new();
        vdp.write_control(0xE0);
        vdp.write_control(0x81);
        assert_eq!(vdp.registers[1], 0xE0);
        assert!(vdp.is_interrupt_enabled());
        assert_eq!(vdp.first_write, None);
    }

    #[test]
    fn test_status_read_clears_flags() {
        let mut vdp = TMS9918::new();
        vdp.set_vblank(true);
        vdp.set_sprite_collision();
        vdp.set_fifth_sprite(5);

        assert_eq!(vdp.read_status(), 0x80 | 0x40 | 0x20 | 0x05);
        assert_eq!(vdp.read_status(), 0x00);
    }

    #[test]
    fn test_status_read_resets_control_latch() {
        let mut vdp = TMS9918::new();
        vdp.write_control(0x12);
        vdp.read_status();
        vdp.write_control(0x00);
        vdp.write_control(0x40 | 0x20);
        assert_eq!(vdp.address, 0x2000);
    }

    #[test]
    fn test_interrupt_pending() {
        let mut vdp = TMS9918::new();
        vdp.set_vblank(true);
        assert!(!vdp.interrupt_pending());
        vdp.registers[1] = 0x20;
        assert!(vdp.interrupt_pending());
    }
}
