use std::fmt;

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::error::{MapperError, Result};

/// Size of one page table window.
pub const PAGE_SIZE: usize = 0x400;
/// Size of one primary slot quadrant.
pub const QUADRANT_SIZE: usize = 0x4000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RegionId {
    BootRom,
    BasicRom,
    Rom1,
    Rom2,
    Ram,
    Unmapped,
}

impl RegionId {
    pub fn size(self) -> usize {
        match self {
            RegionId::BootRom | RegionId::BasicRom => QUADRANT_SIZE,
            RegionId::Rom1 | RegionId::Rom2 | RegionId::Ram => 4 * QUADRANT_SIZE,
            RegionId::Unmapped => PAGE_SIZE,
        }
    }

    pub fn is_rom(self) -> bool {
        matches!(
            self,
            RegionId::BootRom | RegionId::BasicRom | RegionId::Rom1 | RegionId::Rom2
        )
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionId::BootRom => write!(f, "BIOS"),
            RegionId::BasicRom => write!(f, "BASIC"),
            RegionId::Rom1 => write!(f, "ROM1"),
            RegionId::Rom2 => write!(f, "ROM2"),
            RegionId::Ram => write!(f, "RAM"),
            RegionId::Unmapped => write!(f, "Unmapped"),
        }
    }
}

/// Physical storage behind the page table.
///
/// Every region is allocated once at its final size; page table entries hold
/// offsets into these buffers, so nothing here is ever resized.
#[derive(Derivative, Clone, PartialEq)]
#[derivative(Debug)]
pub struct Regions {
    #[derivative(Debug = "ignore")]
    boot_rom: Box<[u8]>,
    #[derivative(Debug = "ignore")]
    basic_rom: Box<[u8]>,
    #[derivative(Debug = "ignore")]
    rom_1: Box<[u8]>,
    #[derivative(Debug = "ignore")]
    rom_2: Box<[u8]>,
    #[derivative(Debug = "ignore")]
    ram: Box<[u8]>,
    #[derivative(Debug = "ignore")]
    unmapped: Box<[u8]>,
    open_bus_value: u8,
}

impl Regions {
    pub fn new(open_bus_value: u8, ram_fill: u8) -> Self {
        let rom = |id: RegionId| vec![0xFF; id.size()].into_boxed_slice();

        Self {
            boot_rom: rom(RegionId::BootRom),
            basic_rom: rom(RegionId::BasicRom),
            rom_1: rom(RegionId::Rom1),
            rom_2: rom(RegionId::Rom2),
            ram: vec![ram_fill; RegionId::Ram.size()].into_boxed_slice(),
            unmapped: vec![open_bus_value; RegionId::Unmapped.size()].into_boxed_slice(),
            open_bus_value,
        }
    }

    /// Copies a ROM image into its region, mirroring images smaller than the
    /// region across the whole of it.
    pub fn load(&mut self, id: RegionId, image: &[u8]) -> Result<()> {
        if !id.is_rom() {
            return Err(MapperError::NotLoadable(id));
        }
        if image.is_empty() {
            return Err(MapperError::EmptyImage { region: id });
        }
        if image.len() > id.size() {
            return Err(MapperError::ImageTooLarge {
                region: id,
                len: image.len(),
                capacity: id.size(),
            });
        }

        for chunk in self.bytes_mut(id).chunks_mut(image.len()) {
            chunk.copy_from_slice(&image[..chunk.len()]);
        }

        tracing::debug!(
            "[MAPPER] Loaded {} bytes into {} ({:#06X} bytes)",
            image.len(),
            id,
            id.size()
        );
        Ok(())
    }

    pub fn bytes(&self, id: RegionId) -> &[u8] {
        match id {
            RegionId::BootRom => &self.boot_rom[..],
            RegionId::BasicRom => &self.basic_rom[..],
            RegionId::Rom1 => &self.rom_1[..],
            RegionId::Rom2 => &self.rom_2[..],
            RegionId::Ram => &self.ram[..],
            RegionId::Unmapped => &self.unmapped[..],
        }
    }

    fn bytes_mut(&mut self, id: RegionId) -> &mut [u8] {
        match id {
            RegionId::BootRom => &mut self.boot_rom[..],
            RegionId::BasicRom => &mut self.basic_rom[..],
            RegionId::Rom1 => &mut self.rom_1[..],
            RegionId::Rom2 => &mut self.rom_2[..],
            RegionId::Ram => &mut self.ram[..],
            RegionId::Unmapped => &mut self.unmapped[..],
        }
    }

    pub fn read(&self, id: RegionId, offset: usize) -> u8 {
        self.bytes(id)[offset]
    }

    /// Stores `value` through `mask`; a zero mask and the unmapped page
    /// discard the write.
    pub fn write(&mut self, id: RegionId, offset: usize, value: u8, mask: u8) {
        if mask == 0 || id == RegionId::Unmapped {
            tracing::trace!(
                "[MAPPER] Discarded write to {} offset {:#06X} = {:02X}",
                id,
                offset,
                value
            );
            return;
        }

        let cell = &mut self.bytes_mut(id)[offset];
        *cell = (*cell & !mask) | (value & mask);
    }

    pub fn open_bus_value(&self) -> u8 {
        self.open_bus_value
    }

    pub fn ram(&self) -> &[u8] {
        &self.ram
    }
}

impl Default for Regions {
    fn default() -> Self {
        Self::new(0xFF, 0xFF)
    }
}
