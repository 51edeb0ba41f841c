// +------+-------------------------------------------+
// | Port | Description                               |
// +------+-------------------------------------------+
// | 0x98 | VDP data (R/W)                            |
// | 0x99 | VDP status (R) / control (W)              |
// | 0xA0 | PSG register select (W)                   |
// | 0xA1 | PSG register write (W)                    |
// | 0xA2 | PSG register read (R)                     |
// | 0xA8 | Primary slot select (R/W)                 |
// | 0xA9 | Keyboard, not connected (R = 0xFF)        |
// +------+-------------------------------------------+
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    config::BusConfig,
    controller::{ControllerPort, ControllerPorts},
    error::{MapperError, Result},
    mapper::BankMapper,
    page_table::{PageTable, Source},
    peripheral::{SoundUnit, VideoUnit},
    psg::AY38910,
    region::{RegionId, Regions, QUADRANT_SIZE},
    vdp::TMS9918,
};

/// Value seen on the data bus when no device answers.
pub const OPEN_BUS: u8 = 0xFF;

pub type MsxBus = Bus<TMS9918, AY38910>;

pub struct Bus<V, S> {
    // I/O Devices
    pub vdp: V,
    pub psg: S,

    mapper: BankMapper,
    page_table: PageTable,
    config: BusConfig,
}

impl<V: VideoUnit, S: SoundUnit> Bus<V, S> {
    /// Wires the peripherals to the mapper and builds the initial page table
    /// from `config.slot_config`.
    pub fn new(vdp: V, psg: S, regions: Regions, config: BusConfig) -> Self {
        let controllers = ControllerPorts::new(config.controller_1, config.controller_2);
        let mut mapper = BankMapper::new(regions, controllers);
        let mut page_table = PageTable::new();
        mapper.write_slot_config(config.slot_config, &mut page_table);

        tracing::info!("[BUS] Initialized with {:?}", config);

        Self {
            vdp,
            psg,
            mapper,
            page_table,
            config,
        }
    }

    /// Warm reset: peripherals go back to power-on state and the configured
    /// slot layout is restored. RAM keeps its contents.
    pub fn reset(&mut self) {
        self.vdp.reset();
        self.psg.reset();
        self.mapper
            .write_slot_config(self.config.slot_config, &mut self.page_table);
    }

    /// Port read. Only the low 8 bits of `port` are decoded.
    pub fn input(&mut self, port: u16) -> u8 {
        let port = port as u8;
        let value = match port {
            0x98 => self.vdp.read_data(),
            0x99 => self.vdp.read_status(),
            0xA2 => self.psg.read_selected_register(),
            0xA8 => self.mapper.slot_config(),
            0xA9 => OPEN_BUS,
            _ => {
                tracing::trace!("[BUS] Invalid port {:02X} read", port);
                return OPEN_BUS;
            }
        };

        tracing::trace!("[BUS] [RD] [{:02X}] = {:02X}", port, value);
        value
    }

    /// Port write. Only the low 8 bits of `port` are decoded.
    pub fn output(&mut self, port: u16, value: u8) {
        let port = port as u8;
        match port {
            0x98 => self.vdp.write_data(value),
            0x99 => self.vdp.write_control(value),
            0xA0 => self.psg.set_select(value & 0x0F),
            0xA1 => {
                self.psg.write_selected_register(value);
                self.mapper.controllers().after_sound_write(&mut self.psg);
            }
            0xA8 => self.mapper.write_slot_config(value, &mut self.page_table),
            _ => {
                tracing::trace!("[BUS] Invalid port {:02X} write = {:02X}", port, value);
                return;
            }
        }

        tracing::trace!("[BUS] [WR] [{:02X}] = {:02X}", port, value);
    }

    pub fn set_controller(&mut self, port: ControllerPort, value: u8) {
        self.mapper.controllers_mut().set(port, value);
    }

    pub fn controllers(&self) -> &ControllerPorts {
        self.mapper.controllers()
    }
}

impl<V, S> Bus<V, S> {
    #[inline]
    pub fn read_byte(&self, addr: u16) -> u8 {
        let (region, offset, _) = self.page_table.resolve(addr);
        self.mapper.regions().read(region, offset)
    }

    #[inline]
    pub fn write_byte(&mut self, addr: u16, data: u8) {
        let (region, offset, mask) = self.page_table.resolve(addr);
        self.mapper.regions_mut().write(region, offset, data, mask);
    }

    pub fn read_word(&self, address: u16) -> u16 {
        let low_byte = self.read_byte(address) as u16;
        let high_byte = self.read_byte(address.wrapping_add(1)) as u16;
        (high_byte << 8) | low_byte
    }

    pub fn write_word(&mut self, address: u16, value: u16) {
        let [low_byte, high_byte] = value.to_le_bytes();
        self.write_byte(address, low_byte);
        self.write_byte(address.wrapping_add(1), high_byte);
    }

    pub fn write_block(&mut self, start_addr: u16, data: &[u8]) {
        let mut addr = start_addr;
        for &byte in data {
            self.write_byte(addr, byte);
            addr = addr.wrapping_add(1);
        }
    }

    pub fn primary_slot_config(&self) -> u8 {
        self.mapper.slot_config()
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn mapper(&self) -> &BankMapper {
        &self.mapper
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    pub fn ram(&self) -> &[u8] {
        self.mapper.regions().ram()
    }

    /// Replaces a ROM image in place. The page table keeps pointing at the
    /// same offsets, so the new contents are visible immediately.
    pub fn load_rom(&mut self, region: RegionId, data: &[u8]) -> Result<()> {
        self.mapper.regions_mut().load(region, data)
    }

    /// Current layout as contiguous address ranges; adjacent quadrants that
    /// continue the same region are merged.
    pub fn memory_segments(&self) -> Vec<MemorySegment> {
        let mut segments: Vec<MemorySegment> = Vec::new();

        for (quadrant, source) in self.page_table.quadrant_sources().into_iter().enumerate() {
            let start = (quadrant * QUADRANT_SIZE) as u16;
            let end = start + (QUADRANT_SIZE - 1) as u16;

            if let Some(last) = segments.last_mut() {
                let continues = last.source.region == source.region
                    && (source.region == RegionId::Unmapped
                        || last.source.offset + last.len() == source.offset);
                if continues {
                    last.end = end;
                    continue;
                }
            }

            segments.push(MemorySegment { start, end, source });
        }

        segments
    }
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct MemorySegment {
    pub start: u16,
    pub end: u16,
    pub source: Source,
}

impl MemorySegment {
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }
}

impl fmt::Display for MemorySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X} - 0x{:04X} - {}", self.start, self.end, self.source)
    }
}

#[derive(Debug, Default, Clone)]
pub struct BusBuilder {
    boot_rom: Option<Vec<u8>>,
    basic_rom: Option<Vec<u8>>,
    cartridges: Vec<(u8, Vec<u8>)>,
    config: BusConfig,
}

impl BusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boot_rom(&mut self, data: &[u8]) -> &mut Self {
        self.boot_rom = Some(data.to_vec());
        self
    }

    pub fn basic_rom(&mut self, data: &[u8]) -> &mut Self {
        self.basic_rom = Some(data.to_vec());
        self
    }

    /// Inserts a cartridge image into slot 1 or 2.
    pub fn cartridge(&mut self, slot: u8, data: &[u8]) -> &mut Self {
        self.cartridges.push((slot, data.to_vec()));
        self
    }

    pub fn config(&mut self, config: BusConfig) -> &mut Self {
        self.config = config;
        self
    }

    pub fn build<V: VideoUnit, S: SoundUnit>(&self, vdp: V, psg: S) -> Result<Bus<V, S>> {
        let mut regions = Regions::new(self.config.open_bus_value, self.config.ram_fill);

        if let Some(rom) = &self.boot_rom {
            regions.load(RegionId::BootRom, rom)?;
        }
        if let Some(rom) = &self.basic_rom {
            regions.load(RegionId::BasicRom, rom)?;
        }
        for (slot, rom) in &self.cartridges {
            let region = match slot {
                1 => RegionId::Rom1,
                2 => RegionId::Rom2,
                n => return Err(MapperError::InvalidCartridgeSlot(*n)),
            };
            regions.load(region, rom)?;
        }

        Ok(Bus::new(vdp, psg, regions, self.config))
    }

    pub fn build_msx(&self) -> Result<MsxBus> {
        self.build(TMS9918::new(), AY38910::new())
    }
}
