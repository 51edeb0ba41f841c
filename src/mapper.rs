// Primary slot layout, one row per 2-bit field value of port A8:
//
// +-------+-------------+-------------+-------------+-------------+
// | field | 0000-3FFF   | 4000-7FFF   | 8000-BFFF   | C000-FFFF   |
// +-------+-------------+-------------+-------------+-------------+
// |   0   | BIOS        | BASIC       | unmapped    | unmapped    |
// |   1   | ROM1 0000   | ROM1 4000   | ROM1 8000   | ROM1 C000   |
// |   2   | ROM2 0000   | ROM2 4000   | ROM2 8000   | ROM2 C000   |
// |   3   | RAM 0000    | RAM 4000    | RAM 8000    | RAM C000    |
// +-------+-------------+-------------+-------------+-------------+
use crate::{
    controller::ControllerPorts,
    page_table::{PageTable, Source},
    region::{RegionId, Regions},
};

const SOURCES: [[Source; 4]; 4] = [
    [
        Source::new(RegionId::BootRom, 0x0000),
        Source::new(RegionId::BasicRom, 0x0000),
        Source::new(RegionId::Unmapped, 0x0000),
        Source::new(RegionId::Unmapped, 0x0000),
    ],
    [
        Source::new(RegionId::Rom1, 0x0000),
        Source::new(RegionId::Rom1, 0x4000),
        Source::new(RegionId::Rom1, 0x8000),
        Source::new(RegionId::Rom1, 0xC000),
    ],
    [
        Source::new(RegionId::Rom2, 0x0000),
        Source::new(RegionId::Rom2, 0x4000),
        Source::new(RegionId::Rom2, 0x8000),
        Source::new(RegionId::Rom2, 0xC000),
    ],
    [
        Source::new(RegionId::Ram, 0x0000),
        Source::new(RegionId::Ram, 0x4000),
        Source::new(RegionId::Ram, 0x8000),
        Source::new(RegionId::Ram, 0xC000),
    ],
];

/// Owns the primary slot register (port A8), the physical regions and the
/// controller snapshot bytes.
#[derive(Debug, Clone)]
pub struct BankMapper {
    slot_config: u8,
    regions: Regions,
    controllers: ControllerPorts,
}

impl BankMapper {
    pub fn new(regions: Regions, controllers: ControllerPorts) -> Self {
        Self {
            slot_config: 0,
            regions,
            controllers,
        }
    }

    pub fn slot_config(&self) -> u8 {
        self.slot_config
    }

    /// Stores a new primary slot configuration and rebuilds the whole table
    /// before returning.
    pub fn write_slot_config(&mut self, value: u8, table: &mut PageTable) {
        self.slot_config = value;
        self.remap(table);
    }

    pub fn remap(&self, table: &mut PageTable) {
        for quadrant in 0..4 {
            table.fill_quadrant(quadrant, Self::source_for(self.slot_config, quadrant));
        }

        let [q0, q1, q2, q3] = table.quadrant_sources();
        tracing::debug!(
            "[MAPPER] Remap A8={:02X} (P0:{}, P1:{}, P2:{}, P3:{})",
            self.slot_config,
            q0,
            q1,
            q2,
            q3
        );
    }

    pub fn source_for(slot_config: u8, quadrant: usize) -> Source {
        let field = (slot_config >> (quadrant * 2)) & 0x03;
        SOURCES[field as usize][quadrant]
    }

    pub fn regions(&self) -> &Regions {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut Regions {
        &mut self.regions
    }

    pub fn controllers(&self) -> &ControllerPorts {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut ControllerPorts {
        &mut self.controllers
    }
}
