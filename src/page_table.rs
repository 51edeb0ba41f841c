use std::fmt;

use serde::{Deserialize, Serialize};

use crate::region::{RegionId, PAGE_SIZE};

pub const PAGE_COUNT: usize = 64;
pub const PAGES_PER_QUADRANT: usize = 16;

/// Where a quadrant's first page starts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub region: RegionId,
    pub offset: usize,
}

impl Source {
    pub const fn new(region: RegionId, offset: usize) -> Self {
        Self { region, offset }
    }

    pub fn mask(&self) -> u8 {
        match self.region {
            RegionId::Ram => 0xFF,
            _ => 0x00,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.region {
            RegionId::Unmapped => write!(f, "{}", self.region),
            region => write!(f, "{} @ {:#06X}", region, self.offset),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageEntry {
    pub region: RegionId,
    /// Byte offset of the page inside `region`.
    pub offset: usize,
    /// 0x00 for read-only pages, 0xFF for RAM.
    pub mask: u8,
}

impl PageEntry {
    const UNMAPPED: PageEntry = PageEntry {
        region: RegionId::Unmapped,
        offset: 0,
        mask: 0,
    };
}

/// The processor's view of the 64KB address space, one entry per 1KB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTable {
    entries: [PageEntry; PAGE_COUNT],
}

impl PageTable {
    pub fn new() -> Self {
        Self {
            entries: [PageEntry::UNMAPPED; PAGE_COUNT],
        }
    }

    pub fn entry(&self, page: usize) -> PageEntry {
        self.entries[page]
    }

    pub fn entries(&self) -> &[PageEntry; PAGE_COUNT] {
        &self.entries
    }

    /// Points the 16 pages of `quadrant` at consecutive 1KB windows of
    /// `source`. The unmapped placeholder is a single page, so every entry
    /// shares it.
    pub fn fill_quadrant(&mut self, quadrant: usize, source: Source) {
        let mask = source.mask();
        let first = quadrant * PAGES_PER_QUADRANT;

        for (i, entry) in self.entries[first..first + PAGES_PER_QUADRANT]
            .iter_mut()
            .enumerate()
        {
            let offset = match source.region {
                RegionId::Unmapped => 0,
                _ => source.offset + i * PAGE_SIZE,
            };
            *entry = PageEntry {
                region: source.region,
                offset,
                mask,
            };
        }
    }

    /// Returns the region, byte offset and write mask backing `address`.
    #[inline]
    pub fn resolve(&self, address: u16) -> (RegionId, usize, u8) {
        let entry = self.entries[address as usize / PAGE_SIZE];
        let offset = entry.offset + (address as usize & (PAGE_SIZE - 1));
        (entry.region, offset, entry.mask)
    }

    pub fn quadrant_sources(&self) -> [Source; 4] {
        [0, 1, 2, 3].map(|q| {
            let entry = self.entries[q * PAGES_PER_QUADRANT];
            Source::new(entry.region, entry.offset)
        })
    }
}

impl Default for PageTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_quadrant_advances_by_page() {
        let mut table = PageTable::new();
        table.fill_quadrant(2, Source::new(RegionId::Rom1, 0x8000));

        for i in 0..PAGES_PER_QUADRANT {
            let entry = table.entry(32 + i);
            assert_eq!(entry.region, RegionId::Rom1);
            assert_eq!(entry.offset, 0x8000 + i * 0x400);
            assert_eq!(entry.mask, 0x00);
        }
        // Neighbouring quadrants are untouched
        assert_eq!(table.entry(31).region, RegionId::Unmapped);
        assert_eq!(table.entry(48).region, RegionId::Unmapped);
    }

    #[test]
    fn test_unmapped_quadrant_shares_one_page() {
        let mut table = PageTable::new();
        table.fill_quadrant(3, Source::new(RegionId::Unmapped, 0));
        assert!(table.entries()[48..]
            .iter()
            .all(|e| e.region == RegionId::Unmapped && e.offset == 0 && e.mask == 0));
    }

    #[test]
    fn test_ram_is_writable() {
        let mut table = PageTable::new();
        table.fill_quadrant(0, Source::new(RegionId::Ram, 0));
        assert!(table.entries()[..16].iter().all(|e| e.mask == 0xFF));
    }

    #[test]
    fn test_resolve() {
        let mut table = PageTable::new();
        table.fill_quadrant(1, Source::new(RegionId::Rom2, 0x4000));
        table.fill_quadrant(3, Source::new(RegionId::Ram, 0xC000));

        assert_eq!(table.resolve(0x4000), (RegionId::Rom2, 0x4000, 0x00));
        assert_eq!(table.resolve(0x57FF), (RegionId::Rom2, 0x57FF, 0x00));
        assert_eq!(table.resolve(0xFFFF), (RegionId::Ram, 0xFFFF, 0xFF));
        assert_eq!(table.resolve(0x8123), (RegionId::Unmapped, 0x123, 0x00));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(Source::new(RegionId::Rom1, 0x4000).to_string(), "ROM1 @ 0x4000");
        assert_eq!(Source::new(RegionId::Unmapped, 0).to_string(), "Unmapped");
    }
}
