use thiserror::Error;

use crate::region::RegionId;

pub type Result<T> = std::result::Result<T, MapperError>;

#[derive(Debug, Error)]
pub enum MapperError {
    #[error("{region} image is {len:#X} bytes, region holds {capacity:#X}")]
    ImageTooLarge {
        region: RegionId,
        len: usize,
        capacity: usize,
    },

    #[error("{region} image is empty")]
    EmptyImage { region: RegionId },

    #[error("{0} cannot be loaded from an image")]
    NotLoadable(RegionId),

    #[error("invalid cartridge slot {0}, expected 1 or 2")]
    InvalidCartridgeSlot(u8),

    #[error("invalid controller port {0}, expected 1 or 2")]
    InvalidControllerPort(u8),

    #[error("invalid bus configuration: {0}")]
    Config(#[from] serde_json::Error),
}
