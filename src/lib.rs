pub mod bus;
pub mod config;
pub mod controller;
pub mod error;
pub mod io;
pub mod mapper;
pub mod page_table;
pub mod peripheral;
pub mod psg;
pub mod region;
pub mod vdp;

use std::sync::Once;

pub use bus::{Bus, BusBuilder, MemorySegment, MsxBus};
pub use config::BusConfig;
pub use controller::{ControllerPort, ControllerPorts};
pub use error::MapperError;
pub use io::Io;
pub use mapper::BankMapper;
pub use page_table::{PageEntry, PageTable, Source};
pub use peripheral::{SoundUnit, VideoUnit};
pub use psg::AY38910;
pub use region::{RegionId, Regions};
pub use vdp::TMS9918;
use wasm_bindgen::{prelude::*, JsError};

static LOGGING: Once = Once::new();

#[wasm_bindgen(js_name = Bus)]
pub struct JsBus(MsxBus);

#[wasm_bindgen(js_class = Bus)]
impl JsBus {
    #[wasm_bindgen(constructor)]
    pub fn new(boot_rom: &[u8], basic_rom: &[u8]) -> Result<JsBus, JsError> {
        LOGGING.call_once(|| {
            console_error_panic_hook::set_once();
            tracing_wasm::set_as_global_default();
        });

        let bus = BusBuilder::new()
            .boot_rom(boot_rom)
            .basic_rom(basic_rom)
            .build_msx()?;
        Ok(Self(bus))
    }

    #[wasm_bindgen(js_name = insertCartridge)]
    pub fn insert_cartridge(&mut self, slot: u8, data: &[u8]) -> Result<(), JsError> {
        let region = match slot {
            1 => RegionId::Rom1,
            2 => RegionId::Rom2,
            n => return Err(MapperError::InvalidCartridgeSlot(n).into()),
        };
        self.0.load_rom(region, data)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = portIn)]
    pub fn port_in(&mut self, port: u16) -> u8 {
        self.0.input(port)
    }

    #[wasm_bindgen(js_name = portOut)]
    pub fn port_out(&mut self, port: u16, value: u8) {
        self.0.output(port, value)
    }

    #[wasm_bindgen(js_name = readByte)]
    pub fn read_byte(&self, address: u16) -> u8 {
        self.0.read_byte(address)
    }

    #[wasm_bindgen(js_name = writeByte)]
    pub fn write_byte(&mut self, address: u16, value: u8) {
        self.0.write_byte(address, value)
    }

    #[wasm_bindgen(js_name = setController)]
    pub fn set_controller(&mut self, port: u8, value: u8) -> Result<(), JsError> {
        let port = ControllerPort::try_from(port)?;
        self.0.set_controller(port, value);
        Ok(())
    }

    #[wasm_bindgen(getter = slotConfig)]
    pub fn slot_config(&self) -> u8 {
        self.0.primary_slot_config()
    }

    #[wasm_bindgen(getter)]
    pub fn ram(&self) -> Vec<u8> {
        self.0.ram().to_vec()
    }

    #[wasm_bindgen(getter = memorySegments)]
    pub fn memory_segments(&self) -> String {
        self.0
            .memory_segments()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
