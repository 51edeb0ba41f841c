//! Contracts the port dispatcher expects from the video and sound chips.

/// Video display processor as seen from ports 0x98 and 0x99.
pub trait VideoUnit {
    fn read_data(&mut self) -> u8;
    fn read_status(&mut self) -> u8;
    fn write_data(&mut self, value: u8);
    fn write_control(&mut self, value: u8);

    fn reset(&mut self) {}
}

/// Programmable sound generator as seen from ports 0xA0 to 0xA2.
///
/// Besides the select/read/write protocol, the register file is exposed
/// directly so the joystick multiplexer can patch registers 14 and 15.
pub trait SoundUnit {
    fn read_selected_register(&self) -> u8;
    /// Selects the register addressed by the next read or write. Only the
    /// low nibble is significant.
    fn set_select(&mut self, register: u8);
    fn write_selected_register(&mut self, value: u8);

    fn selected_register(&self) -> u8;
    fn register(&self, index: u8) -> u8;
    fn set_register(&mut self, index: u8, value: u8);

    fn reset(&mut self) {}
}
