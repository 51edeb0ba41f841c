use std::{cell::RefCell, rc::Rc};

use z80::Z80_io;

use crate::{
    bus::Bus,
    peripheral::{SoundUnit, VideoUnit},
};

/// Connects a `z80::Z80` core to the bus. Memory accesses go through the
/// page table, IN/OUT through the port dispatcher.
pub struct Io<V, S> {
    pub bus: Rc<RefCell<Bus<V, S>>>,
}

impl<V, S> Io<V, S> {
    pub fn new(bus: Rc<RefCell<Bus<V, S>>>) -> Self {
        Self { bus }
    }
}

impl<V: VideoUnit, S: SoundUnit> Z80_io for Io<V, S> {
    fn read_byte(&self, address: u16) -> u8 {
        self.bus.borrow().read_byte(address)
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        self.bus.borrow_mut().write_byte(address, value)
    }

    fn port_in(&self, port: u16) -> u8 {
        self.bus.borrow_mut().input(port)
    }

    fn port_out(&mut self, port: u16, value: u8) {
        self.bus.borrow_mut().output(port, value)
    }
}
