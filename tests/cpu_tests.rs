use std::{cell::RefCell, rc::Rc};

use tracing_subscriber::fmt;
use wasmsx_mapper::{BusBuilder, BusConfig, ControllerPort, Io, MsxBus, AY38910, TMS9918};
use z80::Z80;

#[cfg(test)]
#[ctor::ctor]
fn init() {
    let fmt_subscriber = fmt::Subscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .with_test_writer()
        .finish();
    tracing::subscriber::set_global_default(fmt_subscriber)
        .expect("Unable to set global tracing subscriber");
}

fn get_cpu(bios: &[u8]) -> (Z80<Io<TMS9918, AY38910>>, Rc<RefCell<MsxBus>>) {
    let bus = BusBuilder::new()
        .boot_rom(bios)
        .config(BusConfig {
            ram_fill: 0x00,
            ..Default::default()
        })
        .build_msx()
        .unwrap();
    let bus = Rc::new(RefCell::new(bus));
    let cpu = Z80::new(Io::new(bus.clone()));
    (cpu, bus)
}

fn run_until_halt<T: z80::Z80_io>(cpu: &mut Z80<T>, max_steps: usize) {
    for _ in 0..max_steps {
        if cpu.halted {
            return;
        }
        cpu.step();
    }
    panic!("CPU did not halt after {} steps", max_steps);
}

#[test]
fn test_out_a8_switches_banks() {
    #[rustfmt::skip]
    let program = [
        0x3E, 0xFC,       // LD A,0FCh      ; BIOS stays, RAM everywhere else
        0xD3, 0xA8,       // OUT (0A8h),A
        0x3E, 0x42,       // LD A,42h
        0x32, 0x00, 0xC0, // LD (0C000h),A
        0x32, 0x00, 0x00, // LD (0000h),A   ; ROM, ignored
        0xDB, 0xA8,       // IN A,(0A8h)
        0x32, 0x01, 0xC0, // LD (0C001h),A
        0x76,             // HALT
    ];
    let (mut cpu, bus) = get_cpu(&program);

    run_until_halt(&mut cpu, 32);

    let bus = bus.borrow();
    assert_eq!(bus.primary_slot_config(), 0xFC);
    assert_eq!(bus.read_byte(0xC000), 0x42);
    assert_eq!(bus.read_byte(0xC001), 0xFC);
    assert_eq!(bus.ram()[0xC000], 0x42);
    assert_eq!(bus.read_byte(0x0000), 0x3E);
}

#[test]
fn test_out_c_uses_low_port_byte() {
    #[rustfmt::skip]
    let program = [
        0x01, 0xA8, 0x7F, // LD BC,7FA8h
        0x3E, 0xC0,       // LD A,0C0h
        0xED, 0x79,       // OUT (C),A
        0x3E, 0x99,       // LD A,99h
        0x32, 0xFF, 0xFF, // LD (0FFFFh),A
        0x76,             // HALT
    ];
    let (mut cpu, bus) = get_cpu(&program);

    run_until_halt(&mut cpu, 32);

    let bus = bus.borrow();
    assert_eq!(bus.primary_slot_config(), 0xC0);
    assert_eq!(bus.ram()[0xFFFF], 0x99);
}

#[test]
fn test_joystick_read_through_psg() {
    #[rustfmt::skip]
    let program = [
        0x3E, 0xC0,       // LD A,0C0h
        0xD3, 0xA8,       // OUT (0A8h),A
        0x3E, 0x0F,       // LD A,0Fh
        0xD3, 0xA0,       // OUT (0A0h),A  ; select R15
        0x3E, 0x40,       // LD A,40h
        0xD3, 0xA1,       // OUT (0A1h),A  ; joystick port 2
        0x3E, 0x0E,       // LD A,0Eh
        0xD3, 0xA0,       // OUT (0A0h),A  ; select R14
        0xDB, 0xA2,       // IN A,(0A2h)
        0x32, 0x00, 0xC0, // LD (0C000h),A
        0x76,             // HALT
    ];
    let (mut cpu, bus) = get_cpu(&program);
    bus.borrow_mut().set_controller(ControllerPort::Two, 0x2E);

    run_until_halt(&mut cpu, 32);

    assert_eq!(bus.borrow().read_byte(0xC000), 0x2E);
}
