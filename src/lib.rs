#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate bitflags;

mod bus;
mod cartridge;
mod cpu;
mod nes;
mod ppu;

pub use bus::SystemBus;
pub use cartridge::{CartridgeNes, Mirroring, RomFormatError};
pub use cpu::Cpu6502;
pub use nes::Nes;
pub use ppu::{decode_tile, Colour, Ppu2C02, PpuBus, PpuCtrl, PpuMask, PpuStatus, DISPLAY_PALETTE};

pub const DISPLAY_WIDTH: usize = 256;
pub const DISPLAY_HEIGHT: usize = 240;

pub trait SystemControl {
    fn reset(&mut self);
}
