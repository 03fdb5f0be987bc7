use std::fs::read;
use std::path::Path;

use thiserror::Error;

use crate::bus::{SystemBus, PRG_ROM_START};

// The size of each PRG-ROM bank
pub const PRG_BANK_SIZE: usize = 0x4000;

// The size of each CHR-ROM bank
pub const CHR_BANK_SIZE: usize = 0x2000;

const HEADER_SIZE: usize = 0x10;

// "NES" in ASCII followed by 0x1A
const INES_TAG: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

/// Width of the vector region mirrored to the top of the address space
/// when the image holds a single PRG bank.
const VECTOR_MIRROR_SIZE: usize = 0x10;

const VECTOR_MIRROR_DEST: usize = 0xFFF0;

#[derive(Debug, Error)]
pub enum RomFormatError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image is {len} bytes, shorter than the {HEADER_SIZE}-byte header")]
    MissingHeader { len: usize },
    #[error("missing iNES magic bytes")]
    NotInes,
    #[error("header declares {expected} bytes but image holds {actual}")]
    TruncatedImage { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
}

#[derive(Debug)]
pub struct CartridgeNes {
    prg_banks: usize,
    chr_banks: usize,
    mirroring: Mirroring,
    prg_rom: Vec<u8>,
    chr_rom: Vec<u8>,
}

impl CartridgeNes {
    pub fn from_ines_file<P: AsRef<Path>>(path: P) -> Result<Self, RomFormatError> {
        let data = read(path)?;

        CartridgeNes::from_ines_bytes(&data)
    }

    pub fn from_ines_bytes(data: &[u8]) -> Result<Self, RomFormatError> {
        if data.len() < HEADER_SIZE {
            return Err(RomFormatError::MissingHeader { len: data.len() });
        }

        if data[0..4] != INES_TAG {
            return Err(RomFormatError::NotInes);
        }

        let prg_banks = data[4] as usize;
        let chr_banks = data[5] as usize;

        let mirroring = if data[6] & 0x01 == 0 {
            Mirroring::Horizontal
        } else {
            Mirroring::Vertical
        };

        let prg_len = prg_banks * PRG_BANK_SIZE;
        let chr_len = chr_banks * CHR_BANK_SIZE;

        let expected = HEADER_SIZE + prg_len + chr_len;
        if data.len() < expected {
            return Err(RomFormatError::TruncatedImage {
                expected,
                actual: data.len(),
            });
        }

        log::info!(
            "cartridge image: {} PRG bank(s), {} CHR bank(s), {:?} mirroring",
            prg_banks,
            chr_banks,
            mirroring
        );

        Ok(Self {
            prg_banks,
            chr_banks,
            mirroring,
            prg_rom: data[HEADER_SIZE..HEADER_SIZE + prg_len].to_vec(),
            chr_rom: data[HEADER_SIZE + prg_len..expected].to_vec(),
        })
    }

    /// Copies program and pattern data into the address space and records
    /// the nametable mirroring mode for the renderer.
    pub fn load_into(&self, bus: &mut SystemBus) {
        // the fixed NROM layout maps at most two banks at 0x8000-0xFFFF
        let window = 0x10000 - PRG_ROM_START;

        for (i, &byte) in self.prg_rom.iter().take(window).enumerate() {
            bus.cpu_write(PRG_ROM_START + i, byte);
        }

        // A single 16KB bank fills only 0x8000-0xBFFF, but the CPU fetches
        // its reset/IRQ/NMI vectors from the very top of the 64KB space.
        // Mirror the bank's vector table up there so they resolve.
        if self.prg_banks == 1 {
            let top = self.prg_rom.len() - VECTOR_MIRROR_SIZE;

            for (i, &byte) in self.prg_rom[top..].iter().enumerate() {
                bus.cpu_write(VECTOR_MIRROR_DEST + i, byte);
            }
        }

        for (i, &byte) in self.chr_rom.iter().enumerate() {
            bus.ppu_bus.ppu_write(i, byte);
        }

        bus.ppu_bus.set_mirroring(self.mirroring);
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn prg_banks(&self) -> usize {
        self.prg_banks
    }

    pub fn chr_banks(&self) -> usize {
        self.chr_banks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(prg_banks: u8, chr_banks: u8, flags: u8) -> Vec<u8> {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, prg_banks, chr_banks, flags];
        data.resize(
            HEADER_SIZE
                + prg_banks as usize * PRG_BANK_SIZE
                + chr_banks as usize * CHR_BANK_SIZE,
            0,
        );
        data
    }

    #[test]
    fn test_rejects_short_header() {
        let err = CartridgeNes::from_ines_bytes(&[0x4E, 0x45, 0x53]).unwrap_err();
        assert!(matches!(err, RomFormatError::MissingHeader { len: 3 }));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut data = image(1, 1, 0);
        data[0] = 0x00;

        let err = CartridgeNes::from_ines_bytes(&data).unwrap_err();
        assert!(matches!(err, RomFormatError::NotInes));
    }

    #[test]
    fn test_rejects_truncated_image() {
        let mut data = image(2, 1, 0);
        data.truncate(HEADER_SIZE + PRG_BANK_SIZE);

        let err = CartridgeNes::from_ines_bytes(&data).unwrap_err();
        assert!(matches!(
            err,
            RomFormatError::TruncatedImage { expected, actual }
                if expected == HEADER_SIZE + 2 * PRG_BANK_SIZE + CHR_BANK_SIZE
                    && actual == HEADER_SIZE + PRG_BANK_SIZE
        ));
    }

    #[test]
    fn test_mirroring_flag() {
        assert_eq!(
            CartridgeNes::from_ines_bytes(&image(1, 1, 0)).unwrap().mirroring(),
            Mirroring::Horizontal
        );
        assert_eq!(
            CartridgeNes::from_ines_bytes(&image(1, 1, 1)).unwrap().mirroring(),
            Mirroring::Vertical
        );
    }

    #[test]
    fn test_one_bank_mirrors_vector_table() {
        let mut data = image(1, 1, 0);
        for i in 0..VECTOR_MIRROR_SIZE {
            data[HEADER_SIZE + PRG_BANK_SIZE - VECTOR_MIRROR_SIZE + i] = 0xA0 + i as u8;
        }

        let cartridge = CartridgeNes::from_ines_bytes(&data).unwrap();
        let mut bus = SystemBus::new();
        cartridge.load_into(&mut bus);

        for i in 0..VECTOR_MIRROR_SIZE {
            assert_eq!(bus.cpu_read(0xBFF0 + i), 0xA0 + i as u8);
            assert_eq!(bus.cpu_read(0xFFF0 + i), 0xA0 + i as u8);
        }
    }

    #[test]
    fn test_two_banks_fill_upper_half() {
        let mut data = image(2, 1, 0);
        data[HEADER_SIZE + 2 * PRG_BANK_SIZE - 4] = 0x34;
        data[HEADER_SIZE + 2 * PRG_BANK_SIZE - 3] = 0x12;

        let cartridge = CartridgeNes::from_ines_bytes(&data).unwrap();
        let mut bus = SystemBus::new();
        cartridge.load_into(&mut bus);

        assert_eq!(bus.cpu_read(0xFFFC), 0x34);
        assert_eq!(bus.cpu_read(0xFFFD), 0x12);
    }
}
