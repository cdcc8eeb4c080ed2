//! iNES / NES 2.0 cartridge image parsing.
//!
//! The header is decoded for PRG/CHR sizes, mapper and submapper numbers, and nametable
//! wiring. Mapper numbers are recorded but not interpreted; only the fixed NROM-style
//! mapping in the bus uses the banks.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::ppu::vram::Mirroring;

const HEADER_LEN: usize = 16;
const TRAINER_LEN: usize = 512;
const PRG_UNIT: usize = 16 * 1024;
const CHR_UNIT: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ines,
    Nes20,
}

pub struct Rom {
    pub prg: Vec<u8>,
    pub chr: Vec<u8>,
    pub mapper: u16,
    pub submapper: u8,
    pub mirroring: Mirroring,
    pub format: Format,
    /// True when the header declared no CHR ROM; `chr` is then an 8 KiB RAM buffer.
    pub chr_ram: bool,
}

impl Rom {
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&data)
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            bail!("file too short for an iNES header ({} bytes)", data.len());
        }
        if &data[0..4] != b"NES\x1A" {
            bail!("bad magic, not an iNES file");
        }

        // NES 2.0 is flagged by bits 2-3 of byte 7 reading binary 10
        let format = if data[7] & 0x0C == 0x08 {
            Format::Nes20
        } else {
            Format::Ines
        };

        let (prg_size, chr_size) = match format {
            Format::Ines => (
                data[4] as usize * PRG_UNIT,
                data[5] as usize * CHR_UNIT,
            ),
            Format::Nes20 => (
                nes2_size(data[4], data[9] & 0x0F, PRG_UNIT)?,
                nes2_size(data[5], data[9] >> 4, CHR_UNIT)?,
            ),
        };

        let mut mapper = (data[7] as u16 & 0xF0) | (data[6] as u16 >> 4);
        let mut submapper = 0;
        if format == Format::Nes20 {
            mapper |= (data[8] as u16 & 0x0F) << 8;
            submapper = data[8] >> 4;
        }

        let mirroring = if data[6] & 0x08 != 0 {
            Mirroring::FourScreen
        } else if data[6] & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let mut offset = HEADER_LEN;
        if data[6] & 0x04 != 0 {
            offset += TRAINER_LEN; // trainer present, skipped
        }

        if data.len() < offset + prg_size + chr_size {
            bail!(
                "file truncated: header promises {} PRG + {} CHR bytes, {} available",
                prg_size,
                chr_size,
                data.len().saturating_sub(offset)
            );
        }

        let prg = data[offset..offset + prg_size].to_vec();
        let chr_ram = chr_size == 0;
        let chr = if chr_ram {
            vec![0; CHR_UNIT]
        } else {
            data[offset + prg_size..offset + prg_size + chr_size].to_vec()
        };

        log::info!(
            "mapper {} ({:?} mirroring), {} KiB PRG, {} KiB CHR{}",
            mapper,
            mirroring,
            prg.len() / 1024,
            chr.len() / 1024,
            if chr_ram { " RAM" } else { "" }
        );

        Ok(Self {
            prg,
            chr,
            mapper,
            submapper,
            mirroring,
            format,
            chr_ram,
        })
    }
}

/// Decode a NES 2.0 size field. A high nibble of 0xF switches the 12-bit value to
/// exponent-multiplier form: size = 2^E * (M*2 + 1).
fn nes2_size(lo: u8, hi: u8, unit: usize) -> Result<usize> {
    if hi == 0x0F {
        let exponent = (lo >> 2) as u32;
        let multiplier = (lo & 0x03) as usize * 2 + 1;
        let size = 1usize
            .checked_shl(exponent)
            .and_then(|base| base.checked_mul(multiplier))
            .context("ROM size field overflows")?;
        Ok(size)
    } else {
        Ok((((hi as usize) << 8) | lo as usize) * unit)
    }
}
