//! PPU address space with nametable and palette mirroring.
//!
//! [PPU memory map](https://www.nesdev.org/wiki/PPU_memory_map): pattern tables at
//! $0000-$1FFF, nametables at $2000-$2FFF (wired per cartridge), $3000-$3EFF echoing
//! the nametables, palette RAM repeating every 32 bytes from $3F00.

/// How the two physical nametables appear in the four logical slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    SingleScreen,
    Horizontal,
    Vertical,
    FourScreen,
}

pub struct Vram {
    pub mem: [u8; 0x4000],
    pub mirroring: Mirroring,
}

impl Vram {
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            mem: [0; 0x4000],
            mirroring,
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.mem[self.mirrored_address(addr) as usize]
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        let addr = self.mirrored_address(addr);
        self.mem[addr as usize] = data;
    }

    /// Fold a PPU address into its canonical slot.
    pub fn mirrored_address(&self, addr: u16) -> u16 {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => addr,
            0x3F00..=0x3FFF => 0x3F00 | (addr & 0x001F),
            _ => {
                // $3000-$3EFF echoes the nametable range
                let addr = if addr >= 0x3000 { addr - 0x1000 } else { addr };
                let index = addr & 0x03FF;
                let table = (addr - 0x2000) / 0x0400;
                let table = match self.mirroring {
                    Mirroring::SingleScreen => 0,
                    Mirroring::Horizontal => table / 2,
                    Mirroring::Vertical => table % 2,
                    Mirroring::FourScreen => table,
                };
                0x2000 + table * 0x0400 + index
            }
        }
    }
}
