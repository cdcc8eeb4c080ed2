//! Memory bus and address decoding.
//!
//! Maps CPU addresses to RAM, PPU registers, and cartridge space per the
//! [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map).

use crate::{cartridge::rom::Rom, ppu::ppu::Ppu};

/// Trait for memory-mapped I/O and bus access used by the CPU.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);
}

/// Fold a CPU address into its canonical slot: internal RAM repeats every 2 KiB below
/// $2000, the eight PPU registers repeat through $2000-$3FFF. Everything else maps to
/// itself.
pub fn mirrored_address(addr: u16) -> u16 {
    match addr {
        0x0000..=0x1FFF => addr & 0x07FF,
        0x2000..=0x3FFF => 0x2000 | (addr & 0x0007),
        _ => addr,
    }
}

/// Main CPU bus: 2 KiB internal RAM, the PPU register engine, and flat cartridge space.
pub struct CpuBus {
    /// Backing store for everything except the PPU range; only the canonical slots
    /// (after mirroring) are ever touched.
    pub mem: [u8; 0x10000],
    pub ppu: Ppu,
}

impl CpuBus {
    pub fn new(ppu: Ppu) -> Self {
        Self {
            mem: [0; 0x10000],
            ppu,
        }
    }

    /// Copy a raw program image into CPU space at `offset`, clipped at the top of the
    /// address space.
    pub fn load_bytes(&mut self, offset: u16, data: &[u8]) {
        let start = offset as usize;
        let end = (start + data.len()).min(self.mem.len());
        self.mem[start..end].copy_from_slice(&data[..end - start]);
    }

    /// Map a cartridge the way an NROM board wires it: PRG at $8000 (a 16 KiB bank
    /// appears in both halves), CHR into PPU pattern-table space, nametable wiring from
    /// the header.
    pub fn load_rom(&mut self, rom: &Rom) {
        let prg_len = rom.prg.len().min(0x8000);
        self.mem[0x8000..0x8000 + prg_len].copy_from_slice(&rom.prg[..prg_len]);
        if rom.prg.len() == 0x4000 {
            self.mem[0xC000..0x10000].copy_from_slice(&rom.prg);
        }

        let chr_len = rom.chr.len().min(0x2000);
        self.ppu.vram.mem[..chr_len].copy_from_slice(&rom.chr[..chr_len]);
        self.ppu.vram.mirroring = rom.mirroring;
    }

    /// OAM DMA ($4014): copy one 256-byte CPU page into OAM through OAMDATA.
    fn oam_dma(&mut self, page: u8) {
        let base = (page as u16) << 8;
        for i in 0..256 {
            let byte = self.read(base.wrapping_add(i));
            self.ppu.write_oam(byte);
        }
    }
}

impl Bus for CpuBus {
    fn read(&mut self, addr: u16) -> u8 {
        match mirrored_address(addr) {
            r @ 0x2000..=0x2007 => self.ppu.read_register(r),
            a => self.mem[a as usize],
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        match mirrored_address(addr) {
            r @ 0x2000..=0x2007 => self.ppu.write_register(r, data),
            0x4014 => self.oam_dma(data),
            a => self.mem[a as usize] = data,
        }
    }
}
