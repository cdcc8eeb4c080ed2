//! PPU register engine: CPU-visible side effects of $2000-$2007.
//!
//! Models the internal scroll registers described in
//! [PPU scrolling](https://www.nesdev.org/wiki/PPU_scrolling): `v` (current VRAM
//! address), `t` (temporary address), `x` (fine X), and the shared write toggle `w`.
//! No rendering pipeline; the registers behave as they do between frames.

use crate::ppu::{
    registers::{Ctrl, Mask, Status, VramAddr},
    vram::{Mirroring, Vram},
};

pub struct Ppu {
    pub ctrl: Ctrl,
    pub mask: Mask,
    pub status: Status,
    pub oam_addr: u8,
    pub oam: [u8; 256],
    /// Current VRAM address; PPUDATA accesses go through its low 14 bits.
    pub v: VramAddr,
    /// Temporary VRAM address, assembled by PPUSCROLL/PPUADDR writes.
    pub t: VramAddr,
    pub fine_x: u8,
    /// First/second-write toggle shared by PPUSCROLL and PPUADDR.
    pub w: bool,
    /// Last byte driven over the register interface; write-only registers read back as this.
    pub open_bus: u8,
    pub vram: Vram,
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            ctrl: Ctrl(0),
            mask: Mask(0),
            status: Status(0xA0), // vblank and sprite-overflow read as set at power-up
            oam_addr: 0,
            oam: [0; 256],
            v: VramAddr(0),
            t: VramAddr(0),
            fine_x: 0,
            w: false,
            open_bus: 0,
            vram: Vram::new(Mirroring::Horizontal),
        }
    }

    /// CPU read of a canonical register address ($2000-$2007).
    pub fn read_register(&mut self, addr: u16) -> u8 {
        let value = match addr {
            0x2002 => self.read_status(),
            0x2004 => self.oam[self.oam_addr as usize],
            0x2007 => self.read_data(),
            _ => {
                log::warn!("read of write-only PPU register ${:04X}", addr);
                self.open_bus
            }
        };
        self.open_bus = value;
        value
    }

    /// CPU write of a canonical register address ($2000-$2007).
    pub fn write_register(&mut self, addr: u16, data: u8) {
        self.open_bus = data;
        match addr {
            0x2000 => {
                self.ctrl = Ctrl(data);
                self.t.set_nametable(data as u16 & 0x03);
            }
            0x2001 => self.mask = Mask(data),
            0x2002 => log::warn!("write to read-only PPUSTATUS"),
            0x2003 => self.oam_addr = data,
            0x2004 => self.write_oam(data),
            0x2005 => self.write_scroll(data),
            0x2006 => self.write_addr(data),
            0x2007 => self.write_data(data),
            _ => unreachable!("non-canonical PPU register ${:04X}", addr),
        }
    }

    fn read_status(&mut self) -> u8 {
        let value = self.status.0;
        self.status.set_vblank(false);
        self.w = false;
        value
    }

    fn read_data(&mut self) -> u8 {
        let value = self.vram.read(self.v.0 & 0x3FFF);
        self.increment_addr();
        value
    }

    /// OAMDATA write: store at OAMADDR and advance it. OAM DMA funnels through here too.
    pub fn write_oam(&mut self, data: u8) {
        self.oam[self.oam_addr as usize] = data;
        self.oam_addr = self.oam_addr.wrapping_add(1);
    }

    fn write_scroll(&mut self, data: u8) {
        if !self.w {
            self.t.set_coarse_x(data as u16 >> 3);
            self.fine_x = data & 0x07;
        } else {
            self.t.set_coarse_y(data as u16 >> 3);
            self.t.set_fine_y(data as u16 & 0x07);
        }
        self.w = !self.w;
    }

    fn write_addr(&mut self, data: u8) {
        if !self.w {
            // High byte first; bit 14 is forced clear
            self.t.0 = ((data as u16 & 0x3F) << 8) | (self.t.0 & 0x00FF);
        } else {
            self.t.0 = (self.t.0 & 0xFF00) | data as u16;
            self.v = self.t;
        }
        self.w = !self.w;
    }

    fn write_data(&mut self, data: u8) {
        self.vram.write(self.v.0 & 0x3FFF, data);
        self.increment_addr();
    }

    fn increment_addr(&mut self) {
        self.v.0 = self.v.0.wrapping_add(self.ctrl.vram_increment()) & 0x7FFF;
    }

    /// Advance `v` one scanline down, as the renderer does at the end of each line.
    ///
    /// Fine Y carries into coarse Y; coarse Y 29 is the last row of a nametable, so it
    /// wraps to 0 and flips the vertical nametable bit. Coarse Y 31 (reachable by
    /// writing out-of-range scroll values) wraps without the flip.
    pub fn fine_y_increment(&mut self) {
        if self.v.fine_y() < 7 {
            self.v.set_fine_y(self.v.fine_y() + 1);
            return;
        }

        self.v.set_fine_y(0);
        match self.v.coarse_y() {
            29 => {
                self.v.set_coarse_y(0);
                self.v.0 ^= VramAddr::NAMETABLE_V;
            }
            31 => self.v.set_coarse_y(0),
            y => self.v.set_coarse_y(y + 1),
        }
    }

    /// Power-up and reset register state, per the NESdev power-up table. Reset leaves
    /// OAMADDR and the VRAM address alone and reports vblank as pending; power-up
    /// clears everything.
    pub fn power_reset(&mut self, is_reset: bool) {
        self.ctrl = Ctrl(0);
        self.mask = Mask(0);
        self.fine_x = 0;
        self.w = false;
        self.t = VramAddr(0);

        if is_reset {
            self.status.set_vblank(true);
        } else {
            self.status = Status(0xA0);
            self.oam_addr = 0;
            self.v = VramAddr(0);
        }
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}
