//! CPU-visible PPU register bitfields and the internal VRAM address layout.
//!
//! See [PPU registers](https://www.nesdev.org/wiki/PPU_registers) and
//! [PPU scrolling](https://www.nesdev.org/wiki/PPU_scrolling).

/// PPUCTRL ($2000), write-only.
///
/// ```text
/// 7  bit  0
/// ---- ----
/// VPHB SINN
/// |||| ||||
/// |||| ||++- Base nametable address
/// |||| |+--- VRAM address increment (0: add 1; 1: add 32)
/// |||| +---- Sprite pattern table address
/// |||+------ Background pattern table address
/// ||+------- Sprite size
/// |+-------- PPU master/slave select
/// +--------- Vblank NMI enable
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ctrl(pub u8);

impl Ctrl {
    pub fn nametable(self) -> u8 {
        self.0 & 0x03
    }

    /// PPUDATA address step: 32 walks down a nametable column, 1 walks across.
    pub fn vram_increment(self) -> u16 {
        if self.0 & 0x04 != 0 { 32 } else { 1 }
    }

    pub fn nmi_enabled(self) -> bool {
        self.0 & 0x80 != 0
    }
}

/// PPUMASK ($2001), write-only.
///
/// ```text
/// 7  bit  0
/// ---- ----
/// BGRs bMmG
/// |||| ||||
/// |||| |||+- Greyscale
/// |||| ||+-- Show background in leftmost 8 pixels
/// |||| |+--- Show sprites in leftmost 8 pixels
/// |||| +---- Show background
/// |||+------ Show sprites
/// +++------- Colour emphasis
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mask(pub u8);

impl Mask {
    pub fn rendering_enabled(self) -> bool {
        self.0 & 0x18 != 0
    }
}

/// PPUSTATUS ($2002), read-only. Reading it clears the vblank bit and the shared
/// write toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    pub const VBLANK: u8 = 0x80;
    pub const SPRITE_ZERO_HIT: u8 = 0x40;
    pub const SPRITE_OVERFLOW: u8 = 0x20;

    pub fn in_vblank(self) -> bool {
        self.0 & Self::VBLANK != 0
    }

    pub fn set_vblank(&mut self, on: bool) {
        if on {
            self.0 |= Self::VBLANK;
        } else {
            self.0 &= !Self::VBLANK;
        }
    }
}

/// The 15-bit VRAM address as the PPU packs it, used for both `v` and `t`:
///
/// ```text
/// yyy NN YYYYY XXXXX
/// ||| || ||||| +++++- coarse X scroll
/// ||| || +++++------- coarse Y scroll
/// ||| ++------------- nametable select
/// +++---------------- fine Y scroll
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VramAddr(pub u16);

impl VramAddr {
    /// Bit flipped when coarse Y wraps off the bottom of a nametable.
    pub const NAMETABLE_V: u16 = 0x0800;

    pub fn coarse_x(self) -> u16 {
        self.0 & 0x1F
    }

    pub fn set_coarse_x(&mut self, value: u16) {
        self.0 = (self.0 & !0x1F) | (value & 0x1F);
    }

    pub fn coarse_y(self) -> u16 {
        (self.0 >> 5) & 0x1F
    }

    pub fn set_coarse_y(&mut self, value: u16) {
        self.0 = (self.0 & !(0x1F << 5)) | ((value & 0x1F) << 5);
    }

    pub fn nametable(self) -> u16 {
        (self.0 >> 10) & 0x03
    }

    pub fn set_nametable(&mut self, value: u16) {
        self.0 = (self.0 & !(0x03 << 10)) | ((value & 0x03) << 10);
    }

    pub fn fine_y(self) -> u16 {
        (self.0 >> 12) & 0x07
    }

    pub fn set_fine_y(&mut self, value: u16) {
        self.0 = (self.0 & !(0x07 << 12)) | ((value & 0x07) << 12);
    }
}
