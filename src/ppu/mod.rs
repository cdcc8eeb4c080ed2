//! PPU register model.
//!
//! The CPU-visible side of the 2C02: [PPU registers](https://www.nesdev.org/wiki/PPU_registers)
//! $2000-$2007 side effects, the v/t/x/w scroll state from
//! [PPU scrolling](https://www.nesdev.org/wiki/PPU_scrolling), OAM, and
//! nametable/palette mirroring. No rendering.

pub mod ppu;
pub mod registers;
pub mod vram;
