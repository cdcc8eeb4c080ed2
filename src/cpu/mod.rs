//! 6502 CPU emulation.
//!
//! Fetch-decode-dispatch engine over a fixed 256-entry opcode table; official instruction
//! set with page-cross and branch cycle accounting, [NMI](https://www.nesdev.org/wiki/NMI)/IRQ/BRK/reset protocol.
//! Bus trait used for memory and I/O (PPU, cartridge).

pub mod addressing;
pub mod cpu;
pub mod disasm;
pub mod flags;
pub mod opcodes;

#[cfg(test)]
mod tests;
