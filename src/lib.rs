//! Ferrite: a headless MOS 6502 + NES PPU core written in Rust.
//!
//! Implements the Ricoh 2A03 instruction engine and the CPU-visible side of the 2C02
//! PPU as documented on the [NESdev Wiki](https://www.nesdev.org/wiki/NES_reference_guide).
//! No rendering, audio, or mapper logic; the crate is the execution and register model
//! underneath those layers.
//!
//! ## Modules (NESdev references)
//!
//! - **bus** – [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map): RAM and PPU
//!   register mirroring, OAM DMA, cartridge space
//! - **cartridge** – [iNES](https://www.nesdev.org/wiki/INES) / [NES 2.0](https://www.nesdev.org/wiki/NES_2.0) image loading
//! - **cpu** – [6502](https://www.nesdev.org/wiki/CPU) / 2A03: official opcodes, table
//!   dispatch, cycle accounting, [NMI](https://www.nesdev.org/wiki/NMI)/IRQ/BRK/reset
//! - **ppu** – [PPU registers](https://www.nesdev.org/wiki/PPU_registers): $2000–$2007
//!   side effects, v/t/x/w scroll state, OAM, nametable and palette mirroring

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod ppu;
