//! Cartridge image loading: [iNES](https://www.nesdev.org/wiki/INES) and
//! [NES 2.0](https://www.nesdev.org/wiki/NES_2.0) headers.

pub mod rom;
