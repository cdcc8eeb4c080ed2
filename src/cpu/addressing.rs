//! 6502 addressing modes and operand resolution.
//!
//! See [CPU addressing modes](https://www.nesdev.org/wiki/CPU_addressing_modes). The resolver
//! consumes the operand bytes following the opcode and yields the effective operand plus a
//! page-cross signal for the indexed modes that can incur an extra read cycle.

use crate::{bus::Bus, cpu::cpu::Cpu};

/// The thirteen addressing modes of the 6502.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand; the instruction acts on registers alone.
    Implied,
    /// The instruction acts on the accumulator.
    Accumulator,
    /// The operand is the byte following the opcode.
    Immediate,
    /// A full 16-bit little-endian address.
    Absolute,
    /// Absolute address indexed by X.
    AbsoluteX,
    /// Absolute address indexed by Y.
    AbsoluteY,
    /// JMP only: a 16-bit pointer to the target address.
    Indirect,
    /// A one-byte address into page zero.
    ZeroPage,
    /// Zero-page address plus X, wrapping within page zero.
    ZeroPageX,
    /// Zero-page address plus Y, wrapping within page zero.
    ZeroPageY,
    /// Zero-page pointer indexed by X before the 16-bit fetch.
    IndirectX,
    /// Zero-page pointer fetched first, then indexed by Y.
    IndirectY,
    /// Signed 8-bit displacement for branches.
    Relative,
}

impl AddressingMode {
    /// Operand bytes following the opcode (instruction length minus one).
    pub fn operand_len(self) -> u16 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY
            | AddressingMode::Relative => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }
}

/// A resolved operand: where the instruction reads from and writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Accumulator,
    Immediate(u8),
    Address(u16),
}

impl<B: Bus> Cpu<B> {
    /// Consume the operand bytes for `mode` and resolve the effective operand.
    ///
    /// The bool is the page-cross signal: true when indexing moved the access into a
    /// different page than the pre-index base. Only AbsoluteX/AbsoluteY/IndirectY report
    /// it; whether it costs a cycle is decided by the dispatch table entry.
    pub(crate) fn resolve(&mut self, mode: AddressingMode) -> (Operand, bool) {
        match mode {
            AddressingMode::Implied => (Operand::None, false),
            AddressingMode::Accumulator => (Operand::Accumulator, false),
            AddressingMode::Immediate | AddressingMode::Relative => {
                (Operand::Immediate(self.fetch_byte()), false)
            }
            AddressingMode::Absolute => (Operand::Address(self.fetch_word()), false),
            AddressingMode::AbsoluteX => {
                let base = self.fetch_word();
                let addr = base.wrapping_add(self.x as u16);
                (Operand::Address(addr), (base & 0xFF00) != (addr & 0xFF00))
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_word();
                let addr = base.wrapping_add(self.y as u16);
                (Operand::Address(addr), (base & 0xFF00) != (addr & 0xFF00))
            }
            AddressingMode::Indirect => {
                let ptr = self.fetch_word();

                let lo = self.bus.read(ptr) as u16;
                let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF); // page-boundary bug
                let hi = self.bus.read(hi_addr) as u16;

                (Operand::Address((hi << 8) | lo), false)
            }
            AddressingMode::ZeroPage => (Operand::Address(self.fetch_byte() as u16), false),
            AddressingMode::ZeroPageX => {
                let base = self.fetch_byte();
                (Operand::Address(base.wrapping_add(self.x) as u16), false)
            }
            AddressingMode::ZeroPageY => {
                let base = self.fetch_byte();
                (Operand::Address(base.wrapping_add(self.y) as u16), false)
            }
            AddressingMode::IndirectX => {
                let zp = self.fetch_byte();
                let ptr = zp.wrapping_add(self.x);

                let lo = self.bus.read(ptr as u16) as u16;
                let hi = self.bus.read(ptr.wrapping_add(1) as u16) as u16;

                (Operand::Address((hi << 8) | lo), false)
            }
            AddressingMode::IndirectY => {
                let zp = self.fetch_byte();

                let lo = self.bus.read(zp as u16) as u16;
                let hi = self.bus.read(zp.wrapping_add(1) as u16) as u16;
                let base = (hi << 8) | lo;

                let addr = base.wrapping_add(self.y as u16);
                (Operand::Address(addr), (base & 0xFF00) != (addr & 0xFF00))
            }
        }
    }
}
