//! One-instruction disassembler for trace output.
//!
//! Formats operands the way 6502 assemblers print them; relative operands resolve to
//! their absolute target.

use crate::{
    bus::Bus,
    cpu::{addressing::AddressingMode, opcodes::OPCODES},
};

/// Disassemble the instruction at `addr`, returning its text and byte length.
///
/// Only the bytes the instruction actually occupies are read, so disassembling past a
/// program's end does not touch unrelated bus addresses.
pub fn disassemble<B: Bus>(bus: &mut B, addr: u16) -> (String, u16) {
    let opcode = bus.read(addr);

    let Some(op) = OPCODES[opcode as usize] else {
        return (format!(".byte ${:02X}", opcode), 1);
    };

    let operand_len = op.mode.operand_len();
    let lo = if operand_len >= 1 {
        bus.read(addr.wrapping_add(1))
    } else {
        0
    };
    let hi = if operand_len >= 2 {
        bus.read(addr.wrapping_add(2))
    } else {
        0
    };
    let word = ((hi as u16) << 8) | lo as u16;
    let name = op.mnemonic.name();

    let text = match op.mode {
        AddressingMode::Implied => name.to_string(),
        AddressingMode::Accumulator => format!("{} A", name),
        AddressingMode::Immediate => format!("{} #${:02X}", name, lo),
        AddressingMode::Absolute => format!("{} ${:04X}", name, word),
        AddressingMode::AbsoluteX => format!("{} ${:04X},X", name, word),
        AddressingMode::AbsoluteY => format!("{} ${:04X},Y", name, word),
        AddressingMode::Indirect => format!("{} (${:04X})", name, word),
        AddressingMode::ZeroPage => format!("{} ${:02X}", name, lo),
        AddressingMode::ZeroPageX => format!("{} ${:02X},X", name, lo),
        AddressingMode::ZeroPageY => format!("{} ${:02X},Y", name, lo),
        AddressingMode::IndirectX => format!("{} (${:02X},X)", name, lo),
        AddressingMode::IndirectY => format!("{} (${:02X}),Y", name, lo),
        AddressingMode::Relative => {
            let target = addr.wrapping_add(2).wrapping_add(lo as i8 as u16);
            format!("{} ${:04X}", name, target)
        }
    };

    (text, 1 + operand_len)
}
