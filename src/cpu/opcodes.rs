//! The fixed 256-entry opcode dispatch table.
//!
//! Each entry carries the mnemonic, addressing mode, base cycle count, and whether the
//! opcode pays the page-cross cycle when indexing crosses a page. `None` entries are
//! undefined opcodes; the engine treats them as no-ops consuming 0 cycles.

use crate::cpu::addressing::AddressingMode;

/// Official 6502 instruction mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
}

impl Mnemonic {
    /// Assembler name, for trace and disassembly output.
    pub fn name(self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC",
            Mnemonic::And => "AND",
            Mnemonic::Asl => "ASL",
            Mnemonic::Bcc => "BCC",
            Mnemonic::Bcs => "BCS",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Bit => "BIT",
            Mnemonic::Bmi => "BMI",
            Mnemonic::Bne => "BNE",
            Mnemonic::Bpl => "BPL",
            Mnemonic::Brk => "BRK",
            Mnemonic::Bvc => "BVC",
            Mnemonic::Bvs => "BVS",
            Mnemonic::Clc => "CLC",
            Mnemonic::Cld => "CLD",
            Mnemonic::Cli => "CLI",
            Mnemonic::Clv => "CLV",
            Mnemonic::Cmp => "CMP",
            Mnemonic::Cpx => "CPX",
            Mnemonic::Cpy => "CPY",
            Mnemonic::Dec => "DEC",
            Mnemonic::Dex => "DEX",
            Mnemonic::Dey => "DEY",
            Mnemonic::Eor => "EOR",
            Mnemonic::Inc => "INC",
            Mnemonic::Inx => "INX",
            Mnemonic::Iny => "INY",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX",
            Mnemonic::Ldy => "LDY",
            Mnemonic::Lsr => "LSR",
            Mnemonic::Nop => "NOP",
            Mnemonic::Ora => "ORA",
            Mnemonic::Pha => "PHA",
            Mnemonic::Php => "PHP",
            Mnemonic::Pla => "PLA",
            Mnemonic::Plp => "PLP",
            Mnemonic::Rol => "ROL",
            Mnemonic::Ror => "ROR",
            Mnemonic::Rti => "RTI",
            Mnemonic::Rts => "RTS",
            Mnemonic::Sbc => "SBC",
            Mnemonic::Sec => "SEC",
            Mnemonic::Sed => "SED",
            Mnemonic::Sei => "SEI",
            Mnemonic::Sta => "STA",
            Mnemonic::Stx => "STX",
            Mnemonic::Sty => "STY",
            Mnemonic::Tax => "TAX",
            Mnemonic::Tay => "TAY",
            Mnemonic::Tsx => "TSX",
            Mnemonic::Txa => "TXA",
            Mnemonic::Txs => "TXS",
            Mnemonic::Tya => "TYA",
        }
    }
}

/// One dispatch table entry.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    /// Base cycle cost before page-cross and branch extras. BRK is listed as 0 because
    /// its cost comes from the shared interrupt sequence.
    pub cycles: u8,
    /// True when indexing across a page boundary costs an extra cycle.
    pub page_cross: bool,
}

impl Opcode {
    const fn new(mnemonic: Mnemonic, mode: AddressingMode, cycles: u8, page_cross: bool) -> Self {
        Self {
            mnemonic,
            mode,
            cycles,
            page_cross,
        }
    }
}

pub const OPCODES: [Option<Opcode>; 256] = {
    use AddressingMode::*;
    use Mnemonic::*;

    let mut t: [Option<Opcode>; 256] = [None; 256];

    t[0x69] = Some(Opcode::new(Adc, Immediate, 2, false));
    t[0x65] = Some(Opcode::new(Adc, ZeroPage, 3, false));
    t[0x75] = Some(Opcode::new(Adc, ZeroPageX, 4, false));
    t[0x6D] = Some(Opcode::new(Adc, Absolute, 4, false));
    t[0x7D] = Some(Opcode::new(Adc, AbsoluteX, 4, true));
    t[0x79] = Some(Opcode::new(Adc, AbsoluteY, 4, true));
    t[0x61] = Some(Opcode::new(Adc, IndirectX, 6, false));
    t[0x71] = Some(Opcode::new(Adc, IndirectY, 5, true));

    t[0x29] = Some(Opcode::new(And, Immediate, 2, false));
    t[0x25] = Some(Opcode::new(And, ZeroPage, 3, false));
    t[0x35] = Some(Opcode::new(And, ZeroPageX, 4, false));
    t[0x2D] = Some(Opcode::new(And, Absolute, 4, false));
    t[0x3D] = Some(Opcode::new(And, AbsoluteX, 4, true));
    t[0x39] = Some(Opcode::new(And, AbsoluteY, 4, true));
    t[0x21] = Some(Opcode::new(And, IndirectX, 6, false));
    t[0x31] = Some(Opcode::new(And, IndirectY, 5, true));

    t[0x0A] = Some(Opcode::new(Asl, Accumulator, 2, false));
    t[0x06] = Some(Opcode::new(Asl, ZeroPage, 5, false));
    t[0x16] = Some(Opcode::new(Asl, ZeroPageX, 6, false));
    t[0x0E] = Some(Opcode::new(Asl, Absolute, 6, false));
    t[0x1E] = Some(Opcode::new(Asl, AbsoluteX, 7, false));

    t[0x90] = Some(Opcode::new(Bcc, Relative, 2, false));
    t[0xB0] = Some(Opcode::new(Bcs, Relative, 2, false));
    t[0xF0] = Some(Opcode::new(Beq, Relative, 2, false));
    t[0x30] = Some(Opcode::new(Bmi, Relative, 2, false));
    t[0xD0] = Some(Opcode::new(Bne, Relative, 2, false));
    t[0x10] = Some(Opcode::new(Bpl, Relative, 2, false));
    t[0x50] = Some(Opcode::new(Bvc, Relative, 2, false));
    t[0x70] = Some(Opcode::new(Bvs, Relative, 2, false));

    t[0x24] = Some(Opcode::new(Bit, ZeroPage, 3, false));
    t[0x2C] = Some(Opcode::new(Bit, Absolute, 4, false));

    t[0x00] = Some(Opcode::new(Brk, Implied, 0, false));

    t[0x18] = Some(Opcode::new(Clc, Implied, 2, false));
    t[0xD8] = Some(Opcode::new(Cld, Implied, 2, false));
    t[0x58] = Some(Opcode::new(Cli, Implied, 2, false));
    t[0xB8] = Some(Opcode::new(Clv, Implied, 2, false));

    t[0xC9] = Some(Opcode::new(Cmp, Immediate, 2, false));
    t[0xC5] = Some(Opcode::new(Cmp, ZeroPage, 3, false));
    t[0xD5] = Some(Opcode::new(Cmp, ZeroPageX, 4, false));
    t[0xCD] = Some(Opcode::new(Cmp, Absolute, 4, false));
    t[0xDD] = Some(Opcode::new(Cmp, AbsoluteX, 4, true));
    t[0xD9] = Some(Opcode::new(Cmp, AbsoluteY, 4, true));
    t[0xC1] = Some(Opcode::new(Cmp, IndirectX, 6, false));
    t[0xD1] = Some(Opcode::new(Cmp, IndirectY, 5, true));

    t[0xE0] = Some(Opcode::new(Cpx, Immediate, 2, false));
    t[0xE4] = Some(Opcode::new(Cpx, ZeroPage, 3, false));
    t[0xEC] = Some(Opcode::new(Cpx, Absolute, 4, false));

    t[0xC0] = Some(Opcode::new(Cpy, Immediate, 2, false));
    t[0xC4] = Some(Opcode::new(Cpy, ZeroPage, 3, false));
    t[0xCC] = Some(Opcode::new(Cpy, Absolute, 4, false));

    t[0xC6] = Some(Opcode::new(Dec, ZeroPage, 5, false));
    t[0xD6] = Some(Opcode::new(Dec, ZeroPageX, 6, false));
    t[0xCE] = Some(Opcode::new(Dec, Absolute, 6, false));
    t[0xDE] = Some(Opcode::new(Dec, AbsoluteX, 7, false));

    t[0xCA] = Some(Opcode::new(Dex, Implied, 2, false));
    t[0x88] = Some(Opcode::new(Dey, Implied, 2, false));

    t[0x49] = Some(Opcode::new(Eor, Immediate, 2, false));
    t[0x45] = Some(Opcode::new(Eor, ZeroPage, 3, false));
    t[0x55] = Some(Opcode::new(Eor, ZeroPageX, 4, false));
    t[0x4D] = Some(Opcode::new(Eor, Absolute, 4, false));
    t[0x5D] = Some(Opcode::new(Eor, AbsoluteX, 4, true));
    t[0x59] = Some(Opcode::new(Eor, AbsoluteY, 4, true));
    t[0x41] = Some(Opcode::new(Eor, IndirectX, 6, false));
    t[0x51] = Some(Opcode::new(Eor, IndirectY, 5, true));

    t[0xE6] = Some(Opcode::new(Inc, ZeroPage, 5, false));
    t[0xF6] = Some(Opcode::new(Inc, ZeroPageX, 6, false));
    t[0xEE] = Some(Opcode::new(Inc, Absolute, 6, false));
    t[0xFE] = Some(Opcode::new(Inc, AbsoluteX, 7, false));

    t[0xE8] = Some(Opcode::new(Inx, Implied, 2, false));
    t[0xC8] = Some(Opcode::new(Iny, Implied, 2, false));

    t[0x4C] = Some(Opcode::new(Jmp, Absolute, 3, false));
    t[0x6C] = Some(Opcode::new(Jmp, Indirect, 5, false));
    t[0x20] = Some(Opcode::new(Jsr, Absolute, 6, false));

    t[0xA9] = Some(Opcode::new(Lda, Immediate, 2, false));
    t[0xA5] = Some(Opcode::new(Lda, ZeroPage, 3, false));
    t[0xB5] = Some(Opcode::new(Lda, ZeroPageX, 4, false));
    t[0xAD] = Some(Opcode::new(Lda, Absolute, 4, false));
    t[0xBD] = Some(Opcode::new(Lda, AbsoluteX, 4, true));
    t[0xB9] = Some(Opcode::new(Lda, AbsoluteY, 4, true));
    t[0xA1] = Some(Opcode::new(Lda, IndirectX, 6, false));
    t[0xB1] = Some(Opcode::new(Lda, IndirectY, 5, true));

    t[0xA2] = Some(Opcode::new(Ldx, Immediate, 2, false));
    t[0xA6] = Some(Opcode::new(Ldx, ZeroPage, 3, false));
    t[0xB6] = Some(Opcode::new(Ldx, ZeroPageY, 4, false));
    t[0xAE] = Some(Opcode::new(Ldx, Absolute, 4, false));
    t[0xBE] = Some(Opcode::new(Ldx, AbsoluteY, 4, true));

    t[0xA0] = Some(Opcode::new(Ldy, Immediate, 2, false));
    t[0xA4] = Some(Opcode::new(Ldy, ZeroPage, 3, false));
    t[0xB4] = Some(Opcode::new(Ldy, ZeroPageX, 4, false));
    t[0xAC] = Some(Opcode::new(Ldy, Absolute, 4, false));
    t[0xBC] = Some(Opcode::new(Ldy, AbsoluteX, 4, true));

    t[0x4A] = Some(Opcode::new(Lsr, Accumulator, 2, false));
    t[0x46] = Some(Opcode::new(Lsr, ZeroPage, 5, false));
    t[0x56] = Some(Opcode::new(Lsr, ZeroPageX, 6, false));
    t[0x4E] = Some(Opcode::new(Lsr, Absolute, 6, false));
    t[0x5E] = Some(Opcode::new(Lsr, AbsoluteX, 7, false));

    t[0xEA] = Some(Opcode::new(Nop, Implied, 2, false));

    t[0x09] = Some(Opcode::new(Ora, Immediate, 2, false));
    t[0x05] = Some(Opcode::new(Ora, ZeroPage, 3, false));
    t[0x15] = Some(Opcode::new(Ora, ZeroPageX, 4, false));
    t[0x0D] = Some(Opcode::new(Ora, Absolute, 4, false));
    t[0x1D] = Some(Opcode::new(Ora, AbsoluteX, 4, true));
    t[0x19] = Some(Opcode::new(Ora, AbsoluteY, 4, true));
    t[0x01] = Some(Opcode::new(Ora, IndirectX, 6, false));
    t[0x11] = Some(Opcode::new(Ora, IndirectY, 5, true));

    t[0x48] = Some(Opcode::new(Pha, Implied, 3, false));
    t[0x08] = Some(Opcode::new(Php, Implied, 3, false));
    t[0x68] = Some(Opcode::new(Pla, Implied, 4, false));
    t[0x28] = Some(Opcode::new(Plp, Implied, 4, false));

    t[0x2A] = Some(Opcode::new(Rol, Accumulator, 2, false));
    t[0x26] = Some(Opcode::new(Rol, ZeroPage, 5, false));
    t[0x36] = Some(Opcode::new(Rol, ZeroPageX, 6, false));
    t[0x2E] = Some(Opcode::new(Rol, Absolute, 6, false));
    t[0x3E] = Some(Opcode::new(Rol, AbsoluteX, 7, false));

    t[0x6A] = Some(Opcode::new(Ror, Accumulator, 2, false));
    t[0x66] = Some(Opcode::new(Ror, ZeroPage, 5, false));
    t[0x76] = Some(Opcode::new(Ror, ZeroPageX, 6, false));
    t[0x6E] = Some(Opcode::new(Ror, Absolute, 6, false));
    t[0x7E] = Some(Opcode::new(Ror, AbsoluteX, 7, false));

    t[0x40] = Some(Opcode::new(Rti, Implied, 6, false));
    t[0x60] = Some(Opcode::new(Rts, Implied, 6, false));

    t[0xE9] = Some(Opcode::new(Sbc, Immediate, 2, false));
    t[0xE5] = Some(Opcode::new(Sbc, ZeroPage, 3, false));
    t[0xF5] = Some(Opcode::new(Sbc, ZeroPageX, 4, false));
    t[0xED] = Some(Opcode::new(Sbc, Absolute, 4, false));
    t[0xFD] = Some(Opcode::new(Sbc, AbsoluteX, 4, true));
    t[0xF9] = Some(Opcode::new(Sbc, AbsoluteY, 4, true));
    t[0xE1] = Some(Opcode::new(Sbc, IndirectX, 6, false));
    t[0xF1] = Some(Opcode::new(Sbc, IndirectY, 5, true));

    t[0x38] = Some(Opcode::new(Sec, Implied, 2, false));
    t[0xF8] = Some(Opcode::new(Sed, Implied, 2, false));
    t[0x78] = Some(Opcode::new(Sei, Implied, 2, false));

    t[0x85] = Some(Opcode::new(Sta, ZeroPage, 3, false));
    t[0x95] = Some(Opcode::new(Sta, ZeroPageX, 4, false));
    t[0x8D] = Some(Opcode::new(Sta, Absolute, 4, false));
    t[0x9D] = Some(Opcode::new(Sta, AbsoluteX, 5, false));
    t[0x99] = Some(Opcode::new(Sta, AbsoluteY, 5, false));
    t[0x81] = Some(Opcode::new(Sta, IndirectX, 6, false));
    t[0x91] = Some(Opcode::new(Sta, IndirectY, 6, false));

    t[0x86] = Some(Opcode::new(Stx, ZeroPage, 3, false));
    t[0x96] = Some(Opcode::new(Stx, ZeroPageY, 4, false));
    t[0x8E] = Some(Opcode::new(Stx, Absolute, 4, false));

    t[0x84] = Some(Opcode::new(Sty, ZeroPage, 3, false));
    t[0x94] = Some(Opcode::new(Sty, ZeroPageX, 4, false));
    t[0x8C] = Some(Opcode::new(Sty, Absolute, 4, false));

    t[0xAA] = Some(Opcode::new(Tax, Implied, 2, false));
    t[0xA8] = Some(Opcode::new(Tay, Implied, 2, false));
    t[0xBA] = Some(Opcode::new(Tsx, Implied, 2, false));
    t[0x8A] = Some(Opcode::new(Txa, Implied, 2, false));
    t[0x9A] = Some(Opcode::new(Txs, Implied, 2, false));
    t[0x98] = Some(Opcode::new(Tya, Implied, 2, false));

    t
};
