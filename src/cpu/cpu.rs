//! 6502 execution engine: fetch, table dispatch, cycle accounting, interrupts.
//!
//! 2A03 variant: decimal mode is never applied to ADC/SBC, though the D flag itself
//! still sets and clears.

use crate::{
    bus::Bus,
    cpu::{
        addressing::{AddressingMode, Operand},
        flags::{
            FLAG_BREAK, FLAG_CARRY, FLAG_DECIMAL, FLAG_INTERRUPT_DISABLE, FLAG_NEGATIVE,
            FLAG_OVERFLOW, FLAG_UNUSED, FLAG_ZERO,
        },
        opcodes::{Mnemonic, OPCODES, Opcode},
    },
};

/// The four entry points into the interrupt sequence.
///
/// BRK, IRQ, and reset are suppressed while the I flag is set; NMI is never masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Brk,
    Irq,
    Nmi,
    Reset,
}

impl Interrupt {
    fn maskable(self) -> bool {
        !matches!(self, Interrupt::Nmi)
    }

    fn vector(self) -> u16 {
        match self {
            Interrupt::Brk | Interrupt::Irq => 0xFFFE,
            Interrupt::Nmi => 0xFFFA,
            Interrupt::Reset => 0xFFFC,
        }
    }
}

pub struct Cpu<B: Bus> {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
    pub cycles: usize,
    pub bus: B,
}

impl<B: Bus> Cpu<B> {
    pub fn new(bus: B) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0,
            pc: 0,
            status: 0,
            cycles: 0,
            bus,
        }
    }

    pub fn reset(&mut self) {
        let lo = self.bus.read(0xFFFC) as u16;
        let hi = self.bus.read(0xFFFD) as u16;

        self.pc = (hi << 8) | lo;

        self.sp = 0xFD; // resets at 0xFD instead of 0xFF for some reason
        self.status = FLAG_INTERRUPT_DISABLE | FLAG_UNUSED;

        self.a = 0;
        self.x = 0;
        self.y = 0;

        self.cycles = 7;
    }

    /// Execute one instruction and return its full cycle cost, base plus page-cross and
    /// branch extras. Undefined opcodes advance PC past the opcode byte and cost 0.
    pub fn step(&mut self) -> usize {
        let start = self.cycles;
        let pc = self.pc;
        let opcode = self.fetch_byte();

        let Some(op) = OPCODES[opcode as usize] else {
            log::warn!("undefined opcode ${:02X} at ${:04X}", opcode, pc);
            return 0;
        };

        self.cycles += op.cycles as usize;
        self.execute(op);

        self.cycles - start
    }

    /// Run the interrupt sequence for `kind` and return its cycle cost.
    ///
    /// When the I flag masks the request, nothing happens and the cost is 0. Otherwise
    /// PC and the packed status byte go on the stack (B set only for BRK, bit 5 always
    /// set), I is raised, and PC loads from the little-endian vector.
    pub fn interrupt(&mut self, kind: Interrupt) -> usize {
        if kind.maskable() && self.status & FLAG_INTERRUPT_DISABLE != 0 {
            return 0;
        }

        if kind == Interrupt::Brk {
            self.pc = self.pc.wrapping_add(1); // +1 because of padding byte
        }

        self.push((self.pc >> 8) as u8);
        self.push(self.pc as u8);

        let status = if kind == Interrupt::Brk {
            self.status | FLAG_BREAK | FLAG_UNUSED
        } else {
            (self.status & !FLAG_BREAK) | FLAG_UNUSED
        };
        self.push(status);

        self.status |= FLAG_INTERRUPT_DISABLE;

        let vector = kind.vector();
        let lo = self.bus.read(vector) as u16;
        let hi = self.bus.read(vector.wrapping_add(1)) as u16;
        self.pc = (hi << 8) | lo;

        self.cycles += 7;
        7
    }

    pub(crate) fn fetch_byte(&mut self) -> u8 {
        let byte = self.bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        byte
    }

    pub(crate) fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte() as u16;
        let hi = self.fetch_byte() as u16;
        (hi << 8) | lo
    }

    fn execute(&mut self, op: Opcode) {
        match op.mnemonic {
            Mnemonic::Lda => {
                let value = self.load(op);
                self.a = value;
                self.update_zero_and_negative_flags(value);
            }
            Mnemonic::Ldx => {
                let value = self.load(op);
                self.x = value;
                self.update_zero_and_negative_flags(value);
            }
            Mnemonic::Ldy => {
                let value = self.load(op);
                self.y = value;
                self.update_zero_and_negative_flags(value);
            }
            Mnemonic::Sta => {
                let addr = self.store_addr(op);
                self.bus.write(addr, self.a);
            }
            Mnemonic::Stx => {
                let addr = self.store_addr(op);
                self.bus.write(addr, self.x);
            }
            Mnemonic::Sty => {
                let addr = self.store_addr(op);
                self.bus.write(addr, self.y);
            }
            Mnemonic::Tax => {
                self.x = self.a;
                self.update_zero_and_negative_flags(self.x);
            }
            Mnemonic::Tay => {
                self.y = self.a;
                self.update_zero_and_negative_flags(self.y);
            }
            Mnemonic::Tsx => {
                self.x = self.sp;
                self.update_zero_and_negative_flags(self.x);
            }
            Mnemonic::Txa => {
                self.a = self.x;
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::Txs => self.sp = self.x, // the one transfer that leaves flags alone
            Mnemonic::Tya => {
                self.a = self.y;
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::Adc => {
                let value = self.load(op);
                self.add_with_carry(value);
            }
            Mnemonic::Sbc => {
                // SBC is ADC of the one's complement; the borrow rides the carry flag
                let value = self.load(op);
                self.add_with_carry(value ^ 0xFF);
            }
            Mnemonic::And => {
                let value = self.load(op);
                self.a &= value;
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::Ora => {
                let value = self.load(op);
                self.a |= value;
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::Eor => {
                let value = self.load(op);
                self.a ^= value;
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::Cmp => {
                let value = self.load(op);
                self.compare(self.a, value);
            }
            Mnemonic::Cpx => {
                let value = self.load(op);
                self.compare(self.x, value);
            }
            Mnemonic::Cpy => {
                let value = self.load(op);
                self.compare(self.y, value);
            }
            Mnemonic::Bit => {
                let value = self.load(op);
                self.set_flag(FLAG_ZERO, (self.a & value) == 0);
                self.set_flag(FLAG_NEGATIVE, value & 0x80 != 0);
                self.set_flag(FLAG_OVERFLOW, value & 0x40 != 0);
            }
            Mnemonic::Inc => {
                let addr = self.store_addr(op);
                let value = self.bus.read(addr).wrapping_add(1);
                self.bus.write(addr, value);
                self.update_zero_and_negative_flags(value);
            }
            Mnemonic::Dec => {
                let addr = self.store_addr(op);
                let value = self.bus.read(addr).wrapping_sub(1);
                self.bus.write(addr, value);
                self.update_zero_and_negative_flags(value);
            }
            Mnemonic::Inx => {
                self.x = self.x.wrapping_add(1);
                self.update_zero_and_negative_flags(self.x);
            }
            Mnemonic::Iny => {
                self.y = self.y.wrapping_add(1);
                self.update_zero_and_negative_flags(self.y);
            }
            Mnemonic::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.update_zero_and_negative_flags(self.x);
            }
            Mnemonic::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.update_zero_and_negative_flags(self.y);
            }
            Mnemonic::Asl => {
                let (operand, _) = self.resolve(op.mode);
                let value = self.read_operand(operand);
                let result = value << 1;

                self.set_flag(FLAG_CARRY, value & 0x80 != 0);
                self.update_zero_and_negative_flags(result);
                self.write_operand(operand, result);
            }
            Mnemonic::Lsr => {
                let (operand, _) = self.resolve(op.mode);
                let value = self.read_operand(operand);
                let result = value >> 1;

                self.set_flag(FLAG_CARRY, value & 0x01 != 0);
                self.update_zero_and_negative_flags(result);
                self.write_operand(operand, result);
            }
            Mnemonic::Rol => {
                let (operand, _) = self.resolve(op.mode);
                let value = self.read_operand(operand);
                let carry_in = self.status & FLAG_CARRY;
                let result = (value << 1) | carry_in;

                self.set_flag(FLAG_CARRY, value & 0x80 != 0);
                self.update_zero_and_negative_flags(result);
                self.write_operand(operand, result);
            }
            Mnemonic::Ror => {
                let (operand, _) = self.resolve(op.mode);
                let value = self.read_operand(operand);
                let carry_in = self.status & FLAG_CARRY;
                let result = (value >> 1) | (carry_in << 7);

                self.set_flag(FLAG_CARRY, value & 0x01 != 0);
                self.update_zero_and_negative_flags(result);
                self.write_operand(operand, result);
            }
            Mnemonic::Jmp => {
                let addr = self.store_addr(op);
                self.pc = addr;
            }
            Mnemonic::Jsr => {
                let addr = self.fetch_word();

                let return_addr = self.pc.wrapping_sub(1);
                self.push((return_addr >> 8) as u8);
                self.push(return_addr as u8);

                self.pc = addr;
            }
            Mnemonic::Rts => {
                let lo = self.pop() as u16;
                let hi = self.pop() as u16;

                self.pc = ((hi << 8) | lo).wrapping_add(1);
            }
            Mnemonic::Rti => {
                let status = self.pop();
                self.status = (status & !FLAG_BREAK) | FLAG_UNUSED;

                let lo = self.pop() as u16;
                let hi = self.pop() as u16;
                self.pc = (hi << 8) | lo;
            }
            Mnemonic::Brk => {
                self.interrupt(Interrupt::Brk);
            }
            Mnemonic::Bcc => self.branch(self.status & FLAG_CARRY == 0),
            Mnemonic::Bcs => self.branch(self.status & FLAG_CARRY != 0),
            Mnemonic::Beq => self.branch(self.status & FLAG_ZERO != 0),
            Mnemonic::Bne => self.branch(self.status & FLAG_ZERO == 0),
            Mnemonic::Bmi => self.branch(self.status & FLAG_NEGATIVE != 0),
            Mnemonic::Bpl => self.branch(self.status & FLAG_NEGATIVE == 0),
            Mnemonic::Bvs => self.branch(self.status & FLAG_OVERFLOW != 0),
            Mnemonic::Bvc => self.branch(self.status & FLAG_OVERFLOW == 0),
            Mnemonic::Pha => self.push(self.a),
            Mnemonic::Php => {
                let status = self.status | FLAG_BREAK | FLAG_UNUSED;
                self.push(status);
            }
            Mnemonic::Pla => {
                self.a = self.pop();
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::Plp => {
                let value = self.pop();
                self.status = (value & !FLAG_BREAK) | FLAG_UNUSED;
            }
            Mnemonic::Sec => self.status |= FLAG_CARRY,
            Mnemonic::Clc => self.status &= !FLAG_CARRY,
            Mnemonic::Sei => self.status |= FLAG_INTERRUPT_DISABLE,
            Mnemonic::Cli => self.status &= !FLAG_INTERRUPT_DISABLE,
            Mnemonic::Sed => self.status |= FLAG_DECIMAL,
            Mnemonic::Cld => self.status &= !FLAG_DECIMAL,
            Mnemonic::Clv => self.status &= !FLAG_OVERFLOW,
            Mnemonic::Nop => {}
        }
    }

    /// Resolve and read the operand value, charging the page-cross cycle when the table
    /// entry is eligible for it.
    fn load(&mut self, op: Opcode) -> u8 {
        let (operand, crossed) = self.resolve(op.mode);
        if op.page_cross && crossed {
            self.cycles += 1;
        }
        self.read_operand(operand)
    }

    /// Resolve to an effective address. Stores and read-modify-write instructions pay a
    /// fixed cost whether or not indexing crossed a page.
    fn store_addr(&mut self, op: Opcode) -> u16 {
        match self.resolve(op.mode) {
            (Operand::Address(addr), _) => addr,
            (operand, _) => unreachable!("no effective address for operand {:?}", operand),
        }
    }

    fn read_operand(&mut self, operand: Operand) -> u8 {
        match operand {
            Operand::Accumulator => self.a,
            Operand::Immediate(value) => value,
            Operand::Address(addr) => self.bus.read(addr),
            Operand::None => 0,
        }
    }

    fn write_operand(&mut self, operand: Operand, value: u8) {
        match operand {
            Operand::Accumulator => self.a = value,
            Operand::Address(addr) => self.bus.write(addr, value),
            Operand::Immediate(_) | Operand::None => {}
        }
    }

    fn add_with_carry(&mut self, value: u8) {
        let carry_in = if self.status & FLAG_CARRY != 0 { 1 } else { 0 };

        let sum = self.a as u16 + value as u16 + carry_in as u16;
        let result = sum as u8;

        self.set_flag(FLAG_CARRY, sum > 0xFF);
        self.set_flag(
            FLAG_OVERFLOW,
            ((!(self.a ^ value) & (self.a ^ result)) & 0x80) != 0,
        );

        self.a = result;
        self.update_zero_and_negative_flags(result);
    }

    fn compare(&mut self, register: u8, value: u8) {
        let result = register.wrapping_sub(value);
        self.set_flag(FLAG_CARRY, register >= value);
        self.update_zero_and_negative_flags(result);
    }

    /// Conditional relative jump. PC sits on the displacement byte here; the page-cross
    /// check compares that byte's page against the undisplaced target, and the final PC
    /// adds the 1-byte operand advance afterwards.
    fn branch(&mut self, condition: bool) {
        let operand_addr = self.pc;
        let offset = self.fetch_byte() as i8;

        if condition {
            let target = operand_addr.wrapping_add(offset as u16);
            self.cycles += 1;

            if (operand_addr & 0xFF00) != (target & 0xFF00) {
                self.cycles += 1;
            }

            self.pc = target.wrapping_add(1);
        }
    }

    fn push(&mut self, value: u8) {
        let addr = 0x0100 | self.sp as u16;
        self.bus.write(addr, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        let addr = 0x0100 | self.sp as u16;
        self.bus.read(addr)
    }

    fn set_flag(&mut self, flag: u8, on: bool) {
        if on {
            self.status |= flag;
        } else {
            self.status &= !flag;
        }
    }

    fn update_zero_and_negative_flags(&mut self, value: u8) {
        self.set_flag(FLAG_ZERO, value == 0);
        self.set_flag(FLAG_NEGATIVE, value & 0x80 != 0);
    }
}
