use crate::{
    bus::Bus,
    cpu::{
        cpu::{Cpu, Interrupt},
        flags::{
            FLAG_BREAK, FLAG_CARRY, FLAG_INTERRUPT_DISABLE, FLAG_NEGATIVE, FLAG_OVERFLOW,
            FLAG_UNUSED, FLAG_ZERO,
        },
    },
};

struct TestBus {
    mem: [u8; 65536],
}

impl TestBus {
    fn new() -> Self {
        Self { mem: [0; 65536] }
    }
}

impl Bus for TestBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.mem[addr as usize] = data;
    }
}

/// Bus with `program` at $8000 and the reset vector pointing there.
fn bus_with_program(program: &[u8]) -> TestBus {
    let mut bus = TestBus::new();
    bus.mem[0x8000..0x8000 + program.len()].copy_from_slice(program);

    bus.mem[0xFFFC] = 0x00;
    bus.mem[0xFFFD] = 0x80;

    bus
}

fn new_cpu(bus: TestBus) -> Cpu<TestBus> {
    let mut cpu = Cpu::new(bus);
    cpu.reset();
    cpu
}

#[test]
fn reset_loads_vector_and_initial_state() {
    let cpu = new_cpu(bus_with_program(&[]));

    assert_eq!(cpu.pc, 0x8000);
    assert_eq!(cpu.sp, 0xFD);
    assert_eq!(cpu.status, FLAG_INTERRUPT_DISABLE | FLAG_UNUSED);
    assert_eq!(cpu.cycles, 7);
}

#[test]
fn lda_immediate_loads_value() {
    let mut cpu = new_cpu(bus_with_program(&[0xA9, 0x42])); // LDA #$42
    let cycles = cpu.step();

    assert_eq!(cpu.a, 0x42);
    assert_eq!(cycles, 2);
    assert_eq!(cpu.pc, 0x8002);
}

#[test]
fn lda_sets_zero_flag() {
    let mut cpu = new_cpu(bus_with_program(&[0xA9, 0x00])); // LDA #$00
    cpu.step();

    assert!(cpu.status & FLAG_ZERO != 0);
    assert!(cpu.status & FLAG_NEGATIVE == 0);
}

#[test]
fn lda_sets_negative_flag() {
    let mut cpu = new_cpu(bus_with_program(&[0xA9, 0x80])); // LDA #$80
    cpu.step();

    assert!(cpu.status & FLAG_NEGATIVE != 0);
    assert!(cpu.status & FLAG_ZERO == 0);
}

#[test]
fn adc_overflow_from_positive_operands() {
    let mut cpu = new_cpu(bus_with_program(&[0x69, 0x01])); // ADC #$01
    cpu.a = 0x7F;
    cpu.step();

    assert_eq!(cpu.a, 0x80);
    assert!(cpu.status & FLAG_OVERFLOW != 0);
    assert!(cpu.status & FLAG_NEGATIVE != 0);
    assert!(cpu.status & FLAG_CARRY == 0);
}

#[test]
fn adc_sets_carry_and_zero_on_wrap() {
    let mut cpu = new_cpu(bus_with_program(&[0x69, 0x01])); // ADC #$01
    cpu.a = 0xFF;
    cpu.step();

    assert_eq!(cpu.a, 0x00);
    assert!(cpu.status & FLAG_CARRY != 0);
    assert!(cpu.status & FLAG_ZERO != 0);
    assert!(cpu.status & FLAG_OVERFLOW == 0);
}

#[test]
fn sbc_borrow_clears_carry() {
    let mut cpu = new_cpu(bus_with_program(&[0xE9, 0x01])); // SBC #$01
    cpu.a = 0x00;
    cpu.status |= FLAG_CARRY; // no borrow pending
    cpu.step();

    assert_eq!(cpu.a, 0xFF);
    assert!(cpu.status & FLAG_CARRY == 0);
    assert!(cpu.status & FLAG_NEGATIVE != 0);
    assert!(cpu.status & FLAG_OVERFLOW == 0);
}

#[test]
fn absolute_x_page_cross_costs_a_cycle() {
    let mut bus = bus_with_program(&[0xBD, 0xFF, 0x20]); // LDA $20FF,X
    bus.mem[0x2100] = 0x37;

    let mut cpu = new_cpu(bus);
    cpu.x = 0x01;
    let cycles = cpu.step();

    assert_eq!(cpu.a, 0x37);
    assert_eq!(cycles, 5);
}

#[test]
fn absolute_x_same_page_has_no_penalty() {
    let mut bus = bus_with_program(&[0xBD, 0x80, 0x20]); // LDA $2080,X
    bus.mem[0x2081] = 0x37;

    let mut cpu = new_cpu(bus);
    cpu.x = 0x01;
    let cycles = cpu.step();

    assert_eq!(cycles, 4);
}

#[test]
fn sta_absolute_x_cost_is_fixed() {
    let mut cpu = new_cpu(bus_with_program(&[0x9D, 0xFF, 0x20])); // STA $20FF,X
    cpu.a = 0x55;
    cpu.x = 0x01;
    let cycles = cpu.step();

    assert_eq!(cpu.bus.mem[0x2100], 0x55);
    assert_eq!(cycles, 5); // no page-cross extra on stores
}

#[test]
fn zeropage_x_wraps_within_page_zero() {
    let mut bus = bus_with_program(&[0xB5, 0xFF]); // LDA $FF,X
    bus.mem[0x0000] = 0x99;

    let mut cpu = new_cpu(bus);
    cpu.x = 0x01;
    cpu.step();

    assert_eq!(cpu.a, 0x99);
}

#[test]
fn indirect_y_pointer_wraps_in_page_zero() {
    let mut bus = bus_with_program(&[0xB1, 0xFF]); // LDA ($FF),Y
    bus.mem[0x00FF] = 0x00;
    bus.mem[0x0000] = 0x30; // pointer high byte comes from $0000, not $0100
    bus.mem[0x3002] = 0x77;

    let mut cpu = new_cpu(bus);
    cpu.y = 0x02;
    cpu.step();

    assert_eq!(cpu.a, 0x77);
}

#[test]
fn jmp_indirect_page_boundary_bug() {
    let mut bus = bus_with_program(&[0x6C, 0xFF, 0x02]); // JMP ($02FF)
    bus.mem[0x02FF] = 0x34;
    bus.mem[0x0300] = 0x12; // would be the high byte on a fixed CPU
    bus.mem[0x0200] = 0x56; // actual high byte source

    let mut cpu = new_cpu(bus);
    cpu.step();

    assert_eq!(cpu.pc, 0x5634);
}

#[test]
fn branch_not_taken_costs_two() {
    let mut cpu = new_cpu(bus_with_program(&[0xF0, 0x10])); // BEQ +$10
    let cycles = cpu.step();

    assert_eq!(cycles, 2);
    assert_eq!(cpu.pc, 0x8002);
}

#[test]
fn branch_taken_costs_three() {
    let mut cpu = new_cpu(bus_with_program(&[0xF0, 0x10])); // BEQ +$10
    cpu.status |= FLAG_ZERO;
    let cycles = cpu.step();

    assert_eq!(cycles, 3);
    assert_eq!(cpu.pc, 0x8012);
}

#[test]
fn branch_page_cross_costs_four() {
    let mut bus = TestBus::new();
    bus.mem[0x1FFE] = 0xF0; // BEQ +$01 sitting at the top of page $1F
    bus.mem[0x1FFF] = 0x01;
    bus.mem[0xFFFC] = 0xFE;
    bus.mem[0xFFFD] = 0x1F;

    let mut cpu = new_cpu(bus);
    cpu.status |= FLAG_ZERO;
    let cycles = cpu.step();

    assert_eq!(cycles, 4);
    assert_eq!(cpu.pc, 0x2001);
}

#[test]
fn jsr_rts_round_trip() {
    let mut bus = TestBus::new();
    bus.mem[0x0200] = 0x20; // JSR $8000
    bus.mem[0x0201] = 0x00;
    bus.mem[0x0202] = 0x80;
    bus.mem[0x8000] = 0x60; // RTS
    bus.mem[0xFFFC] = 0x00;
    bus.mem[0xFFFD] = 0x02;

    let mut cpu = new_cpu(bus);

    cpu.step(); // JSR
    assert_eq!(cpu.pc, 0x8000);
    // the pushed return address is the JSR's own last byte
    assert_eq!(cpu.bus.mem[0x01FD], 0x02);
    assert_eq!(cpu.bus.mem[0x01FC], 0x02);

    cpu.step(); // RTS
    assert_eq!(cpu.pc, 0x0203);
    assert_eq!(cpu.sp, 0xFD);
}

#[test]
fn brk_rti_round_trip() {
    let mut bus = bus_with_program(&[0x00, 0xFF]); // BRK + padding
    bus.mem[0xFFFE] = 0x00;
    bus.mem[0xFFFF] = 0x90;
    bus.mem[0x9000] = 0x40; // RTI

    let mut cpu = new_cpu(bus);
    cpu.status = FLAG_UNUSED; // I clear so BRK is deliverable

    let cycles = cpu.step(); // BRK
    assert_eq!(cycles, 7);
    assert_eq!(cpu.pc, 0x9000);
    assert!(cpu.status & FLAG_INTERRUPT_DISABLE != 0);
    // pushed status carries B and bit 5
    assert_eq!(cpu.bus.mem[0x01FB], FLAG_UNUSED | FLAG_BREAK);

    cpu.step(); // RTI
    assert_eq!(cpu.pc, 0x8002); // past the padding byte
    assert!(cpu.status & FLAG_INTERRUPT_DISABLE == 0);
    assert!(cpu.status & FLAG_BREAK == 0); // B has no storage
}

#[test]
fn brk_masked_by_interrupt_disable() {
    let mut cpu = new_cpu(bus_with_program(&[0x00, 0xFF]));
    // reset() leaves I set
    let sp_before = cpu.sp;
    let cycles = cpu.step();

    assert_eq!(cycles, 0);
    assert_eq!(cpu.pc, 0x8001); // only the opcode fetch advanced
    assert_eq!(cpu.sp, sp_before);
}

#[test]
fn irq_masked_when_interrupt_disable_set() {
    let mut cpu = new_cpu(bus_with_program(&[]));
    let pc_before = cpu.pc;

    let cycles = cpu.interrupt(Interrupt::Irq);

    assert_eq!(cycles, 0);
    assert_eq!(cpu.pc, pc_before);
}

#[test]
fn nmi_is_never_masked() {
    let mut bus = bus_with_program(&[]);
    bus.mem[0xFFFA] = 0x34;
    bus.mem[0xFFFB] = 0x12;

    let mut cpu = new_cpu(bus);
    assert!(cpu.status & FLAG_INTERRUPT_DISABLE != 0);

    let cycles = cpu.interrupt(Interrupt::Nmi);

    assert_eq!(cycles, 7);
    assert_eq!(cpu.pc, 0x1234);
}

#[test]
fn irq_pushes_state_and_loads_vector() {
    let mut bus = bus_with_program(&[]);
    bus.mem[0xFFFE] = 0x00;
    bus.mem[0xFFFF] = 0xA0;

    let mut cpu = new_cpu(bus);
    cpu.status = FLAG_UNUSED | FLAG_CARRY;
    cpu.pc = 0x1234;

    cpu.interrupt(Interrupt::Irq);

    assert_eq!(cpu.pc, 0xA000);
    assert_eq!(cpu.bus.mem[0x01FD], 0x12);
    assert_eq!(cpu.bus.mem[0x01FC], 0x34);
    // B clear, bit 5 set in the pushed copy
    assert_eq!(cpu.bus.mem[0x01FB], FLAG_UNUSED | FLAG_CARRY);
    assert!(cpu.status & FLAG_INTERRUPT_DISABLE != 0);
    assert_eq!(cpu.sp, 0xFA);
}

#[test]
fn stack_push_wraps_from_00_to_ff() {
    let mut cpu = new_cpu(bus_with_program(&[0x48])); // PHA
    cpu.a = 0x42;
    cpu.sp = 0x00;
    cpu.step();

    assert_eq!(cpu.bus.mem[0x0100], 0x42);
    assert_eq!(cpu.sp, 0xFF);
}

#[test]
fn stack_pop_wraps_from_ff_to_00() {
    let mut bus = bus_with_program(&[0x68]); // PLA
    bus.mem[0x0100] = 0x55;

    let mut cpu = new_cpu(bus);
    cpu.sp = 0xFF;
    cpu.step();

    assert_eq!(cpu.a, 0x55);
    assert_eq!(cpu.sp, 0x00);
}

#[test]
fn pha_pla_round_trip_at_every_stack_pointer() {
    for sp in 0..=255u8 {
        let mut cpu = new_cpu(bus_with_program(&[0x48, 0x68])); // PHA; PLA
        cpu.a = 0xC3;
        cpu.sp = sp;

        cpu.step();
        cpu.a = 0x00;
        cpu.step();

        assert_eq!(cpu.a, 0xC3, "sp={sp:#04x}");
        assert_eq!(cpu.sp, sp, "sp={sp:#04x}");
    }
}

#[test]
fn php_sets_break_and_unused_in_pushed_copy() {
    let mut cpu = new_cpu(bus_with_program(&[0x08])); // PHP
    cpu.status = FLAG_CARRY;
    cpu.step();

    assert_eq!(cpu.bus.mem[0x01FD], FLAG_CARRY | FLAG_BREAK | FLAG_UNUSED);
    assert_eq!(cpu.status, FLAG_CARRY); // live status untouched
}

#[test]
fn plp_ignores_pushed_break_bit() {
    let mut bus = bus_with_program(&[0x28]); // PLP
    bus.mem[0x01FE] = 0xFF;

    let mut cpu = new_cpu(bus);
    cpu.step();

    assert!(cpu.status & FLAG_BREAK == 0);
    assert!(cpu.status & FLAG_UNUSED != 0);
    assert!(cpu.status & FLAG_CARRY != 0);
}

#[test]
fn undefined_opcode_is_a_zero_cycle_noop() {
    let mut cpu = new_cpu(bus_with_program(&[0x02, 0xA9, 0x42]));
    let a = cpu.a;
    let sp = cpu.sp;

    let cycles = cpu.step();

    assert_eq!(cycles, 0);
    assert_eq!(cpu.pc, 0x8001);
    assert_eq!(cpu.a, a);
    assert_eq!(cpu.sp, sp);

    // execution continues with the next instruction
    cpu.step();
    assert_eq!(cpu.a, 0x42);
}

#[test]
fn cmp_greater_sets_carry() {
    let mut cpu = new_cpu(bus_with_program(&[0xC9, 0x10])); // CMP #$10
    cpu.a = 0x20;
    cpu.step();

    assert!(cpu.status & FLAG_CARRY != 0);
    assert!(cpu.status & FLAG_ZERO == 0);
}

#[test]
fn cmp_equal_sets_carry_and_zero() {
    let mut cpu = new_cpu(bus_with_program(&[0xC9, 0x20])); // CMP #$20
    cpu.a = 0x20;
    cpu.step();

    assert!(cpu.status & FLAG_CARRY != 0);
    assert!(cpu.status & FLAG_ZERO != 0);
}

#[test]
fn cpx_less_clears_carry_sets_negative() {
    let mut cpu = new_cpu(bus_with_program(&[0xE0, 0x20])); // CPX #$20
    cpu.x = 0x10;
    cpu.step();

    assert!(cpu.status & FLAG_CARRY == 0);
    assert!(cpu.status & FLAG_NEGATIVE != 0);
}

#[test]
fn asl_accumulator_shifts_into_carry() {
    let mut cpu = new_cpu(bus_with_program(&[0x0A])); // ASL A
    cpu.a = 0x81;
    cpu.step();

    assert_eq!(cpu.a, 0x02);
    assert!(cpu.status & FLAG_CARRY != 0);
}

#[test]
fn ror_rotates_through_carry() {
    let mut cpu = new_cpu(bus_with_program(&[0x6A])); // ROR A
    cpu.a = 0x01;
    cpu.status |= FLAG_CARRY;
    cpu.step();

    assert_eq!(cpu.a, 0x80);
    assert!(cpu.status & FLAG_CARRY != 0);
    assert!(cpu.status & FLAG_NEGATIVE != 0);
}

#[test]
fn rol_memory_operand() {
    let mut bus = bus_with_program(&[0x26, 0x10]); // ROL $10
    bus.mem[0x0010] = 0x80;

    let mut cpu = new_cpu(bus);
    let cycles = cpu.step();

    assert_eq!(cpu.bus.mem[0x0010], 0x00);
    assert!(cpu.status & FLAG_CARRY != 0);
    assert!(cpu.status & FLAG_ZERO != 0);
    assert_eq!(cycles, 5);
}

#[test]
fn inc_wraps_and_sets_zero() {
    let mut bus = bus_with_program(&[0xE6, 0x10]); // INC $10
    bus.mem[0x0010] = 0xFF;

    let mut cpu = new_cpu(bus);
    cpu.step();

    assert_eq!(cpu.bus.mem[0x0010], 0x00);
    assert!(cpu.status & FLAG_ZERO != 0);
}

#[test]
fn bit_copies_high_bits_into_flags() {
    let mut bus = bus_with_program(&[0x24, 0x10]); // BIT $10
    bus.mem[0x0010] = 0x40;

    let mut cpu = new_cpu(bus);
    cpu.a = 0x00;
    cpu.step();

    assert!(cpu.status & FLAG_ZERO != 0); // A & M == 0
    assert!(cpu.status & FLAG_OVERFLOW != 0); // bit 6
    assert!(cpu.status & FLAG_NEGATIVE == 0); // bit 7 clear
}

#[test]
fn txs_does_not_touch_flags() {
    let mut cpu = new_cpu(bus_with_program(&[0x9A])); // TXS
    cpu.x = 0x00;
    let status = cpu.status;
    cpu.step();

    assert_eq!(cpu.sp, 0x00);
    assert_eq!(cpu.status, status);
}

#[test]
fn indirect_x_reads_through_zero_page_pointer() {
    let mut bus = bus_with_program(&[0xA1, 0x20]); // LDA ($20,X)
    bus.mem[0x0024] = 0x00;
    bus.mem[0x0025] = 0x30;
    bus.mem[0x3000] = 0x5A;

    let mut cpu = new_cpu(bus);
    cpu.x = 0x04;
    let cycles = cpu.step();

    assert_eq!(cpu.a, 0x5A);
    assert_eq!(cycles, 6);
}

#[test]
fn indirect_y_page_cross_costs_a_cycle() {
    let mut bus = bus_with_program(&[0xB1, 0x20]); // LDA ($20),Y
    bus.mem[0x0020] = 0xFF;
    bus.mem[0x0021] = 0x20;
    bus.mem[0x2100] = 0x5A;

    let mut cpu = new_cpu(bus);
    cpu.y = 0x01;
    let cycles = cpu.step();

    assert_eq!(cpu.a, 0x5A);
    assert_eq!(cycles, 6);
}

#[test]
fn adc_stays_binary_with_decimal_flag_set() {
    // 2A03: SED sets the flag but never changes the arithmetic
    let mut cpu = new_cpu(bus_with_program(&[0xF8, 0x69, 0x19])); // SED; ADC #$19
    cpu.a = 0x19;
    cpu.step();
    cpu.step();

    assert_eq!(cpu.a, 0x32); // not BCD 0x38
}

#[test]
fn cycles_accumulate_across_instructions() {
    let mut cpu = new_cpu(bus_with_program(&[0xA9, 0x01, 0xEA])); // LDA #$01; NOP
    cpu.step();
    cpu.step();

    assert_eq!(cpu.cycles, 7 + 2 + 2);
}
