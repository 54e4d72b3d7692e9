//! ADD/ADC/SUB/SBB/ANA/XRA/ORA/CMP, INR/DCR, INX/DCX/DAD — flag semantics
//! from spec section 4.2.3, exercised through the full fetch-decode-execute
//! path rather than the ALU helpers directly.

mod common;
use common::Harness;

#[test]
fn inr_updates_ca_sz_p_but_not_carry() {
    let mut h = Harness::new(true);
    h.cpu.b = 0x0F;
    h.cpu.flag_cy = true;
    h.load(0, &[0x04]); // INR B
    h.step();
    assert_eq!(h.cpu.b, 0x10);
    assert!(h.cpu.flag_ca);
    assert!(h.cpu.flag_cy, "INR must not touch CY");
}

#[test]
fn dcr_on_memory_operand_costs_ten_cycles() {
    let mut h = Harness::new(true);
    h.cpu.set_hl(0x3000);
    h.mem.write(0x3000, 0x01).unwrap();
    h.load(0, &[0x35]); // DCR M
    assert_eq!(h.step(), 10);
    assert_eq!(h.mem.read(0x3000).unwrap(), 0x00);
    assert!(h.cpu.flag_z);
}

#[test]
fn inx_dcx_do_not_touch_flags() {
    let mut h = Harness::new(true);
    h.cpu.flag_z = true;
    h.cpu.flag_cy = true;
    h.cpu.set_bc(0xFFFF);
    h.load(0, &[0x03, 0x0B]); // INX B ; DCX B
    assert_eq!(h.step(), 5);
    assert_eq!(h.cpu.bc(), 0x0000);
    assert!(h.cpu.flag_z);
    assert!(h.cpu.flag_cy);
    assert_eq!(h.step(), 5);
    assert_eq!(h.cpu.bc(), 0xFFFF);
}

#[test]
fn ana_sets_auxiliary_carry_from_or_of_operands() {
    let mut h = Harness::new(true);
    h.cpu.a = 0b0000_1000;
    h.cpu.c = 0b0000_0000;
    h.cpu.flag_cy = true;
    h.load(0, &[0xA1]); // ANA C
    h.step();
    assert_eq!(h.cpu.a, 0);
    assert!(!h.cpu.flag_cy);
    assert!(h.cpu.flag_ca, "bit 3 of (A|C) was set before the AND");
    assert!(h.cpu.flag_z);
}

#[test]
fn ora_and_xra_always_clear_carry_and_auxiliary_carry() {
    let mut h = Harness::new(true);
    h.cpu.a = 0xF0;
    h.cpu.b = 0x0F;
    h.cpu.flag_cy = true;
    h.cpu.flag_ca = true;
    h.load(0, &[0xB0]); // ORA B
    h.step();
    assert_eq!(h.cpu.a, 0xFF);
    assert!(!h.cpu.flag_cy);
    assert!(!h.cpu.flag_ca);
}

#[test]
fn cmp_leaves_accumulator_unchanged() {
    let mut h = Harness::new(true);
    h.cpu.a = 0x10;
    h.cpu.b = 0x20;
    h.load(0, &[0xB8]); // CMP B
    h.step();
    assert_eq!(h.cpu.a, 0x10);
    assert!(h.cpu.flag_cy);
}

#[test]
fn immediate_alu_consumes_operand_byte() {
    let mut h = Harness::new(true);
    h.cpu.a = 0x01;
    h.load(0, &[0xC6, 0x01]); // ADI 1
    assert_eq!(h.step(), 7);
    assert_eq!(h.cpu.a, 0x02);
    assert_eq!(h.cpu.pc, 2);
}

#[test]
fn dad_sets_carry_on_sixteen_bit_overflow_only() {
    let mut h = Harness::new(true);
    h.cpu.set_hl(0x8000);
    h.cpu.set_de(0x8000);
    h.load(0, &[0x19]); // DAD D
    h.step();
    assert_eq!(h.cpu.hl(), 0x0000);
    assert!(h.cpu.flag_cy);
}
