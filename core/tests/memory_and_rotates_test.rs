//! Memory bounds/ROM-protection invariants (spec section 8, items 2 and 7)
//! plus the rotate family (section 4.2.4) and DI/EI/IN/OUT.

mod common;
use common::Harness;
use i8080_core::error::MemoryError;
use i8080_core::io::{FaultingIo, IoBus};
use i8080_core::memory::Memory;

#[test]
fn word_write_then_read_round_trips_across_ram() {
    let mut mem = Memory::new(0x100, 0x100).unwrap();
    for addr in [0x100u16, 0x150, 0x1FE] {
        mem.write_word(addr, 0xCAFE).unwrap();
        assert_eq!(mem.read_word(addr).unwrap(), 0xCAFE);
    }
}

#[test]
fn rom_write_never_changes_memory() {
    let mut mem = Memory::new(0x10, 0x10).unwrap();
    mem.load(0, &[0x11]).unwrap();
    let before = mem.read(0).unwrap();
    let result = mem.write(0, 0x22);
    assert!(matches!(result, Err(MemoryError::WriteToRom { .. })));
    assert_eq!(mem.read(0).unwrap(), before);
}

#[test]
fn rlc_rotates_bit_seven_into_carry_and_bit_zero() {
    let mut h = Harness::new(true);
    h.cpu.a = 0b1000_0001;
    h.load(0, &[0x07]); // RLC
    h.step();
    assert_eq!(h.cpu.a, 0b0000_0011);
    assert!(h.cpu.flag_cy);
}

#[test]
fn rrc_rotates_bit_zero_into_carry_and_bit_seven() {
    let mut h = Harness::new(true);
    h.cpu.a = 0b1000_0001;
    h.load(0, &[0x0F]); // RRC
    h.step();
    assert_eq!(h.cpu.a, 0b1100_0000);
    assert!(h.cpu.flag_cy);
}

#[test]
fn ral_rotates_through_carry_not_around_it() {
    let mut h = Harness::new(true);
    h.cpu.a = 0b1000_0000;
    h.cpu.flag_cy = true;
    h.load(0, &[0x17]); // RAL
    h.step();
    assert_eq!(h.cpu.a, 0b0000_0001);
    assert!(h.cpu.flag_cy);
}

#[test]
fn rar_rotates_through_carry_not_around_it() {
    let mut h = Harness::new(true);
    h.cpu.a = 0b0000_0001;
    h.cpu.flag_cy = true;
    h.load(0, &[0x1F]); // RAR
    h.step();
    assert_eq!(h.cpu.a, 0b1000_0000);
    assert!(h.cpu.flag_cy);
}

#[test]
fn cma_complements_without_touching_flags() {
    let mut h = Harness::new(true);
    h.cpu.a = 0b1010_1010;
    h.cpu.flag_z = true;
    h.load(0, &[0x2F]); // CMA
    h.step();
    assert_eq!(h.cpu.a, 0b0101_0101);
    assert!(h.cpu.flag_z);
}

#[test]
fn stc_and_cmc_toggle_carry() {
    let mut h = Harness::new(true);
    h.load(0, &[0x37, 0x3F, 0x3F]); // STC ; CMC ; CMC
    h.step();
    assert!(h.cpu.flag_cy);
    h.step();
    assert!(!h.cpu.flag_cy);
    h.step();
    assert!(h.cpu.flag_cy);
}

#[test]
fn di_ei_gate_interrupt_enable_flag() {
    let mut h = Harness::new(true);
    h.load(0, &[0xFB, 0xF3]); // EI ; DI
    h.step();
    assert!(h.cpu.interrupts_enabled);
    h.step();
    assert!(!h.cpu.interrupts_enabled);
}

#[test]
fn faulting_io_surfaces_unmapped_port_through_in_and_out() {
    let mut io = FaultingIo;
    assert!(io.read(5).is_err());
    assert!(io.write(5, 0).is_err());
}
