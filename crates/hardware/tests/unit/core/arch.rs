//! Architectural register tests.
//!
//! Covers the GPR `r0` invariant, the FPR width views, and the COP0 write
//! masks, read-only registers, reserved-index latch, and `Random`.

use proptest::prelude::*;
use vrsim_core::common::RegisterFile;
use vrsim_core::core::arch::cp0::{self as regs, ControlRegisters, WriteKind, write_kind};
use vrsim_core::core::arch::fpr::Fpr;

use crate::common::harness::TestContext;

// ══════════════════════════════════════════════════════════
// 1. General-purpose registers
// ══════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn r0_reads_zero_after_any_write(val in any::<u64>()) {
        let mut rf = RegisterFile::new();
        rf.write(0, val);
        prop_assert_eq!(rf.read(0), 0);
    }

    #[test]
    fn other_registers_hold_their_value(idx in 1usize..32, val in any::<u64>()) {
        let mut rf = RegisterFile::new();
        rf.write(idx, val);
        prop_assert_eq!(rf.read(idx), val);
    }
}

#[test]
fn write_sx32_sign_extends() {
    let mut rf = RegisterFile::new();
    rf.write_sx32(3, 0x8000_0000);
    assert_eq!(rf.read(3), 0xFFFF_FFFF_8000_0000);
    rf.write_sx32(3, 0x7FFF_FFFF);
    assert_eq!(rf.read(3), 0x7FFF_FFFF);
}

// ══════════════════════════════════════════════════════════
// 2. Floating-point register views
// ══════════════════════════════════════════════════════════

#[test]
fn half_width_pairs_odd_singles_into_even_slot() {
    let mut fpr = Fpr::new();
    fpr.write_s(0, 0x1111_1111);
    fpr.write_s(1, 0x2222_2222);
    assert_eq!(fpr.read_d(0), 0x2222_2222_1111_1111);
    assert_eq!(fpr.read_s(1), 0x2222_2222);
}

#[test]
fn full_width_keeps_registers_independent() {
    let mut fpr = Fpr::new();
    fpr.set_full_width(true);
    fpr.write_d(1, 0xAAAA_BBBB_CCCC_DDDD);
    fpr.write_s(0, 0x1234_5678);
    assert_eq!(fpr.read_d(1), 0xAAAA_BBBB_CCCC_DDDD);
    assert_eq!(fpr.read_s(1), 0xCCCC_DDDD);
    assert_eq!(fpr.read_s(0), 0x1234_5678);
}

#[test]
fn switching_width_preserves_storage() {
    let mut fpr = Fpr::new();
    fpr.set_full_width(true);
    fpr.write_d(2, 0x0102_0304_0506_0708);
    fpr.set_full_width(false);
    assert_eq!(fpr.read_s(2), 0x0506_0708);
    assert_eq!(fpr.read_s(3), 0x0102_0304);
}

// ══════════════════════════════════════════════════════════
// 3. COP0 register bank
// ══════════════════════════════════════════════════════════

#[test]
fn masked_writes_keep_unwritable_bits() {
    let mut cp0 = ControlRegisters::new(0, 0);
    assert!(cp0.write(regs::CAUSE, u64::MAX));
    assert_eq!(cp0.cause(), 0x300);
    assert!(cp0.write(regs::PAGE_MASK, u64::MAX));
    assert_eq!(cp0.get(regs::PAGE_MASK), 0x01FF_E000);
}

#[test]
fn read_only_registers_drop_writes() {
    let mut cp0 = ControlRegisters::new(0, 0);
    assert!(!cp0.write(regs::PRID, 0));
    assert_eq!(cp0.get(regs::PRID), regs::PRID_VALUE);
    assert_eq!(write_kind(regs::BAD_VADDR), WriteKind::ReadOnly);
}

#[test]
fn reserved_indices_share_one_latch() {
    let mut cp0 = ControlRegisters::new(0, 0);
    assert!(cp0.write(7, 0xDEAD));
    for idx in regs::RESERVED {
        assert_eq!(cp0.get(idx), 0xDEAD);
    }
}

#[test]
fn register_numbers_wrap_at_five_bits() {
    let mut cp0 = ControlRegisters::new(0, 0);
    assert!(cp0.write(regs::EPC + 32, 0x1234));
    assert_eq!(cp0.get(regs::EPC), 0x1234);
    assert_eq!(cp0.get(regs::PRID + 64), regs::PRID_VALUE);
    assert!(cp0.write(regs::CAUSE + 96, !0));
    assert_eq!(cp0.get(regs::CAUSE), 0x300);
}

#[test]
fn machine_reads_any_cp0_index() {
    let ctx = TestContext::new();
    assert_eq!(ctx.machine.cp0(regs::STATUS + 32), ctx.machine.cp0(regs::STATUS));
    assert_eq!(ctx.machine.cp0(usize::MAX), ctx.machine.cp0(31));
}

#[test]
fn interrupt_pending_requires_ie_and_no_exl() {
    let mut cp0 = ControlRegisters::new(regs::STATUS_IE | regs::CAUSE_IP7, 0);
    cp0.set_bits(regs::CAUSE, regs::CAUSE_IP7);
    assert!(cp0.interrupt_pending());
    cp0.set_bits(regs::STATUS, regs::STATUS_EXL);
    assert!(!cp0.interrupt_pending());
}

#[test]
fn random_counts_down_from_31() {
    let mut ctx = TestContext::new().load_program(&[0, 0, 0]);
    assert_eq!(ctx.machine.cp0(regs::RANDOM), 31);
    let _ = ctx.step_n(2).unwrap();
    assert_eq!(ctx.machine.cp0(regs::RANDOM), 29);
}

#[test]
fn random_restarts_at_31_after_wired_write() {
    let mut ctx = TestContext::new().load_program(&[0, 0, 0]);
    let _ = ctx.step_n(3).unwrap();
    ctx.cpu_mut().write_cp0(regs::WIRED, 30);
    assert_eq!(ctx.machine.cp0(regs::RANDOM), 31);
    let _ = ctx.step();
    assert_eq!(ctx.machine.cp0(regs::RANDOM), 30);
    let _ = ctx.step();
    assert_eq!(ctx.machine.cp0(regs::RANDOM), 31);
}

#[test]
fn count_write_reschedules_compare() {
    let mut ctx = TestContext::new();
    ctx.cpu_mut().write_cp0(regs::COMPARE, 100);
    ctx.cpu_mut().write_cp0(regs::COUNT, 40);
    let due = ctx
        .cpu()
        .events
        .cycles_until_event(vrsim_core::core::units::events::EventType::Compare);
    assert_eq!(due, Some(60));
}
