//! COP1 instruction tests.
//!
//! Runs FPU instructions through the interpreter: register moves, arithmetic
//! with FCR31 bookkeeping, compare-and-branch, the fixed-rounding conversions,
//! and the two ways a COP1 instruction can trap.

use rstest::rstest;
use vrsim_core::core::arch::cp0 as regs;
use vrsim_core::core::units::fpu::exception_flags::FpFlags;

use crate::common::builder::asm::*;
use crate::common::harness::TestContext;

const FP_EXC_CODE: u64 = 15;
const CPU_EXC_CODE: u64 = 11;

fn exc_code(ctx: &TestContext) -> u64 {
    (ctx.machine.cp0(regs::CAUSE) & regs::CAUSE_EXC) >> regs::CAUSE_EXC_SHIFT
}

/// Runs `program` with single-precision `a` in `f2` and `b` in `f3`.
fn run_s(program: &[u32], a: f32, b: f32) -> TestContext {
    let mut ctx = TestContext::new().load_program(program);
    ctx.cpu_mut().regs.fpr.write_s(2, a.to_bits());
    ctx.cpu_mut().regs.fpr.write_s(3, b.to_bits());
    let _ = ctx.step_n(program.len()).unwrap();
    ctx
}

// ══════════════════════════════════════════════════════════
// 1. Moves
// ══════════════════════════════════════════════════════════

#[test]
fn mtc1_mfc1_round_trip_sign_extends() {
    let mut ctx = TestContext::new().load_program(&[mtc1(1, 4), mfc1(2, 4)]);
    ctx.set_reg(1, 0x1234_5678_8000_0000);
    let _ = ctx.step_n(2).unwrap();
    assert_eq!(ctx.machine.fpr_s(4), 0x8000_0000);
    assert_eq!(ctx.get_reg(2), 0xFFFF_FFFF_8000_0000);
}

#[test]
fn dmtc1_moves_all_64_bits() {
    let mut ctx = TestContext::new().load_program(&[dmtc1(1, 5)]);
    ctx.set_reg(1, 0x4000_0000_0000_0000);
    let _ = ctx.step();
    assert_eq!(ctx.machine.fpr_d(5), 2.0f64.to_bits());
}

#[test]
fn cfc1_reads_revision_and_control() {
    let mut ctx = TestContext::new().load_program(&[ctc1(1, 31), cfc1(2, 0), cfc1(3, 31)]);
    ctx.set_reg(1, 0x3);
    let _ = ctx.step_n(3).unwrap();
    assert_eq!(ctx.get_reg(2), 0x0B00);
    assert_eq!(ctx.get_reg(3), 0x3);
    assert_eq!(ctx.machine.fcr31().rm(), 3);
}

#[test]
fn lwc1_loads_a_single() {
    let mut ctx = TestContext::new().load_program(&[lwc1(7, 1, 0)]);
    let data = crate::common::harness::DATA_VADDR;
    ctx.cpu_mut().store_u32(data, 1.5f32.to_bits()).unwrap();
    ctx.set_reg(1, data);
    let _ = ctx.step();
    assert_eq!(ctx.machine.fpr_s(7), 1.5f32.to_bits());
}

// ══════════════════════════════════════════════════════════
// 2. Arithmetic and conversions
// ══════════════════════════════════════════════════════════

#[test]
fn exact_add_leaves_flags_clear() {
    let ctx = run_s(&[add_s(4, 2, 3)], 1.5, 2.25);
    assert_eq!(ctx.machine.fpr_s(4), 3.75f32.to_bits());
    assert_eq!(ctx.machine.fcr31().flags(), 0);
}

#[test]
fn divide_by_zero_sets_sticky_flag() {
    let ctx = run_s(&[div_s(4, 2, 3)], 1.0, 0.0);
    assert_eq!(ctx.machine.fpr_s(4), f32::INFINITY.to_bits());
    assert_eq!(ctx.machine.fcr31().flags(), FpFlags::DZ.bits());
    assert_eq!(ctx.machine.fcr31().cause(), FpFlags::DZ.bits());
}

#[test]
fn double_arithmetic() {
    let mut ctx = TestContext::new().load_program(&[add_d(6, 2, 4), mul_d(8, 6, 4)]);
    ctx.cpu_mut().regs.fpr.write_d(2, 1.25f64.to_bits());
    ctx.cpu_mut().regs.fpr.write_d(4, 2.0f64.to_bits());
    let _ = ctx.step_n(2).unwrap();
    assert_eq!(ctx.machine.fpr_d(6), 3.25f64.to_bits());
    assert_eq!(ctx.machine.fpr_d(8), 6.5f64.to_bits());
}

#[test]
fn conversions_between_formats() {
    let mut ctx = TestContext::new().load_program(&[mtc1(1, 2), cvt_s_w(4, 2), cvt_d_s(6, 4)]);
    ctx.set_reg(1, (-3i64) as u64);
    let _ = ctx.step_n(3).unwrap();
    assert_eq!(ctx.machine.fpr_s(4), (-3.0f32).to_bits());
    assert_eq!(ctx.machine.fpr_d(6), (-3.0f64).to_bits());
}

#[rstest]
#[case(round_w_s(4, 2), 2.5, 2)]
#[case(round_w_s(4, 2), 3.5, 4)]
#[case(trunc_w_s(4, 2), -2.5, -2)]
#[case(floor_w_s(4, 2), -2.5, -3)]
fn fixed_rounding_conversions(#[case] word: u32, #[case] x: f32, #[case] expected: i32) {
    let ctx = run_s(&[word], x, 0.0);
    assert_eq!(ctx.machine.fpr_s(4) as i32, expected);
    assert_eq!(ctx.machine.fcr31().flags(), FpFlags::NX.bits());
}

#[test]
fn fixed_rounding_ignores_fcr31_mode() {
    // Round toward zero in FCR31 does not affect ROUND.W.
    let mut ctx = TestContext::new().load_program(&[ctc1(1, 31), round_w_s(4, 2)]);
    ctx.set_reg(1, 1);
    ctx.cpu_mut().regs.fpr.write_s(2, 2.75f32.to_bits());
    let _ = ctx.step_n(2).unwrap();
    assert_eq!(ctx.machine.fpr_s(4), 3);
}

// ══════════════════════════════════════════════════════════
// 3. Compare and branch
// ══════════════════════════════════════════════════════════

#[test]
fn compare_sets_condition_for_bc1t() {
    // c.lt.s f2, f3 ; bc1t +2 ; nop ; addiu r5 (skipped) ; addiu r6
    let ctx = run_s(
        &[c_s(0xC, 2, 3), bc1t(2), nop(), addiu(5, 0, 1), addiu(6, 0, 1)],
        1.0,
        2.0,
    );
    assert!(ctx.machine.fcr31().condition());
    assert_eq!(ctx.get_reg(5), 0);
    assert_eq!(ctx.get_reg(6), 1);
}

#[test]
fn false_condition_takes_bc1f() {
    let ctx = run_s(
        &[c_s(0x2, 2, 3), bc1f(2), nop(), addiu(5, 0, 1), addiu(6, 0, 1)],
        1.0,
        2.0,
    );
    assert!(!ctx.machine.fcr31().condition());
    assert_eq!(ctx.get_reg(5), 0);
}

// ══════════════════════════════════════════════════════════
// 4. Traps
// ══════════════════════════════════════════════════════════

#[test]
fn cleared_cu1_raises_coprocessor_unusable() {
    let mut ctx = TestContext::new().load_program(&[add_s(4, 2, 3)]);
    let status = ctx.machine.cp0(regs::STATUS) & !regs::STATUS_CU1;
    ctx.cpu_mut().write_cp0(regs::STATUS, status);

    let r = ctx.step();
    assert!(r.trapped);
    assert_eq!(exc_code(&ctx), CPU_EXC_CODE);
    assert_eq!(ctx.machine.cp0(regs::CAUSE) & regs::CAUSE_CE, 1 << regs::CAUSE_CE_SHIFT);
    assert_eq!(ctx.machine.cp0(regs::EPC), TestContext::addr(0));
}

#[test]
fn cu1_gates_loads_too() {
    let mut ctx = TestContext::new().load_program(&[lwc1(1, 0, 0)]);
    let status = ctx.machine.cp0(regs::STATUS) & !regs::STATUS_CU1;
    ctx.cpu_mut().write_cp0(regs::STATUS, status);
    assert!(ctx.step().trapped);
    assert_eq!(exc_code(&ctx), CPU_EXC_CODE);
}

#[test]
fn enabled_invalid_traps_and_keeps_destination() {
    let mut ctx = TestContext::new().load_program(&[ctc1(1, 31), add_s(4, 2, 3)]);
    ctx.set_reg(1, 1 << 11);
    ctx.cpu_mut().regs.fpr.write_s(2, 0x7FC0_0000);
    ctx.cpu_mut().regs.fpr.write_s(3, 1.0f32.to_bits());
    ctx.cpu_mut().regs.fpr.write_s(4, 0xDEAD_BEEF);

    let _ = ctx.step();
    let r = ctx.step();
    assert!(r.trapped);
    assert_eq!(exc_code(&ctx), FP_EXC_CODE);
    assert_eq!(ctx.machine.fpr_s(4), 0xDEAD_BEEF);
    assert_eq!(ctx.machine.fcr31().cause(), FpFlags::NV.bits());
    assert_eq!(ctx.machine.fcr31().flags(), 0);
}

#[test]
fn signaling_nan_is_unimplemented() {
    let ctx = {
        let mut ctx = TestContext::new().load_program(&[add_s(4, 2, 3)]);
        ctx.cpu_mut().regs.fpr.write_s(2, 0x7F80_0001);
        let _ = ctx.step();
        ctx
    };
    assert_eq!(exc_code(&ctx), FP_EXC_CODE);
    assert_eq!(ctx.machine.fcr31().cause(), FpFlags::E.bits());
}
