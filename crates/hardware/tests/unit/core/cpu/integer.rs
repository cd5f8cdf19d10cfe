//! Integer instruction tests.
//!
//! Exercises the SPECIAL and immediate handlers end to end through the
//! interpreter: sign extension of 32-bit results, HI/LO, shifts.

use rstest::rstest;

use crate::common::builder::asm::*;
use crate::common::harness::TestContext;

/// Runs `program` from reset with `r1 = a` and `r2 = b`, returning the context.
fn run_with(program: &[u32], a: u64, b: u64) -> TestContext {
    let mut ctx = TestContext::new().load_program(program);
    ctx.set_reg(1, a);
    ctx.set_reg(2, b);
    let _ = ctx.step_n(program.len()).unwrap();
    ctx
}

// ══════════════════════════════════════════════════════════
// 1. Immediates
// ══════════════════════════════════════════════════════════

#[test]
fn lui_ori_builds_a_sign_extended_word() {
    let ctx = run_with(&[lui(3, 0x8000), ori(3, 3, 0x1234)], 0, 0);
    assert_eq!(ctx.get_reg(3), 0xFFFF_FFFF_8000_1234);
}

#[test]
fn addiu_wraps_and_sign_extends() {
    let ctx = run_with(&[addiu(3, 1, 1)], 0x7FFF_FFFF, 0);
    assert_eq!(ctx.get_reg(3), 0xFFFF_FFFF_8000_0000);
}

#[test]
fn daddiu_keeps_the_upper_word() {
    let ctx = run_with(&[daddiu(3, 1, -1)], 0x1_0000_0000, 0);
    assert_eq!(ctx.get_reg(3), 0xFFFF_FFFF);
}

#[test]
fn logical_immediates_zero_extend() {
    let ctx = run_with(&[andi(3, 1, 0xFFFF), xori(4, 1, 0x00FF), slti(5, 1, 0)], u64::MAX, 0);
    assert_eq!(ctx.get_reg(3), 0xFFFF);
    assert_eq!(ctx.get_reg(4), 0xFFFF_FFFF_FFFF_FF00);
    assert_eq!(ctx.get_reg(5), 1);
}

#[test]
fn writes_to_r0_are_discarded() {
    let ctx = run_with(&[addiu(0, 0, 5), or(3, 0, 0)], 0, 0);
    assert_eq!(ctx.get_reg(0), 0);
    assert_eq!(ctx.get_reg(3), 0);
}

// ══════════════════════════════════════════════════════════
// 2. Register-register
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(addu(3, 1, 2), 0xFFFF_FFFF, 1, 0)]
#[case(subu(3, 1, 2), 0, 1, u64::MAX)]
#[case(daddu(3, 1, 2), 0xFFFF_FFFF, 1, 0x1_0000_0000)]
#[case(and(3, 1, 2), 0xF0F0, 0xFF00, 0xF000)]
#[case(or(3, 1, 2), 0xF0F0, 0x0F0F, 0xFFFF)]
#[case(xor(3, 1, 2), 0xFF, 0x0F, 0xF0)]
#[case(nor(3, 1, 2), 0, 0, u64::MAX)]
#[case(slt(3, 1, 2), u64::MAX, 0, 1)]
#[case(sltu(3, 1, 2), u64::MAX, 0, 0)]
fn three_register_ops(#[case] word: u32, #[case] a: u64, #[case] b: u64, #[case] expected: u64) {
    let ctx = run_with(&[word], a, b);
    assert_eq!(ctx.get_reg(3), expected);
}

#[rstest]
#[case(sll(3, 1, 4), 0x0800_0000, 0xFFFF_FFFF_8000_0000)]
#[case(srl(3, 1, 4), 0xFFFF_FFFF_8000_0000, 0x0800_0000)]
#[case(sra(3, 1, 4), 0xFFFF_FFFF_8000_0000, 0xFFFF_FFFF_F800_0000)]
#[case(dsll32(3, 1, 0), 0x1234, 0x1234_0000_0000)]
fn shifts(#[case] word: u32, #[case] a: u64, #[case] expected: u64) {
    let ctx = run_with(&[word], a, 0);
    assert_eq!(ctx.get_reg(3), expected);
}

// ══════════════════════════════════════════════════════════
// 3. HI/LO
// ══════════════════════════════════════════════════════════

#[test]
fn mult_fills_hi_and_lo() {
    let ctx = run_with(&[mult(1, 2), mfhi(3), mflo(4)], 0x8000_0000, 2);
    assert_eq!(ctx.machine.hi(), u64::MAX);
    assert_eq!(ctx.machine.lo(), 0);
    assert_eq!(ctx.get_reg(3), u64::MAX);
    assert_eq!(ctx.get_reg(4), 0);
}

#[test]
fn div_leaves_quotient_and_remainder() {
    let ctx = run_with(&[div(1, 2)], 17, 5);
    assert_eq!(ctx.machine.lo(), 3);
    assert_eq!(ctx.machine.hi(), 2);
}

#[test]
fn div_by_zero_does_not_trap() {
    let ctx = run_with(&[div(1, 2)], 17, 0);
    assert_eq!(ctx.machine.lo(), u64::MAX);
    assert_eq!(ctx.machine.hi(), 17);
    assert_eq!(ctx.machine.stats().exceptions, 0);
}
