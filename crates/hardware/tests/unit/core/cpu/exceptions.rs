//! Exception model tests.
//!
//! Verifies exception delivery end to end:
//! - EPC, Cause.BD, ExcCode, and BadVAddr
//! - Vector selection (general, refill, bootstrap)
//! - Nested exceptions under Status.EXL and `ERET`
//! - Timer and external interrupts
//! - Fatal errors for unimplemented encodings

use vrsim_core::Machine;
use vrsim_core::common::CpuError;
use vrsim_core::common::constants::{
    BOOT_GENERAL_EXCEPTION_VECTOR, GENERAL_EXCEPTION_VECTOR, TLB_REFILL_VECTOR,
};
use vrsim_core::core::arch::cp0 as regs;

use crate::common::builder::asm::*;
use crate::common::harness::{DATA_VADDR, TestContext};
use crate::common::mocks::interrupts::SharedLine;

fn exc_code(ctx: &TestContext) -> u64 {
    (ctx.machine.cp0(regs::CAUSE) & regs::CAUSE_EXC) >> regs::CAUSE_EXC_SHIFT
}

fn exl(ctx: &TestContext) -> bool {
    ctx.machine.cp0(regs::STATUS) & regs::STATUS_EXL != 0
}

// ══════════════════════════════════════════════════════════
// 1. Synchronous exceptions
// ══════════════════════════════════════════════════════════

#[test]
fn syscall_enters_the_general_vector() {
    let mut ctx = TestContext::new().load_program(&[nop(), syscall()]);
    let _ = ctx.step();
    let r = ctx.step();

    assert!(r.trapped);
    assert_eq!(ctx.machine.pc(), GENERAL_EXCEPTION_VECTOR);
    assert_eq!(ctx.machine.cp0(regs::EPC), TestContext::addr(1));
    assert_eq!(exc_code(&ctx), 8);
    assert_eq!(ctx.machine.cp0(regs::CAUSE) & regs::CAUSE_BD, 0);
    assert!(exl(&ctx));
}

#[test]
fn delay_slot_exception_points_epc_at_the_branch() {
    let mut ctx = TestContext::new().load_program(&[beq(0, 0, 4), syscall()]);
    let _ = ctx.step_n(2).unwrap();

    assert_eq!(ctx.machine.cp0(regs::EPC), TestContext::addr(0));
    assert_ne!(ctx.machine.cp0(regs::CAUSE) & regs::CAUSE_BD, 0);
    assert_eq!(ctx.machine.pc(), GENERAL_EXCEPTION_VECTOR);
    assert_eq!(ctx.cpu().delay_slot, None);
}

#[test]
fn reserved_opcode_raises_reserved_instruction() {
    let mut ctx = TestContext::new().load_program(&[reserved()]);
    assert!(ctx.step().trapped);
    assert_eq!(exc_code(&ctx), 10);
}

#[test]
fn overflow_traps_without_writing_destination() {
    let mut ctx = TestContext::new().load_program(&[add(3, 1, 2)]);
    ctx.set_reg(1, 0x7FFF_FFFF);
    ctx.set_reg(2, 1);
    ctx.set_reg(3, 0xAB);
    assert!(ctx.step().trapped);
    assert_eq!(exc_code(&ctx), 12);
    assert_eq!(ctx.get_reg(3), 0xAB);
}

#[test]
fn addi_overflow_traps() {
    let mut ctx = TestContext::new().load_program(&[addi(3, 1, 1)]);
    ctx.set_reg(1, 0x7FFF_FFFF);
    assert!(ctx.step().trapped);
    assert_eq!(exc_code(&ctx), 12);
}

#[test]
fn teq_traps_on_equal_operands() {
    let mut ctx = TestContext::new().load_program(&[teq(1, 2), teq(1, 3)]);
    ctx.set_reg(1, 4);
    ctx.set_reg(3, 4);
    assert!(!ctx.step().trapped);
    assert!(ctx.step().trapped);
    assert_eq!(exc_code(&ctx), 13);
}

#[test]
fn misaligned_load_is_an_address_error() {
    let mut ctx = TestContext::new().load_program(&[lw(3, 1, 2)]);
    ctx.set_reg(1, DATA_VADDR);
    assert!(ctx.step().trapped);
    assert_eq!(exc_code(&ctx), 4);
    assert_eq!(ctx.machine.cp0(regs::BAD_VADDR), DATA_VADDR + 2);
}

#[test]
fn misaligned_store_is_an_address_error() {
    let mut ctx = TestContext::new().load_program(&[sw(3, 1, 1)]);
    ctx.set_reg(1, DATA_VADDR);
    assert!(ctx.step().trapped);
    assert_eq!(exc_code(&ctx), 5);
    assert_eq!(ctx.machine.cp0(regs::BAD_VADDR), DATA_VADDR + 1);
}

// ══════════════════════════════════════════════════════════
// 2. TLB exceptions
// ══════════════════════════════════════════════════════════

#[test]
fn tlb_miss_uses_the_refill_vector() {
    let mut ctx = TestContext::new().load_program(&[lw(3, 1, 0)]);
    ctx.set_reg(1, 0x0040_0000);
    assert!(ctx.step().trapped);

    assert_eq!(ctx.machine.pc(), TLB_REFILL_VECTOR);
    assert_eq!(exc_code(&ctx), 2);
    assert_eq!(ctx.machine.cp0(regs::BAD_VADDR), 0x0040_0000);
    assert_eq!(ctx.machine.cp0(regs::CONTEXT), 0x2000);
    assert_eq!(ctx.machine.cp0(regs::ENTRY_HI), 0x0040_0000);
}

#[test]
fn tlb_miss_on_store_reports_tlbs() {
    let mut ctx = TestContext::new().load_program(&[sw(3, 1, 0)]);
    ctx.set_reg(1, 0x0040_0000);
    assert!(ctx.step().trapped);
    assert_eq!(exc_code(&ctx), 3);
}

#[test]
fn tlb_miss_under_exl_uses_the_general_vector() {
    let mut ctx = TestContext::new().load_program(&[lw(3, 1, 0)]);
    ctx.set_reg(1, 0x0040_0000);
    let status = ctx.machine.cp0(regs::STATUS) | regs::STATUS_EXL;
    ctx.cpu_mut().write_cp0(regs::STATUS, status);
    let _ = ctx.step();
    assert_eq!(ctx.machine.pc(), GENERAL_EXCEPTION_VECTOR);
}

// ══════════════════════════════════════════════════════════
// 3. Nesting, return, bootstrap vectors
// ══════════════════════════════════════════════════════════

#[test]
fn eret_returns_to_epc() {
    let mut ctx = TestContext::new().load_program(&[syscall()]);
    ctx.machine.load_program(0x180, &[eret()]);

    let _ = ctx.step();
    assert!(exl(&ctx));
    let _ = ctx.step();
    assert_eq!(ctx.machine.pc(), TestContext::addr(0));
    assert!(!exl(&ctx));
}

#[test]
fn nested_exception_keeps_the_first_epc() {
    let mut ctx = TestContext::new().load_program(&[nop(), syscall()]);
    ctx.machine.load_program(0x180, &[brk_word()]);

    let _ = ctx.step_n(3).unwrap();
    assert_eq!(ctx.machine.cp0(regs::EPC), TestContext::addr(1));
    assert_eq!(exc_code(&ctx), 9);
    assert_eq!(ctx.machine.stats().exceptions, 2);
}

#[test]
fn bev_selects_bootstrap_vectors() {
    let mut ctx = TestContext::new().load_program(&[syscall()]);
    let status = ctx.machine.cp0(regs::STATUS) | regs::STATUS_BEV;
    ctx.cpu_mut().write_cp0(regs::STATUS, status);
    let _ = ctx.step();
    assert_eq!(ctx.machine.pc(), BOOT_GENERAL_EXCEPTION_VECTOR);
}

/// `BREAK` with a zero code field.
const fn brk_word() -> u32 {
    0x0000_000D
}

// ══════════════════════════════════════════════════════════
// 4. Interrupts
// ══════════════════════════════════════════════════════════

fn enable_interrupts(ctx: &mut TestContext, mask: u64) {
    let status = ctx.machine.cp0(regs::STATUS) | regs::STATUS_IE | mask;
    ctx.cpu_mut().write_cp0(regs::STATUS, status);
}

#[test]
fn compare_match_raises_timer_interrupt() {
    let mut ctx = TestContext::new();
    ctx.cpu_mut().write_cp0(regs::COMPARE, 10);
    enable_interrupts(&mut ctx, regs::CAUSE_IP7);

    for _ in 0..12 {
        let _ = ctx.step();
    }

    assert_eq!(ctx.machine.stats().interrupts, 1);
    assert_ne!(ctx.machine.cp0(regs::CAUSE) & regs::CAUSE_IP7, 0);
    assert_eq!(exc_code(&ctx), 0);
    assert!(exl(&ctx));
}

#[test]
fn compare_write_acknowledges_the_timer() {
    let mut ctx = TestContext::new();
    ctx.cpu_mut().write_cp0(regs::COMPARE, 5);
    for _ in 0..6 {
        let _ = ctx.step();
    }
    assert_ne!(ctx.machine.cp0(regs::CAUSE) & regs::CAUSE_IP7, 0);

    ctx.cpu_mut().write_cp0(regs::COMPARE, 100);
    assert_eq!(ctx.machine.cp0(regs::CAUSE) & regs::CAUSE_IP7, 0);
}

#[test]
fn masked_interrupt_is_not_taken() {
    let mut ctx = TestContext::new();
    ctx.cpu_mut().write_cp0(regs::COMPARE, 3);
    enable_interrupts(&mut ctx, 0);
    for _ in 0..6 {
        let _ = ctx.step();
    }
    assert_eq!(ctx.machine.stats().interrupts, 0);
}

fn with_line(line: &SharedLine) -> TestContext {
    let machine = Machine::new(&TestContext::config())
        .unwrap()
        .with_interrupt_controller(Box::new(line.clone()));
    TestContext { machine }
}

#[test]
fn external_line_drives_ip2() {
    let line = SharedLine::default();
    let mut ctx = with_line(&line);
    enable_interrupts(&mut ctx, regs::CAUSE_IP2);

    let _ = ctx.step();
    assert_eq!(ctx.machine.stats().interrupts, 0);

    line.raise();
    let _ = ctx.step();
    assert_eq!(ctx.machine.stats().interrupts, 1);
    assert_ne!(ctx.machine.cp0(regs::CAUSE) & regs::CAUSE_IP2, 0);
    assert_eq!(ctx.machine.cp0(regs::EPC), TestContext::addr(1));

    line.lower();
    let _ = ctx.step();
    assert_eq!(ctx.machine.cp0(regs::CAUSE) & regs::CAUSE_IP2, 0);
}

#[test]
fn interrupt_in_delay_slot_sets_bd() {
    let line = SharedLine::default();
    let mut ctx = with_line(&line).load_program(&[beq(0, 0, 4), nop()]);
    enable_interrupts(&mut ctx, regs::CAUSE_IP2);

    let _ = ctx.step();
    line.raise();
    let _ = ctx.step();

    assert_eq!(ctx.machine.cp0(regs::EPC), TestContext::addr(0));
    assert_ne!(ctx.machine.cp0(regs::CAUSE) & regs::CAUSE_BD, 0);
}

// ══════════════════════════════════════════════════════════
// 5. Fatal errors
// ══════════════════════════════════════════════════════════

#[test]
fn unimplemented_encoding_stops_at_the_instruction() {
    let word = lwc2(1, 0, 0);
    let mut ctx = TestContext::new().load_program(&[nop(), word]);
    let _ = ctx.step();

    let err = ctx.machine.step().unwrap_err();
    assert_eq!(
        err,
        CpuError::UnimplementedInstruction {
            pc: TestContext::addr(1),
            word
        }
    );
    assert_eq!(ctx.machine.pc(), TestContext::addr(1));
    assert_eq!(ctx.machine.ops_executed(), 1);
}

#[test]
fn fatal_error_in_delay_slot_keeps_the_pending_branch() {
    let mut ctx = TestContext::new().load_program(&[beq(0, 0, 4), lwc2(1, 0, 0)]);
    let _ = ctx.step();
    assert!(ctx.machine.step().is_err());
    assert_eq!(ctx.cpu().delay_slot, Some(TestContext::addr(5)));
}
