//! Trap Handling Logic.
//!
//! This module implements exception delivery for the CPU. It performs the following:
//! 1. **Context Saving:** Writes EPC, Cause.BD, and Cause.ExcCode/CE, but only outside exception level.
//! 2. **Fault Address:** Loads BadVAddr, and for TLB faults also Context, XContext, and EntryHi.
//! 3. **Vector Selection:** Picks the refill or general vector, in the bootstrap range while Status.BEV is set.
//! 4. **Return Handling:** Implements `ERET`.

use tracing::debug;

use super::Cpu;
use crate::common::Trap;
use crate::common::constants::{
    BOOT_GENERAL_EXCEPTION_VECTOR, BOOT_TLB_REFILL_VECTOR, GENERAL_EXCEPTION_VECTOR,
    INSTRUCTION_SIZE, TLB_REFILL_VECTOR,
};
use crate::core::arch::cp0::{self as regs};

/// PTEBase field of Context.
const CONTEXT_PTE_BASE: u64 = 0xFFFF_FFFF_FF80_0000;
/// BadVPN2 field of Context (bits 22:4).
const CONTEXT_BAD_VPN2: u64 = 0x007F_FFF0;
/// PTEBase field of XContext.
const XCONTEXT_PTE_BASE: u64 = 0xFFFF_FFFE_0000_0000;
/// VPN2 and region bits copied into EntryHi on a TLB fault.
const ENTRY_HI_VPN: u64 = 0xC000_00FF_FFFF_E000;
/// ASID field of EntryHi.
const ENTRY_HI_ASID: u64 = 0xFF;

impl Cpu {
    /// Delivers an exception.
    ///
    /// `pc` must still hold the address of the instruction that faulted (or, for an
    /// interrupt, the instruction about to execute).
    ///
    /// # Arguments
    ///
    /// * `trap` - The exception being delivered.
    /// * `in_delay` - The faulting instruction sits in a branch delay slot.
    pub fn take_exception(&mut self, trap: Trap, in_delay: bool) {
        let status = self.cp0.status();
        let exl = status & regs::STATUS_EXL != 0;

        if !exl {
            let (epc, bd) = if in_delay {
                (self.pc.wrapping_sub(INSTRUCTION_SIZE), true)
            } else {
                (self.pc, false)
            };
            self.cp0.set_raw(regs::EPC, epc);
            if bd {
                self.cp0.set_bits(regs::CAUSE, regs::CAUSE_BD);
            } else {
                self.cp0.clear_bits(regs::CAUSE, regs::CAUSE_BD);
            }
        }

        let mut cause = self.cp0.cause() & !(regs::CAUSE_EXC | regs::CAUSE_CE);
        cause |= trap.exception_code() << regs::CAUSE_EXC_SHIFT;
        if let Trap::CoprocessorUnusable(n) = trap {
            cause |= ((n as u64) << regs::CAUSE_CE_SHIFT) & regs::CAUSE_CE;
        }
        self.cp0.set_raw(regs::CAUSE, cause);

        if let Some(vaddr) = trap.bad_vaddr() {
            self.cp0.set_raw(regs::BAD_VADDR, vaddr);
            if trap.is_tlb() {
                self.load_tlb_fault_context(vaddr);
            }
        }

        let refill = trap.is_refill() && !exl;
        let vector = match (status & regs::STATUS_BEV != 0, refill) {
            (false, true) => TLB_REFILL_VECTOR,
            (false, false) => GENERAL_EXCEPTION_VECTOR,
            (true, true) => BOOT_TLB_REFILL_VECTOR,
            (true, false) => BOOT_GENERAL_EXCEPTION_VECTOR,
        };

        debug!(
            ?trap,
            pc = format_args!("{:#018x}", self.pc),
            vector = format_args!("{vector:#018x}"),
            in_delay,
            "exception"
        );

        self.cp0.set_bits(regs::STATUS, regs::STATUS_EXL);
        self.pc = vector;
        self.next_pc = vector;
        self.delay_slot = None;
        self.branch_target = None;
        if trap == Trap::Interrupt {
            self.stats.interrupts += 1;
        } else {
            self.stats.exceptions += 1;
        }
        self.status_changed();
    }

    /// Loads Context, XContext, and EntryHi for a TLB fault at `vaddr`.
    fn load_tlb_fault_context(&mut self, vaddr: u64) {
        let context = (self.cp0.get(regs::CONTEXT) & CONTEXT_PTE_BASE)
            | ((vaddr >> 9) & CONTEXT_BAD_VPN2);
        self.cp0.set_raw(regs::CONTEXT, context);

        let region = (vaddr >> 62) << 31;
        let bad_vpn2 = ((vaddr >> 13) & 0x7FF_FFFF) << 4;
        let xcontext = (self.cp0.get(regs::XCONTEXT) & XCONTEXT_PTE_BASE) | region | bad_vpn2;
        self.cp0.set_raw(regs::XCONTEXT, xcontext);

        let asid = self.cp0.get(regs::ENTRY_HI) & ENTRY_HI_ASID;
        self.cp0
            .set_raw(regs::ENTRY_HI, (vaddr & ENTRY_HI_VPN) | asid);
    }

    /// Delivers a pending interrupt at the current instruction boundary.
    pub fn deliver_interrupt(&mut self) {
        let in_delay = self.delay_slot.is_some();
        self.take_exception(Trap::Interrupt, in_delay);
    }

    /// Executes `ERET`: returns through ErrorEPC when Status.ERL is set, else EPC.
    ///
    /// `ERET` has no delay slot; the return address becomes the next `pc` directly.
    pub fn eret(&mut self) {
        let status = self.cp0.status();
        if status & regs::STATUS_ERL != 0 {
            self.next_pc = self.cp0.get(regs::ERROR_EPC);
            self.cp0.clear_bits(regs::STATUS, regs::STATUS_ERL);
        } else {
            self.next_pc = self.cp0.get(regs::EPC);
            self.cp0.clear_bits(regs::STATUS, regs::STATUS_EXL);
        }
        self.ll_bit = false;
        self.status_changed();
    }
}
