//! COP0 handlers: register moves, TLB maintenance, and `ERET`.
//!
//! The table is indexed by the `rs` field. Indices `0x10..=0x1F` form the CO
//! range, decoded further by the function field.

use tracing::debug;

use super::{OpHandler, reserved};
use crate::common::Fault;
use crate::common::constants::TLB_ENTRIES;
use crate::core::Cpu;
use crate::core::arch::cp0::{self as regs};
use crate::core::units::alu::sx32;
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::cop;

/// Builds the 32-entry COP0 table.
pub fn table() -> Vec<OpHandler> {
    let mut t: Vec<OpHandler> = vec![reserved; 32];
    t[cop::MF as usize] = mfc0;
    t[cop::DMF as usize] = dmfc0;
    t[cop::MT as usize] = mtc0;
    t[cop::DMT as usize] = dmtc0;
    for slot in &mut t[cop::CO as usize..] {
        *slot = co;
    }
    t
}

fn mfc0(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = sx32(cpu.read_cp0(word.rd()));
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn dmfc0(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.read_cp0(word.rd());
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn mtc0(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = sx32(cpu.regs.read(word.rt()));
    cpu.write_cp0(word.rd(), v);
    Ok(())
}

fn dmtc0(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.regs.read(word.rt());
    cpu.write_cp0(word.rd(), v);
    Ok(())
}

/// The CO range, selected by the function field.
fn co(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    match word.funct() {
        cop::TLBR => tlbr(cpu),
        cop::TLBWI => {
            let index = cpu.cp0.get(regs::INDEX) as usize % TLB_ENTRIES;
            tlb_write(cpu, index);
        }
        cop::TLBWR => {
            let index = cpu.random() as usize;
            tlb_write(cpu, index);
        }
        cop::TLBP => tlbp(cpu),
        cop::ERET => cpu.eret(),
        _ => return reserved(cpu, word),
    }
    Ok(())
}

fn tlbr(cpu: &mut Cpu) {
    let index = cpu.cp0.get(regs::INDEX) as usize % TLB_ENTRIES;
    let e = *cpu.mmu.tlb.entry(index);
    cpu.cp0.set_raw(regs::PAGE_MASK, e.page_mask);
    cpu.cp0.set_raw(regs::ENTRY_HI, e.entry_hi);
    cpu.cp0.set_raw(regs::ENTRY_LO0, e.read_lo0());
    cpu.cp0.set_raw(regs::ENTRY_LO1, e.read_lo1());
}

fn tlb_write(cpu: &mut Cpu, index: usize) {
    let page_mask = cpu.cp0.get(regs::PAGE_MASK);
    let entry_hi = cpu.cp0.get(regs::ENTRY_HI);
    let lo0 = cpu.cp0.get(regs::ENTRY_LO0);
    let lo1 = cpu.cp0.get(regs::ENTRY_LO1);
    cpu.mmu.tlb.update(index, page_mask, entry_hi, lo0, lo1);
    cpu.tlb_dirty = true;
    debug!(
        index,
        entry_hi = format_args!("{entry_hi:#x}"),
        page_mask = format_args!("{page_mask:#x}"),
        "tlb write"
    );
}

fn tlbp(cpu: &mut Cpu) {
    let entry_hi = cpu.cp0.get(regs::ENTRY_HI);
    let index = match cpu.mmu.tlb.probe(entry_hi) {
        Some(i) => i as u64,
        None => regs::INDEX_PROBE_FAIL,
    };
    cpu.cp0.set_raw(regs::INDEX, index);
}
