//! REGIMM handlers (primary opcode 1, selected by the `rt` field).

use super::{OpHandler, RA, reserved};
use crate::common::{Fault, Trap};
use crate::core::Cpu;
use crate::core::units::alu::logic::TrapCond;
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::regimm as r;

/// Builds the 32-entry REGIMM table.
pub fn table() -> Vec<OpHandler> {
    let mut t: Vec<OpHandler> = vec![reserved; 32];
    let mut set = |sel: u32, h: OpHandler| t[sel as usize] = h;

    set(r::BLTZ, bltz);
    set(r::BGEZ, bgez);
    set(r::BLTZL, bltzl);
    set(r::BGEZL, bgezl);
    set(r::TGEI, tgei);
    set(r::TGEIU, tgeiu);
    set(r::TLTI, tlti);
    set(r::TLTIU, tltiu);
    set(r::TEQI, teqi);
    set(r::TNEI, tnei);
    set(r::BLTZAL, bltzal);
    set(r::BGEZAL, bgezal);
    set(r::BLTZALL, bltzall);
    set(r::BGEZALL, bgezall);
    t
}

#[inline(always)]
fn negative(cpu: &Cpu, word: u32) -> bool {
    (cpu.regs.read(word.rs()) as i64) < 0
}

fn bltz(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.branch(negative(cpu, word), word);
    Ok(())
}

fn bgez(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.branch(!negative(cpu, word), word);
    Ok(())
}

fn bltzl(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.branch_likely(negative(cpu, word), word);
    Ok(())
}

fn bgezl(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.branch_likely(!negative(cpu, word), word);
    Ok(())
}

fn bltzal(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let taken = negative(cpu, word);
    cpu.link(RA);
    cpu.branch(taken, word);
    Ok(())
}

fn bgezal(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let taken = !negative(cpu, word);
    cpu.link(RA);
    cpu.branch(taken, word);
    Ok(())
}

fn bltzall(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let taken = negative(cpu, word);
    cpu.link(RA);
    cpu.branch_likely(taken, word);
    Ok(())
}

fn bgezall(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let taken = !negative(cpu, word);
    cpu.link(RA);
    cpu.branch_likely(taken, word);
    Ok(())
}

#[inline(always)]
fn trap_imm(cpu: &Cpu, word: u32, cond: TrapCond) -> Result<(), Fault> {
    if cond.holds(cpu.regs.read(word.rs()), word.simm()) {
        return Err(Trap::TrapInstruction.into());
    }
    Ok(())
}

fn tgei(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    trap_imm(cpu, word, TrapCond::Ge)
}

fn tgeiu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    trap_imm(cpu, word, TrapCond::Geu)
}

fn tlti(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    trap_imm(cpu, word, TrapCond::Lt)
}

fn tltiu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    trap_imm(cpu, word, TrapCond::Ltu)
}

fn teqi(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    trap_imm(cpu, word, TrapCond::Eq)
}

fn tnei(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    trap_imm(cpu, word, TrapCond::Ne)
}
