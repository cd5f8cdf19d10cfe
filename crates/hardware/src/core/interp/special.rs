//! SPECIAL handlers (primary opcode 0, selected by the function field).

use super::{OpHandler, reserved};
use crate::common::{Fault, Trap};
use crate::core::Cpu;
use crate::core::units::alu::arithmetic::{self as arith, HiLo, add32, add64, sub32, sub64};
use crate::core::units::alu::logic::{TrapCond, slt, sltu};
use crate::core::units::alu::shifts;
use crate::core::units::alu::sx32;
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::special as f;

/// Builds the 64-entry SPECIAL table.
pub fn table() -> Vec<OpHandler> {
    let mut t: Vec<OpHandler> = vec![reserved; 64];
    let mut set = |funct: u32, h: OpHandler| t[funct as usize] = h;

    set(f::SLL, sll);
    set(f::SRL, srl);
    set(f::SRA, sra);
    set(f::SLLV, sllv);
    set(f::SRLV, srlv);
    set(f::SRAV, srav);
    set(f::JR, jr);
    set(f::JALR, jalr);
    set(f::SYSCALL, syscall);
    set(f::BREAK, brk);
    set(f::SYNC, sync);
    set(f::MFHI, mfhi);
    set(f::MTHI, mthi);
    set(f::MFLO, mflo);
    set(f::MTLO, mtlo);
    set(f::DSLLV, dsllv);
    set(f::DSRLV, dsrlv);
    set(f::DSRAV, dsrav);
    set(f::MULT, mult);
    set(f::MULTU, multu);
    set(f::DIV, div);
    set(f::DIVU, divu);
    set(f::DMULT, dmult);
    set(f::DMULTU, dmultu);
    set(f::DDIV, ddiv);
    set(f::DDIVU, ddivu);
    set(f::ADD, add);
    set(f::ADDU, addu);
    set(f::SUB, sub);
    set(f::SUBU, subu);
    set(f::AND, and);
    set(f::OR, or);
    set(f::XOR, xor);
    set(f::NOR, nor);
    set(f::SLT, slt_);
    set(f::SLTU, sltu_);
    set(f::DADD, dadd);
    set(f::DADDU, daddu);
    set(f::DSUB, dsub);
    set(f::DSUBU, dsubu);
    set(f::TGE, tge);
    set(f::TGEU, tgeu);
    set(f::TLT, tlt);
    set(f::TLTU, tltu);
    set(f::TEQ, teq);
    set(f::TNE, tne);
    set(f::DSLL, dsll);
    set(f::DSRL, dsrl);
    set(f::DSRA, dsra);
    set(f::DSLL32, dsll32);
    set(f::DSRL32, dsrl32);
    set(f::DSRA32, dsra32);
    t
}

#[inline(always)]
fn rs(cpu: &Cpu, word: u32) -> u64 {
    cpu.regs.read(word.rs())
}

#[inline(always)]
fn rt(cpu: &Cpu, word: u32) -> u64 {
    cpu.regs.read(word.rt())
}

/// Writes `op(rs, rt)` to `rd`.
#[inline(always)]
fn rrr(cpu: &mut Cpu, word: u32, op: impl FnOnce(u64, u64) -> u64) -> Result<(), Fault> {
    let v = op(rs(cpu, word), rt(cpu, word));
    cpu.regs.write(word.rd(), v);
    Ok(())
}

/// Writes `op(rs, rt)` to `rd`, or raises overflow.
#[inline(always)]
fn rrr_checked(
    cpu: &mut Cpu,
    word: u32,
    op: impl FnOnce(u64, u64) -> Option<u64>,
) -> Result<(), Fault> {
    let v = op(rs(cpu, word), rt(cpu, word)).ok_or(Trap::Overflow)?;
    cpu.regs.write(word.rd(), v);
    Ok(())
}

/// Writes `op(rt, sa)` to `rd`.
#[inline(always)]
fn shift_imm(cpu: &mut Cpu, word: u32, extra: u32, op: fn(u64, u32) -> u64) -> Result<(), Fault> {
    let v = op(rt(cpu, word), word.sa() + extra);
    cpu.regs.write(word.rd(), v);
    Ok(())
}

/// Writes `op(rt, rs)` to `rd`.
#[inline(always)]
fn shift_var(cpu: &mut Cpu, word: u32, op: fn(u64, u32) -> u64) -> Result<(), Fault> {
    let v = op(rt(cpu, word), rs(cpu, word) as u32);
    cpu.regs.write(word.rd(), v);
    Ok(())
}

#[inline(always)]
fn hilo(cpu: &mut Cpu, word: u32, op: fn(u64, u64) -> HiLo) -> Result<(), Fault> {
    let r = op(rs(cpu, word), rt(cpu, word));
    cpu.regs.hi = r.hi;
    cpu.regs.lo = r.lo;
    Ok(())
}

#[inline(always)]
fn trap_if(cpu: &Cpu, word: u32, cond: TrapCond) -> Result<(), Fault> {
    if cond.holds(rs(cpu, word), rt(cpu, word)) {
        return Err(Trap::TrapInstruction.into());
    }
    Ok(())
}

fn sll(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_imm(cpu, word, 0, shifts::sll)
}

fn srl(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_imm(cpu, word, 0, shifts::srl)
}

fn sra(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_imm(cpu, word, 0, shifts::sra)
}

fn sllv(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_var(cpu, word, shifts::sll)
}

fn srlv(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_var(cpu, word, shifts::srl)
}

fn srav(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_var(cpu, word, shifts::sra)
}

fn dsllv(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_var(cpu, word, shifts::dsll)
}

fn dsrlv(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_var(cpu, word, shifts::dsrl)
}

fn dsrav(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_var(cpu, word, shifts::dsra)
}

fn dsll(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_imm(cpu, word, 0, shifts::dsll)
}

fn dsrl(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_imm(cpu, word, 0, shifts::dsrl)
}

fn dsra(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_imm(cpu, word, 0, shifts::dsra)
}

fn dsll32(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_imm(cpu, word, 32, shifts::dsll)
}

fn dsrl32(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_imm(cpu, word, 32, shifts::dsrl)
}

fn dsra32(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    shift_imm(cpu, word, 32, shifts::dsra)
}

fn jr(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.set_branch(rs(cpu, word));
    Ok(())
}

fn jalr(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let target = rs(cpu, word);
    cpu.link(word.rd());
    cpu.set_branch(target);
    Ok(())
}

fn syscall(_cpu: &mut Cpu, _word: u32) -> Result<(), Fault> {
    Err(Trap::Syscall.into())
}

fn brk(_cpu: &mut Cpu, _word: u32) -> Result<(), Fault> {
    Err(Trap::Breakpoint.into())
}

fn sync(_cpu: &mut Cpu, _word: u32) -> Result<(), Fault> {
    Ok(())
}

fn mfhi(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.regs.write(word.rd(), cpu.regs.hi);
    Ok(())
}

fn mthi(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.regs.hi = rs(cpu, word);
    Ok(())
}

fn mflo(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.regs.write(word.rd(), cpu.regs.lo);
    Ok(())
}

fn mtlo(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.regs.lo = rs(cpu, word);
    Ok(())
}

fn mult(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    hilo(cpu, word, arith::mult)
}

fn multu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    hilo(cpu, word, arith::multu)
}

fn div(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    hilo(cpu, word, arith::div)
}

fn divu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    hilo(cpu, word, arith::divu)
}

fn dmult(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    hilo(cpu, word, arith::dmult)
}

fn dmultu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    hilo(cpu, word, arith::dmultu)
}

fn ddiv(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    hilo(cpu, word, arith::ddiv)
}

fn ddivu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    hilo(cpu, word, arith::ddivu)
}

fn add(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr_checked(cpu, word, add32)
}

fn addu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr(cpu, word, |a, b| sx32(a.wrapping_add(b)))
}

fn sub(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr_checked(cpu, word, sub32)
}

fn subu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr(cpu, word, |a, b| sx32(a.wrapping_sub(b)))
}

fn and(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr(cpu, word, |a, b| a & b)
}

fn or(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr(cpu, word, |a, b| a | b)
}

fn xor(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr(cpu, word, |a, b| a ^ b)
}

fn nor(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr(cpu, word, |a, b| !(a | b))
}

fn slt_(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr(cpu, word, slt)
}

fn sltu_(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr(cpu, word, sltu)
}

fn dadd(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr_checked(cpu, word, add64)
}

fn daddu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr(cpu, word, u64::wrapping_add)
}

fn dsub(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr_checked(cpu, word, sub64)
}

fn dsubu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    rrr(cpu, word, u64::wrapping_sub)
}

fn tge(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    trap_if(cpu, word, TrapCond::Ge)
}

fn tgeu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    trap_if(cpu, word, TrapCond::Geu)
}

fn tlt(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    trap_if(cpu, word, TrapCond::Lt)
}

fn tltu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    trap_if(cpu, word, TrapCond::Ltu)
}

fn teq(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    trap_if(cpu, word, TrapCond::Eq)
}

fn tne(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    trap_if(cpu, word, TrapCond::Ne)
}
