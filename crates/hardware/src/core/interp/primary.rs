//! Primary opcode handlers.
//!
//! Immediate arithmetic, branches and jumps, and every load/store. Memory handlers
//! complete the access (which may fault) before writing any register.

use super::{OpHandler, RA, reserved, unimplemented};
use crate::common::{AccessType, AccessWidth, Fault, Trap};
use crate::core::Cpu;
use crate::core::arch::cp0 as regs;
use crate::core::units::alu::arithmetic::{add32, add64};
use crate::core::units::alu::logic::{slt, sltu};
use crate::core::units::alu::sx32;
use crate::core::units::lsu::unaligned;
use crate::isa::decode::jump_target;
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::primary as op;

/// Builds the 64-entry primary table.
pub fn table() -> Vec<OpHandler> {
    let mut t: Vec<OpHandler> = vec![reserved; 64];
    let mut set = |opcode: u32, h: OpHandler| t[opcode as usize] = h;

    set(op::SPECIAL, special);
    set(op::REGIMM, regimm);
    set(op::J, j);
    set(op::JAL, jal);
    set(op::BEQ, beq);
    set(op::BNE, bne);
    set(op::BLEZ, blez);
    set(op::BGTZ, bgtz);
    set(op::ADDI, addi);
    set(op::ADDIU, addiu);
    set(op::SLTI, slti);
    set(op::SLTIU, sltiu);
    set(op::ANDI, andi);
    set(op::ORI, ori);
    set(op::XORI, xori);
    set(op::LUI, lui);
    set(op::COP0, cop0);
    set(op::COP1, super::cop1::dispatch);
    set(op::COP2, cop2);
    set(op::BEQL, beql);
    set(op::BNEL, bnel);
    set(op::BLEZL, blezl);
    set(op::BGTZL, bgtzl);
    set(op::DADDI, daddi);
    set(op::DADDIU, daddiu);
    set(op::LDL, ldl);
    set(op::LDR, ldr);
    set(op::LB, lb);
    set(op::LH, lh);
    set(op::LWL, lwl);
    set(op::LW, lw);
    set(op::LBU, lbu);
    set(op::LHU, lhu);
    set(op::LWR, lwr);
    set(op::LWU, lwu);
    set(op::SB, sb);
    set(op::SH, sh);
    set(op::SWL, swl);
    set(op::SW, sw);
    set(op::SDL, sdl);
    set(op::SDR, sdr);
    set(op::SWR, swr);
    set(op::CACHE, cache);
    set(op::LL, ll);
    set(op::LWC1, super::cop1::lwc1);
    set(op::LWC2, unimplemented);
    set(op::LLD, lld);
    set(op::LDC1, super::cop1::ldc1);
    set(op::LDC2, unimplemented);
    set(op::LD, ld);
    set(op::SC, sc);
    set(op::SWC1, super::cop1::swc1);
    set(op::SWC2, unimplemented);
    set(op::SCD, scd);
    set(op::SDC1, super::cop1::sdc1);
    set(op::SDC2, unimplemented);
    set(op::SD, sd);
    t
}

/// Effective address `rs + simm`.
#[inline(always)]
fn ea(cpu: &Cpu, word: u32) -> u64 {
    cpu.regs.read(word.rs()).wrapping_add(word.simm())
}

fn special(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    (cpu.dispatch.special[word.funct() as usize])(cpu, word)
}

fn regimm(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    (cpu.dispatch.regimm[word.rt()])(cpu, word)
}

fn cop0(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    (cpu.dispatch.cop0[word.rs()])(cpu, word)
}

fn cop2(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    (cpu.dispatch.cop2[word.rs()])(cpu, word)
}

fn j(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.set_branch(jump_target(cpu.pc, word));
    Ok(())
}

fn jal(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.link(RA);
    cpu.set_branch(jump_target(cpu.pc, word));
    Ok(())
}

fn beq(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let taken = cpu.regs.read(word.rs()) == cpu.regs.read(word.rt());
    cpu.branch(taken, word);
    Ok(())
}

fn bne(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let taken = cpu.regs.read(word.rs()) != cpu.regs.read(word.rt());
    cpu.branch(taken, word);
    Ok(())
}

fn blez(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.branch(cpu.regs.read(word.rs()) as i64 <= 0, word);
    Ok(())
}

fn bgtz(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.branch(cpu.regs.read(word.rs()) as i64 > 0, word);
    Ok(())
}

fn beql(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let taken = cpu.regs.read(word.rs()) == cpu.regs.read(word.rt());
    cpu.branch_likely(taken, word);
    Ok(())
}

fn bnel(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let taken = cpu.regs.read(word.rs()) != cpu.regs.read(word.rt());
    cpu.branch_likely(taken, word);
    Ok(())
}

fn blezl(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.branch_likely(cpu.regs.read(word.rs()) as i64 <= 0, word);
    Ok(())
}

fn bgtzl(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.branch_likely(cpu.regs.read(word.rs()) as i64 > 0, word);
    Ok(())
}

fn addi(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = add32(cpu.regs.read(word.rs()), word.simm()).ok_or(Trap::Overflow)?;
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn addiu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = sx32(cpu.regs.read(word.rs()).wrapping_add(word.simm()));
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn slti(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = slt(cpu.regs.read(word.rs()), word.simm());
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn sltiu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = sltu(cpu.regs.read(word.rs()), word.simm());
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn andi(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.regs.write(word.rt(), cpu.regs.read(word.rs()) & word.imm());
    Ok(())
}

fn ori(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.regs.write(word.rt(), cpu.regs.read(word.rs()) | word.imm());
    Ok(())
}

fn xori(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.regs.write(word.rt(), cpu.regs.read(word.rs()) ^ word.imm());
    Ok(())
}

fn lui(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    cpu.regs.write(word.rt(), sx32(word.imm() << 16));
    Ok(())
}

fn daddi(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = add64(cpu.regs.read(word.rs()), word.simm()).ok_or(Trap::Overflow)?;
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn daddiu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.regs.read(word.rs()).wrapping_add(word.simm());
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn lb(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.load_u8(ea(cpu, word))?;
    cpu.regs.write(word.rt(), v as i8 as i64 as u64);
    Ok(())
}

fn lbu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.load_u8(ea(cpu, word))?;
    cpu.regs.write(word.rt(), v as u64);
    Ok(())
}

fn lh(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.load_u16(ea(cpu, word))?;
    cpu.regs.write(word.rt(), v as i16 as i64 as u64);
    Ok(())
}

fn lhu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.load_u16(ea(cpu, word))?;
    cpu.regs.write(word.rt(), v as u64);
    Ok(())
}

fn lw(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.load_u32(ea(cpu, word))?;
    cpu.regs.write_sx32(word.rt(), v);
    Ok(())
}

fn lwu(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.load_u32(ea(cpu, word))?;
    cpu.regs.write(word.rt(), v as u64);
    Ok(())
}

fn ld(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.load_u64(ea(cpu, word))?;
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn lwl(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let addr = ea(cpu, word);
    let mem = cpu.load_u32(addr & !3)?;
    let v = unaligned::lwl(cpu.regs.read(word.rt()), mem, addr);
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn lwr(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let addr = ea(cpu, word);
    let mem = cpu.load_u32(addr & !3)?;
    let v = unaligned::lwr(cpu.regs.read(word.rt()), mem, addr);
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn ldl(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let addr = ea(cpu, word);
    let mem = cpu.load_u64(addr & !7)?;
    let v = unaligned::ldl(cpu.regs.read(word.rt()), mem, addr);
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn ldr(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let addr = ea(cpu, word);
    let mem = cpu.load_u64(addr & !7)?;
    let v = unaligned::ldr(cpu.regs.read(word.rt()), mem, addr);
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn sb(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.regs.read(word.rt()) as u8;
    cpu.store_u8(ea(cpu, word), v)?;
    Ok(())
}

fn sh(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.regs.read(word.rt()) as u16;
    cpu.store_u16(ea(cpu, word), v)?;
    Ok(())
}

fn sw(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.regs.read(word.rt()) as u32;
    cpu.store_u32(ea(cpu, word), v)?;
    Ok(())
}

fn sd(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.regs.read(word.rt());
    cpu.store_u64(ea(cpu, word), v)?;
    Ok(())
}

fn swl(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let s = unaligned::swl(cpu.regs.read(word.rt()), ea(cpu, word));
    cpu.store32_masked(s.addr, s.value as u32, s.mask as u32)?;
    Ok(())
}

fn swr(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let s = unaligned::swr(cpu.regs.read(word.rt()), ea(cpu, word));
    cpu.store32_masked(s.addr, s.value as u32, s.mask as u32)?;
    Ok(())
}

fn sdl(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let s = unaligned::sdl(cpu.regs.read(word.rt()), ea(cpu, word));
    cpu.store64_masked(s.addr, s.value, s.mask)?;
    Ok(())
}

fn sdr(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let s = unaligned::sdr(cpu.regs.read(word.rt()), ea(cpu, word));
    cpu.store64_masked(s.addr, s.value, s.mask)?;
    Ok(())
}

fn ll(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let addr = ea(cpu, word);
    let paddr = cpu.translate_data(addr, AccessWidth::Word, AccessType::Read)?;
    let v = cpu.load_u32(addr)?;
    cpu.regs.write_sx32(word.rt(), v);
    cpu.ll_bit = true;
    cpu.cp0.set_raw(regs::LL_ADDR, paddr >> 4);
    Ok(())
}

fn lld(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let addr = ea(cpu, word);
    let paddr = cpu.translate_data(addr, AccessWidth::Double, AccessType::Read)?;
    let v = cpu.load_u64(addr)?;
    cpu.regs.write(word.rt(), v);
    cpu.ll_bit = true;
    cpu.cp0.set_raw(regs::LL_ADDR, paddr >> 4);
    Ok(())
}

fn sc(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let addr = ea(cpu, word);
    let ok = cpu.ll_bit;
    if ok {
        cpu.store_u32(addr, cpu.regs.read(word.rt()) as u32)?;
    } else {
        let _ = cpu.translate_data(addr, AccessWidth::Word, AccessType::Write)?;
    }
    cpu.regs.write(word.rt(), ok as u64);
    Ok(())
}

fn scd(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let addr = ea(cpu, word);
    let ok = cpu.ll_bit;
    if ok {
        cpu.store_u64(addr, cpu.regs.read(word.rt()))?;
    } else {
        let _ = cpu.translate_data(addr, AccessWidth::Double, AccessType::Write)?;
    }
    cpu.regs.write(word.rt(), ok as u64);
    Ok(())
}

/// `CACHE`: only instruction-cache operations have a visible effect, which is
/// to drop any compiled code for the line.
fn cache(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    const ICACHE: usize = 0;
    if word.rt() & 3 == ICACHE {
        let addr = ea(cpu, word);
        cpu.invalidate_code(addr, crate::common::constants::ICACHE_LINE_SIZE);
    }
    Ok(())
}
