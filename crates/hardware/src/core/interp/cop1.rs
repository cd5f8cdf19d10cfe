//! COP1 (FPU) handlers.
//!
//! The table is indexed by the `rs`/format field. Arithmetic goes through
//! `core::units::fpu`, whose outcome is recorded in FCR31 before the result is
//! written: an exception with its enable set (or an unimplemented operation)
//! traps and leaves the destination untouched.

use super::OpHandler;
use crate::common::{Fault, Trap};
use crate::core::Cpu;
use crate::core::units::fpu::classify::BinOp;
use crate::core::units::fpu::exception_flags::{FCR0_VALUE, Fcr31, FpFlags};
use crate::core::units::fpu::rounding_modes::RoundingMode;
use crate::core::units::fpu::{self, Format, FpOutcome, IntFormat};
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::{cop, fpu as f, primary as op};

/// Primary-table slots replaced by [`unusable`] while Status.CU1 is clear.
pub const GATED: [(u32, OpHandler); 5] = [
    (op::COP1, dispatch),
    (op::LWC1, lwc1),
    (op::LDC1, ldc1),
    (op::SWC1, swc1),
    (op::SDC1, sdc1),
];

/// Builds the 32-entry COP1 table.
pub fn table() -> Vec<OpHandler> {
    let mut t: Vec<OpHandler> = vec![unknown; 32];
    t[cop::MF as usize] = mfc1;
    t[cop::DMF as usize] = dmfc1;
    t[cop::CF as usize] = cfc1;
    t[cop::MT as usize] = mtc1;
    t[cop::DMT as usize] = dmtc1;
    t[cop::CT as usize] = ctc1;
    t[cop::BC as usize] = bc1;
    t[f::FMT_S as usize] = fmt_s;
    t[f::FMT_D as usize] = fmt_d;
    t[f::FMT_W as usize] = fmt_w;
    t[f::FMT_L as usize] = fmt_l;
    t
}

/// Primary-table entry for opcode COP1 while the FPU is usable.
pub fn dispatch(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    (cpu.dispatch.cop1[word.rs()])(cpu, word)
}

/// Primary-table entry for every COP1-gated opcode while Status.CU1 is clear.
pub fn unusable(_cpu: &mut Cpu, _word: u32) -> Result<(), Fault> {
    Err(Trap::CoprocessorUnusable(1).into())
}

/// Unknown format or function: the unimplemented-operation exception.
fn unknown(cpu: &mut Cpu, _word: u32) -> Result<(), Fault> {
    let _ = cpu.fcr31.record(FpFlags::E);
    Err(Trap::FloatingPoint.into())
}

/// Records `out` in FCR31 and returns the bits to write, or the trap.
#[inline]
fn commit(fcr31: &mut Fcr31, out: FpOutcome) -> Result<u64, Fault> {
    if fcr31.record(out.flags) {
        Ok(out.bits)
    } else {
        Err(Trap::FloatingPoint.into())
    }
}

#[inline(always)]
fn current_rounding(cpu: &Cpu) -> RoundingMode {
    RoundingMode::from_bits(cpu.fcr31.rm())
}

#[inline(always)]
fn read_operand(cpu: &Cpu, fmt: Format, reg: usize) -> u64 {
    match fmt {
        Format::S => u64::from(cpu.regs.fpr.read_s(reg)),
        Format::D => cpu.regs.fpr.read_d(reg),
    }
}

pub(super) fn lwc1(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let addr = cpu.regs.read(word.rs()).wrapping_add(word.simm());
    let v = cpu.load_u32(addr)?;
    cpu.regs.fpr.write_s(word.ft(), v);
    Ok(())
}

pub(super) fn ldc1(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let addr = cpu.regs.read(word.rs()).wrapping_add(word.simm());
    let v = cpu.load_u64(addr)?;
    cpu.regs.fpr.write_d(word.ft(), v);
    Ok(())
}

pub(super) fn swc1(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let addr = cpu.regs.read(word.rs()).wrapping_add(word.simm());
    let v = cpu.regs.fpr.read_s(word.ft());
    cpu.store_u32(addr, v)?;
    Ok(())
}

pub(super) fn sdc1(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let addr = cpu.regs.read(word.rs()).wrapping_add(word.simm());
    let v = cpu.regs.fpr.read_d(word.ft());
    cpu.store_u64(addr, v)?;
    Ok(())
}

fn mfc1(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.regs.fpr.read_s(word.fs());
    cpu.regs.write_sx32(word.rt(), v);
    Ok(())
}

fn dmfc1(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.regs.fpr.read_d(word.fs());
    cpu.regs.write(word.rt(), v);
    Ok(())
}

fn cfc1(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = match word.fs() {
        0 => FCR0_VALUE,
        31 => cpu.fcr31.raw(),
        _ => 0,
    };
    cpu.regs.write_sx32(word.rt(), v);
    Ok(())
}

fn mtc1(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.regs.read(word.rt()) as u32;
    cpu.regs.fpr.write_s(word.fs(), v);
    Ok(())
}

fn dmtc1(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let v = cpu.regs.read(word.rt());
    cpu.regs.fpr.write_d(word.fs(), v);
    Ok(())
}

/// `CTC1`: only FCR31 is writable. A written cause bit whose enable is set
/// (or the unimplemented cause) traps after the write.
fn ctc1(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    if word.fs() != 31 {
        return Ok(());
    }
    cpu.fcr31 = Fcr31::new(cpu.regs.read(word.rt()) as u32);
    if cpu.fcr31.cause_traps() {
        return Err(Trap::FloatingPoint.into());
    }
    Ok(())
}

/// `BC1F`/`BC1T`/`BC1FL`/`BC1TL`: bit 16 selects true, bit 17 selects likely.
fn bc1(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let on_true = word & (1 << 16) != 0;
    let likely = word & (1 << 17) != 0;
    let taken = cpu.fcr31.condition() == on_true;
    if likely {
        cpu.branch_likely(taken, word);
    } else {
        cpu.branch(taken, word);
    }
    Ok(())
}

/// Arithmetic operator of function codes 0-3.
const fn binop(funct: u32) -> BinOp {
    match funct {
        f::ADD => BinOp::Add,
        f::SUB => BinOp::Sub,
        f::MUL => BinOp::Mul,
        _ => BinOp::Div,
    }
}

/// Fixed rounding of `ROUND`/`TRUNC`/`CEIL`/`FLOOR`, in that order.
const fn fixed_rounding(funct: u32) -> RoundingMode {
    RoundingMode::from_bits(funct & 3)
}

/// Shared body of the `S` and `D` formats.
fn fmt_float(cpu: &mut Cpu, word: u32, fmt: Format) -> Result<(), Fault> {
    let funct = word.funct();
    let (fs, ft, fd) = (word.fs(), word.ft(), word.fd());
    let a = read_operand(cpu, fmt, fs);
    let rm = current_rounding(cpu);

    let (out, dest) = match funct {
        f::ADD..=f::DIV => {
            let b = read_operand(cpu, fmt, ft);
            let out = match fmt {
                Format::S => fpu::binop_s(binop(funct), a as u32, b as u32, rm),
                Format::D => fpu::binop_d(binop(funct), a, b, rm),
            };
            (out, fmt)
        }
        f::SQRT => (fpu::sqrt(fmt, a, rm), fmt),
        f::ABS => (fpu::abs(fmt, a), fmt),
        f::NEG => (fpu::neg(fmt, a), fmt),
        f::MOV => {
            match fmt {
                Format::S => cpu.regs.fpr.write_s(fd, a as u32),
                Format::D => cpu.regs.fpr.write_d(fd, a),
            }
            return Ok(());
        }
        f::ROUND_L..=f::FLOOR_L => {
            let out = fpu::to_int(fmt, a, IntFormat::L, fixed_rounding(funct));
            let bits = commit(&mut cpu.fcr31, out)?;
            cpu.regs.fpr.write_d(fd, bits);
            return Ok(());
        }
        f::ROUND_W..=f::FLOOR_W => {
            let out = fpu::to_int(fmt, a, IntFormat::W, fixed_rounding(funct));
            let bits = commit(&mut cpu.fcr31, out)?;
            cpu.regs.fpr.write_s(fd, bits as u32);
            return Ok(());
        }
        f::CVT_S if fmt == Format::D => (fpu::cvt_s_from_d(a, rm), Format::S),
        f::CVT_D if fmt == Format::S => (fpu::cvt_d_from_s(a as u32), Format::D),
        f::CVT_W => {
            let bits = commit(&mut cpu.fcr31, fpu::to_int(fmt, a, IntFormat::W, rm))?;
            cpu.regs.fpr.write_s(fd, bits as u32);
            return Ok(());
        }
        f::CVT_L => {
            let bits = commit(&mut cpu.fcr31, fpu::to_int(fmt, a, IntFormat::L, rm))?;
            cpu.regs.fpr.write_d(fd, bits);
            return Ok(());
        }
        c if c >= f::C_BASE => {
            let b = read_operand(cpu, fmt, ft);
            let (cond, flags) = fpu::compare(fmt, a, b, c & 0xF);
            if !cpu.fcr31.record(flags) {
                return Err(Trap::FloatingPoint.into());
            }
            cpu.fcr31.set_condition(cond);
            return Ok(());
        }
        _ => return unknown(cpu, word),
    };

    let bits = commit(&mut cpu.fcr31, out)?;
    match dest {
        Format::S => cpu.regs.fpr.write_s(fd, bits as u32),
        Format::D => cpu.regs.fpr.write_d(fd, bits),
    }
    Ok(())
}

fn fmt_s(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    fmt_float(cpu, word, Format::S)
}

fn fmt_d(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    fmt_float(cpu, word, Format::D)
}

/// `CVT.S.W`/`CVT.D.W`; every other function is unimplemented.
fn fmt_w(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let src = cpu.regs.fpr.read_s(word.fs());
    let rm = current_rounding(cpu);
    match word.funct() {
        f::CVT_S => {
            let bits = commit(&mut cpu.fcr31, fpu::cvt_from_w(Format::S, src, rm))?;
            cpu.regs.fpr.write_s(word.fd(), bits as u32);
        }
        f::CVT_D => {
            let bits = commit(&mut cpu.fcr31, fpu::cvt_from_w(Format::D, src, rm))?;
            cpu.regs.fpr.write_d(word.fd(), bits);
        }
        _ => return unknown(cpu, word),
    }
    Ok(())
}

/// `CVT.S.L`/`CVT.D.L`; every other function is unimplemented.
fn fmt_l(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    let src = cpu.regs.fpr.read_d(word.fs());
    let rm = current_rounding(cpu);
    match word.funct() {
        f::CVT_S => {
            let bits = commit(&mut cpu.fcr31, fpu::cvt_from_l(Format::S, src, rm))?;
            cpu.regs.fpr.write_s(word.fd(), bits as u32);
        }
        f::CVT_D => {
            let bits = commit(&mut cpu.fcr31, fpu::cvt_from_l(Format::D, src, rm))?;
            cpu.regs.fpr.write_d(word.fd(), bits);
        }
        _ => return unknown(cpu, word),
    }
    Ok(())
}
