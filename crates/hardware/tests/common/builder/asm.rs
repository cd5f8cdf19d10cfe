//! MIPS III instruction encoders.
//!
//! Register arguments are plain register numbers; immediates and branch offsets
//! are given as the signed values the assembler would accept (branch offsets in
//! instructions, relative to the delay slot).

use vrsim_core::isa::opcodes::{cop, fpu, primary as op, regimm, special as sp};

/// `ra`.
pub const RA: u32 = 31;

/// Encodes an I-type instruction.
pub const fn itype(opcode: u32, rs: u32, rt: u32, imm: i16) -> u32 {
    (opcode << 26) | (rs << 21) | (rt << 16) | (imm as u16 as u32)
}

/// Encodes a SPECIAL R-type instruction.
pub const fn rtype(rs: u32, rt: u32, rd: u32, sa: u32, funct: u32) -> u32 {
    (rs << 21) | (rt << 16) | (rd << 11) | (sa << 6) | funct
}

/// Encodes a coprocessor instruction.
pub const fn copz(z: u32, sub: u32, rt: u32, rd: u32, low: u32) -> u32 {
    ((op::COP0 + z) << 26) | (sub << 21) | (rt << 16) | (rd << 11) | low
}

/// Encodes a COP1 arithmetic instruction.
pub const fn fp(fmt: u32, ft: u32, fs: u32, fd: u32, funct: u32) -> u32 {
    (op::COP1 << 26) | (fmt << 21) | (ft << 16) | (fs << 11) | (fd << 6) | funct
}

pub const fn nop() -> u32 {
    0
}

// --- Immediate arithmetic ---

pub const fn addi(rt: u32, rs: u32, imm: i16) -> u32 {
    itype(op::ADDI, rs, rt, imm)
}
pub const fn addiu(rt: u32, rs: u32, imm: i16) -> u32 {
    itype(op::ADDIU, rs, rt, imm)
}
pub const fn daddiu(rt: u32, rs: u32, imm: i16) -> u32 {
    itype(op::DADDIU, rs, rt, imm)
}
pub const fn slti(rt: u32, rs: u32, imm: i16) -> u32 {
    itype(op::SLTI, rs, rt, imm)
}
pub const fn andi(rt: u32, rs: u32, imm: u16) -> u32 {
    itype(op::ANDI, rs, rt, imm as i16)
}
pub const fn ori(rt: u32, rs: u32, imm: u16) -> u32 {
    itype(op::ORI, rs, rt, imm as i16)
}
pub const fn xori(rt: u32, rs: u32, imm: u16) -> u32 {
    itype(op::XORI, rs, rt, imm as i16)
}
pub const fn lui(rt: u32, imm: u16) -> u32 {
    itype(op::LUI, 0, rt, imm as i16)
}

// --- Register arithmetic ---

pub const fn add(rd: u32, rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, rd, 0, sp::ADD)
}
pub const fn addu(rd: u32, rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, rd, 0, sp::ADDU)
}
pub const fn subu(rd: u32, rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, rd, 0, sp::SUBU)
}
pub const fn daddu(rd: u32, rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, rd, 0, sp::DADDU)
}
pub const fn and(rd: u32, rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, rd, 0, sp::AND)
}
pub const fn or(rd: u32, rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, rd, 0, sp::OR)
}
pub const fn xor(rd: u32, rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, rd, 0, sp::XOR)
}
pub const fn nor(rd: u32, rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, rd, 0, sp::NOR)
}
pub const fn slt(rd: u32, rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, rd, 0, sp::SLT)
}
pub const fn sltu(rd: u32, rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, rd, 0, sp::SLTU)
}
pub const fn sll(rd: u32, rt: u32, sa: u32) -> u32 {
    rtype(0, rt, rd, sa, sp::SLL)
}
pub const fn srl(rd: u32, rt: u32, sa: u32) -> u32 {
    rtype(0, rt, rd, sa, sp::SRL)
}
pub const fn sra(rd: u32, rt: u32, sa: u32) -> u32 {
    rtype(0, rt, rd, sa, sp::SRA)
}
pub const fn dsll32(rd: u32, rt: u32, sa: u32) -> u32 {
    rtype(0, rt, rd, sa, sp::DSLL32)
}
pub const fn mult(rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, 0, 0, sp::MULT)
}
pub const fn div(rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, 0, 0, sp::DIV)
}
pub const fn mfhi(rd: u32) -> u32 {
    rtype(0, 0, rd, 0, sp::MFHI)
}
pub const fn mflo(rd: u32) -> u32 {
    rtype(0, 0, rd, 0, sp::MFLO)
}
pub const fn teq(rs: u32, rt: u32) -> u32 {
    rtype(rs, rt, 0, 0, sp::TEQ)
}
pub const fn syscall() -> u32 {
    sp::SYSCALL
}

// --- Branches and jumps ---

pub const fn beq(rs: u32, rt: u32, offset: i16) -> u32 {
    itype(op::BEQ, rs, rt, offset)
}
pub const fn bne(rs: u32, rt: u32, offset: i16) -> u32 {
    itype(op::BNE, rs, rt, offset)
}
pub const fn beql(rs: u32, rt: u32, offset: i16) -> u32 {
    itype(op::BEQL, rs, rt, offset)
}
pub const fn bnel(rs: u32, rt: u32, offset: i16) -> u32 {
    itype(op::BNEL, rs, rt, offset)
}
pub const fn bgezal(rs: u32, offset: i16) -> u32 {
    itype(op::REGIMM, rs, regimm::BGEZAL, offset)
}
/// `J` to the 256 MiB-region address `target`.
pub const fn j(target: u64) -> u32 {
    (op::J << 26) | ((target >> 2) as u32 & 0x03FF_FFFF)
}
pub const fn jal(target: u64) -> u32 {
    (op::JAL << 26) | ((target >> 2) as u32 & 0x03FF_FFFF)
}
pub const fn jr(rs: u32) -> u32 {
    rtype(rs, 0, 0, 0, sp::JR)
}

// --- Loads and stores ---

pub const fn lw(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::LW, base, rt, offset)
}
pub const fn lwu(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::LWU, base, rt, offset)
}
pub const fn lb(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::LB, base, rt, offset)
}
pub const fn lbu(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::LBU, base, rt, offset)
}
pub const fn ld(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::LD, base, rt, offset)
}
pub const fn lwl(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::LWL, base, rt, offset)
}
pub const fn lwr(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::LWR, base, rt, offset)
}
pub const fn sw(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::SW, base, rt, offset)
}
pub const fn sb(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::SB, base, rt, offset)
}
pub const fn sd(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::SD, base, rt, offset)
}
pub const fn ll(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::LL, base, rt, offset)
}
pub const fn sc(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::SC, base, rt, offset)
}
/// `CACHE` with operation field `cache_op`.
pub const fn cache(cache_op: u32, base: u32, offset: i16) -> u32 {
    itype(op::CACHE, base, cache_op, offset)
}

// --- COP0 ---

pub const fn mtc0(rt: u32, rd: u32) -> u32 {
    copz(0, cop::MT, rt, rd, 0)
}
pub const fn mfc0(rt: u32, rd: u32) -> u32 {
    copz(0, cop::MF, rt, rd, 0)
}
pub const fn tlbwi() -> u32 {
    copz(0, cop::CO, 0, 0, cop::TLBWI)
}
pub const fn tlbp() -> u32 {
    copz(0, cop::CO, 0, 0, cop::TLBP)
}
pub const fn tlbr() -> u32 {
    copz(0, cop::CO, 0, 0, cop::TLBR)
}
pub const fn eret() -> u32 {
    copz(0, cop::CO, 0, 0, cop::ERET)
}

// --- COP1 ---

pub const fn mtc1(rt: u32, fs: u32) -> u32 {
    copz(1, cop::MT, rt, fs, 0)
}
pub const fn mfc1(rt: u32, fs: u32) -> u32 {
    copz(1, cop::MF, rt, fs, 0)
}
pub const fn dmtc1(rt: u32, fs: u32) -> u32 {
    copz(1, cop::DMT, rt, fs, 0)
}
pub const fn ctc1(rt: u32, fs: u32) -> u32 {
    copz(1, cop::CT, rt, fs, 0)
}
pub const fn cfc1(rt: u32, fs: u32) -> u32 {
    copz(1, cop::CF, rt, fs, 0)
}
pub const fn lwc1(ft: u32, base: u32, offset: i16) -> u32 {
    itype(op::LWC1, base, ft, offset)
}
pub const fn bc1t(offset: i16) -> u32 {
    copz(1, cop::BC, 1, 0, 0) | (offset as u16 as u32)
}
pub const fn bc1f(offset: i16) -> u32 {
    copz(1, cop::BC, 0, 0, 0) | (offset as u16 as u32)
}
pub const fn add_s(fd: u32, fs: u32, ft: u32) -> u32 {
    fp(fpu::FMT_S, ft, fs, fd, fpu::ADD)
}
pub const fn div_s(fd: u32, fs: u32, ft: u32) -> u32 {
    fp(fpu::FMT_S, ft, fs, fd, fpu::DIV)
}
pub const fn add_d(fd: u32, fs: u32, ft: u32) -> u32 {
    fp(fpu::FMT_D, ft, fs, fd, fpu::ADD)
}
pub const fn mul_d(fd: u32, fs: u32, ft: u32) -> u32 {
    fp(fpu::FMT_D, ft, fs, fd, fpu::MUL)
}
pub const fn cvt_s_w(fd: u32, fs: u32) -> u32 {
    fp(fpu::FMT_W, 0, fs, fd, fpu::CVT_S)
}
pub const fn cvt_d_s(fd: u32, fs: u32) -> u32 {
    fp(fpu::FMT_S, 0, fs, fd, fpu::CVT_D)
}
pub const fn round_w_s(fd: u32, fs: u32) -> u32 {
    fp(fpu::FMT_S, 0, fs, fd, fpu::ROUND_W)
}
pub const fn trunc_w_s(fd: u32, fs: u32) -> u32 {
    fp(fpu::FMT_S, 0, fs, fd, fpu::TRUNC_W)
}
pub const fn floor_w_s(fd: u32, fs: u32) -> u32 {
    fp(fpu::FMT_S, 0, fs, fd, fpu::FLOOR_W)
}
/// `C.cond.S`, condition in the low 4 bits.
pub const fn c_s(cond: u32, fs: u32, ft: u32) -> u32 {
    fp(fpu::FMT_S, ft, fs, 0, fpu::C_BASE | cond)
}

// --- Encodings outside the implemented set ---

/// A reserved primary opcode (0x1C).
pub const fn reserved() -> u32 {
    0x1C << 26
}

/// `LWC2`: defined by the architecture, not implemented by this core.
pub const fn lwc2(rt: u32, base: u32, offset: i16) -> u32 {
    itype(op::LWC2, base, rt, offset)
}
