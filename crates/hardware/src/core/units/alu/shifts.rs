//! ALU shift operations.
//!
//! 32-bit shifts use the low 5 bits of the amount and sign-extend the 32-bit
//! result; doubleword shifts use the low 6 bits.

use super::sx32;

/// Shift amount mask for 32-bit shifts.
const SHAMT_MASK_32: u32 = 0x1F;

/// Shift amount mask for 64-bit shifts.
const SHAMT_MASK_64: u32 = 0x3F;

/// `SLL`/`SLLV`.
#[inline(always)]
pub const fn sll(v: u64, sa: u32) -> u64 {
    sx32(((v as u32) << (sa & SHAMT_MASK_32)) as u64)
}

/// `SRL`/`SRLV`: shifts the low word in zeros from bit 31.
#[inline(always)]
pub const fn srl(v: u64, sa: u32) -> u64 {
    sx32(((v as u32) >> (sa & SHAMT_MASK_32)) as u64)
}

/// `SRA`/`SRAV`.
///
/// The shift is performed on the full 64-bit register and the low word of the
/// result is sign-extended, so bits above 31 of the source reach the result.
#[inline(always)]
pub const fn sra(v: u64, sa: u32) -> u64 {
    sx32(((v as i64) >> (sa & SHAMT_MASK_32)) as u64)
}

/// `DSLL`/`DSLLV`/`DSLL32`.
#[inline(always)]
pub const fn dsll(v: u64, sa: u32) -> u64 {
    v << (sa & SHAMT_MASK_64)
}

/// `DSRL`/`DSRLV`/`DSRL32`.
#[inline(always)]
pub const fn dsrl(v: u64, sa: u32) -> u64 {
    v >> (sa & SHAMT_MASK_64)
}

/// `DSRA`/`DSRAV`/`DSRA32`.
#[inline(always)]
pub const fn dsra(v: u64, sa: u32) -> u64 {
    ((v as i64) >> (sa & SHAMT_MASK_64)) as u64
}
