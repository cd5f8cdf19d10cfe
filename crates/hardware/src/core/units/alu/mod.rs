//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer datapath operations used by the interpreter.
//! It handles arithmetic, comparisons, and shifts for both 32-bit and 64-bit
//! operands, plus the HI/LO multiply/divide unit.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: overflow-checked add/sub and the multiply/divide family
//! - [`logic`]:      signed/unsigned set-on-less-than and trap conditions
//! - [`shifts`]:     32-bit and 64-bit logical/arithmetic shifts
//!
//! All 32-bit results are sign-extended from bit 31 to 64 bits.

/// Integer arithmetic operations (add, subtract, multiply, divide).
pub mod arithmetic;

/// Comparison operations (slt, sltu, trap conditions).
pub mod logic;

/// Shift operations (sll, srl, sra and their doubleword forms).
pub mod shifts;

/// Sign-extends the low 32 bits of `v` to 64 bits.
#[inline(always)]
pub const fn sx32(v: u64) -> u64 {
    v as i32 as i64 as u64
}
