//! Instruction builders.

/// MIPS III encoders, one function per mnemonic.
pub mod asm;
