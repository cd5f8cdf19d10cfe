//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains opcode tables, field extraction, and target computation for the
//! MIPS III instruction set implemented by the VR4300.

/// Branch and jump target computation.
pub mod decode;

/// Instruction field extraction.
pub mod instruction;

/// Opcode constants for every dispatch table.
pub mod opcodes;
