//! Execution units and functional components.
//!
//! This module contains the stateless or self-contained units the interpreter
//! and the recompiled fragments share: the integer ALU, the event scheduler,
//! the FPU engine, the partial-word load/store helpers, and the MMU.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Delta-encoded event scheduler.
pub mod events;

/// Floating-Point Unit for IEEE 754 operations.
pub mod fpu;

/// Load/Store Unit helpers for partial-word accesses.
pub mod lsu;

/// Memory Management Unit with the joint TLB.
pub mod mmu;
