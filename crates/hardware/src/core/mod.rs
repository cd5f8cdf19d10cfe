//! Core processor implementation.
//!
//! This module contains the VR4300 CPU: architectural state, the interpreter
//! dispatch tables, the execution units shared with compiled fragments, and the
//! trace-based dynamic recompiler.

/// Architecture-specific components (COP0 bank, register files).
pub mod arch;

/// CPU state, memory access layer, exceptions, and stepping.
pub mod cpu;

/// Trace-based dynamic recompiler.
pub mod dynarec;

/// Interpreter dispatch tables and instruction handlers.
pub mod interp;

/// Execution units (ALU, event scheduler, FPU, LSU helpers, MMU).
pub mod units;

pub use self::cpu::{Cpu, RunExit};
