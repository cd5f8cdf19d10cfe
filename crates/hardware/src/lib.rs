//! VR4300 (MIPS III) CPU core library.
//!
//! This crate implements the main processor of a MIPS64 game console with the following:
//! 1. **Core:** GPR/HI/LO/FPR state, COP0, exceptions, branch-delay slots, and the event scheduler.
//! 2. **Memory:** The joint TLB, a direct RDRAM fast path, and a physical bus for devices.
//! 3. **ISA:** Field decoding and six interpreter dispatch tables.
//! 4. **FPU:** Bit-exact COP1 arithmetic, conversions, rounding, and exception flags.
//! 5. **Dynarec:** Hot-trace recording, fragment compilation, and code invalidation.
//! 6. **Simulation:** The `Machine` run loop, configuration, and statistics.

/// Common types and constants (addresses, registers, traps, access types).
pub mod common;
/// Machine configuration (defaults and JSON loading).
pub mod config;
/// CPU core (arch state, interpreter, execution units, recompiler).
pub mod core;
/// Instruction set (field decoding, opcodes, branch targets).
pub mod isa;
/// Machine aggregate and run loop.
pub mod sim;
/// Physical bus, RDRAM, and collaborator traits.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or load it from JSON.
pub use crate::config::Config;
/// Main CPU type; holds registers, COP0, TLB, RDRAM, and dispatch tables.
pub use crate::core::{Cpu, RunExit};
/// Top-level machine; construct with `Machine::new`.
pub use crate::sim::Machine;
