//! Unified Register File.
//!
//! This module provides the `RegisterFile` struct, which acts as a unified interface for
//! the integer and floating-point register state of the VR4300. It provides:
//! 1. **Unified Storage:** GPRs, the HI/LO multiply-divide pair, and the FPR file.
//! 2. **Abstraction:** A single set of methods for reading and writing register values.
//! 3. **Observability:** Debugging utilities for dumping register state during simulation.

use crate::core::arch::fpr::Fpr;
use crate::core::arch::gpr::Gpr;

/// Unified register file containing general-purpose, HI/LO and floating-point registers.
#[derive(Clone, Debug, Default)]
pub struct RegisterFile {
    gpr: Gpr,
    /// Multiply/divide high result register.
    pub hi: u64,
    /// Multiply/divide low result register.
    pub lo: u64,
    /// COP1 register file.
    pub fpr: Fpr,
}

impl RegisterFile {
    /// Creates a new register file with all registers initialized to zero.
    pub const fn new() -> Self {
        Self {
            gpr: Gpr::new(),
            hi: 0,
            lo: 0,
            fpr: Fpr::new(),
        }
    }

    /// Reads a value from a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Register `r0` always returns 0.
    #[inline(always)]
    pub const fn read(&self, idx: usize) -> u64 {
        self.gpr.read(idx)
    }

    /// Writes a value to a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Writes to `r0` are ignored.
    /// * `val` - The 64-bit value to write.
    #[inline(always)]
    pub const fn write(&mut self, idx: usize, val: u64) {
        self.gpr.write(idx, val);
    }

    /// Writes the sign extension of a 32-bit result to a general-purpose register.
    #[inline(always)]
    pub const fn write_sx32(&mut self, idx: usize, val: u32) {
        self.gpr.write(idx, val as i32 as i64 as u64);
    }

    /// Dumps the contents of all general-purpose registers through `tracing`.
    pub fn dump(&self) {
        self.gpr.dump();
        tracing::debug!(hi = self.hi, lo = self.lo, "multiply/divide registers");
    }
}
