//! MIPS General-Purpose Register File.
//!
//! This module implements the General-Purpose Register (GPR) file of the VR4300.
//! It performs the following:
//! 1. **Storage:** Maintains 32 64-bit integer registers (`r0`-`r31`).
//! 2. **Invariant Enforcement:** Ensures that register `r0` is hardwired to zero.
//! 3. **Debugging:** Provides utilities for dumping the complete register state.

use std::fmt;

/// Conventional MIPS register names, indexed by register number.
pub const GPR_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp", "fp",
    "ra",
];

/// General-Purpose Register file.
///
/// Contains 32 general-purpose registers used for integer operations. Register `r0`
/// is hardwired to zero and cannot be modified.
#[derive(Clone, Default)]
pub struct Gpr {
    regs: [u64; 32],
}

impl Gpr {
    /// Creates a new general-purpose register file with all registers initialized to zero.
    ///
    /// # Returns
    ///
    /// A new `Gpr` instance with all registers set to 0.
    pub const fn new() -> Self {
        Self { regs: [0; 32] }
    }

    /// Reads a general-purpose register value.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    ///
    /// # Returns
    ///
    /// The 64-bit value stored in the specified register. Register `r0` always returns 0.
    #[inline(always)]
    pub const fn read(&self, idx: usize) -> u64 {
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes a value to a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    /// * `val` - The 64-bit value to write.
    #[inline(always)]
    pub const fn write(&mut self, idx: usize, val: u64) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Emits the contents of all general-purpose registers at `debug` level.
    pub fn dump(&self) {
        tracing::debug!("\n{self}");
    }
}

impl fmt::Display for Gpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..32).step_by(2) {
            writeln!(
                f,
                "{:>4}={:#018x} {:>4}={:#018x}",
                GPR_NAMES[i],
                self.read(i),
                GPR_NAMES[i + 1],
                self.read(i + 1)
            )?;
        }
        Ok(())
    }
}

impl fmt::Debug for Gpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gpr").field("regs", &self.regs).finish()
    }
}
