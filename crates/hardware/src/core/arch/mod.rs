//! VR4300 architectural state.
//!
//! This module contains the architecturally visible register files.
//! It includes the following modules:
//! 1. **COP0:** System control register bank with per-register write masks.
//! 2. **FPRs:** Floating-point register file with full/half width views.
//! 3. **GPRs:** General-purpose register file.

/// System control coprocessor register bank.
pub mod cp0;

/// Floating-Point Register file implementation.
pub mod fpr;

/// General-Purpose Register file implementation.
pub mod gpr;
