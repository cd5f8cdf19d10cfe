//! Collaborator traits.
//!
//! This module defines the interfaces through which the CPU core reaches the rest
//! of the console. It provides:
//! 1. **Devices:** The `Device` trait for memory-mapped components on the physical bus.
//! 2. **Vector Unit:** The co-scheduled RSP, stepped once per CPU cycle.
//! 3. **Interrupts:** The RCP interrupt line feeding Cause.IP2.
//! 4. **Breakpoints:** The registry consulted before each fetched address executes.
//!
//! Default no-op implementations are provided so a machine can run with only RDRAM.

use std::collections::{BTreeSet, HashSet};

/// Trait for memory-mapped I/O devices attached to the physical bus.
///
/// Offsets are device-relative. Multi-byte values use the console's big-endian
/// byte order.
pub trait Device {
    /// Returns a short name for this device (e.g., `"PI"`, `"SP_DMEM"`).
    fn name(&self) -> &str;
    /// Returns (base_address, size_in_bytes) for this device's region.
    fn address_range(&self) -> (u64, u64);
    /// Reads one byte at the given device-relative offset.
    fn read_u8(&mut self, offset: u64) -> u8;
    /// Reads two bytes at the given offset.
    fn read_u16(&mut self, offset: u64) -> u16;
    /// Reads four bytes at the given offset.
    fn read_u32(&mut self, offset: u64) -> u32;
    /// Reads eight bytes at the given offset.
    fn read_u64(&mut self, offset: u64) -> u64;
    /// Writes one byte at the given offset.
    fn write_u8(&mut self, offset: u64, val: u8);
    /// Writes two bytes at the given offset.
    fn write_u16(&mut self, offset: u64, val: u16);
    /// Writes four bytes at the given offset.
    fn write_u32(&mut self, offset: u64, val: u32);
    /// Writes eight bytes at the given offset.
    fn write_u64(&mut self, offset: u64, val: u64);
}

/// The vector coprocessor, interleaved with the CPU one step per CPU cycle.
pub trait VectorUnit {
    /// Advances the vector unit by one step.
    fn step(&mut self);
}

/// The external interrupt controller (the RCP MIPS interface).
pub trait InterruptController {
    /// Returns `true` while any unmasked interrupt source is asserted.
    fn pending(&self) -> bool;
}

/// Addresses at which execution must stop before the instruction runs.
pub trait BreakpointRegistry {
    /// Returns `true` if `pc` carries a breakpoint.
    fn contains(&self, pc: u64) -> bool;

    /// Returns `true` if any breakpoint lies in `[start, end)`.
    fn any_in(&self, start: u64, end: u64) -> bool;
}

/// Vector unit that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdleVectorUnit;

impl VectorUnit for IdleVectorUnit {
    fn step(&mut self) {}
}

/// Interrupt controller with no sources.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInterrupts;

impl InterruptController for NoInterrupts {
    fn pending(&self) -> bool {
        false
    }
}

impl BreakpointRegistry for HashSet<u64> {
    fn contains(&self, pc: u64) -> bool {
        HashSet::contains(self, &pc)
    }

    fn any_in(&self, start: u64, end: u64) -> bool {
        self.iter().any(|&a| a >= start && a < end)
    }
}

impl BreakpointRegistry for BTreeSet<u64> {
    fn contains(&self, pc: u64) -> bool {
        BTreeSet::contains(self, &pc)
    }

    fn any_in(&self, start: u64, end: u64) -> bool {
        self.range(start..end).next().is_some()
    }
}
