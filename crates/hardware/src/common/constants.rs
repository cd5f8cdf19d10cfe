//! Global System Constants.
//!
//! This module defines system-wide constants used across the core. It includes:
//! 1. **Address Space:** Segment bases and the unmapped-segment physical mask.
//! 2. **Exception Vectors:** Normal and bootstrap (BEV) vector addresses.
//! 3. **Structure Sizes:** TLB entry count, instruction size, and cache-line granularity.

/// Size of a MIPS instruction in bytes.
pub const INSTRUCTION_SIZE: u64 = 4;

/// Encoding of `SLL r0, r0, 0`, the canonical NOP.
pub const NOP: u32 = 0;

/// Sign-extended base of kseg0 (unmapped, cached).
pub const KSEG0_BASE: u64 = 0xFFFF_FFFF_8000_0000;

/// Sign-extended base of kseg1 (unmapped, uncached).
pub const KSEG1_BASE: u64 = 0xFFFF_FFFF_A000_0000;

/// Mask applied to a kseg0/kseg1 address to obtain its physical address.
pub const KSEG_UNMAPPED_MASK: u32 = 0x1FFF_FFFF;

/// Address execution starts from after a cold reset.
pub const RESET_VECTOR: u64 = 0xFFFF_FFFF_BFC0_0000;

/// TLB refill vector used when Status.EXL is clear.
pub const TLB_REFILL_VECTOR: u64 = 0xFFFF_FFFF_8000_0000;

/// General exception vector (also the refill vector when Status.EXL is set).
pub const GENERAL_EXCEPTION_VECTOR: u64 = 0xFFFF_FFFF_8000_0180;

/// TLB refill vector while Status.BEV is set.
pub const BOOT_TLB_REFILL_VECTOR: u64 = 0xFFFF_FFFF_BFC0_0200;

/// General exception vector while Status.BEV is set.
pub const BOOT_GENERAL_EXCEPTION_VECTOR: u64 = 0xFFFF_FFFF_BFC0_0380;

/// Number of TLB entries.
pub const TLB_ENTRIES: usize = 32;

/// Instruction cache line size; code invalidation works at this granularity.
pub const ICACHE_LINE_SIZE: u64 = 32;

/// Cycles between two Count == Compare matches when nothing is rewritten.
pub const COMPARE_PERIOD: i64 = 1 << 32;
