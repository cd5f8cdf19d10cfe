//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used throughout the core.
//! These types are used for the following:
//! 1. **Fault Generation:** Choosing between load and store flavors of address-error and TLB traps.
//! 2. **Dirty Checking:** Only writes require the TLB dirty bit.
//! 3. **Width Selection:** Sized access helpers for the load/store layer.

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch access. Faults use the load exception codes.
    Fetch,

    /// Data read access.
    Read,

    /// Data write access. Requires the dirty bit in the TLB entry.
    Write,
}

impl AccessType {
    /// Returns `true` for stores.
    #[inline(always)]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

/// Width of a load or store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessWidth {
    /// 8-bit access.
    Byte,
    /// 16-bit access.
    Half,
    /// 32-bit access.
    Word,
    /// 64-bit access.
    Double,
}

impl AccessWidth {
    /// Size of the access in bytes.
    #[inline(always)]
    pub const fn bytes(self) -> u64 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
            Self::Double => 8,
        }
    }

    /// Returns `true` if `addr` is naturally aligned for this width.
    #[inline(always)]
    pub const fn is_aligned(self, addr: u64) -> bool {
        addr & (self.bytes() - 1) == 0
    }
}
