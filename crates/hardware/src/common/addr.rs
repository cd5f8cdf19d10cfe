//! Physical and Virtual Address types.
//!
//! This module defines strong types for physical and virtual addresses to prevent
//! accidental mixing of address spaces. It provides the following:
//! 1. **Type Safety:** Distinguishes between virtual and physical address spaces at compile time.
//! 2. **Segment Decoding:** Classifies 32-bit compatibility addresses into kuseg/kseg0/kseg1/ksseg/kseg3.
//! 3. **MMU Integration:** Acts as the primary interface for memory translation operations.

use super::constants::{KSEG0_BASE, KSEG1_BASE, KSEG_UNMAPPED_MASK};

/// A virtual address as produced by the CPU (64-bit, normally a sign-extended 32-bit value).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub u64);

/// A physical address on the system bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub u64);

/// Kernel-mode address segments of the 32-bit compatibility address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    /// `0x0000_0000..0x8000_0000`, TLB mapped.
    Kuseg,
    /// `0x8000_0000..0xA000_0000`, unmapped, cached.
    Kseg0,
    /// `0xA000_0000..0xC000_0000`, unmapped, uncached.
    Kseg1,
    /// `0xC000_0000..0xE000_0000`, TLB mapped.
    Ksseg,
    /// `0xE000_0000..`, TLB mapped.
    Kseg3,
}

impl Segment {
    /// Returns `true` if addresses in this segment go through the TLB.
    #[inline]
    pub const fn is_mapped(self) -> bool {
        matches!(self, Self::Kuseg | Self::Ksseg | Self::Kseg3)
    }
}

impl VirtAddr {
    /// Creates a new virtual address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Returns the low 32 bits used for segment decoding.
    #[inline(always)]
    pub const fn compat(&self) -> u32 {
        self.0 as u32
    }

    /// Classifies the address into its kernel segment.
    #[inline]
    pub const fn segment(&self) -> Segment {
        match self.compat() >> 29 {
            0..=3 => Segment::Kuseg,
            4 => Segment::Kseg0,
            5 => Segment::Kseg1,
            6 => Segment::Ksseg,
            _ => Segment::Kseg3,
        }
    }

    /// Returns the physical address for an unmapped (kseg0/kseg1) address.
    ///
    /// # Returns
    ///
    /// `Some(PhysAddr)` for kseg0 and kseg1, `None` for TLB-mapped segments.
    #[inline]
    pub const fn unmapped_phys(&self) -> Option<PhysAddr> {
        match self.segment() {
            Segment::Kseg0 | Segment::Kseg1 => {
                Some(PhysAddr((self.compat() & KSEG_UNMAPPED_MASK) as u64))
            }
            _ => None,
        }
    }

    /// Returns the other unmapped view of the same physical line (kseg0 <-> kseg1).
    pub const fn unmapped_alias(&self) -> Option<Self> {
        match self.segment() {
            Segment::Kseg0 => Some(Self(self.0.wrapping_add(KSEG1_BASE - KSEG0_BASE))),
            Segment::Kseg1 => Some(Self(self.0.wrapping_sub(KSEG1_BASE - KSEG0_BASE))),
            _ => None,
        }
    }
}

impl PhysAddr {
    /// Creates a new physical address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }
}
