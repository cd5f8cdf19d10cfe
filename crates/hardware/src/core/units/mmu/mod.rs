//! Memory Management Unit (MMU).
//!
//! This module implements virtual-to-physical address translation for the
//! 32-bit compatibility address space. kseg0 and kseg1 are unmapped windows
//! onto the low 512 MiB of physical memory; every other segment goes through
//! the TLB.

/// Translation Lookaside Buffer.
pub mod tlb;

use crate::common::{AccessType, PhysAddr, Trap, VirtAddr};

use self::tlb::Tlb;

/// Memory Management Unit for virtual-to-physical address translation.
#[derive(Clone, Debug, Default)]
pub struct Mmu {
    /// The joint instruction/data TLB.
    pub tlb: Tlb,
}

impl Mmu {
    /// Creates an MMU with an empty TLB.
    pub fn new() -> Self {
        Self { tlb: Tlb::new() }
    }

    /// Translates a virtual address to a physical address.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - Virtual address to translate
    /// * `access` - Type of memory access (Fetch, Read, Write)
    /// * `asid` - Current address space identifier
    ///
    /// # Returns
    ///
    /// The physical address, or the TLB exception raised by a mapped segment.
    #[inline]
    pub fn translate(&self, vaddr: VirtAddr, access: AccessType, asid: u64) -> Result<PhysAddr, Trap> {
        if let Some(paddr) = vaddr.unmapped_phys() {
            return Ok(paddr);
        }
        self.tlb.translate(vaddr.val(), access, asid).map(PhysAddr::new)
    }
}
