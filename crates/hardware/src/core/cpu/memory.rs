//! Memory Access Layer.
//!
//! This module provides the interface between the CPU and the memory subsystem.
//! It performs the following:
//! 1. **Alignment:** Misaligned halfword/word/doubleword accesses raise an address error
//!    before any translation or device access happens.
//! 2. **Fast Path:** kseg0 addresses inside RDRAM are served directly with a single range test.
//! 3. **Slow Path:** Everything else is translated by the MMU and routed to RDRAM or the bus.
//! 4. **Masked Stores:** Read-modify-write of selected byte lanes for partial-word stores.

use super::Cpu;
use crate::common::constants::KSEG0_BASE;
use crate::common::{AccessType, AccessWidth, Trap, VirtAddr};
use crate::core::arch::cp0 as regs;

/// Where a resolved physical access lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Ram(u64),
    Bus(u64),
}

impl Target {
    const fn paddr(self) -> u64 {
        match self {
            Self::Ram(a) | Self::Bus(a) => a,
        }
    }
}

impl Cpu {
    /// Resolves a virtual address for an access of the given width.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - The virtual address.
    /// * `width` - Access width; the address must be naturally aligned.
    /// * `access` - Fetch, read, or write.
    ///
    /// # Returns
    ///
    /// The physical target, or the address error / TLB exception raised.
    #[inline]
    fn resolve(&self, vaddr: u64, width: AccessWidth, access: AccessType) -> Result<Target, Trap> {
        if !width.is_aligned(vaddr) {
            return Err(if access.is_write() {
                Trap::AddressErrorStore(vaddr)
            } else {
                Trap::AddressErrorLoad(vaddr)
            });
        }

        let ram_len = self.ram.len() as u64;
        let offset = vaddr.wrapping_sub(KSEG0_BASE);
        if offset < ram_len {
            return Ok(Target::Ram(offset));
        }

        let asid = self.cp0.get(regs::ENTRY_HI) & 0xFF;
        let paddr = self.mmu.translate(VirtAddr::new(vaddr), access, asid)?.val();
        if paddr < ram_len {
            Ok(Target::Ram(paddr))
        } else {
            Ok(Target::Bus(paddr))
        }
    }

    /// Translates `vaddr` for a data access and returns the physical address.
    pub fn translate_data(&self, vaddr: u64, width: AccessWidth, access: AccessType) -> Result<u64, Trap> {
        self.resolve(vaddr, width, access).map(Target::paddr)
    }

    /// Fetches the instruction word at `pc`.
    pub fn fetch(&mut self, pc: u64) -> Result<u32, Trap> {
        match self.resolve(pc, AccessWidth::Word, AccessType::Fetch)? {
            Target::Ram(a) => Ok(self.ram.read_u32(a)),
            Target::Bus(a) => Ok(self.bus.read_u32(a)),
        }
    }

    /// Loads a byte.
    pub fn load_u8(&mut self, vaddr: u64) -> Result<u8, Trap> {
        match self.resolve(vaddr, AccessWidth::Byte, AccessType::Read)? {
            Target::Ram(a) => Ok(self.ram.read_u8(a)),
            Target::Bus(a) => Ok(self.bus.read_u8(a)),
        }
    }

    /// Loads a halfword.
    pub fn load_u16(&mut self, vaddr: u64) -> Result<u16, Trap> {
        match self.resolve(vaddr, AccessWidth::Half, AccessType::Read)? {
            Target::Ram(a) => Ok(self.ram.read_u16(a)),
            Target::Bus(a) => Ok(self.bus.read_u16(a)),
        }
    }

    /// Loads a word.
    pub fn load_u32(&mut self, vaddr: u64) -> Result<u32, Trap> {
        match self.resolve(vaddr, AccessWidth::Word, AccessType::Read)? {
            Target::Ram(a) => Ok(self.ram.read_u32(a)),
            Target::Bus(a) => Ok(self.bus.read_u32(a)),
        }
    }

    /// Loads a doubleword.
    pub fn load_u64(&mut self, vaddr: u64) -> Result<u64, Trap> {
        match self.resolve(vaddr, AccessWidth::Double, AccessType::Read)? {
            Target::Ram(a) => Ok(self.ram.read_u64(a)),
            Target::Bus(a) => Ok(self.bus.read_u64(a)),
        }
    }

    /// Stores a byte.
    pub fn store_u8(&mut self, vaddr: u64, val: u8) -> Result<(), Trap> {
        match self.resolve(vaddr, AccessWidth::Byte, AccessType::Write)? {
            Target::Ram(a) => self.ram.write_u8(a, val),
            Target::Bus(a) => self.bus.write_u8(a, val),
        }
        Ok(())
    }

    /// Stores a halfword.
    pub fn store_u16(&mut self, vaddr: u64, val: u16) -> Result<(), Trap> {
        match self.resolve(vaddr, AccessWidth::Half, AccessType::Write)? {
            Target::Ram(a) => self.ram.write_u16(a, val),
            Target::Bus(a) => self.bus.write_u16(a, val),
        }
        Ok(())
    }

    /// Stores a word.
    pub fn store_u32(&mut self, vaddr: u64, val: u32) -> Result<(), Trap> {
        match self.resolve(vaddr, AccessWidth::Word, AccessType::Write)? {
            Target::Ram(a) => self.ram.write_u32(a, val),
            Target::Bus(a) => self.bus.write_u32(a, val),
        }
        Ok(())
    }

    /// Stores a doubleword.
    pub fn store_u64(&mut self, vaddr: u64, val: u64) -> Result<(), Trap> {
        match self.resolve(vaddr, AccessWidth::Double, AccessType::Write)? {
            Target::Ram(a) => self.ram.write_u64(a, val),
            Target::Bus(a) => self.bus.write_u64(a, val),
        }
        Ok(())
    }

    /// Replaces the bits of the word at `vaddr` selected by `mask` with those of `val`.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - Word-aligned address.
    /// * `val` - Source bits.
    /// * `mask` - Bits to replace.
    pub fn store32_masked(&mut self, vaddr: u64, val: u32, mask: u32) -> Result<(), Trap> {
        match self.resolve(vaddr, AccessWidth::Word, AccessType::Write)? {
            Target::Ram(a) => {
                let old = self.ram.read_u32(a);
                self.ram.write_u32(a, (old & !mask) | (val & mask));
            }
            Target::Bus(a) => {
                let old = self.bus.read_u32(a);
                self.bus.write_u32(a, (old & !mask) | (val & mask));
            }
        }
        Ok(())
    }

    /// Doubleword form of [`Cpu::store32_masked`].
    pub fn store64_masked(&mut self, vaddr: u64, val: u64, mask: u64) -> Result<(), Trap> {
        match self.resolve(vaddr, AccessWidth::Double, AccessType::Write)? {
            Target::Ram(a) => {
                let old = self.ram.read_u64(a);
                self.ram.write_u64(a, (old & !mask) | (val & mask));
            }
            Target::Bus(a) => {
                let old = self.bus.read_u64(a);
                self.bus.write_u64(a, (old & !mask) | (val & mask));
            }
        }
        Ok(())
    }
}

impl Cpu {
    /// Reads a word from RDRAM without side effects, if `vaddr` resolves there.
    ///
    /// Used to inspect code (the idle-loop check) without touching devices.
    pub fn peek_ram_u32(&self, vaddr: u64) -> Option<u32> {
        match self.resolve(vaddr, AccessWidth::Word, AccessType::Fetch) {
            Ok(Target::Ram(a)) => Some(self.ram.read_u32(a)),
            _ => None,
        }
    }
}
