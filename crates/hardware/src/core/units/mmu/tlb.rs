//! Translation Lookaside Buffer (TLB).
//!
//! The VR4300 TLB is a 32-entry fully associative table. Each entry maps a pair
//! of adjacent virtual pages (even/odd) selected by a variable page mask, tagged
//! with an address-space identifier unless the entry is global.

use crate::common::constants::TLB_ENTRIES;
use crate::common::{AccessType, Trap};

/// Writable page-mask bits (24:13).
const PAGE_MASK_BITS: u64 = 0x01FF_E000;

/// Odd bit of each page-mask pair; a set odd bit forces its even partner.
const PAGE_MASK_ODD: u64 = 0x0155_4000;

/// VPN2 and region bits of EntryHi.
const ENTRY_HI_VPN: u64 = 0xC000_00FF_FFFF_E000;

/// ASID field of EntryHi.
const ASID_MASK: u64 = 0xFF;

/// EntryLo global bit.
const LO_GLOBAL: u64 = 1 << 0;
/// EntryLo valid bit.
const LO_VALID: u64 = 1 << 1;
/// EntryLo dirty (writable) bit.
const LO_DIRTY: u64 = 1 << 2;
/// Writable EntryLo bits (PFN, C, D, V, G).
const LO_MASK: u64 = 0x3FFF_FFFF;

/// Canonicalizes a page mask to the value the hardware reads back.
#[inline]
pub const fn canonical_page_mask(mask: u64) -> u64 {
    (mask | ((mask & PAGE_MASK_ODD) >> 1)) & PAGE_MASK_BITS
}

/// Physical frame base encoded in an EntryLo value.
#[inline]
const fn pfn_base(lo: u64) -> u64 {
    ((lo >> 6) & 0xF_FFFF) << 12
}

/// A single TLB entry with its derived lookup fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TlbEntry {
    /// Canonical page mask.
    pub page_mask: u64,
    /// VPN2, region, and ASID.
    pub entry_hi: u64,
    /// Even page EntryLo (global bit folded into `global`).
    pub entry_lo0: u64,
    /// Odd page EntryLo.
    pub entry_lo1: u64,
    /// Bits of a virtual address compared against `entry_hi`.
    pub vpn_mask: u64,
    /// Bits of a virtual address passed through as page offset.
    pub offset_mask: u64,
    /// Address bit selecting the odd page.
    pub checkbit: u64,
    /// Even page physical base.
    pub pfn_even: u64,
    /// Odd page physical base.
    pub pfn_odd: u64,
    /// Entry ignores the ASID.
    pub global: bool,
}

impl TlbEntry {
    /// Builds an entry from the values held in the COP0 TLB registers.
    pub const fn new(page_mask: u64, entry_hi: u64, entry_lo0: u64, entry_lo1: u64) -> Self {
        let page_mask = canonical_page_mask(page_mask);
        let vpn_mask = !(page_mask | 0x1FFF) & ENTRY_HI_VPN;
        let offset_mask = (page_mask >> 1) | 0xFFF;
        let lo0 = entry_lo0 & LO_MASK;
        let lo1 = entry_lo1 & LO_MASK;
        Self {
            page_mask,
            entry_hi: entry_hi & (vpn_mask | ASID_MASK),
            entry_lo0: lo0,
            entry_lo1: lo1,
            vpn_mask,
            offset_mask,
            checkbit: offset_mask + 1,
            pfn_even: pfn_base(lo0),
            pfn_odd: pfn_base(lo1),
            global: lo0 & lo1 & LO_GLOBAL != 0,
        }
    }

    /// Returns `true` if this entry maps `vaddr` in address space `asid`.
    #[inline]
    pub const fn matches(&self, vaddr: u64, asid: u64) -> bool {
        (vaddr & self.vpn_mask) == (self.entry_hi & self.vpn_mask)
            && (self.global || (self.entry_hi & ASID_MASK) == (asid & ASID_MASK))
    }

    /// EntryLo0 as read back by `TLBR`.
    pub const fn read_lo0(&self) -> u64 {
        (self.entry_lo0 & !LO_GLOBAL) | self.global as u64
    }

    /// EntryLo1 as read back by `TLBR`.
    pub const fn read_lo1(&self) -> u64 {
        (self.entry_lo1 & !LO_GLOBAL) | self.global as u64
    }
}

/// Translation Lookaside Buffer structure.
#[derive(Clone, Debug)]
pub struct Tlb {
    entries: [TlbEntry; TLB_ENTRIES],
}

impl Tlb {
    /// Creates a TLB with all entries zeroed (invalid).
    pub fn new() -> Self {
        let zero = TlbEntry::new(0, 0, 0, 0);
        Self {
            entries: [zero; TLB_ENTRIES],
        }
    }

    /// Writes an entry.
    ///
    /// # Arguments
    ///
    /// * `index` - Entry slot; taken modulo the entry count.
    /// * `page_mask` - PageMask value, canonicalized before storing.
    /// * `entry_hi` - EntryHi (VPN2, region, ASID).
    /// * `entry_lo0` - EntryLo0 (even page).
    /// * `entry_lo1` - EntryLo1 (odd page).
    pub fn update(
        &mut self,
        index: usize,
        page_mask: u64,
        entry_hi: u64,
        entry_lo0: u64,
        entry_lo1: u64,
    ) {
        self.entries[index % TLB_ENTRIES] = TlbEntry::new(page_mask, entry_hi, entry_lo0, entry_lo1);
    }

    /// Returns the entry at `index` (modulo the entry count).
    pub const fn entry(&self, index: usize) -> &TlbEntry {
        &self.entries[index % TLB_ENTRIES]
    }

    /// Finds the entry matching EntryHi's VPN2, region, and ASID.
    ///
    /// # Returns
    ///
    /// The lowest matching index, or `None`.
    pub fn probe(&self, entry_hi: u64) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.matches(entry_hi, entry_hi & ASID_MASK))
    }

    /// Translates a mapped virtual address.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - The virtual address (sign-extended).
    /// * `access` - Kind of access; selects the load/store trap flavor and the dirty check.
    /// * `asid` - Current ASID from EntryHi.
    ///
    /// # Returns
    ///
    /// The physical address, or the TLB refill/invalid/modified trap.
    pub fn translate(&self, vaddr: u64, access: AccessType, asid: u64) -> Result<u64, Trap> {
        let store = access.is_write();
        let Some(e) = self.entries.iter().find(|e| e.matches(vaddr, asid)) else {
            return Err(if store {
                Trap::TlbRefillStore(vaddr)
            } else {
                Trap::TlbRefillLoad(vaddr)
            });
        };

        let (lo, base) = if vaddr & e.checkbit != 0 {
            (e.entry_lo1, e.pfn_odd)
        } else {
            (e.entry_lo0, e.pfn_even)
        };
        if lo & LO_VALID == 0 {
            return Err(if store {
                Trap::TlbInvalidStore(vaddr)
            } else {
                Trap::TlbInvalidLoad(vaddr)
            });
        }
        if store && lo & LO_DIRTY == 0 {
            return Err(Trap::TlbModified(vaddr));
        }
        // The frame base need not be aligned to the page size; the offset is added.
        Ok(base.wrapping_add(vaddr & e.offset_mask))
    }
}

impl Default for Tlb {
    fn default() -> Self {
        Self::new()
    }
}
