//! TLB Unit Tests.
//!
//! Verifies the 32-entry joint TLB:
//! - Page mask canonicalization
//! - Even/odd page selection and offset pass-through
//! - ASID matching and global entries
//! - Refill, invalid, and modified classification
//! - Probing

use rstest::rstest;
use vrsim_core::common::{AccessType, Trap, VirtAddr};
use vrsim_core::core::units::mmu::Mmu;
use vrsim_core::core::units::mmu::tlb::{Tlb, canonical_page_mask};

// ══════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════

const LO_G: u64 = 1 << 0;
const LO_V: u64 = 1 << 1;
const LO_D: u64 = 1 << 2;

/// EntryLo for physical frame `paddr` with the given flag bits.
const fn lo(paddr: u64, flags: u64) -> u64 {
    ((paddr >> 12) << 6) | flags
}

/// A 4 KiB pair at virtual 0x0001_0000 (ASID 5): even page to 0x20_0000, odd to 0x30_0000.
fn small_pair() -> Tlb {
    let mut tlb = Tlb::new();
    tlb.update(3, 0, 0x0001_0000 | 5, lo(0x20_0000, LO_V | LO_D), lo(0x30_0000, LO_V));
    tlb
}

// ══════════════════════════════════════════════════════════
// 1. Page masks
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0x0000_0000, 0x0000_0000)]
#[case(0x0000_6000, 0x0000_6000)]
#[case(0x0000_4000, 0x0000_6000)]
#[case(0x0001_4000, 0x0001_E000)]
#[case(0x0155_4000, 0x01FF_E000)]
#[case(0xFFFF_FFFF, 0x01FF_E000)]
fn odd_mask_bit_forces_even_partner(#[case] written: u64, #[case] canonical: u64) {
    assert_eq!(canonical_page_mask(written), canonical);
}

#[test]
fn entry_stores_canonical_mask() {
    let mut tlb = Tlb::new();
    tlb.update(0, 0x4000, 0, 0, 0);
    assert_eq!(tlb.entry(0).page_mask, 0x6000);
}

// ══════════════════════════════════════════════════════════
// 2. Translation
// ══════════════════════════════════════════════════════════

#[test]
fn even_and_odd_pages_map_separately() {
    let tlb = small_pair();
    assert_eq!(tlb.translate(0x0001_0123, AccessType::Read, 5), Ok(0x20_0123));
    assert_eq!(tlb.translate(0x0001_1FFC, AccessType::Read, 5), Ok(0x30_0FFC));
}

#[test]
fn large_pages_pass_more_offset_bits() {
    let mut tlb = Tlb::new();
    // 16 KiB pages: the pair covers 32 KiB starting at 0x0010_0000.
    tlb.update(0, 0x6000, 0x0010_0000, lo(0x40_0000, LO_V | LO_G), lo(0x80_0000, LO_V | LO_G));
    assert_eq!(tlb.translate(0x0010_3ABC, AccessType::Read, 0), Ok(0x40_3ABC));
    assert_eq!(tlb.translate(0x0010_4000, AccessType::Read, 0), Ok(0x80_0000));
}

#[test]
fn large_page_offset_is_added_to_an_unaligned_frame() {
    let mut tlb = Tlb::new();
    // 16 KiB pages whose even frame sits on a 4 KiB boundary only.
    tlb.update(0, 0x6000, 0x0010_0000, lo(0x0004_1000, LO_V | LO_G), lo(0x80_0000, LO_V | LO_G));
    assert_eq!(tlb.translate(0x0010_3ABC, AccessType::Read, 0), Ok(0x0004_4ABC));
    assert_eq!(tlb.translate(0x0010_0010, AccessType::Read, 0), Ok(0x0004_1010));
}

#[test]
fn asid_mismatch_is_a_refill() {
    let tlb = small_pair();
    assert_eq!(
        tlb.translate(0x0001_0000, AccessType::Read, 6),
        Err(Trap::TlbRefillLoad(0x0001_0000))
    );
}

#[test]
fn global_entries_ignore_asid() {
    let mut tlb = Tlb::new();
    tlb.update(0, 0, 0x0002_0000 | 9, lo(0x1000, LO_V | LO_G), lo(0x2000, LO_V | LO_G));
    assert_eq!(tlb.translate(0x0002_0010, AccessType::Read, 1), Ok(0x1010));
}

#[test]
fn global_requires_both_halves() {
    let mut tlb = Tlb::new();
    tlb.update(0, 0, 0x0002_0000 | 9, lo(0x1000, LO_V | LO_G), lo(0x2000, LO_V));
    assert!(!tlb.entry(0).global);
    assert_eq!(tlb.entry(0).read_lo0() & LO_G, 0);
}

// ══════════════════════════════════════════════════════════
// 3. Fault classification
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(AccessType::Read, Trap::TlbRefillLoad(0x0040_0000))]
#[case(AccessType::Fetch, Trap::TlbRefillLoad(0x0040_0000))]
#[case(AccessType::Write, Trap::TlbRefillStore(0x0040_0000))]
fn no_match_is_a_refill(#[case] access: AccessType, #[case] expected: Trap) {
    let tlb = small_pair();
    assert_eq!(tlb.translate(0x0040_0000, access, 5), Err(expected));
}

#[test]
fn invalid_half_traps_invalid() {
    let mut tlb = Tlb::new();
    tlb.update(0, 0, 0x0001_0000, lo(0x1000, LO_G), lo(0x2000, LO_G | LO_V));
    assert_eq!(
        tlb.translate(0x0001_0000, AccessType::Read, 0),
        Err(Trap::TlbInvalidLoad(0x0001_0000))
    );
    assert_eq!(
        tlb.translate(0x0001_0004, AccessType::Write, 0),
        Err(Trap::TlbInvalidStore(0x0001_0004))
    );
}

#[test]
fn store_to_clean_page_traps_modified() {
    let tlb = small_pair();
    assert_eq!(
        tlb.translate(0x0001_1000, AccessType::Write, 5),
        Err(Trap::TlbModified(0x0001_1000))
    );
    assert_eq!(tlb.translate(0x0001_0000, AccessType::Write, 5), Ok(0x20_0000));
}

// ══════════════════════════════════════════════════════════
// 4. Probe and the MMU front end
// ══════════════════════════════════════════════════════════

#[test]
fn probe_finds_matching_entry() {
    let tlb = small_pair();
    assert_eq!(tlb.probe(0x0001_0000 | 5), Some(3));
    assert_eq!(tlb.probe(0x0001_0000 | 4), None);
}

#[test]
fn kseg0_and_kseg1_bypass_the_tlb() {
    let mmu = Mmu::new();
    let k0 = mmu.translate(VirtAddr::new(0xFFFF_FFFF_8000_1234), AccessType::Read, 0);
    let k1 = mmu.translate(VirtAddr::new(0xFFFF_FFFF_A000_1234), AccessType::Write, 0);
    assert_eq!(k0.map(|p| p.val()), Ok(0x1234));
    assert_eq!(k1.map(|p| p.val()), Ok(0x1234));
}

#[test]
fn kuseg_goes_through_the_tlb() {
    let mmu = Mmu::new();
    let r = mmu.translate(VirtAddr::new(0x0040_0000), AccessType::Read, 0);
    assert_eq!(r, Err(Trap::TlbRefillLoad(0x0040_0000)));
}
