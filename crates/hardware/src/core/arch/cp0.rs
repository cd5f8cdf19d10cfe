//! System Control Coprocessor (COP0) register definitions and storage.
//!
//! This module implements the COP0 register bank of the VR4300. It provides:
//! 1. **Register Indices:** Constants for all 32 COP0 register numbers.
//! 2. **Field Masks:** Bitmasks for Status, Cause, and the TLB-related registers.
//! 3. **Register Storage:** The `ControlRegisters` struct holding raw architectural values.
//! 4. **Access Logic:** Masked writes, read-only registers, and the reserved-index fallback.
//!
//! Side effects of writes (timer rescheduling, interrupt recomputation, FPU mode changes)
//! are applied by the CPU on top of this bank; see `core::cpu::cp0`.

/// TLB index register.
pub const INDEX: usize = 0;
/// TLB random index (read-only, derived from Count and Wired).
pub const RANDOM: usize = 1;
/// Even-page TLB entry low half.
pub const ENTRY_LO0: usize = 2;
/// Odd-page TLB entry low half.
pub const ENTRY_LO1: usize = 3;
/// Page table context (PTEBase + BadVPN2).
pub const CONTEXT: usize = 4;
/// TLB page mask.
pub const PAGE_MASK: usize = 5;
/// Number of wired TLB entries.
pub const WIRED: usize = 6;
/// Last faulting virtual address (read-only).
pub const BAD_VADDR: usize = 8;
/// Cycle counter.
pub const COUNT: usize = 9;
/// TLB entry high half (VPN2, region, ASID).
pub const ENTRY_HI: usize = 10;
/// Timer compare value.
pub const COMPARE: usize = 11;
/// Processor status.
pub const STATUS: usize = 12;
/// Exception cause.
pub const CAUSE: usize = 13;
/// Exception return address.
pub const EPC: usize = 14;
/// Processor revision identifier (read-only).
pub const PRID: usize = 15;
/// Configuration register.
pub const CONFIG: usize = 16;
/// Load-linked physical address.
pub const LL_ADDR: usize = 17;
/// Watchpoint address low.
pub const WATCH_LO: usize = 18;
/// Watchpoint address high.
pub const WATCH_HI: usize = 19;
/// 64-bit page table context.
pub const XCONTEXT: usize = 20;
/// Cache parity error.
pub const PARITY_ERROR: usize = 26;
/// Cache error (read-only).
pub const CACHE_ERR: usize = 27;
/// Cache tag low.
pub const TAG_LO: usize = 28;
/// Cache tag high.
pub const TAG_HI: usize = 29;
/// Error exception return address.
pub const ERROR_EPC: usize = 30;

/// Indices with no architectural register; reads return the last value written to one of them.
pub const RESERVED: [usize; 7] = [7, 21, 22, 23, 24, 25, 31];

/// Global interrupt enable.
pub const STATUS_IE: u64 = 1 << 0;
/// Exception level.
pub const STATUS_EXL: u64 = 1 << 1;
/// Error level.
pub const STATUS_ERL: u64 = 1 << 2;
/// Interrupt mask field (bits 15:8).
pub const STATUS_IM: u64 = 0xFF << 8;
/// Bootstrap exception vectors.
pub const STATUS_BEV: u64 = 1 << 22;
/// Floating-point register width (set = 32 x 64-bit).
pub const STATUS_FR: u64 = 1 << 26;
/// Coprocessor 0 usable.
pub const STATUS_CU0: u64 = 1 << 28;
/// Coprocessor 1 usable.
pub const STATUS_CU1: u64 = 1 << 29;
/// Coprocessor 2 usable.
pub const STATUS_CU2: u64 = 1 << 30;

/// Exception taken in a branch delay slot.
pub const CAUSE_BD: u64 = 1 << 31;
/// Coprocessor number field shift (bits 29:28).
pub const CAUSE_CE_SHIFT: u64 = 28;
/// Coprocessor number field mask.
pub const CAUSE_CE: u64 = 3 << CAUSE_CE_SHIFT;
/// Pending interrupt field (bits 15:8).
pub const CAUSE_IP: u64 = 0xFF << 8;
/// External interrupt line (RCP) pending.
pub const CAUSE_IP2: u64 = 1 << 10;
/// Timer interrupt pending.
pub const CAUSE_IP7: u64 = 1 << 15;
/// Exception code field shift (bits 6:2).
pub const CAUSE_EXC_SHIFT: u64 = 2;
/// Exception code field mask.
pub const CAUSE_EXC: u64 = 0x1F << CAUSE_EXC_SHIFT;

/// Index.P, set by `TLBP` when no entry matched.
pub const INDEX_PROBE_FAIL: u64 = 1 << 31;

/// Processor revision of the VR4300.
pub const PRID_VALUE: u64 = 0x0B22;

/// How a write to a given COP0 index is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteKind {
    /// Only the bits of the mask change.
    Masked(u64),
    /// Hardware-owned register; the write is dropped.
    ReadOnly,
    /// Reserved index; stored raw and latched as the reserved-read value.
    Reserved,
}

/// Returns the write behavior of a COP0 register.
pub const fn write_kind(idx: usize) -> WriteKind {
    match idx {
        INDEX | WIRED => WriteKind::Masked(0x3F),
        ENTRY_LO0 | ENTRY_LO1 => WriteKind::Masked(0x3FFF_FFFF),
        CONTEXT => WriteKind::Masked(0xFFFF_FFFF_FF80_0000),
        PAGE_MASK => WriteKind::Masked(0x01FF_E000),
        COUNT | COMPARE | LL_ADDR => WriteKind::Masked(0xFFFF_FFFF),
        ENTRY_HI => WriteKind::Masked(0xC000_00FF_FFFF_E0FF),
        STATUS => WriteKind::Masked(0xFF57_FFFF),
        CAUSE => WriteKind::Masked(0x300),
        EPC | ERROR_EPC => WriteKind::Masked(u64::MAX),
        CONFIG => WriteKind::Masked(0x0F00_800F),
        WATCH_LO => WriteKind::Masked(0xFFFF_FFFB),
        WATCH_HI => WriteKind::Masked(0xF),
        XCONTEXT => WriteKind::Masked(0xFFFF_FFFE_0000_0000),
        PARITY_ERROR => WriteKind::Masked(0xFF),
        TAG_LO => WriteKind::Masked(0x0FFF_FFC0),
        TAG_HI => WriteKind::Masked(0),
        RANDOM | BAD_VADDR | PRID | CACHE_ERR => WriteKind::ReadOnly,
        _ => WriteKind::Reserved,
    }
}

/// Register numbers are five bits wide; wider indices wrap.
#[inline(always)]
const fn slot(idx: usize) -> usize {
    idx & 31
}

/// Raw COP0 register storage.
///
/// `Random` is stored but never read from here; the CPU derives it from Count.
#[derive(Clone, Debug)]
pub struct ControlRegisters {
    regs: [u64; 32],
    reserved_latch: u64,
}

impl ControlRegisters {
    /// Creates a bank in its reset state.
    ///
    /// # Arguments
    ///
    /// * `status` - Initial Status value.
    /// * `config` - Initial Config value.
    pub const fn new(status: u64, config: u64) -> Self {
        let mut regs = [0u64; 32];
        regs[STATUS] = status;
        regs[CONFIG] = config;
        regs[PRID] = PRID_VALUE;
        regs[RANDOM] = 31;
        Self {
            regs,
            reserved_latch: 0,
        }
    }

    /// Reads a register as stored; reserved indices return the latched fallback.
    #[inline(always)]
    pub const fn get(&self, idx: usize) -> u64 {
        let idx = slot(idx);
        match write_kind(idx) {
            WriteKind::Reserved => self.reserved_latch,
            _ => self.regs[idx],
        }
    }

    /// Stores a value bypassing the write mask. Used for hardware-driven updates.
    #[inline(always)]
    pub const fn set_raw(&mut self, idx: usize, val: u64) {
        self.regs[slot(idx)] = val;
    }

    /// Sets bits in a register without masking.
    #[inline(always)]
    pub const fn set_bits(&mut self, idx: usize, bits: u64) {
        self.regs[slot(idx)] |= bits;
    }

    /// Clears bits in a register without masking.
    #[inline(always)]
    pub const fn clear_bits(&mut self, idx: usize, bits: u64) {
        self.regs[slot(idx)] &= !bits;
    }

    /// Applies a software (`MTC0`/`DMTC0`) write.
    ///
    /// # Arguments
    ///
    /// * `idx` - COP0 register number (0-31).
    /// * `val` - The value written by the instruction.
    ///
    /// # Returns
    ///
    /// `false` if the register is read-only and the write was dropped.
    pub fn write(&mut self, idx: usize, val: u64) -> bool {
        let idx = slot(idx);
        match write_kind(idx) {
            WriteKind::Masked(mask) => {
                self.regs[idx] = (self.regs[idx] & !mask) | (val & mask);
                true
            }
            WriteKind::ReadOnly => false,
            WriteKind::Reserved => {
                self.regs[idx] = val;
                self.reserved_latch = val;
                true
            }
        }
    }

    /// Status register.
    #[inline(always)]
    pub const fn status(&self) -> u64 {
        self.regs[STATUS]
    }

    /// Cause register.
    #[inline(always)]
    pub const fn cause(&self) -> u64 {
        self.regs[CAUSE]
    }

    /// Returns `true` if the interrupt mask in Status enables any pending Cause.IP bit
    /// and interrupts are globally enabled outside exception/error level.
    pub const fn interrupt_pending(&self) -> bool {
        let status = self.status();
        status & STATUS_IE != 0
            && status & (STATUS_EXL | STATUS_ERL) == 0
            && self.cause() & status & CAUSE_IP != 0
    }
}
