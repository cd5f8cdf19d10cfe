//! MIPS Floating-Point Register File.
//!
//! This module implements the COP1 register file. It performs the following:
//! 1. **Storage:** Maintains 32 64-bit storage slots.
//! 2. **Width Modes:** With Status.FR set every register is an independent 64-bit slot;
//!    with FR clear, the 32 single-precision registers pair up into 16 doubles.
//! 3. **Access Control:** Raw-bit single and double views used by the FPU and the move instructions.

/// Floating-Point Register file.
///
/// In half-width mode (Status.FR = 0) an even single register lives in the low word
/// of its even slot and an odd single register in the high word of the same slot;
/// doubles always use the even slot.
#[derive(Clone, Debug, Default)]
pub struct Fpr {
    slots: [u64; 32],
    full_width: bool,
}

impl Fpr {
    /// Creates a new floating-point register file in half-width mode, all slots zero.
    pub const fn new() -> Self {
        Self {
            slots: [0; 32],
            full_width: false,
        }
    }

    /// Returns `true` when the file is in 32 x 64-bit mode.
    #[inline(always)]
    pub const fn full_width(&self) -> bool {
        self.full_width
    }

    /// Selects the register view; the underlying storage is left untouched.
    pub const fn set_full_width(&mut self, full: bool) {
        self.full_width = full;
    }

    /// Reads a single-precision register as raw bits.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    ///
    /// # Returns
    ///
    /// The 32-bit IEEE 754 representation in the selected view.
    #[inline]
    pub const fn read_s(&self, idx: usize) -> u32 {
        if self.full_width {
            self.slots[idx] as u32
        } else if idx & 1 == 0 {
            self.slots[idx] as u32
        } else {
            (self.slots[idx & !1] >> 32) as u32
        }
    }

    /// Writes a single-precision register from raw bits.
    ///
    /// In full-width mode the upper half of the slot is preserved.
    #[inline]
    pub const fn write_s(&mut self, idx: usize, val: u32) {
        let (slot, shift) = if self.full_width || idx & 1 == 0 {
            (idx, 0)
        } else {
            (idx & !1, 32)
        };
        let mask = 0xFFFF_FFFFu64 << shift;
        self.slots[slot] = (self.slots[slot] & !mask) | ((val as u64) << shift);
    }

    /// Reads a double-precision register as raw bits.
    #[inline]
    pub const fn read_d(&self, idx: usize) -> u64 {
        if self.full_width {
            self.slots[idx]
        } else {
            self.slots[idx & !1]
        }
    }

    /// Writes a double-precision register from raw bits.
    #[inline]
    pub const fn write_d(&mut self, idx: usize, val: u64) {
        if self.full_width {
            self.slots[idx] = val;
        } else {
            self.slots[idx & !1] = val;
        }
    }
}
