//! Floating-point exception flags and the FCR31 layout.
//!
//! The VR4300 tracks five IEEE exceptions plus the unimplemented-operation
//! cause. FCR31 holds three copies of the IEEE set at different offsets:
//!
//! | Bits  | Field   | Contents                         |
//! |-------|---------|----------------------------------|
//! | 1:0   | RM      | Rounding mode                    |
//! | 6:2   | Flags   | Sticky I, U, O, Z, V             |
//! | 11:7  | Enables | Trap enables I, U, O, Z, V       |
//! | 17:12 | Cause   | Last operation's I, U, O, Z, V, E |
//! | 23    | C       | Compare condition                |
//! | 24    | FS      | Flush denormals                  |

use std::ops::{BitOr, BitOrAssign};

/// Exception set raised by a single floating-point operation.
///
/// Bit positions match the cause field of FCR31 (shifted down to bit 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FpFlags(u8);

impl FpFlags {
    /// No exceptions raised.
    pub const NONE: Self = Self(0);
    /// Inexact.
    pub const NX: Self = Self(1 << 0);
    /// Underflow.
    pub const UF: Self = Self(1 << 1);
    /// Overflow.
    pub const OF: Self = Self(1 << 2);
    /// Divide by Zero.
    pub const DZ: Self = Self(1 << 3);
    /// Invalid Operation.
    pub const NV: Self = Self(1 << 4);
    /// Unimplemented operation (cause only; it has no flag or enable bit).
    pub const E: Self = Self(1 << 5);

    /// Returns the raw 6-bit value.
    pub const fn bits(self) -> u32 {
        self.0 as u32
    }

    /// Returns true if no flags are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every flag of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for FpFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FpFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// FCR0: implementation/revision number read by `CFC1 rt, $0`.
pub const FCR0_VALUE: u32 = 0x0B00;

/// Rounding mode field.
pub const FCR31_RM_MASK: u32 = 0x3;
/// Shift of the sticky flag field.
pub const FCR31_FLAGS_SHIFT: u32 = 2;
/// Shift of the enable field.
pub const FCR31_ENABLES_SHIFT: u32 = 7;
/// Shift of the cause field.
pub const FCR31_CAUSE_SHIFT: u32 = 12;
/// Cause field, including E.
pub const FCR31_CAUSE_MASK: u32 = 0x3F << FCR31_CAUSE_SHIFT;
/// Compare condition bit.
pub const FCR31_COND: u32 = 1 << 23;
/// Flush-denormals bit.
pub const FCR31_FS: u32 = 1 << 24;
/// Bits writable through `CTC1`.
pub const FCR31_WRITE_MASK: u32 = 0x0183_FFFF;

/// Mask of the five IEEE exception bits.
const IEEE_BITS: u32 = 0x1F;

/// The FPU control/status register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fcr31(u32);

impl Fcr31 {
    /// Creates the register from a raw value (masked to the writable bits).
    pub const fn new(raw: u32) -> Self {
        Self(raw & FCR31_WRITE_MASK)
    }

    /// Raw register value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Rounding mode field (0-3).
    pub const fn rm(self) -> u32 {
        self.0 & FCR31_RM_MASK
    }

    /// Compare condition bit.
    pub const fn condition(self) -> bool {
        self.0 & FCR31_COND != 0
    }

    /// Sets or clears the compare condition bit.
    pub const fn set_condition(&mut self, c: bool) {
        if c {
            self.0 |= FCR31_COND;
        } else {
            self.0 &= !FCR31_COND;
        }
    }

    /// Enabled IEEE exceptions; E is always enabled.
    pub const fn enables(self) -> u32 {
        ((self.0 >> FCR31_ENABLES_SHIFT) & IEEE_BITS) | FpFlags::E.bits()
    }

    /// Cause field.
    pub const fn cause(self) -> u32 {
        (self.0 & FCR31_CAUSE_MASK) >> FCR31_CAUSE_SHIFT
    }

    /// Sticky flag field.
    pub const fn flags(self) -> u32 {
        (self.0 >> FCR31_FLAGS_SHIFT) & IEEE_BITS
    }

    /// Returns `true` if a cause bit has its enable set (or E is set).
    pub const fn cause_traps(self) -> bool {
        self.cause() & self.enables() != 0
    }

    /// Records the exceptions of a completed operation.
    ///
    /// The cause field is always replaced. When any raised exception is enabled
    /// (or the operation was unimplemented) the sticky flags are left alone and
    /// `false` is returned: the caller must trap and must not write a result.
    pub const fn record(&mut self, raised: FpFlags) -> bool {
        self.0 = (self.0 & !FCR31_CAUSE_MASK) | (raised.bits() << FCR31_CAUSE_SHIFT);
        if self.cause_traps() {
            return false;
        }
        self.0 |= (raised.bits() & IEEE_BITS) << FCR31_FLAGS_SHIFT;
        true
    }
}
