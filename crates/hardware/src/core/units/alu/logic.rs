//! ALU comparison operations.
//!
//! Implements the set-on-less-than family and the conditions evaluated by the
//! trap-on-condition instructions.

/// Trap-on-condition predicates shared by the SPECIAL and REGIMM trap forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrapCond {
    /// Greater or equal, signed.
    Ge,
    /// Greater or equal, unsigned.
    Geu,
    /// Less than, signed.
    Lt,
    /// Less than, unsigned.
    Ltu,
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
}

impl TrapCond {
    /// Evaluates the condition on two 64-bit operands.
    pub const fn holds(self, a: u64, b: u64) -> bool {
        match self {
            Self::Ge => (a as i64) >= (b as i64),
            Self::Geu => a >= b,
            Self::Lt => (a as i64) < (b as i64),
            Self::Ltu => a < b,
            Self::Eq => a == b,
            Self::Ne => a != b,
        }
    }
}

/// Signed set-on-less-than.
#[inline(always)]
pub const fn slt(a: u64, b: u64) -> u64 {
    ((a as i64) < (b as i64)) as u64
}

/// Unsigned set-on-less-than.
#[inline(always)]
pub const fn sltu(a: u64, b: u64) -> u64 {
    (a < b) as u64
}
