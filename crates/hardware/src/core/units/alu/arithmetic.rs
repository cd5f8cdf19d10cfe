//! ALU arithmetic operations.
//!
//! Implements overflow-checked addition and subtraction and the multiply/divide
//! unit. The trapping forms return `None` on signed overflow so the caller can
//! raise the exception before committing anything.
//!
//! 32-bit multiply and divide results are written to HI and LO sign-extended
//! from bit 31.

use super::sx32;

/// Signed 32-bit addition; `None` on overflow. The result is sign-extended.
#[inline]
pub const fn add32(a: u64, b: u64) -> Option<u64> {
    match (a as i32).checked_add(b as i32) {
        Some(v) => Some(v as i64 as u64),
        None => None,
    }
}

/// Signed 32-bit subtraction; `None` on overflow.
#[inline]
pub const fn sub32(a: u64, b: u64) -> Option<u64> {
    match (a as i32).checked_sub(b as i32) {
        Some(v) => Some(v as i64 as u64),
        None => None,
    }
}

/// Signed 64-bit addition; `None` on overflow.
#[inline]
pub const fn add64(a: u64, b: u64) -> Option<u64> {
    match (a as i64).checked_add(b as i64) {
        Some(v) => Some(v as u64),
        None => None,
    }
}

/// Signed 64-bit subtraction; `None` on overflow.
#[inline]
pub const fn sub64(a: u64, b: u64) -> Option<u64> {
    match (a as i64).checked_sub(b as i64) {
        Some(v) => Some(v as u64),
        None => None,
    }
}

/// Result of a multiply or divide, as written to the HI/LO pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HiLo {
    /// High half of a product, or the remainder.
    pub hi: u64,
    /// Low half of a product, or the quotient.
    pub lo: u64,
}

/// `MULT`: signed 32 x 32 -> 64.
pub const fn mult(a: u64, b: u64) -> HiLo {
    let p = (a as i32 as i64).wrapping_mul(b as i32 as i64) as u64;
    HiLo {
        hi: sx32(p >> 32),
        lo: sx32(p),
    }
}

/// `MULTU`: unsigned 32 x 32 -> 64.
pub const fn multu(a: u64, b: u64) -> HiLo {
    let p = (a as u32 as u64) * (b as u32 as u64);
    HiLo {
        hi: sx32(p >> 32),
        lo: sx32(p),
    }
}

/// `DMULT`: signed 64 x 64 -> 128.
pub const fn dmult(a: u64, b: u64) -> HiLo {
    let p = (a as i64 as i128).wrapping_mul(b as i64 as i128) as u128;
    HiLo {
        hi: (p >> 64) as u64,
        lo: p as u64,
    }
}

/// `DMULTU`: unsigned 64 x 64 -> 128.
pub const fn dmultu(a: u64, b: u64) -> HiLo {
    let p = (a as u128) * (b as u128);
    HiLo {
        hi: (p >> 64) as u64,
        lo: p as u64,
    }
}

/// `DIV`: signed 32-bit division.
///
/// Division by zero leaves the dividend in HI and -1 (or +1 for a negative
/// dividend) in LO. `i32::MIN / -1` yields LO = `i32::MIN`, HI = 0.
pub const fn div(a: u64, b: u64) -> HiLo {
    let n = a as i32;
    let d = b as i32;
    if d == 0 {
        let q: i32 = if n < 0 { 1 } else { -1 };
        return HiLo {
            hi: n as i64 as u64,
            lo: q as i64 as u64,
        };
    }
    HiLo {
        hi: n.wrapping_rem(d) as i64 as u64,
        lo: n.wrapping_div(d) as i64 as u64,
    }
}

/// `DIVU`: unsigned 32-bit division. Division by zero yields LO = -1, HI = dividend.
pub const fn divu(a: u64, b: u64) -> HiLo {
    let n = a as u32;
    let d = b as u32;
    if d == 0 {
        return HiLo {
            hi: n as i32 as i64 as u64,
            lo: u64::MAX,
        };
    }
    HiLo {
        hi: (n % d) as i32 as i64 as u64,
        lo: (n / d) as i32 as i64 as u64,
    }
}

/// `DDIV`: signed 64-bit division with the same zero and overflow rules as [`div`].
pub const fn ddiv(a: u64, b: u64) -> HiLo {
    let n = a as i64;
    let d = b as i64;
    if d == 0 {
        let q: i64 = if n < 0 { 1 } else { -1 };
        return HiLo {
            hi: n as u64,
            lo: q as u64,
        };
    }
    HiLo {
        hi: n.wrapping_rem(d) as u64,
        lo: n.wrapping_div(d) as u64,
    }
}

/// `DDIVU`: unsigned 64-bit division.
pub const fn ddivu(a: u64, b: u64) -> HiLo {
    if b == 0 {
        return HiLo {
            hi: a,
            lo: u64::MAX,
        };
    }
    HiLo {
        hi: a % b,
        lo: a / b,
    }
}
