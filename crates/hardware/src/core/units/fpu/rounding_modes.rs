//! Floating-point rounding mode support.
//!
//! The FCR31 RM field encodes four modes:
//!
//! | Value | Mode | Description                          |
//! |-------|------|--------------------------------------|
//! | 0b00  | RN   | Round to Nearest, ties to Even       |
//! | 0b01  | RZ   | Round towards Zero                   |
//! | 0b10  | RP   | Round Up (towards +inf)              |
//! | 0b11  | RM   | Round Down (towards -inf)            |
//!
//! Host arithmetic always rounds to nearest; the directed modes are applied
//! afterwards from the sign of the exact rounding error.

use std::cmp::Ordering;

/// MIPS rounding mode encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RoundingMode {
    /// Round to Nearest, ties to Even.
    Rne = 0b00,
    /// Round towards Zero.
    Rtz = 0b01,
    /// Round Up (towards +inf).
    Rup = 0b10,
    /// Round Down (towards -inf).
    Rdn = 0b11,
}

impl RoundingMode {
    /// Decodes the 2-bit RM field.
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0b00 => Self::Rne,
            0b01 => Self::Rtz,
            0b10 => Self::Rup,
            _ => Self::Rdn,
        }
    }

    /// Rounds `x` to an integral value in this mode.
    ///
    /// Round-to-nearest uses [`round_half_even`], not the host's
    /// round-half-away-from-zero.
    pub fn round_integral(self, x: f64) -> f64 {
        match self {
            Self::Rne => round_half_even(x),
            Self::Rtz => x.trunc(),
            Self::Rup => x.ceil(),
            Self::Rdn => x.floor(),
        }
    }
}

/// Rounds to the nearest integer, breaking exact `.5` ties toward the even neighbour.
///
/// `2.5 -> 2`, `3.5 -> 4`, `-2.5 -> -2`.
pub fn round_half_even(x: f64) -> f64 {
    let floor = x.floor();
    let diff = x - floor;
    match diff.partial_cmp(&0.5) {
        Some(Ordering::Less) => floor,
        Some(Ordering::Greater) => floor + 1.0,
        _ => {
            if (floor / 2.0).fract() == 0.0 {
                floor
            } else {
                floor + 1.0
            }
        }
    }
}

/// Sign of an exact rounding error: -1, 0, or 1.
#[inline]
pub fn error_sign(err: f64) -> i8 {
    if err > 0.0 {
        1
    } else if err < 0.0 {
        -1
    } else {
        0
    }
}

/// Next representable `f64` toward +inf.
pub fn next_up_f64(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    f64::from_bits(if x > 0.0 { bits + 1 } else { bits - 1 })
}

/// Next representable `f64` toward -inf.
pub fn next_down_f64(x: f64) -> f64 {
    -next_up_f64(-x)
}

/// Next representable `f32` toward +inf.
pub fn next_up_f32(x: f32) -> f32 {
    if x.is_nan() || x == f32::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f32::from_bits(1);
    }
    let bits = x.to_bits();
    f32::from_bits(if x > 0.0 { bits + 1 } else { bits - 1 })
}

/// Next representable `f32` toward -inf.
pub fn next_down_f32(x: f32) -> f32 {
    -next_up_f32(-x)
}

/// Applies a directed rounding mode to a round-to-nearest `f64` result.
///
/// # Arguments
///
/// * `r` - The host (round-to-nearest) result.
/// * `err` - Sign of `exact - r`.
/// * `rm` - Requested mode.
///
/// # Returns
///
/// The correctly rounded result in `rm`.
pub fn adjust_f64(r: f64, err: i8, rm: RoundingMode) -> f64 {
    match (rm, err) {
        (_, 0) | (RoundingMode::Rne, _) => r,
        (RoundingMode::Rup, e) if e > 0 => next_up_f64(r),
        (RoundingMode::Rdn, e) if e < 0 => next_down_f64(r),
        (RoundingMode::Rtz, e) if (e > 0) != (r > 0.0) && r != 0.0 => {
            if r > 0.0 { next_down_f64(r) } else { next_up_f64(r) }
        }
        _ => r,
    }
}

/// Rounds an `f64` (with the sign of its own residual error) to `f32`.
///
/// The `f64` value may itself be a rounded approximation; `err` is the sign of
/// `exact - r`, which decides ties created by the first rounding and drives
/// the directed modes when `r` is exactly representable.
///
/// # Returns
///
/// The rounded value and whether it differs from the exact value.
pub fn round_f64_to_f32(r: f64, err: i8, rm: RoundingMode) -> (f32, bool) {
    let nearest = r as f32;
    let back = nearest as f64;

    if back == r {
        if err == 0 {
            return (nearest, false);
        }
        let v = match rm {
            RoundingMode::Rne => nearest,
            RoundingMode::Rup if err > 0 => next_up_f32(nearest),
            RoundingMode::Rdn if err < 0 => next_down_f32(nearest),
            RoundingMode::Rtz if (err > 0) != (r > 0.0) && r != 0.0 => {
                if r > 0.0 { next_down_f32(nearest) } else { next_up_f32(nearest) }
            }
            _ => nearest,
        };
        return (v, true);
    }

    let (lo, hi) = if back < r {
        (nearest, next_up_f32(nearest))
    } else {
        (next_down_f32(nearest), nearest)
    };
    let v = match rm {
        RoundingMode::Rne => {
            let is_tie = hi.is_finite() && lo.is_finite() && (lo as f64 + hi as f64) / 2.0 == r;
            match (is_tie, err) {
                (true, e) if e > 0 => hi,
                (true, e) if e < 0 => lo,
                _ => nearest,
            }
        }
        RoundingMode::Rtz => {
            if r > 0.0 { lo } else { hi }
        }
        RoundingMode::Rup => hi,
        RoundingMode::Rdn => lo,
    };
    (v, true)
}
