//! Floating-Point Unit (FPU).
//!
//! This module implements the COP1 arithmetic engine. Every operation works on
//! raw register bits and returns an [`FpOutcome`]: the result bits plus the
//! exceptions the operation raised. The CPU records the exceptions in FCR31
//! and only writes the result if none of them traps.
//!
//! Operations are organized into submodules:
//! - [`classify`]: operand classes and the per-operator operation-kind tables.
//! - [`rounding_modes`]: rounding modes, custom integral rounding, and directed-rounding helpers.
//! - [`exception_flags`]: the exception set and FCR31 layout.
//!
//! Results are computed by the host in round-to-nearest. The exact rounding
//! error is recovered with error-free transformations (TwoSum for add/sub, a
//! fused multiply-add residual for mul/div/sqrt), and its sign drives both the
//! inexact flag and the directed rounding modes.

/// Operand classification and operation-kind tables.
pub mod classify;

/// Floating-point exception flag types and the FCR31 register.
pub mod exception_flags;

/// Rounding mode definitions and support.
pub mod rounding_modes;

use self::classify::{BinOp, FloatClass, OpKind, classify_f32, classify_f64};
use self::exception_flags::FpFlags;
use self::rounding_modes::{RoundingMode, adjust_f64, error_sign, round_f64_to_f32};

/// Result written for an invalid single-precision operation.
pub const DEFAULT_NAN_S: u32 = 0x7FBF_FFFF;

/// Result written for an invalid double-precision operation.
pub const DEFAULT_NAN_D: u64 = 0x7FF7_FFFF_FFFF_FFFF;

/// Smallest positive normal single.
const MIN_NORMAL_S: u32 = 0x0080_0000;
/// Largest finite single.
const MAX_S: u32 = 0x7F7F_FFFF;
/// Single `+inf`.
const INF_S: u32 = 0x7F80_0000;
/// Smallest positive normal double.
const MIN_NORMAL_D: u64 = 0x0010_0000_0000_0000;
/// Largest finite double.
const MAX_D: u64 = 0x7FEF_FFFF_FFFF_FFFF;
/// Double `+inf`.
const INF_D: u64 = 0x7FF0_0000_0000_0000;

/// Single-precision sign bit.
const SIGN_S: u32 = 0x8000_0000;
/// Double-precision sign bit.
const SIGN_D: u64 = 0x8000_0000_0000_0000;

/// 2^128, the first magnitude past the single-precision range.
const F32_OVERFLOW: f64 = 340_282_366_920_938_463_463_374_607_431_768_211_456.0;

/// Magnitude from which `CVT.{S,D}.L` is unimplemented.
const CVT_FROM_L_LIMIT: i64 = 1 << 55;

/// Magnitude from which conversions to `L` are unimplemented.
const CVT_TO_L_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Result of a floating-point operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FpOutcome {
    /// Result bits; a single occupies the low 32 bits.
    pub bits: u64,
    /// Exceptions raised.
    pub flags: FpFlags,
}

impl FpOutcome {
    const fn new(bits: u64, flags: FpFlags) -> Self {
        Self { bits, flags }
    }

    const fn exact(bits: u64) -> Self {
        Self::new(bits, FpFlags::NONE)
    }

    const fn unimplemented() -> Self {
        Self::new(0, FpFlags::E)
    }

    /// Returns `true` if the operation must trap regardless of the enables.
    pub const fn is_unimplemented(&self) -> bool {
        self.flags.contains(FpFlags::E)
    }
}

/// Storage format of a floating-point operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Single precision.
    S,
    /// Double precision.
    D,
}

/// Integer width of a conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntFormat {
    /// 32-bit word.
    W,
    /// 64-bit long.
    L,
}

const fn overflow_s(neg: bool, rm: RoundingMode) -> u32 {
    let mag = match (rm, neg) {
        (RoundingMode::Rne, _) | (RoundingMode::Rup, false) | (RoundingMode::Rdn, true) => INF_S,
        _ => MAX_S,
    };
    if neg { mag | SIGN_S } else { mag }
}

const fn overflow_d(neg: bool, rm: RoundingMode) -> u64 {
    let mag = match (rm, neg) {
        (RoundingMode::Rne, _) | (RoundingMode::Rup, false) | (RoundingMode::Rdn, true) => INF_D,
        _ => MAX_D,
    };
    if neg { mag | SIGN_D } else { mag }
}

const fn underflow_s(neg: bool, rm: RoundingMode) -> u32 {
    let mag = match (rm, neg) {
        (RoundingMode::Rup, false) | (RoundingMode::Rdn, true) => MIN_NORMAL_S,
        _ => 0,
    };
    if neg { mag | SIGN_S } else { mag }
}

const fn underflow_d(neg: bool, rm: RoundingMode) -> u64 {
    let mag = match (rm, neg) {
        (RoundingMode::Rup, false) | (RoundingMode::Rdn, true) => MIN_NORMAL_D,
        _ => 0,
    };
    if neg { mag | SIGN_D } else { mag }
}

/// Exact rounding error of `a + b` (TwoSum).
fn two_sum_err(a: f64, b: f64, s: f64) -> f64 {
    let bb = s - a;
    (a - (s - bb)) + (b - bb)
}

/// Computes a binary operation in `f64`, returning the round-to-nearest
/// result and the sign of its exact error.
fn host_binop(op: BinOp, a: f64, b: f64) -> (f64, i8) {
    match op {
        BinOp::Add => {
            let r = a + b;
            (r, error_sign(two_sum_err(a, b, r)))
        }
        BinOp::Sub => {
            let r = a - b;
            (r, error_sign(two_sum_err(a, -b, r)))
        }
        BinOp::Mul => {
            let r = a * b;
            let mut err = error_sign(a.mul_add(b, -r));
            if r == 0.0 && err == 0 && a != 0.0 && b != 0.0 {
                err = if (a < 0.0) != (b < 0.0) { -1 } else { 1 };
            }
            (r, err)
        }
        BinOp::Div => {
            let r = a / b;
            let rem = (-r).mul_add(b, a);
            let mut err = error_sign(rem);
            if b < 0.0 {
                err = -err;
            }
            if r == 0.0 && err == 0 && a != 0.0 {
                err = if (a < 0.0) != (b < 0.0) { -1 } else { 1 };
            }
            (r, err)
        }
    }
}

/// Sign a zero result of an exact add/sub takes in round-down mode.
fn exact_zero_sign(op: BinOp, a: f64, b: f64, r: f64, rm: RoundingMode) -> f64 {
    let b_neg = match op {
        BinOp::Sub => !b.is_sign_negative(),
        _ => b.is_sign_negative(),
    };
    if rm == RoundingMode::Rdn && a.is_sign_negative() != b_neg {
        -0.0
    } else {
        r
    }
}

/// Finishes a double-precision result: directed rounding, overflow, underflow.
fn finish_d(r: f64, err: i8, rm: RoundingMode) -> FpOutcome {
    if r.is_infinite() {
        return FpOutcome::new(overflow_d(r < 0.0, rm), FpFlags::OF | FpFlags::NX);
    }
    let v = adjust_f64(r, err, rm);
    if v.is_infinite() {
        return FpOutcome::new(overflow_d(v < 0.0, rm), FpFlags::OF | FpFlags::NX);
    }
    if v.is_subnormal() || (v == 0.0 && err != 0) {
        let neg = if r == 0.0 { err < 0 } else { r < 0.0 };
        return FpOutcome::new(underflow_d(neg, rm), FpFlags::UF | FpFlags::NX);
    }
    let flags = if err != 0 { FpFlags::NX } else { FpFlags::NONE };
    FpOutcome::new(v.to_bits(), flags)
}

/// Returns `true` if rounding `r` to single precision with an unbounded
/// exponent would exceed the largest finite single.
fn overflows_s(r: f64, err: i8, rm: RoundingMode, rounded: f32) -> bool {
    let away = match rm {
        RoundingMode::Rne => true,
        RoundingMode::Rup => r > 0.0,
        RoundingMode::Rdn => r < 0.0,
        RoundingMode::Rtz => false,
    };
    if away {
        return rounded.is_infinite();
    }
    let mag = r.abs();
    mag > F32_OVERFLOW || (mag == F32_OVERFLOW && (err == 0 || (err > 0) == (r > 0.0)))
}

/// Finishes a single-precision result from its `f64` intermediate.
fn finish_s(r: f64, err: i8, rm: RoundingMode) -> FpOutcome {
    let (v, inexact) = round_f64_to_f32(r, err, rm);
    if overflows_s(r, err, rm, v) {
        return FpOutcome::new(overflow_s(r < 0.0, rm) as u64, FpFlags::OF | FpFlags::NX);
    }
    if v.is_subnormal() || (v == 0.0 && (r != 0.0 || err != 0)) {
        let neg = if r == 0.0 { err < 0 } else { r < 0.0 };
        return FpOutcome::new(underflow_s(neg, rm) as u64, FpFlags::UF | FpFlags::NX);
    }
    let flags = if inexact { FpFlags::NX } else { FpFlags::NONE };
    FpOutcome::new(v.to_bits() as u64, flags)
}

/// Executes `ADD`/`SUB`/`MUL`/`DIV` on two singles.
///
/// # Arguments
///
/// * `op` - The operator.
/// * `a` - `fs` bits.
/// * `b` - `ft` bits.
/// * `rm` - Rounding mode from FCR31.
///
/// # Returns
///
/// The result and its exceptions. An unimplemented outcome carries `E` only.
pub fn binop_s(op: BinOp, a: u32, b: u32, rm: RoundingMode) -> FpOutcome {
    match op.kind(classify_f32(a), classify_f32(b)) {
        OpKind::Unimplemented => FpOutcome::unimplemented(),
        OpKind::Invalid => FpOutcome::new(DEFAULT_NAN_S as u64, FpFlags::NV),
        OpKind::DivideByZero => {
            let sign = (a ^ b) & SIGN_S;
            FpOutcome::new((INF_S | sign) as u64, FpFlags::DZ)
        }
        OpKind::Compute => {
            let (fa, fb) = (f32::from_bits(a) as f64, f32::from_bits(b) as f64);
            if fa.is_infinite() || fb.is_infinite() {
                let (r, _) = host_binop(op, fa, fb);
                return FpOutcome::exact((r as f32).to_bits() as u64);
            }
            let (mut r, err) = host_binop(op, fa, fb);
            if r == 0.0 && err == 0 && matches!(op, BinOp::Add | BinOp::Sub) {
                r = exact_zero_sign(op, fa, fb, r, rm);
            }
            finish_s(r, err, rm)
        }
    }
}

/// Executes `ADD`/`SUB`/`MUL`/`DIV` on two doubles.
pub fn binop_d(op: BinOp, a: u64, b: u64, rm: RoundingMode) -> FpOutcome {
    match op.kind(classify_f64(a), classify_f64(b)) {
        OpKind::Unimplemented => FpOutcome::unimplemented(),
        OpKind::Invalid => FpOutcome::new(DEFAULT_NAN_D, FpFlags::NV),
        OpKind::DivideByZero => FpOutcome::new(INF_D | ((a ^ b) & SIGN_D), FpFlags::DZ),
        OpKind::Compute => {
            let (fa, fb) = (f64::from_bits(a), f64::from_bits(b));
            if fa.is_infinite() || fb.is_infinite() {
                let (r, _) = host_binop(op, fa, fb);
                return FpOutcome::exact(r.to_bits());
            }
            let (mut r, err) = host_binop(op, fa, fb);
            if r == 0.0 && err == 0 && matches!(op, BinOp::Add | BinOp::Sub) {
                r = exact_zero_sign(op, fa, fb, r, rm);
            }
            finish_d(r, err, rm)
        }
    }
}

/// Shared operand screening for the unary arithmetic operations.
///
/// # Returns
///
/// `Some(outcome)` if the class alone decides the result.
fn screen_unary(class: FloatClass, default_nan: u64) -> Option<FpOutcome> {
    if class.is_unimplemented() {
        Some(FpOutcome::unimplemented())
    } else if class == FloatClass::QuietNan {
        Some(FpOutcome::new(default_nan, FpFlags::NV))
    } else {
        None
    }
}

/// `SQRT.fmt`.
pub fn sqrt(fmt: Format, bits: u64, rm: RoundingMode) -> FpOutcome {
    let (class, default_nan) = match fmt {
        Format::S => (classify_f32(bits as u32), DEFAULT_NAN_S as u64),
        Format::D => (classify_f64(bits), DEFAULT_NAN_D),
    };
    if let Some(out) = screen_unary(class, default_nan) {
        return out;
    }
    match class {
        FloatClass::NegInf => return FpOutcome::new(default_nan, FpFlags::NV),
        FloatClass::PosZero | FloatClass::NegZero | FloatClass::PosInf => {
            return FpOutcome::exact(bits);
        }
        _ => {}
    }
    let x = match fmt {
        Format::S => f32::from_bits(bits as u32) as f64,
        Format::D => f64::from_bits(bits),
    };
    if x < 0.0 {
        return FpOutcome::new(default_nan, FpFlags::NV);
    }
    let r = x.sqrt();
    let err = error_sign((-r).mul_add(r, x));
    match fmt {
        Format::S => finish_s(r, err, rm),
        Format::D => finish_d(r, err, rm),
    }
}

/// `ABS.fmt`.
pub fn abs(fmt: Format, bits: u64) -> FpOutcome {
    match fmt {
        Format::S => screen_unary(classify_f32(bits as u32), DEFAULT_NAN_S as u64)
            .unwrap_or(FpOutcome::exact(bits & !(SIGN_S as u64) & 0xFFFF_FFFF)),
        Format::D => screen_unary(classify_f64(bits), DEFAULT_NAN_D)
            .unwrap_or(FpOutcome::exact(bits & !SIGN_D)),
    }
}

/// `NEG.fmt`.
pub fn neg(fmt: Format, bits: u64) -> FpOutcome {
    match fmt {
        Format::S => screen_unary(classify_f32(bits as u32), DEFAULT_NAN_S as u64)
            .unwrap_or(FpOutcome::exact((bits ^ SIGN_S as u64) & 0xFFFF_FFFF)),
        Format::D => screen_unary(classify_f64(bits), DEFAULT_NAN_D)
            .unwrap_or(FpOutcome::exact(bits ^ SIGN_D)),
    }
}

/// `CVT.S.D`.
pub fn cvt_s_from_d(bits: u64, rm: RoundingMode) -> FpOutcome {
    let class = classify_f64(bits);
    if let Some(out) = screen_unary(class, DEFAULT_NAN_S as u64) {
        return out;
    }
    let x = f64::from_bits(bits);
    if class.is_zero() || class.is_inf() {
        return FpOutcome::exact((x as f32).to_bits() as u64);
    }
    finish_s(x, 0, rm)
}

/// `CVT.D.S`; always exact for normal operands.
pub fn cvt_d_from_s(bits: u32) -> FpOutcome {
    let class = classify_f32(bits);
    if let Some(out) = screen_unary(class, DEFAULT_NAN_D) {
        return out;
    }
    FpOutcome::exact((f32::from_bits(bits) as f64).to_bits())
}

/// `CVT.{S,D}.W`.
pub fn cvt_from_w(fmt: Format, word: u32, rm: RoundingMode) -> FpOutcome {
    let x = word as i32 as f64;
    match fmt {
        Format::D => FpOutcome::exact(x.to_bits()),
        Format::S => finish_s(x, 0, rm),
    }
}

/// `CVT.{S,D}.L`. Magnitudes of 2^55 and above are unimplemented.
pub fn cvt_from_l(fmt: Format, long: u64, rm: RoundingMode) -> FpOutcome {
    let v = long as i64;
    if v >= CVT_FROM_L_LIMIT || v <= -CVT_FROM_L_LIMIT {
        return FpOutcome::unimplemented();
    }
    let r = v as f64;
    let err = match (v as i128).cmp(&(r as i128)) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    };
    match fmt {
        Format::D => finish_d(r, err, rm),
        Format::S => finish_s(r, err, rm),
    }
}

/// Converts to an integer (`CVT.W/L`, `ROUND`, `TRUNC`, `CEIL`, `FLOOR`).
///
/// # Arguments
///
/// * `fmt` - Source format.
/// * `bits` - Source bits.
/// * `to` - Destination integer width.
/// * `rm` - Rounding applied; the explicit-rounding instructions pass their own mode.
///
/// # Returns
///
/// The integer bits. NaN, infinity, denormal, and out-of-range sources are
/// unimplemented; a rounded result is inexact.
pub fn to_int(fmt: Format, bits: u64, to: IntFormat, rm: RoundingMode) -> FpOutcome {
    let (class, x) = match fmt {
        Format::S => (classify_f32(bits as u32), f32::from_bits(bits as u32) as f64),
        Format::D => (classify_f64(bits), f64::from_bits(bits)),
    };
    if class.is_nan() || class.is_inf() || class == FloatClass::Denormal {
        return FpOutcome::unimplemented();
    }
    let v = rm.round_integral(x);
    let in_range = match to {
        IntFormat::W => (-2_147_483_648.0..2_147_483_648.0).contains(&v),
        IntFormat::L => v > -CVT_TO_L_LIMIT && v < CVT_TO_L_LIMIT,
    };
    if !in_range {
        return FpOutcome::unimplemented();
    }
    let flags = if v == x { FpFlags::NONE } else { FpFlags::NX };
    let out = match to {
        IntFormat::W => v as i32 as u32 as u64,
        IntFormat::L => v as i64 as u64,
    };
    FpOutcome::new(out, flags)
}

/// Evaluates `C.cond.fmt`.
///
/// Condition bits: 0 = unordered, 1 = equal, 2 = less than, 3 = signal on any NaN.
/// A signaling NaN operand always raises invalid.
///
/// # Returns
///
/// The condition result and the exceptions raised.
pub fn compare(fmt: Format, a: u64, b: u64, cond: u32) -> (bool, FpFlags) {
    let (ca, cb, fa, fb) = match fmt {
        Format::S => (
            classify_f32(a as u32),
            classify_f32(b as u32),
            f32::from_bits(a as u32) as f64,
            f32::from_bits(b as u32) as f64,
        ),
        Format::D => (classify_f64(a), classify_f64(b), f64::from_bits(a), f64::from_bits(b)),
    };
    if ca.is_nan() || cb.is_nan() {
        let signal = cond & 0x8 != 0
            || ca == FloatClass::SignalingNan
            || cb == FloatClass::SignalingNan;
        let flags = if signal { FpFlags::NV } else { FpFlags::NONE };
        return (cond & 0x1 != 0, flags);
    }
    let less = fa < fb;
    let equal = fa == fb;
    ((cond & 0x4 != 0 && less) || (cond & 0x2 != 0 && equal), FpFlags::NONE)
}
