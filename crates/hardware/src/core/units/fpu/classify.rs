//! Operand classification and operation-kind tables.
//!
//! Every arithmetic operation classifies its operands into one of eight
//! categories and looks the pair up in an 8 x 8 table for its operator. The
//! table decides whether the host computes a result, or whether the operation
//! is invalid, unimplemented, or a division by zero.
//!
//! NaNs follow the IEEE 754-2008 encoding: a NaN is quiet when the most
//! significant fraction bit is set.

/// Category of a floating-point operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FloatClass {
    /// Finite, non-zero, normalized.
    Normal = 0,
    /// `+0.0`.
    PosZero = 1,
    /// `-0.0`.
    NegZero = 2,
    /// `+inf`.
    PosInf = 3,
    /// `-inf`.
    NegInf = 4,
    /// NaN with the quiet bit set.
    QuietNan = 5,
    /// NaN with the quiet bit clear.
    SignalingNan = 6,
    /// Non-zero subnormal.
    Denormal = 7,
}

/// All classes in table order.
pub const CLASSES: [FloatClass; 8] = [
    FloatClass::Normal,
    FloatClass::PosZero,
    FloatClass::NegZero,
    FloatClass::PosInf,
    FloatClass::NegInf,
    FloatClass::QuietNan,
    FloatClass::SignalingNan,
    FloatClass::Denormal,
];

impl FloatClass {
    /// Returns `true` for either NaN class.
    #[inline(always)]
    pub const fn is_nan(self) -> bool {
        matches!(self, Self::QuietNan | Self::SignalingNan)
    }

    /// Returns `true` for either zero.
    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        matches!(self, Self::PosZero | Self::NegZero)
    }

    /// Returns `true` for either infinity.
    #[inline(always)]
    pub const fn is_inf(self) -> bool {
        matches!(self, Self::PosInf | Self::NegInf)
    }

    /// Returns `true` for operands the hardware refuses (unimplemented operation).
    #[inline(always)]
    pub const fn is_unimplemented(self) -> bool {
        matches!(self, Self::SignalingNan | Self::Denormal)
    }
}

#[inline]
const fn classify_parts(sign: bool, exp_all_ones: bool, exp_zero: bool, frac: u64, quiet: u64) -> FloatClass {
    if exp_all_ones {
        if frac == 0 {
            if sign { FloatClass::NegInf } else { FloatClass::PosInf }
        } else if frac & quiet != 0 {
            FloatClass::QuietNan
        } else {
            FloatClass::SignalingNan
        }
    } else if exp_zero {
        if frac != 0 {
            FloatClass::Denormal
        } else if sign {
            FloatClass::NegZero
        } else {
            FloatClass::PosZero
        }
    } else {
        FloatClass::Normal
    }
}

/// Classifies single-precision raw bits.
#[inline]
pub const fn classify_f32(bits: u32) -> FloatClass {
    let exp = (bits >> 23) & 0xFF;
    classify_parts(
        bits >> 31 != 0,
        exp == 0xFF,
        exp == 0,
        (bits & 0x007F_FFFF) as u64,
        0x0040_0000,
    )
}

/// Classifies double-precision raw bits.
#[inline]
pub const fn classify_f64(bits: u64) -> FloatClass {
    let exp = (bits >> 52) & 0x7FF;
    classify_parts(
        bits >> 63 != 0,
        exp == 0x7FF,
        exp == 0,
        bits & 0x000F_FFFF_FFFF_FFFF,
        0x0008_0000_0000_0000,
    )
}

/// What an arithmetic operation does for a given pair of operand classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    /// The host computes the result; inexact/overflow/underflow are derived afterwards.
    Compute,
    /// Invalid operation: the default NaN is produced and `V` is signalled.
    Invalid,
    /// Unimplemented operation: always traps.
    Unimplemented,
    /// Finite non-zero divided by zero: a signed infinity and `Z`.
    DivideByZero,
}

/// Binary arithmetic operators with their own classification tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    /// `ADD.fmt`
    Add,
    /// `SUB.fmt`
    Sub,
    /// `MUL.fmt`
    Mul,
    /// `DIV.fmt`
    Div,
}

const fn op_kind(op: BinOp, a: FloatClass, b: FloatClass) -> OpKind {
    use FloatClass::{NegInf, Normal, PosInf};

    if a.is_unimplemented() || b.is_unimplemented() {
        return OpKind::Unimplemented;
    }
    if a.is_nan() || b.is_nan() {
        return OpKind::Invalid;
    }
    match op {
        BinOp::Add => match (a, b) {
            (PosInf, NegInf) | (NegInf, PosInf) => OpKind::Invalid,
            _ => OpKind::Compute,
        },
        BinOp::Sub => match (a, b) {
            (PosInf, PosInf) | (NegInf, NegInf) => OpKind::Invalid,
            _ => OpKind::Compute,
        },
        BinOp::Mul => {
            if (a.is_zero() && b.is_inf()) || (a.is_inf() && b.is_zero()) {
                OpKind::Invalid
            } else {
                OpKind::Compute
            }
        }
        BinOp::Div => {
            if (a.is_zero() && b.is_zero()) || (a.is_inf() && b.is_inf()) {
                OpKind::Invalid
            } else if matches!(a, Normal) && b.is_zero() {
                OpKind::DivideByZero
            } else {
                OpKind::Compute
            }
        }
    }
}

const fn build_table(op: BinOp) -> [[OpKind; 8]; 8] {
    let mut table = [[OpKind::Compute; 8]; 8];
    let mut i = 0;
    while i < 8 {
        let mut j = 0;
        while j < 8 {
            table[i][j] = op_kind(op, CLASSES[i], CLASSES[j]);
            j += 1;
        }
        i += 1;
    }
    table
}

/// Operation kinds for `ADD.fmt`, indexed `[class(fs)][class(ft)]`.
pub const ADD_TABLE: [[OpKind; 8]; 8] = build_table(BinOp::Add);
/// Operation kinds for `SUB.fmt`.
pub const SUB_TABLE: [[OpKind; 8]; 8] = build_table(BinOp::Sub);
/// Operation kinds for `MUL.fmt`.
pub const MUL_TABLE: [[OpKind; 8]; 8] = build_table(BinOp::Mul);
/// Operation kinds for `DIV.fmt`.
pub const DIV_TABLE: [[OpKind; 8]; 8] = build_table(BinOp::Div);

impl BinOp {
    /// Looks up the operation kind for a pair of operand classes.
    #[inline]
    pub const fn kind(self, a: FloatClass, b: FloatClass) -> OpKind {
        let table = match self {
            Self::Add => &ADD_TABLE,
            Self::Sub => &SUB_TABLE,
            Self::Mul => &MUL_TABLE,
            Self::Div => &DIV_TABLE,
        };
        table[a as usize][b as usize]
    }
}
