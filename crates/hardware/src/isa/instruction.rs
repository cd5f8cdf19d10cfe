//! Instruction field extraction.
//!
//! Provides bit extraction functions for decoding MIPS instruction fields from
//! 32-bit instruction encodings. Every extractor is total over `u32`.

/// Bit mask for a 5-bit register or shift-amount field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for the 6-bit opcode and function fields.
pub const OP_MASK: u32 = 0x3F;
/// Bit mask for the 16-bit immediate field.
pub const IMM_MASK: u32 = 0xFFFF;
/// Bit mask for the 26-bit jump target field.
pub const TARGET_MASK: u32 = 0x03FF_FFFF;

/// Trait for extracting instruction fields from encoded instructions.
///
/// Field names follow the R/I/J formats; the FPU aliases (`fmt`, `ft`, `fs`, `fd`)
/// name the same bit positions as `rs`, `rt`, `rd`, and `sa`.
pub trait InstructionBits {
    /// Extracts the primary opcode (bits 31-26).
    fn opcode(&self) -> u32;

    /// Extracts the first source register field (bits 25-21).
    ///
    /// Also selects the sub-operation in the coprocessor opcode groups.
    fn rs(&self) -> usize;

    /// Extracts the second source / target register field (bits 20-16).
    ///
    /// Also selects the REGIMM sub-operation.
    fn rt(&self) -> usize;

    /// Extracts the destination register field (bits 15-11).
    fn rd(&self) -> usize;

    /// Extracts the shift amount field (bits 10-6).
    fn sa(&self) -> u32;

    /// Extracts the SPECIAL / coprocessor function field (bits 5-0).
    fn funct(&self) -> u32;

    /// Extracts the zero-extended 16-bit immediate.
    fn imm(&self) -> u64;

    /// Extracts the sign-extended 16-bit immediate.
    fn simm(&self) -> u64;

    /// Extracts the 26-bit jump target field.
    fn target(&self) -> u32;

    /// FPU format field (bits 25-21).
    fn fmt(&self) -> u32;

    /// FPU second operand register (bits 20-16).
    fn ft(&self) -> usize;

    /// FPU first operand register (bits 15-11).
    fn fs(&self) -> usize;

    /// FPU destination register (bits 10-6).
    fn fd(&self) -> usize;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        (self >> 26) & OP_MASK
    }

    #[inline(always)]
    fn rs(&self) -> usize {
        ((self >> 21) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rt(&self) -> usize {
        ((self >> 16) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 11) & REG_MASK) as usize
    }

    #[inline(always)]
    fn sa(&self) -> u32 {
        (self >> 6) & REG_MASK
    }

    #[inline(always)]
    fn funct(&self) -> u32 {
        self & OP_MASK
    }

    #[inline(always)]
    fn imm(&self) -> u64 {
        (self & IMM_MASK) as u64
    }

    /// Sign-extends bits 15-0 to 64 bits.
    #[inline(always)]
    fn simm(&self) -> u64 {
        (*self as u16) as i16 as i64 as u64
    }

    #[inline(always)]
    fn target(&self) -> u32 {
        self & TARGET_MASK
    }

    #[inline(always)]
    fn fmt(&self) -> u32 {
        (self >> 21) & REG_MASK
    }

    #[inline(always)]
    fn ft(&self) -> usize {
        self.rt()
    }

    #[inline(always)]
    fn fs(&self) -> usize {
        self.rd()
    }

    #[inline(always)]
    fn fd(&self) -> usize {
        self.sa() as usize
    }
}
