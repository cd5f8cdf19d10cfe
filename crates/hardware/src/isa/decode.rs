//! Branch and jump target computation.
//!
//! Targets are computed relative to the address of the branch instruction itself;
//! both helpers account for the delay slot at `pc + 4`.

use crate::common::constants::INSTRUCTION_SIZE;
use crate::isa::instruction::InstructionBits;

/// Returns the target of a PC-relative branch.
///
/// # Arguments
///
/// * `pc` - Address of the branch instruction.
/// * `word` - The encoded branch.
///
/// # Returns
///
/// `pc + 4 + (sign_extend(imm) << 2)`, wrapping.
#[inline(always)]
pub fn branch_target(pc: u64, word: u32) -> u64 {
    pc.wrapping_add(INSTRUCTION_SIZE)
        .wrapping_add(word.simm() << 2)
}

/// Returns the target of a `J`/`JAL`: the 256 MiB region of the delay slot plus `target << 2`.
#[inline(always)]
pub fn jump_target(pc: u64, word: u32) -> u64 {
    let region = pc.wrapping_add(INSTRUCTION_SIZE) & !0x0FFF_FFFF;
    region | ((word.target() as u64) << 2)
}
