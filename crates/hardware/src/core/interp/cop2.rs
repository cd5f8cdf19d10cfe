//! COP2 handlers.
//!
//! The VR4300 has no COP2; only the transfer latch behind the move
//! instructions is modeled. Every move requires Status.CU2.

use super::{OpHandler, unimplemented};
use crate::common::{Fault, Trap};
use crate::core::Cpu;
use crate::core::arch::cp0::STATUS_CU2;
use crate::core::units::alu::sx32;
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::cop;

/// Builds the 32-entry COP2 table.
pub fn table() -> Vec<OpHandler> {
    let mut t: Vec<OpHandler> = vec![unimplemented; 32];
    t[cop::MF as usize] = mfc2;
    t[cop::DMF as usize] = dmfc2;
    t[cop::CF as usize] = mfc2;
    t[cop::MT as usize] = mtc2;
    t[cop::DMT as usize] = mtc2;
    t[cop::CT as usize] = mtc2;
    t
}

#[inline]
fn require_cu2(cpu: &Cpu) -> Result<(), Fault> {
    if cpu.cp0.status() & STATUS_CU2 == 0 {
        return Err(Trap::CoprocessorUnusable(2).into());
    }
    Ok(())
}

/// `MFC2`/`CFC2`: the low word of the latch, sign-extended.
fn mfc2(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    require_cu2(cpu)?;
    cpu.regs.write(word.rt(), sx32(cpu.cop2_latch));
    Ok(())
}

fn dmfc2(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    require_cu2(cpu)?;
    cpu.regs.write(word.rt(), cpu.cop2_latch);
    Ok(())
}

/// `MTC2`/`DMTC2`/`CTC2` all load the full latch.
fn mtc2(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    require_cu2(cpu)?;
    cpu.cop2_latch = cpu.regs.read(word.rt());
    Ok(())
}
