//! Interpreter Dispatch.
//!
//! Instructions are decoded through six fixed-size tables of handler function
//! pointers: the primary opcode table and the SPECIAL, REGIMM, COP0, COP1, and COP2
//! sub-tables. Each table is checked for its exact size when it is built.
//!
//! Every handler has the signature [`OpHandler`]: it either completes, or returns
//! a [`Fault`] without having changed any register or memory. Branches do not write
//! `pc`; they leave a target in `Cpu::branch_target` for the delay-slot machinery.

/// COP0 instructions: register moves, TLB maintenance, `ERET`.
pub mod cop0;

/// COP1 (FPU) instructions.
pub mod cop1;

/// COP2 latch moves.
pub mod cop2;

/// Primary opcode handlers: immediates, branches, jumps, loads, stores.
pub mod primary;

/// REGIMM branches and immediate traps.
pub mod regimm;

/// SPECIAL register-register handlers.
pub mod special;

use std::fmt;

use crate::common::constants::{INSTRUCTION_SIZE, NOP};
use crate::common::{CpuError, Fault, Trap};
use crate::core::Cpu;
use crate::isa::decode::branch_target;
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::primary as op;

/// An instruction handler.
pub type OpHandler = fn(&mut Cpu, u32) -> Result<(), Fault>;

/// Link register written by `JAL` and the linking branches.
pub const RA: usize = 31;

/// The six interpreter tables.
pub struct DispatchTables {
    /// Primary opcode (64 entries).
    pub main: [OpHandler; 64],
    /// SPECIAL function (64 entries).
    pub special: [OpHandler; 64],
    /// REGIMM selector (32 entries).
    pub regimm: [OpHandler; 32],
    /// COP0 `rs` field (32 entries).
    pub cop0: [OpHandler; 32],
    /// COP1 `rs`/format field (32 entries).
    pub cop1: [OpHandler; 32],
    /// COP2 `rs` field (32 entries).
    pub cop2: [OpHandler; 32],
    cop1_usable: bool,
}

/// Converts a handler list into a table of exactly `N` entries.
///
/// # Returns
///
/// The table, or `CpuError::DispatchTableSize` naming the table.
pub fn build_table<const N: usize>(
    table: &'static str,
    entries: Vec<OpHandler>,
) -> Result<[OpHandler; N], CpuError> {
    entries.try_into().map_err(|v: Vec<OpHandler>| {
        let err = CpuError::DispatchTableSize {
            table,
            expected: N,
            actual: v.len(),
        };
        tracing::error!(error = %err, "dispatch table rejected");
        err
    })
}

impl DispatchTables {
    /// Builds and validates all six tables, with COP1 enabled.
    pub fn new() -> Result<Self, CpuError> {
        Ok(Self {
            main: build_table("main", primary::table())?,
            special: build_table("special", special::table())?,
            regimm: build_table("regimm", regimm::table())?,
            cop0: build_table("cop0", cop0::table())?,
            cop1: build_table("cop1", cop1::table())?,
            cop2: build_table("cop2", cop2::table())?,
            cop1_usable: true,
        })
    }

    /// Handler of the primary table for `word`.
    #[inline(always)]
    pub fn main_handler(&self, word: u32) -> OpHandler {
        self.main[word.opcode() as usize]
    }

    /// Resolves `word` through every table level to the handler that implements it.
    ///
    /// Calling the result is equivalent to calling [`DispatchTables::main_handler`]
    /// while the tables stay unchanged.
    pub fn resolve(&self, word: u32) -> OpHandler {
        match word.opcode() {
            op::SPECIAL => self.special[word.funct() as usize],
            op::REGIMM => self.regimm[word.rt()],
            op::COP0 => self.cop0[word.rs()],
            op::COP1 if self.cop1_usable => self.cop1[word.rs()],
            op::COP2 => self.cop2[word.rs()],
            _ => self.main_handler(word),
        }
    }

    /// Switches the COP1-gated primary slots between their handlers and the
    /// coprocessor-unusable trap.
    pub fn set_cop1_usable(&mut self, usable: bool) {
        self.cop1_usable = usable;
        for (opcode, handler) in cop1::GATED {
            self.main[opcode as usize] = if usable { handler } else { cop1::unusable };
        }
    }
}

impl fmt::Debug for DispatchTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTables")
            .field("main", &self.main.len())
            .field("special", &self.special.len())
            .field("regimm", &self.regimm.len())
            .field("cop0", &self.cop0.len())
            .field("cop1", &self.cop1.len())
            .field("cop2", &self.cop2.len())
            .field("cop1_usable", &self.cop1_usable)
            .finish()
    }
}

/// Handler for architecturally reserved encodings.
pub fn reserved(_cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    Err(Trap::ReservedInstruction(word).into())
}

/// Handler for encodings this core does not implement; stops execution.
pub fn unimplemented(cpu: &mut Cpu, word: u32) -> Result<(), Fault> {
    Err(CpuError::UnimplementedInstruction { pc: cpu.pc, word }.into())
}

impl Cpu {
    /// Schedules a transfer to `target` after the delay slot.
    ///
    /// A branch to itself whose delay slot is a NOP is an idle loop and is
    /// fast-forwarded once it commits, if enabled.
    pub fn set_branch(&mut self, target: u64) {
        self.branch_target = Some(target);
        if self.idle_skip
            && target == self.pc
            && self.peek_ram_u32(self.pc.wrapping_add(INSTRUCTION_SIZE)) == Some(NOP)
        {
            self.idle_pending = true;
        }
    }

    /// Conditional PC-relative branch.
    #[inline]
    pub fn branch(&mut self, taken: bool, word: u32) {
        if taken {
            self.set_branch(branch_target(self.pc, word));
        }
    }

    /// Branch-likely: when not taken, the delay slot is skipped.
    #[inline]
    pub fn branch_likely(&mut self, taken: bool, word: u32) {
        if taken {
            self.set_branch(branch_target(self.pc, word));
        } else {
            self.next_pc = self.next_pc.wrapping_add(INSTRUCTION_SIZE);
        }
    }

    /// Writes the return address (the instruction after the delay slot) to `reg`.
    #[inline]
    pub fn link(&mut self, reg: usize) {
        self.regs
            .write(reg, self.pc.wrapping_add(2 * INSTRUCTION_SIZE));
    }
}
