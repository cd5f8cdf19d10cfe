//! Fragment code generation.
//!
//! "Compiling" a trace resolves every recorded word to its leaf handler and
//! classifies it, so the executor knows which ops may run with deferred
//! bookkeeping and which need the full commit path.

use super::fragment::{CompiledFragment, CompiledOp, OpClass};
use crate::core::interp::{DispatchTables, OpHandler, cop1};
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::{cop, primary as op, regimm, special};

/// A recorded instruction before compilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedOp {
    /// Address the op executed at.
    pub addr: u64,
    /// Instruction word.
    pub word: u32,
    /// The op executed in a branch delay slot.
    pub in_delay_slot: bool,
}

/// Classifies an instruction word.
pub fn classify(word: u32) -> OpClass {
    match word.opcode() {
        op::ADDIU | op::SLTI | op::SLTIU | op::ANDI | op::ORI | op::XORI | op::LUI | op::DADDIU => {
            OpClass::Trivial
        }
        op::J | op::JAL | op::BEQ | op::BNE | op::BLEZ | op::BGTZ => OpClass::Branch,
        op::BEQL | op::BNEL | op::BLEZL | op::BGTZL => OpClass::Branch,
        op::LB | op::LBU | op::LH | op::LHU | op::LW | op::LWU | op::LD => OpClass::Memory,
        op::LWL | op::LWR | op::LDL | op::LDR => OpClass::Memory,
        op::SB | op::SH | op::SW | op::SD => OpClass::Memory,
        op::SWL | op::SWR | op::SDL | op::SDR => OpClass::Memory,
        op::LWC1 | op::LDC1 | op::SWC1 | op::SDC1 => OpClass::Memory,
        op::SPECIAL => classify_special(word.funct()),
        op::REGIMM => match word.rt() as u32 {
            regimm::BLTZ | regimm::BGEZ | regimm::BLTZL | regimm::BGEZL => OpClass::Branch,
            regimm::BLTZAL | regimm::BGEZAL | regimm::BLTZALL | regimm::BGEZALL => OpClass::Branch,
            _ => OpClass::Generic,
        },
        op::COP1 if word.rs() as u32 == cop::BC => OpClass::Branch,
        _ => OpClass::Generic,
    }
}

fn classify_special(funct: u32) -> OpClass {
    use special::*;
    match funct {
        SLL | SRL | SRA | SLLV | SRLV | SRAV | DSLLV | DSRLV | DSRAV => OpClass::Trivial,
        DSLL | DSRL | DSRA | DSLL32 | DSRL32 | DSRA32 => OpClass::Trivial,
        MFHI | MTHI | MFLO | MTLO => OpClass::Trivial,
        MULT | MULTU | DIV | DIVU | DMULT | DMULTU | DDIV | DDIVU => OpClass::Trivial,
        ADDU | SUBU | AND | OR | XOR | NOR | SLT | SLTU | DADDU | DSUBU => OpClass::Trivial,
        SYNC => OpClass::Trivial,
        JR | JALR => OpClass::Branch,
        _ => OpClass::Generic,
    }
}

/// Returns `true` if `word` needs Status.CU1 to execute.
pub fn needs_cop1(word: u32) -> bool {
    op::COP1_GATED.contains(&word.opcode())
}

/// Leaf handler for `word`, with COP1 treated as usable.
///
/// Fragments are only entered while COP1 is usable if they contain a COP1 op,
/// so the coprocessor-unusable stubs are never baked in.
pub fn resolve(dispatch: &DispatchTables, word: u32) -> OpHandler {
    let opcode = word.opcode();
    if opcode == op::COP1 {
        return dispatch.cop1[word.rs()];
    }
    cop1::GATED
        .iter()
        .find(|(gated, _)| *gated == opcode)
        .map_or_else(|| dispatch.resolve(word), |&(_, handler)| handler)
}

/// Compiles a recorded trace.
///
/// # Arguments
///
/// * `entry` - Entry `pc` of the trace.
/// * `ops` - Recorded instructions, in execution order.
/// * `dispatch` - Tables to resolve leaf handlers from.
pub fn compile(entry: u64, ops: &[RecordedOp], dispatch: &DispatchTables) -> CompiledFragment {
    let mut uses_cop1 = false;
    let compiled = ops
        .iter()
        .map(|r| {
            uses_cop1 |= needs_cop1(r.word);
            CompiledOp {
                addr: r.addr,
                word: r.word,
                handler: resolve(dispatch, r.word),
                class: classify(r.word),
                in_delay_slot: r.in_delay_slot,
            }
        })
        .collect();
    CompiledFragment::new(entry, compiled, uses_cop1)
}
