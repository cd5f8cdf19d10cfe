//! Fragment executor.
//!
//! Runs a compiled fragment against the CPU with the same observable effect as
//! interpreting its ops one at a time. Trivial ops outside delay slots run their
//! handler directly and defer the `pc`, instruction-count and cycle updates; any
//! other op flushes the deferred work and goes through `Cpu::execute`.
//!
//! The interrupt line is resampled after every op, so an interrupt raised by the
//! vector unit is taken at the same instruction boundary as in the interpreter.
//!
//! The executor leaves the fragment (a bailout) as soon as the CPU diverges from
//! the recorded path or something the run loop must observe happens: an
//! exception, an event requesting a stop, a pending interrupt, a code
//! invalidation, or COP1 becoming unusable under a fragment that needs it.

use super::fragment::{CompiledFragment, OpClass};
use crate::common::CpuError;
use crate::common::constants::INSTRUCTION_SIZE;
use crate::core::Cpu;
use crate::soc::traits::VectorUnit;

/// Where a fragment run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentExit {
    /// Index of the first op that did not run from the fragment; `len()` if all did.
    pub index: usize,
    /// Every op ran.
    pub completed: bool,
}

/// Trivial ops run but not yet accounted for.
struct Deferred {
    count: u64,
    pc: u64,
}

impl Deferred {
    /// Commits the deferred `pc`, instruction count, and cycles.
    fn flush(&mut self, cpu: &mut Cpu) {
        if self.count == 0 {
            return;
        }
        cpu.pc = self.pc;
        cpu.next_pc = self.pc;
        cpu.ops_executed += self.count;
        cpu.advance(self.count);
        self.count = 0;
    }
}

/// Runs `frag` from the CPU's current `pc`.
///
/// # Arguments
///
/// * `cpu` - The processor, positioned at `frag.entry` with no delay slot pending.
/// * `frag` - The fragment to run.
/// * `vector_unit` - Stepped once per executed op.
///
/// # Returns
///
/// The exit point, or the fatal error raised by an op.
pub fn run(
    cpu: &mut Cpu,
    frag: &CompiledFragment,
    vector_unit: &mut dyn VectorUnit,
) -> Result<FragmentExit, CpuError> {
    frag.count_run();
    cpu.stats.fragment_runs += 1;

    let mut deferred = Deferred {
        count: 0,
        pc: cpu.pc,
    };

    for (i, op) in frag.ops.iter().enumerate() {
        if op.class == OpClass::Trivial
            && !op.in_delay_slot
            && cpu.delay_slot.is_none()
            && deferred.pc == op.addr
            && can_defer(cpu, deferred.count)
            && (op.handler)(cpu, op.word).is_ok()
        {
            deferred.count += 1;
            deferred.pc = op.addr.wrapping_add(INSTRUCTION_SIZE);
            cpu.stats.compiled_ops += 1;
            vector_unit.step();
            cpu.update_interrupts();
            if cpu.interrupts_pending {
                deferred.flush(cpu);
                return Ok(bail(cpu, i + 1));
            }
            continue;
        }

        deferred.flush(cpu);
        deferred.pc = cpu.pc;
        if cpu.pc != op.addr || cpu.in_delay_slot() != op.in_delay_slot {
            return Ok(bail(cpu, i));
        }

        let retired = cpu.execute(op.addr, op.word, op.handler)?;
        cpu.stats.compiled_ops += 1;
        vector_unit.step();
        deferred.pc = cpu.pc;

        if retired.trapped {
            return Ok(bail(cpu, i + 1));
        }
        cpu.update_interrupts();
        if must_leave(cpu, frag) {
            return Ok(bail(cpu, i + 1));
        }
    }

    deferred.flush(cpu);
    Ok(FragmentExit {
        index: frag.ops.len(),
        completed: true,
    })
}

/// Deferring one more cycle must not reach the head event.
#[inline]
fn can_defer(cpu: &Cpu, pending: u64) -> bool {
    cpu.events
        .cycles_until_next()
        .is_none_or(|head| (pending as i64) + 1 < head)
}

/// Conditions under which control returns to the run loop.
#[inline]
fn must_leave(cpu: &Cpu, frag: &CompiledFragment) -> bool {
    cpu.breakout.is_some()
        || cpu.interrupts_pending
        || !cpu.code_invalidations.is_empty()
        || cpu.tlb_dirty
        || (frag.uses_cop1 && !cpu.cop1_usable())
}

fn bail(cpu: &mut Cpu, index: usize) -> FragmentExit {
    cpu.stats.bailouts += 1;
    FragmentExit {
        index,
        completed: false,
    }
}
