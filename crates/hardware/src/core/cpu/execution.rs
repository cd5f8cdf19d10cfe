//! Main Execution Path.
//!
//! This module implements the per-instruction cycle shared by the interpreter and
//! the fragment executor. It performs the following:
//! 1. **Delay Slots:** Consumes a pending delay-slot target exactly once and promotes the
//!    branch target set by the current instruction.
//! 2. **Outcome Handling:** Commits on success, delivers traps, and restores state on fatal errors.
//! 3. **Timing:** Counts the instruction and advances the event queue by one cycle.
//! 4. **Idle Loops:** Fast-forwards to the next event after a branch-to-self with a NOP delay slot.

use tracing::{error, trace};

use super::Cpu;
use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::{CpuError, Fault};
use crate::core::arch::cp0 as regs;
use crate::core::interp::OpHandler;

/// Record of one executed instruction, as seen by the fragment recorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retired {
    /// Address of the instruction.
    pub addr: u64,
    /// Instruction word (0 if the fetch itself faulted).
    pub word: u32,
    /// The instruction executed in a branch delay slot.
    pub in_delay_slot: bool,
    /// The instruction raised an exception instead of completing.
    pub trapped: bool,
}

impl Cpu {
    /// Fetches and executes one instruction.
    ///
    /// # Returns
    ///
    /// What was executed, or the fatal error that stopped execution. On a fatal
    /// error the CPU is left at the offending instruction.
    pub fn step(&mut self) -> Result<Retired, CpuError> {
        let pc = self.pc;
        match self.fetch(pc) {
            Ok(word) => {
                let handler = self.dispatch.main_handler(word);
                self.execute(pc, word, handler)
            }
            Err(trap) => {
                let in_delay = self.in_delay_slot();
                self.take_exception(trap, in_delay);
                self.retire();
                Ok(Retired {
                    addr: pc,
                    word: 0,
                    in_delay_slot: in_delay,
                    trapped: true,
                })
            }
        }
    }

    /// Executes an already-fetched instruction at `addr` through `handler`.
    ///
    /// `pc` must equal `addr`. The handler may be any level of the dispatch
    /// tables as long as it decodes `word` to the same operation.
    ///
    /// # Arguments
    ///
    /// * `addr` - Address of the instruction.
    /// * `word` - Instruction word.
    /// * `handler` - Handler to run.
    pub fn execute(&mut self, addr: u64, word: u32, handler: OpHandler) -> Result<Retired, CpuError> {
        if self.trace {
            trace!(pc = format_args!("{addr:#018x}"), word = format_args!("{word:#010x}"), "exec");
        }

        let saved_slot = self.delay_slot;
        let in_delay = saved_slot.is_some();
        self.next_pc = self
            .delay_slot
            .take()
            .unwrap_or_else(|| addr.wrapping_add(INSTRUCTION_SIZE));
        self.branch_target = None;

        let trapped = match handler(self, word) {
            Ok(()) => {
                self.pc = self.next_pc;
                self.delay_slot = self.branch_target.take();
                false
            }
            Err(Fault::Trap(trap)) => {
                self.take_exception(trap, in_delay);
                true
            }
            Err(Fault::Fatal(e)) => {
                self.delay_slot = saved_slot;
                self.branch_target = None;
                self.idle_pending = false;
                error!(pc = format_args!("{addr:#018x}"), error = %e, "fatal");
                return Err(e);
            }
        };

        self.retire();
        if std::mem::take(&mut self.idle_pending) && !trapped {
            self.skip_idle();
        }

        Ok(Retired {
            addr,
            word,
            in_delay_slot: in_delay,
            trapped,
        })
    }

    /// Counts one instruction and its cycle.
    #[inline]
    fn retire(&mut self) {
        self.ops_executed += 1;
        self.advance(1);
    }

    /// Jumps Count forward to one cycle before the next scheduled event.
    fn skip_idle(&mut self) {
        let skipped = self.events.skip_to_next_event(1);
        if skipped > 0 {
            let skipped = skipped as u64;
            self.cycles = self.cycles.wrapping_add(skipped);
            let count = self.cp0.get(regs::COUNT).wrapping_add(skipped) & 0xFFFF_FFFF;
            self.cp0.set_raw(regs::COUNT, count);
            self.stats.idle_cycles_skipped += skipped;
        }
    }
}
