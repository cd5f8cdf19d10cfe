//! COP0 Side Effects.
//!
//! This module layers the behavior of the system control registers on top of the
//! raw bank in `core::arch::cp0`. It performs the following:
//! 1. **Read Operations:** Derives `Random` from elapsed cycles and `Wired`.
//! 2. **Write Operations:** Applies writable masks and reacts to Count, Compare, Status, Cause, and Wired.
//! 3. **Timer:** Keeps the `Compare` event scheduled at the next Count == Compare match.
//! 4. **Interrupts:** Samples the external line into Cause.IP2 and caches the pending flag.

use tracing::{debug, trace, warn};

use super::Cpu;
use crate::common::constants::COMPARE_PERIOD;
use crate::common::constants::TLB_ENTRIES;
use crate::core::arch::cp0::{self as regs};
use crate::core::units::events::{EventType, increment_count};

/// Count and Compare are 32 bits wide.
const COUNT_MASK: u64 = 0xFFFF_FFFF;

impl Cpu {
    /// Reads a COP0 register as `MFC0`/`DMFC0` observe it.
    ///
    /// # Arguments
    ///
    /// * `idx` - The register number; only the low five bits are used.
    ///
    /// # Returns
    ///
    /// The register value; reserved indices return the last value written to one of them.
    pub fn read_cp0(&self, idx: usize) -> u64 {
        match idx & 31 {
            regs::RANDOM => self.random(),
            _ => self.cp0.get(idx),
        }
    }

    /// Current `Random` value: counts down from 31 to `Wired` once per cycle, then wraps.
    pub fn random(&self) -> u64 {
        let wired = self.cp0.get(regs::WIRED).min(TLB_ENTRIES as u64 - 1);
        let span = TLB_ENTRIES as u64 - wired;
        let elapsed = self.cycles.wrapping_sub(self.random_epoch);
        wired + (span - 1 - elapsed % span)
    }

    /// Writes a COP0 register as `MTC0`/`DMTC0` do.
    ///
    /// # Arguments
    ///
    /// * `idx` - The register number; only the low five bits are used.
    /// * `val` - The value written by the instruction.
    pub fn write_cp0(&mut self, idx: usize, val: u64) {
        if !self.cp0.write(idx, val) {
            warn!(idx, val = format_args!("{val:#x}"), "write to read-only COP0 register ignored");
            return;
        }

        match idx & 31 {
            regs::COUNT => self.schedule_compare(),
            regs::COMPARE => {
                self.cp0.clear_bits(regs::CAUSE, regs::CAUSE_IP7);
                self.schedule_compare();
                self.update_interrupts();
            }
            regs::STATUS => self.status_changed(),
            regs::CAUSE => self.update_interrupts(),
            regs::WIRED => self.random_epoch = self.cycles,
            _ => {}
        }
    }

    /// Re-derives everything that depends on Status.
    ///
    /// Called after any Status change, including exception entry and `ERET`.
    pub fn status_changed(&mut self) {
        let status = self.cp0.status();
        self.regs.fpr.set_full_width(status & regs::STATUS_FR != 0);
        self.dispatch.set_cop1_usable(status & regs::STATUS_CU1 != 0);
        self.update_interrupts();
    }

    /// Samples the external interrupt line and recomputes `interrupts_pending`.
    pub fn update_interrupts(&mut self) {
        if self.interrupts.pending() {
            self.cp0.set_bits(regs::CAUSE, regs::CAUSE_IP2);
        } else {
            self.cp0.clear_bits(regs::CAUSE, regs::CAUSE_IP2);
        }
        self.interrupts_pending = self.cp0.interrupt_pending();
    }

    /// Reschedules the `Compare` event for the next Count == Compare match.
    pub fn schedule_compare(&mut self) {
        if let Some(left) = self.events.remove_events_of_type(EventType::Compare) {
            trace!(cycles_left = left, "compare event rescheduled");
        }
        let count = self.cp0.get(regs::COUNT);
        let compare = self.cp0.get(regs::COMPARE);
        let delta = compare.wrapping_sub(count) & COUNT_MASK;
        let countdown = if delta == 0 {
            COMPARE_PERIOD
        } else {
            delta as i64
        };
        if let Err(e) = self.events.add_event(EventType::Compare, countdown, compare_event) {
            warn!(error = %e, "cannot schedule compare event");
        }
    }

    /// Advances time by `cycles`: Count, the Random epoch base, and every due event.
    pub fn advance(&mut self, cycles: u64) {
        self.cycles = self.cycles.wrapping_add(cycles);
        let count = self.cp0.get(regs::COUNT).wrapping_add(cycles) & COUNT_MASK;
        self.cp0.set_raw(regs::COUNT, count);
        increment_count(self, cycles as i64);
    }
}

/// Count reached Compare: raise the timer interrupt and wait for the next wrap.
fn compare_event(cpu: &mut Cpu) {
    debug!(count = cpu.cp0.get(regs::COUNT), "compare timer fired");
    cpu.cp0.set_bits(regs::CAUSE, regs::CAUSE_IP7);
    if let Err(e) = cpu
        .events
        .add_event(EventType::Compare, COMPARE_PERIOD, compare_event)
    {
        warn!(error = %e, "cannot reschedule compare event");
    }
    cpu.update_interrupts();
}
