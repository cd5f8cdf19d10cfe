//! Machine: owns the CPU, the recompiler, and the external collaborators.
//!
//! The run loop interleaves exactly one vector-unit step with every CPU
//! instruction, whether the instruction is interpreted or run from a compiled
//! fragment. Stop requests (budget exhausted, halt) are observed between
//! instructions only.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info};

use crate::common::constants::KSEG0_BASE;
use crate::common::CpuError;
use crate::config::Config;
use crate::core::cpu::execution::Retired;
use crate::core::dynarec::Dynarec;
use crate::core::units::events::EventType;
use crate::core::units::fpu::exception_flags::Fcr31;
use crate::core::{Cpu, RunExit};
use crate::soc::traits::{BreakpointRegistry, IdleVectorUnit, InterruptController, VectorUnit};
use crate::soc::Bus;
use crate::stats::SimStats;

/// Callback run after every [`Machine::reset`].
pub type ResetHook = Box<dyn FnMut()>;

/// The emulated processor together with everything the run loop drives.
pub struct Machine {
    cpu: Cpu,
    dynarec: Dynarec,
    vector_unit: Box<dyn VectorUnit>,
    breakpoints: Box<dyn BreakpointRegistry>,
    on_reset: Vec<ResetHook>,
    resume_at: Option<u64>,
}

impl Machine {
    /// Builds a machine in its reset state with no devices, an idle vector unit,
    /// no interrupt sources, and no breakpoints.
    ///
    /// # Arguments
    ///
    /// * `config` - The machine configuration.
    ///
    /// # Returns
    ///
    /// The machine, or the error raised while building the dispatch tables.
    pub fn new(config: &Config) -> Result<Self, CpuError> {
        let cpu = Cpu::new(config)?;
        info!(
            pc = format_args!("{:#x}", cpu.pc),
            ram = config.memory.ram_size,
            dynarec = config.dynarec.enabled,
            "machine created"
        );
        Ok(Self {
            cpu,
            dynarec: Dynarec::new(&config.dynarec),
            vector_unit: Box::new(IdleVectorUnit),
            breakpoints: Box::new(HashSet::<u64>::new()),
            on_reset: Vec::new(),
            resume_at: None,
        })
    }

    /// Replaces the physical bus.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.cpu.bus = bus;
        self
    }

    /// Replaces the vector unit stepped alongside the CPU.
    pub fn with_vector_unit(mut self, unit: Box<dyn VectorUnit>) -> Self {
        self.vector_unit = unit;
        self
    }

    /// Replaces the source of the external interrupt line.
    pub fn with_interrupt_controller(mut self, controller: Box<dyn InterruptController>) -> Self {
        self.cpu.interrupts = controller;
        self.cpu.update_interrupts();
        self
    }

    /// Replaces the breakpoint registry consulted by [`Machine::run`].
    pub fn with_breakpoints(mut self, breakpoints: Box<dyn BreakpointRegistry>) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    /// Registers a callback run after every reset.
    pub fn on_reset(&mut self, hook: impl FnMut() + 'static) {
        self.on_reset.push(Box::new(hook));
    }

    /// Resets the CPU and drops every compiled fragment. RDRAM is kept.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.dynarec.clear();
        self.resume_at = None;
        info!(pc = format_args!("{:#x}", self.cpu.pc), "machine reset");
        for hook in &mut self.on_reset {
            hook();
        }
    }

    /// Runs until `budget` cycles have elapsed, a halt is requested, or a
    /// breakpoint is reached.
    ///
    /// Resuming after a breakpoint executes the instruction it stopped at.
    ///
    /// # Arguments
    ///
    /// * `budget` - Cycles to run; zero returns immediately.
    ///
    /// # Returns
    ///
    /// Why the run stopped, or the fatal error that stopped it. After a fatal
    /// error the CPU is left at the offending instruction.
    pub fn run(&mut self, budget: u64) -> Result<RunExit, CpuError> {
        if budget == 0 {
            return Ok(RunExit::BudgetExhausted);
        }
        let countdown = i64::try_from(budget).unwrap_or(i64::MAX);
        if let Err(e) = self
            .cpu
            .events
            .add_event(EventType::RunForCycles, countdown, budget_expired)
        {
            tracing::warn!(error = %e, "cannot schedule run budget");
        }

        let result = self.run_loop();
        // Still queued when the run stopped early (halt, breakpoint, fatal error).
        if let Some(left) = self.cpu.events.remove_events_of_type(EventType::RunForCycles) {
            debug!(cycles_left = left, "unused run budget dropped");
        }
        if let Ok(exit) = &result {
            debug!(?exit, pc = format_args!("{:#x}", self.cpu.pc), "run finished");
        }
        result
    }

    fn run_loop(&mut self) -> Result<RunExit, CpuError> {
        let mut resume_at = self.resume_at.take();
        loop {
            if let Some(exit) = self.cpu.breakout.take() {
                return Ok(exit);
            }

            self.cpu.update_interrupts();
            if self.cpu.interrupts_pending {
                self.cpu.deliver_interrupt();
            }

            let pc = self.cpu.pc;
            if resume_at.take() != Some(pc) && self.breakpoints.contains(pc) {
                self.resume_at = Some(pc);
                return Ok(RunExit::Breakpoint(pc));
            }

            if let Some(frag) = self.dynarec.lookup(&self.cpu, self.breakpoints.as_ref()) {
                let _ = self
                    .dynarec
                    .execute(&mut self.cpu, frag, self.vector_unit.as_mut())?;
            } else {
                let retired = self.interpret()?;
                self.dynarec.observe(&mut self.cpu, &retired);
            }
            self.drain_invalidations();
        }
    }

    /// Interprets one instruction and steps the vector unit.
    fn interpret(&mut self) -> Result<Retired, CpuError> {
        let retired = self.cpu.step()?;
        self.cpu.stats.interpreted_ops += 1;
        self.vector_unit.step();
        Ok(retired)
    }

    fn drain_invalidations(&mut self) {
        for (vaddr, len) in std::mem::take(&mut self.cpu.code_invalidations) {
            self.dynarec.invalidate(vaddr, len, &mut self.cpu.stats);
        }
        if std::mem::take(&mut self.cpu.tlb_dirty) {
            self.dynarec.invalidate_mapped(&mut self.cpu.stats);
        }
    }

    /// Executes a single instruction through the interpreter, ignoring breakpoints.
    ///
    /// A pending interrupt is delivered first; the instruction then runs at its vector.
    pub fn step(&mut self) -> Result<Retired, CpuError> {
        self.cpu.update_interrupts();
        if self.cpu.interrupts_pending {
            self.cpu.deliver_interrupt();
        }
        let retired = self.interpret()?;
        self.drain_invalidations();
        Ok(retired)
    }

    /// Asks the current (or next) run to stop before its next instruction.
    pub fn request_halt(&mut self) {
        self.cpu.breakout = Some(RunExit::Halted);
    }

    /// Resets fragments covering `[vaddr, vaddr + len)` and its kseg0/kseg1 alias.
    pub fn invalidate_code(&mut self, vaddr: u64, len: u64) {
        self.dynarec.invalidate(vaddr, len, &mut self.cpu.stats);
    }

    /// Copies big-endian instruction words into RDRAM at physical `paddr`.
    ///
    /// Fragments compiled from the overwritten range are invalidated.
    pub fn load_program(&mut self, paddr: usize, words: &[u32]) {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
        self.cpu.ram.load(paddr, &bytes);
        self.invalidate_code(KSEG0_BASE + paddr as u64, bytes.len() as u64);
    }

    /// Instructions executed since reset.
    pub const fn ops_executed(&self) -> u64 {
        self.cpu.ops_executed
    }

    /// General-purpose register `idx`.
    pub const fn gpr(&self, idx: usize) -> u64 {
        self.cpu.regs.read(idx)
    }

    /// Writes general-purpose register `idx`; writes to `r0` are ignored.
    pub const fn set_gpr(&mut self, idx: usize, val: u64) {
        self.cpu.regs.write(idx, val);
    }

    /// COP0 register `idx` as `DMFC0` would read it.
    pub fn cp0(&self, idx: usize) -> u64 {
        self.cpu.read_cp0(idx)
    }

    /// FPR `idx` read as a single.
    pub const fn fpr_s(&self, idx: usize) -> u32 {
        self.cpu.regs.fpr.read_s(idx)
    }

    /// FPR `idx` read as a double.
    pub const fn fpr_d(&self, idx: usize) -> u64 {
        self.cpu.regs.fpr.read_d(idx)
    }

    /// FPU control/status register.
    pub const fn fcr31(&self) -> Fcr31 {
        self.cpu.fcr31
    }

    /// HI register.
    pub const fn hi(&self) -> u64 {
        self.cpu.regs.hi
    }

    /// LO register.
    pub const fn lo(&self) -> u64 {
        self.cpu.regs.lo
    }

    /// Address of the next instruction.
    pub const fn pc(&self) -> u64 {
        self.cpu.pc
    }

    /// Snapshot of the statistics, with cycle and instruction totals filled in.
    pub fn stats(&self) -> SimStats {
        let mut stats = self.cpu.stats.clone();
        stats.cycles = self.cpu.cycles;
        stats.instructions = self.cpu.ops_executed;
        stats
    }

    /// The processor.
    pub const fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// The processor, mutably. Direct edits bypass fragment invalidation;
    /// follow code writes with [`Machine::invalidate_code`].
    pub const fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// The recompiler.
    pub const fn dynarec(&self) -> &Dynarec {
        &self.dynarec
    }

    /// The recompiler, mutably.
    pub const fn dynarec_mut(&mut self) -> &mut Dynarec {
        &mut self.dynarec
    }
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("cpu", &self.cpu)
            .field("dynarec", &self.dynarec)
            .field("on_reset", &self.on_reset.len())
            .finish_non_exhaustive()
    }
}

/// `RunForCycles` handler: ends the current run.
fn budget_expired(cpu: &mut Cpu) {
    let _ = cpu.breakout.get_or_insert(RunExit::BudgetExhausted);
}
