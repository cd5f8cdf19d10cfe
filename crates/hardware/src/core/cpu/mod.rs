//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which serves as the container for the
//! entire processor state. It coordinates the following:
//! 1. **State Management:** Registers, program counter, the delay-slot pair, and COP0/COP1 control state.
//! 2. **Timing:** The event queue that Count, Compare, and bounded runs are scheduled on.
//! 3. **Memory Hierarchy:** MMU, RDRAM, and the physical bus for memory-mapped devices.
//! 4. **Dispatch:** The six interpreter tables, re-targeted when Status.CU1 changes.

/// COP0 register side effects (timer, Random, interrupts, FPU mode).
pub mod cp0;

/// Instruction stepping and the shared per-instruction commit path.
pub mod execution;

/// Memory access layer: fast RDRAM path, translated slow path, masked stores.
pub mod memory;

/// Exception delivery and `ERET`.
pub mod trap;

use crate::common::constants::ICACHE_LINE_SIZE;
use crate::common::{CpuError, RegisterFile};
use crate::config::Config;
use crate::core::arch::cp0::{self as regs, ControlRegisters};
use crate::core::interp::DispatchTables;
use crate::core::units::events::{EventQueue, Scheduled};
use crate::core::units::fpu::exception_flags::Fcr31;
use crate::core::units::mmu::Mmu;
use crate::soc::traits::{InterruptController, NoInterrupts};
use crate::soc::{Bus, Rdram};
use crate::stats::SimStats;

/// Why the run loop was asked to stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunExit {
    /// The cycle budget given to `run` was consumed.
    BudgetExhausted,
    /// A halt was requested.
    Halted,
    /// Execution reached a registered breakpoint; the instruction there has not run.
    Breakpoint(u64),
}

/// Main CPU structure containing all processor state and components.
///
/// Branches never write `pc` directly: they set `branch_target`, which becomes
/// `delay_slot` once the following instruction completes, and is consumed as
/// the next `pc` after the delay-slot instruction.
pub struct Cpu {
    /// General Purpose, HI/LO, and Floating Point Registers.
    pub regs: RegisterFile,
    /// Address of the instruction about to execute.
    pub pc: u64,
    /// Address the current instruction continues to; handlers may adjust it.
    pub next_pc: u64,
    /// Target to jump to after the instruction at `pc` (a delay slot) completes.
    pub delay_slot: Option<u64>,
    /// Target set by the branch currently executing.
    pub branch_target: Option<u64>,
    /// Load-linked bit for `LL`/`SC`.
    pub ll_bit: bool,

    /// System control coprocessor registers.
    pub cp0: ControlRegisters,
    /// Total cycles elapsed since reset; Count and Random derive from it.
    pub cycles: u64,
    /// Cycle at which Wired was last written.
    pub random_epoch: u64,
    /// FPU control/status register.
    pub fcr31: Fcr31,
    /// The COP2 transfer latch.
    pub cop2_latch: u64,

    /// Memory Management Unit.
    pub mmu: Mmu,
    /// Main memory at physical address 0.
    pub ram: Rdram,
    /// Memory-mapped devices outside RDRAM.
    pub bus: Bus,
    /// Timed callbacks (compare interrupt, run budget).
    pub events: EventQueue<Self>,
    /// Interpreter dispatch tables.
    pub dispatch: DispatchTables,

    /// Cached "an enabled interrupt is pending" flag.
    pub interrupts_pending: bool,
    /// The RCP interrupt line feeding Cause.IP2.
    pub interrupts: Box<dyn InterruptController>,
    /// Set by an event or a halt request; ends the current run.
    pub breakout: Option<RunExit>,

    /// Instructions executed since reset.
    pub ops_executed: u64,
    /// Emit a `trace!` event per instruction.
    pub trace: bool,
    /// Fast-forward self-branch idle loops.
    pub idle_skip: bool,
    /// The current instruction is an idle-loop branch; skip ahead once it commits.
    pub idle_pending: bool,
    /// Code ranges written by `CACHE`, awaiting fragment invalidation.
    pub code_invalidations: Vec<(u64, u64)>,
    /// A TLB entry was rewritten since the last drain.
    pub tlb_dirty: bool,
    /// Performance statistics.
    pub stats: SimStats,

    initial_status: u64,
    initial_config: u64,
    start_pc: u64,
}

impl Cpu {
    /// Creates a CPU in its reset state.
    ///
    /// # Arguments
    ///
    /// * `config` - The machine configuration.
    ///
    /// # Returns
    ///
    /// The CPU, or `CpuError::DispatchTableSize` if a dispatch table is malformed.
    pub fn new(config: &Config) -> Result<Self, CpuError> {
        let dispatch = DispatchTables::new()?;
        let mut cpu = Self {
            regs: RegisterFile::new(),
            pc: config.general.start_pc,
            next_pc: 0,
            delay_slot: None,
            branch_target: None,
            ll_bit: false,
            cp0: ControlRegisters::new(config.cpu.initial_status, config.cpu.initial_config),
            cycles: 0,
            random_epoch: 0,
            fcr31: Fcr31::default(),
            cop2_latch: 0,
            mmu: Mmu::new(),
            ram: Rdram::new(config.memory.ram_size),
            bus: Bus::new(),
            events: EventQueue::new(),
            dispatch,
            interrupts_pending: false,
            interrupts: Box::new(NoInterrupts),
            breakout: None,
            ops_executed: 0,
            trace: config.general.trace_instructions,
            idle_skip: config.general.idle_loop_skip,
            idle_pending: false,
            code_invalidations: Vec::new(),
            tlb_dirty: false,
            stats: SimStats::default(),
            initial_status: config.cpu.initial_status,
            initial_config: config.cpu.initial_config,
            start_pc: config.general.start_pc,
        };
        cpu.reset();
        Ok(cpu)
    }

    /// Returns the processor to its configured reset state.
    ///
    /// RDRAM contents, the bus, and the interrupt controller are kept.
    pub fn reset(&mut self) {
        self.regs = RegisterFile::new();
        self.pc = self.start_pc;
        self.next_pc = self.start_pc;
        self.delay_slot = None;
        self.branch_target = None;
        self.ll_bit = false;
        self.cp0 = ControlRegisters::new(self.initial_status, self.initial_config);
        self.cycles = 0;
        self.random_epoch = 0;
        self.fcr31 = Fcr31::default();
        self.cop2_latch = 0;
        self.mmu = Mmu::new();
        self.events.clear();
        self.breakout = None;
        self.idle_pending = false;
        self.ops_executed = 0;
        self.code_invalidations.clear();
        self.tlb_dirty = true;
        self.stats = SimStats::default();

        let status = self.cp0.status();
        self.regs.fpr.set_full_width(status & regs::STATUS_FR != 0);
        self.dispatch.set_cop1_usable(status & regs::STATUS_CU1 != 0);
        self.schedule_compare();
        self.update_interrupts();
    }

    /// Returns `true` if the instruction at `pc` is a branch delay slot.
    #[inline(always)]
    pub const fn in_delay_slot(&self) -> bool {
        self.delay_slot.is_some()
    }

    /// Returns `true` if COP1 instructions currently execute.
    #[inline]
    pub const fn cop1_usable(&self) -> bool {
        self.cp0.status() & regs::STATUS_CU1 != 0
    }

    /// Queues invalidation of the code cache lines covering `[vaddr, vaddr + len)`.
    pub fn invalidate_code(&mut self, vaddr: u64, len: u64) {
        let start = vaddr & !(ICACHE_LINE_SIZE - 1);
        self.code_invalidations.push((start, len.max(1) + (vaddr - start)));
    }

    /// Dumps the current CPU state through `tracing`.
    pub fn dump_state(&self) {
        tracing::debug!(
            pc = format_args!("{:#018x}", self.pc),
            status = format_args!("{:#010x}", self.cp0.status()),
            cause = format_args!("{:#010x}", self.cp0.cause()),
            count = self.cp0.get(regs::COUNT),
            "cpu state"
        );
        self.regs.dump();
    }
}

impl Scheduled for Cpu {
    fn event_queue(&mut self) -> &mut EventQueue<Self> {
        &mut self.events
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("pc", &format_args!("{:#018x}", self.pc))
            .field("delay_slot", &self.delay_slot)
            .field("ops_executed", &self.ops_executed)
            .field("cycles", &self.cycles)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
