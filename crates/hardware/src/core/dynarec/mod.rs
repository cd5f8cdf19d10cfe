//! Trace-based Dynamic Recompiler.
//!
//! This module replaces interpretation of hot code with compiled fragments. It covers:
//! 1. **Hot Detection:** Counting landings (taken branches, exception vectors) per `pc`.
//! 2. **Recording:** Growing a trace from the instructions the interpreter retires.
//! 3. **Compilation:** Resolving each recorded op to its leaf handler and class (see [`codegen`]).
//! 4. **Execution:** Running fragments with deferred bookkeeping (see [`exec`]).
//! 5. **Invalidation:** Resetting fragments whose code was rewritten or remapped.
//!
//! A fragment moves through `Empty -> Recording -> Compiled`, and back to `Empty`
//! when an invalidation touches it.

/// Op classification and leaf-handler resolution.
pub mod codegen;

/// Fragment executor.
pub mod exec;

/// Compiled fragments and their lifecycle states.
pub mod fragment;

/// Cache-line index of compiled code.
pub mod invalidation;

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::debug;

use self::codegen::RecordedOp;
use self::exec::FragmentExit;
use self::fragment::{CompiledFragment, FragmentState};
use self::invalidation::{InvalidationMap, line_of};
use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::{CpuError, VirtAddr};
use crate::config::DynarecConfig;
use crate::core::Cpu;
use crate::core::cpu::execution::Retired;
use crate::soc::traits::{BreakpointRegistry, VectorUnit};
use crate::stats::SimStats;

/// Trace being recorded.
#[derive(Debug)]
struct Recorder {
    entry: u64,
    ops: Vec<RecordedOp>,
    seen: HashSet<u64>,
}

/// Recorder verdict after an op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Close {
    Continue,
    Compile,
}

/// The fragment cache and its recorder.
#[derive(Debug)]
pub struct Dynarec {
    enabled: bool,
    hot_threshold: u32,
    max_ops: usize,
    hits: HashMap<u64, u32>,
    fragments: HashMap<u64, FragmentState>,
    recorder: Option<Recorder>,
    invalidation: InvalidationMap,
    last_exit: Option<(Rc<CompiledFragment>, usize)>,
}

impl Dynarec {
    /// Creates an empty cache.
    ///
    /// # Arguments
    ///
    /// * `config` - Enable flag, hotness threshold, and trace length limit.
    pub fn new(config: &DynarecConfig) -> Self {
        Self {
            enabled: config.enabled,
            hot_threshold: config.hot_threshold,
            max_ops: config.max_fragment_ops.max(1),
            hits: HashMap::new(),
            fragments: HashMap::new(),
            recorder: None,
            invalidation: InvalidationMap::new(),
            last_exit: None,
        }
    }

    /// Returns `true` if recompilation is enabled.
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables recompilation. Disabling drops every fragment.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear();
        }
    }

    /// Drops every fragment, hit count, and the trace in progress.
    pub fn clear(&mut self) {
        for state in self.fragments.values() {
            if let FragmentState::Compiled(frag) = state {
                frag.invalidate();
            }
        }
        self.hits.clear();
        self.fragments.clear();
        self.recorder = None;
        self.invalidation.clear();
        self.last_exit = None;
    }

    /// Lifecycle state of the fragment entered at `entry`.
    pub fn state(&self, entry: u64) -> FragmentState {
        self.fragments.get(&entry).cloned().unwrap_or_default()
    }

    /// Number of compiled fragments.
    pub fn compiled_count(&self) -> usize {
        self.fragments
            .values()
            .filter(|s| matches!(s, FragmentState::Compiled(_)))
            .count()
    }

    /// Returns `true` while a trace is being recorded.
    pub const fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Finds a fragment that may be entered at the CPU's current `pc`.
    ///
    /// A fragment is not entered while a delay slot is pending, while an event is
    /// due within its length, while it needs COP1 and COP1 is unusable, or when
    /// a breakpoint lies inside it.
    pub fn lookup(
        &mut self,
        cpu: &Cpu,
        breakpoints: &dyn BreakpointRegistry,
    ) -> Option<Rc<CompiledFragment>> {
        let previous = self.last_exit.take();
        if !self.enabled || self.recorder.is_some() || cpu.in_delay_slot() {
            return None;
        }

        let pc = cpu.pc;
        let frag = match previous
            .as_ref()
            .and_then(|(prev, exit)| prev.next_at(*exit))
            .filter(|f| f.entry == pc)
        {
            Some(frag) => frag,
            None => {
                let Some(FragmentState::Compiled(frag)) = self.fragments.get(&pc) else {
                    return None;
                };
                if let Some((prev, exit)) = &previous {
                    prev.link_next(*exit, frag);
                }
                Rc::clone(frag)
            }
        };

        let head = cpu.events.cycles_until_next().unwrap_or(i64::MAX);
        let enterable = frag.is_valid()
            && head > frag.len() as i64
            && (!frag.uses_cop1 || cpu.cop1_usable())
            && !frag
                .ranges
                .iter()
                .any(|&(start, end)| breakpoints.any_in(start, end));
        enterable.then_some(frag)
    }

    /// Runs a fragment returned by [`Dynarec::lookup`].
    pub fn execute(
        &mut self,
        cpu: &mut Cpu,
        frag: Rc<CompiledFragment>,
        vector_unit: &mut dyn VectorUnit,
    ) -> Result<FragmentExit, CpuError> {
        let exit = exec::run(cpu, &frag, vector_unit)?;
        self.last_exit = Some((frag, exit.index));
        if !cpu.in_delay_slot() {
            self.count_hit(cpu.pc);
        }
        Ok(exit)
    }

    /// Feeds an interpreted instruction to hot detection and the recorder.
    ///
    /// `cpu` is the state after `retired` committed.
    pub fn observe(&mut self, cpu: &mut Cpu, retired: &Retired) {
        if !self.enabled {
            return;
        }

        if self.recorder.is_some() {
            if self.record(cpu, retired) == Close::Compile {
                self.close(cpu);
            }
            return;
        }

        let landing = retired.trapped || cpu.pc != retired.addr.wrapping_add(INSTRUCTION_SIZE);
        if landing && !cpu.in_delay_slot() {
            self.count_hit(cpu.pc);
        }
    }

    /// Counts a landing at `pc`; past the threshold, recording starts there.
    fn count_hit(&mut self, pc: u64) {
        if !matches!(self.state(pc), FragmentState::Empty) {
            return;
        }
        let hits = self.hits.entry(pc).or_insert(0);
        *hits += 1;
        if *hits <= self.hot_threshold {
            return;
        }
        let _ = self.hits.remove(&pc);
        debug!(entry = format_args!("{pc:#x}"), "fragment recording");
        let _ = self.fragments.insert(pc, FragmentState::Recording);
        self.recorder = Some(Recorder {
            entry: pc,
            ops: Vec::new(),
            seen: HashSet::new(),
        });
    }

    fn record(&mut self, cpu: &Cpu, retired: &Retired) -> Close {
        let Some(rec) = self.recorder.as_mut() else {
            return Close::Continue;
        };
        if rec.ops.is_empty() && retired.addr != rec.entry {
            // Recording starts with the entry instruction.
            return Close::Compile;
        }
        if retired.trapped {
            return Close::Compile;
        }

        rec.ops.push(RecordedOp {
            addr: retired.addr,
            word: retired.word,
            in_delay_slot: retired.in_delay_slot,
        });
        let _ = rec.seen.insert(retired.addr);

        if rec.ops.len() >= self.max_ops || cpu.breakout.is_some() || cpu.interrupts_pending {
            return Close::Compile;
        }
        if !cpu.in_delay_slot()
            && (cpu.pc == rec.entry
                || rec.seen.contains(&cpu.pc)
                || matches!(self.fragments.get(&cpu.pc), Some(FragmentState::Compiled(_))))
        {
            return Close::Compile;
        }
        Close::Continue
    }

    /// Ends the trace in progress, compiling it if it holds any ops.
    fn close(&mut self, cpu: &mut Cpu) {
        let Some(rec) = self.recorder.take() else {
            return;
        };
        if !matches!(self.fragments.get(&rec.entry), Some(FragmentState::Recording)) {
            return;
        }
        if rec.ops.is_empty() {
            let _ = self.fragments.remove(&rec.entry);
            return;
        }

        let frag = Rc::new(codegen::compile(rec.entry, &rec.ops, &cpu.dispatch));
        debug!(
            entry = format_args!("{:#x}", rec.entry),
            ops = frag.len(),
            "fragment compiled"
        );
        self.invalidation.insert(rec.entry, &frag.lines);
        let _ = self
            .fragments
            .insert(rec.entry, FragmentState::Compiled(frag));
        cpu.stats.fragments_compiled += 1;
    }

    /// Resets every fragment, compiled or recording, whose code overlaps
    /// `[vaddr, vaddr + len)` or its kseg0/kseg1 alias.
    pub fn invalidate(&mut self, vaddr: u64, len: u64, stats: &mut SimStats) {
        let mut hit = self.invalidation.overlapping(vaddr, len);
        if let Some(rec) = &self.recorder {
            if rec
                .ops
                .iter()
                .map(|op| op.addr)
                .chain(std::iter::once(rec.entry))
                .any(|addr| InvalidationMap::covers(line_of(addr), vaddr, len))
            {
                let _ = hit.insert(rec.entry);
            }
        }
        if hit.is_empty() {
            return;
        }
        for &entry in &hit {
            self.reset_fragment(entry);
        }
        stats.invalidated_fragments += hit.len() as u64;
        debug!(
            start = format_args!("{vaddr:#x}"),
            len,
            fragments = hit.len(),
            "fragments invalidated"
        );
    }

    /// Resets every fragment entered in a TLB-mapped segment.
    pub fn invalidate_mapped(&mut self, stats: &mut SimStats) {
        let mapped: Vec<u64> = self
            .fragments
            .keys()
            .copied()
            .filter(|&entry| VirtAddr::new(entry).segment().is_mapped())
            .collect();
        if mapped.is_empty() {
            return;
        }
        for &entry in &mapped {
            self.reset_fragment(entry);
        }
        stats.invalidated_fragments += mapped.len() as u64;
        debug!(fragments = mapped.len(), "mapped fragments invalidated");
    }

    fn reset_fragment(&mut self, entry: u64) {
        if self.recorder.as_ref().is_some_and(|rec| rec.entry == entry) {
            self.recorder = None;
        }
        if let Some(FragmentState::Compiled(frag)) = self.fragments.remove(&entry) {
            frag.invalidate();
            self.invalidation.remove(entry, &frag.lines);
        }
        let _ = self.hits.remove(&entry);
        if self
            .last_exit
            .as_ref()
            .is_some_and(|(frag, _)| frag.entry == entry)
        {
            self.last_exit = None;
        }
    }
}
