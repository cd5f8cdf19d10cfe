//! Compiled fragment representation.
//!
//! A fragment is a trace of instructions recorded from the interpreter, starting at
//! its entry `pc`. Each op carries the leaf handler that implements it, so running
//! a fragment skips every dispatch level.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::interp::OpHandler;

/// How much bookkeeping an op needs around it when it runs inside a fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpClass {
    /// Cannot fault, branch, or touch COP0; its `pc` and cycle update may be deferred.
    Trivial,
    /// May fault with a TLB or address error but never branches.
    Memory,
    /// Sets a branch target or skips a delay slot.
    Branch,
    /// Anything else; state is re-checked after it runs.
    Generic,
}

/// One recorded instruction.
#[derive(Clone, Copy)]
pub struct CompiledOp {
    /// Address the op was recorded at.
    pub addr: u64,
    /// Instruction word.
    pub word: u32,
    /// Leaf handler resolved through the dispatch tables.
    pub handler: OpHandler,
    /// Bookkeeping class.
    pub class: OpClass,
    /// The op ran in a branch delay slot when it was recorded.
    pub in_delay_slot: bool,
}

impl fmt::Debug for CompiledOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledOp")
            .field("addr", &format_args!("{:#x}", self.addr))
            .field("word", &format_args!("{:#010x}", self.word))
            .field("class", &self.class)
            .field("in_delay_slot", &self.in_delay_slot)
            .finish_non_exhaustive()
    }
}

/// Per-entry lifecycle in the fragment cache.
#[derive(Clone, Debug, Default)]
pub enum FragmentState {
    /// Not recorded yet, or reset by an invalidation.
    #[default]
    Empty,
    /// Instructions are being appended by the recorder.
    Recording,
    /// Ready to run.
    Compiled(Rc<CompiledFragment>),
}

/// A compiled trace.
pub struct CompiledFragment {
    /// Entry `pc`.
    pub entry: u64,
    /// Ops in recorded order.
    pub ops: Vec<CompiledOp>,
    /// Some op needs Status.CU1.
    pub uses_cop1: bool,
    /// Covered address runs as `[start, end)` pairs.
    pub ranges: Vec<(u64, u64)>,
    /// Instruction cache lines (`addr >> 5`) the ops were fetched from.
    pub lines: Vec<u64>,
    runs: Cell<u64>,
    valid: Cell<bool>,
    next: RefCell<Vec<Weak<Self>>>,
}

impl CompiledFragment {
    /// Wraps a list of compiled ops.
    pub fn new(entry: u64, ops: Vec<CompiledOp>, uses_cop1: bool) -> Self {
        let ranges = address_runs(&ops);
        let mut lines: Vec<u64> = ops.iter().map(|op| op.addr >> 5).collect();
        lines.sort_unstable();
        lines.dedup();
        let exits = ops.len() + 1;
        Self {
            entry,
            ops,
            uses_cop1,
            ranges,
            lines,
            runs: Cell::new(0),
            valid: Cell::new(true),
            next: RefCell::new(vec![Weak::new(); exits]),
        }
    }

    /// Number of compiled ops.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if the fragment holds no ops.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Times the fragment was entered.
    pub fn runs(&self) -> u64 {
        self.runs.get()
    }

    pub(super) fn count_run(&self) {
        self.runs.set(self.runs.get() + 1);
    }

    /// Returns `false` once the fragment has been invalidated.
    pub fn is_valid(&self) -> bool {
        self.valid.get()
    }

    pub(super) fn invalidate(&self) {
        self.valid.set(false);
        self.next.borrow_mut().clear();
    }

    /// Cached successor reached through exit `exit`, if it is still live and valid.
    pub fn next_at(&self, exit: usize) -> Option<Rc<Self>> {
        let next = self.next.borrow();
        let frag = next.get(exit)?.upgrade()?;
        frag.is_valid().then_some(frag)
    }

    /// Remembers `frag` as the successor of exit `exit`.
    pub fn link_next(&self, exit: usize, frag: &Rc<Self>) {
        if let Some(slot) = self.next.borrow_mut().get_mut(exit) {
            *slot = Rc::downgrade(frag);
        }
    }
}

impl fmt::Debug for CompiledFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFragment")
            .field("entry", &format_args!("{:#x}", self.entry))
            .field("ops", &self.ops.len())
            .field("uses_cop1", &self.uses_cop1)
            .field("runs", &self.runs.get())
            .field("valid", &self.valid.get())
            .finish_non_exhaustive()
    }
}

/// Merges op addresses into maximal runs of consecutive words.
fn address_runs(ops: &[CompiledOp]) -> Vec<(u64, u64)> {
    let mut addrs: Vec<u64> = ops.iter().map(|op| op.addr).collect();
    addrs.sort_unstable();
    addrs.dedup();

    let mut runs: Vec<(u64, u64)> = Vec::new();
    for addr in addrs {
        match runs.last_mut() {
            Some((_, end)) if *end == addr => *end = addr.wrapping_add(4),
            _ => runs.push((addr, addr.wrapping_add(4))),
        }
    }
    runs
}
