//! Cache-line index of compiled code.
//!
//! Maps each 32-byte instruction cache line to the entries of the fragments
//! compiled from it. A line is keyed by its virtual address; the kseg0/kseg1
//! alias of a written line is looked up as well, since both views fetch the
//! same physical bytes.

use std::collections::{BTreeSet, HashMap};

use crate::common::VirtAddr;
use crate::common::constants::ICACHE_LINE_SIZE;

const LINE_SHIFT: u32 = ICACHE_LINE_SIZE.trailing_zeros();

/// Line number of `vaddr`.
#[inline(always)]
pub const fn line_of(vaddr: u64) -> u64 {
    vaddr >> LINE_SHIFT
}

/// Line-to-fragment index.
#[derive(Clone, Debug, Default)]
pub struct InvalidationMap {
    lines: HashMap<u64, BTreeSet<u64>>,
}

impl InvalidationMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the fragment entered at `entry` as covering `lines`.
    pub fn insert(&mut self, entry: u64, lines: &[u64]) {
        for &line in lines {
            let _ = self.lines.entry(line).or_default().insert(entry);
        }
    }

    /// Forgets the fragment entered at `entry`.
    pub fn remove(&mut self, entry: u64, lines: &[u64]) {
        for line in lines {
            if let Some(set) = self.lines.get_mut(line) {
                let _ = set.remove(&entry);
                if set.is_empty() {
                    let _ = self.lines.remove(line);
                }
            }
        }
    }

    /// Entries of every fragment overlapping `[vaddr, vaddr + len)` or its unmapped alias.
    ///
    /// # Returns
    ///
    /// Fragment entries in ascending order, without duplicates.
    pub fn overlapping(&self, vaddr: u64, len: u64) -> BTreeSet<u64> {
        let mut hit = BTreeSet::new();
        let mut collect = |start: u64| {
            let first = line_of(start);
            let last = line_of(start.wrapping_add(len.max(1) - 1));
            for line in first..=last {
                if let Some(set) = self.lines.get(&line) {
                    hit.extend(set.iter().copied());
                }
            }
        };
        collect(vaddr);
        if let Some(alias) = VirtAddr::new(vaddr).unmapped_alias() {
            collect(alias.val());
        }
        hit
    }

    /// Returns `true` if `line` lies in `[vaddr, vaddr + len)` or its unmapped alias.
    pub fn covers(line: u64, vaddr: u64, len: u64) -> bool {
        let within = |start: u64| {
            (line_of(start)..=line_of(start.wrapping_add(len.max(1) - 1))).contains(&line)
        };
        within(vaddr)
            || VirtAddr::new(vaddr)
                .unmapped_alias()
                .is_some_and(|alias| within(alias.val()))
    }

    /// Number of indexed lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drops every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
