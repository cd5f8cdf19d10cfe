//! Statistics tests.
//!
//! Verifies that the machine fills in the counters it owns and that the
//! report renders the requested sections.

use vrsim_core::stats::{STATS_SECTIONS, SimStats};

use crate::common::builder::asm::*;
use crate::common::harness::TestContext;

#[test]
fn snapshot_counts_interpreted_instructions() {
    let mut ctx = TestContext::new().load_program(&[addiu(1, 0, 1), addiu(2, 0, 2), nop()]);
    let _ = ctx.step_n(3).unwrap();

    let stats = ctx.machine.stats();
    assert_eq!(stats.instructions, 3);
    assert_eq!(stats.interpreted_ops, 3);
    assert_eq!(stats.compiled_ops, 0);
    assert!(stats.cycles >= 3);
}

#[test]
fn exceptions_and_interrupts_are_counted_apart() {
    let mut ctx = TestContext::new().load_program(&[syscall()]);
    let _ = ctx.step();

    let stats = ctx.machine.stats();
    assert_eq!(stats.exceptions, 1);
    assert_eq!(stats.interrupts, 0);
}

#[test]
fn report_lists_every_section_by_default() {
    let report = SimStats::default().report_sections(&[]);
    for header in ["EXECUTION", "DYNAREC", "EXCEPTIONS", "sim_cycles"] {
        assert!(report.contains(header), "missing {header}");
    }
    assert_eq!(STATS_SECTIONS.len(), 4);
}

#[test]
fn unknown_sections_are_ignored() {
    let report = SimStats::default().report_sections(&["bogus"]);
    assert!(!report.contains("EXECUTION"));
    assert!(report.contains("VR4300 CORE STATISTICS"));
}

#[test]
fn execution_split_reports_percentages() {
    let mut stats = SimStats::default();
    stats.interpreted_ops = 1;
    stats.compiled_ops = 3;
    let report = stats.report_sections(&["execution"]);
    assert!(report.contains("(25.00%)"));
    assert!(report.contains("(75.00%)"));
}
