//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the VR4300 core. It provides:
//! 1. **Throughput:** Cycles, executed instructions, and host speed.
//! 2. **Execution split:** Instructions interpreted vs. run from compiled fragments.
//! 3. **Recompiler:** Fragments compiled, entered, bailed out of, and invalidated.
//! 4. **Exceptions:** Exceptions and interrupts taken, idle cycles skipped.

use std::fmt::{self, Write as _};
use std::time::Instant;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Cycles elapsed; filled in when a snapshot is taken.
    pub cycles: u64,
    /// Instructions executed; filled in when a snapshot is taken.
    pub instructions: u64,

    /// Instructions run by the interpreter loop.
    pub interpreted_ops: u64,
    /// Instructions run from compiled fragments.
    pub compiled_ops: u64,

    /// Traces compiled into fragments.
    pub fragments_compiled: u64,
    /// Fragment entries.
    pub fragment_runs: u64,
    /// Fragment runs that left before the last op.
    pub bailouts: u64,
    /// Fragments reset by code or TLB invalidation.
    pub invalidated_fragments: u64,

    /// Exceptions taken, excluding interrupts.
    pub exceptions: u64,
    /// Interrupts taken.
    pub interrupts: u64,
    /// Cycles fast-forwarded by idle-loop detection.
    pub idle_cycles_skipped: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions: 0,
            interpreted_ops: 0,
            compiled_ops: 0,
            fragments_compiled: 0,
            fragment_runs: 0,
            bailouts: 0,
            invalidated_fragments: 0,
            exceptions: 0,
            interrupts: 0,
            idle_cycles_skipped: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to [`SimStats::report_sections`] to include all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "execution", "dynarec", "exceptions"];

const RULE: &str = "----------------------------------------------------------";
const BANNER: &str = "==========================================================";

impl SimStats {
    /// Renders the requested statistics sections.
    ///
    /// # Arguments
    ///
    /// * `sections` - Names from [`STATS_SECTIONS`], or empty for all.
    ///
    /// # Returns
    ///
    /// The report text. Unknown section names are ignored.
    pub fn report_sections(&self, sections: &[&str]) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_sections(&mut out, sections);
        out
    }

    fn write_sections(&self, out: &mut String, sections: &[&str]) -> fmt::Result {
        let want = |s: &str| sections.is_empty() || sections.contains(&s);
        let seconds = self.start_time.elapsed().as_secs_f64().max(f64::EPSILON);
        let executed = self.interpreted_ops + self.compiled_ops;

        writeln!(out, "{BANNER}")?;
        writeln!(out, "VR4300 CORE STATISTICS")?;
        writeln!(out, "{BANNER}")?;
        if want("summary") {
            writeln!(out, "host_seconds             {seconds:.4} s")?;
            writeln!(out, "sim_cycles               {}", self.cycles)?;
            writeln!(out, "sim_insts                {}", self.instructions)?;
            writeln!(
                out,
                "sim_mips                 {:.2}",
                self.instructions as f64 / seconds / 1_000_000.0
            )?;
            writeln!(out, "{RULE}")?;
        }
        if want("execution") {
            let pct = |n: u64| {
                if executed == 0 {
                    0.0
                } else {
                    n as f64 / executed as f64 * 100.0
                }
            };
            writeln!(out, "EXECUTION")?;
            writeln!(
                out,
                "  interpreted            {:<10} ({:.2}%)",
                self.interpreted_ops,
                pct(self.interpreted_ops)
            )?;
            writeln!(
                out,
                "  compiled               {:<10} ({:.2}%)",
                self.compiled_ops,
                pct(self.compiled_ops)
            )?;
            writeln!(out, "{RULE}")?;
        }
        if want("dynarec") {
            writeln!(out, "DYNAREC")?;
            writeln!(out, "  fragments.compiled     {}", self.fragments_compiled)?;
            writeln!(out, "  fragments.runs         {}", self.fragment_runs)?;
            writeln!(out, "  fragments.bailouts     {}", self.bailouts)?;
            writeln!(out, "  fragments.invalidated  {}", self.invalidated_fragments)?;
            writeln!(out, "{RULE}")?;
        }
        if want("exceptions") {
            writeln!(out, "EXCEPTIONS")?;
            writeln!(out, "  exceptions             {}", self.exceptions)?;
            writeln!(out, "  interrupts             {}", self.interrupts)?;
            writeln!(out, "  idle_cycles_skipped    {}", self.idle_cycles_skipped)?;
        }
        writeln!(out, "{BANNER}")
    }

    /// Prints the requested sections to stdout.
    pub fn print_sections(&self, sections: &[&str]) {
        print!("{}", self.report_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report_sections(&[]))
    }
}
