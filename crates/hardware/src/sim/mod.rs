//! Machine aggregate and run loop.
//!
//! The [`Machine`] owns the CPU, the recompiler, and the collaborators the run
//! loop drives, and exposes reset, bounded runs, single steps, and state access.

/// The machine and its run loop.
pub mod machine;

pub use machine::Machine;
