//! # Unit Components
//!
//! Tests grouped by the component they exercise: the processor core and its
//! functional units, the recompiler, the machine run loop, the SoC plumbing,
//! configuration loading, and statistics reporting.



/// Machine run loop and its collaborators.
pub mod sim;

/// Bus routing and RDRAM byte order.
pub mod soc;

/// Statistics counters and section reports.
pub mod stats;
