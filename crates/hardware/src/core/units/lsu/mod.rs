//! Load/Store Unit (LSU).
//!
//! This module provides the data-path helpers for partial-word accesses:
//! - [`unaligned`]: byte-lane merges for `LWL`/`LWR`/`LDL`/`LDR` and the
//!   value/mask pairs `SWL`/`SWR`/`SDL`/`SDR` hand to the masked stores.
//!
//! Address translation, alignment checks, and the RDRAM/bus split live in
//! `core::cpu::memory`.

/// Partial-word (left/right) load merges and store masks.
pub mod unaligned;
