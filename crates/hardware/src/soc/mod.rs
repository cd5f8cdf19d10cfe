//! System-side components the CPU talks to.
//!
//! This module organizes the collaborators of the CPU core: RDRAM, the physical
//! bus for memory-mapped devices, and the traits for the vector unit, the
//! interrupt controller, and breakpoints.

/// Physical bus interconnect and routing.
pub mod interconnect;

/// RDRAM and its backing buffer.
pub mod memory;

/// Collaborator trait definitions.
pub mod traits;

pub use interconnect::Bus;
pub use memory::Rdram;
