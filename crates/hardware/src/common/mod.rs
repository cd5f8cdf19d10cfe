//! Common utilities and types used throughout the VR4300 core.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the core. It includes:
//! 1. **Address Types:** Strong types for virtual and physical addresses and segment decoding.
//! 2. **Constants:** Segment bases, exception vectors, and structure sizes.
//! 3. **Memory Access:** Definitions for categorizing memory operations (Fetch/Read/Write).
//! 4. **Error Handling:** Traps, fatal errors, and component error types.
//! 5. **Register Management:** A unified interface for GPR, HI/LO, and FPR access.

/// Address type definitions (physical and virtual addresses).
pub mod addr;

/// Common constants used throughout the core.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types and trap definitions.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use addr::{PhysAddr, Segment, VirtAddr};
pub use data::{AccessType, AccessWidth};
pub use error::{ConfigError, CpuError, EventError, Fault, Trap};
pub use reg::RegisterFile;
