//! Instruction-level tests driven through a `Machine`.


/// COP1 register moves, arithmetic, and FP exceptions.
pub mod cop1;

/// Exception delivery, ERET, interrupts, and the COP0 timer.
pub mod exceptions;

/// Integer instruction semantics.
pub mod integer;
