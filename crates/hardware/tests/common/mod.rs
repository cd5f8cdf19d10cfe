//! Shared test infrastructure.

/// Instruction word encoders.
pub mod builder;

/// `TestContext`: a machine with a program loaded.
pub mod harness;


#[cfg(test)]
mod infrastructure_tests;
