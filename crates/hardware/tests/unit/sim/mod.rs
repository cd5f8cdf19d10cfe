//! Simulation driver tests.
