//! SoC tests.
