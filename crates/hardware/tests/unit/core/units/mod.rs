//! Functional unit tests.


/// Delta-encoded event queue.
pub mod events;


/// TLB matching, canonicalization, and fault classification.
pub mod tlb;
