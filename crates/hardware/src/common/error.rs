//! Trap, fault, and error definitions.
//!
//! This module defines the error handling and trap mechanisms for the core. It provides:
//! 1. **Trap Representation:** Architectural exceptions and the interrupt, each mapped to a MIPS `ExcCode`.
//! 2. **Instruction Outcome:** `Fault`, distinguishing recoverable traps from fatal conditions.
//! 3. **Component Errors:** Scheduler misuse and configuration loading failures.

use thiserror::Error;

/// Architectural exceptions delivered through the COP0 exception mechanism.
///
/// A trap never leaves partial state behind: the instruction that raised it has
/// not committed any register or memory write when the trap is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Trap {
    /// External or timer interrupt, delivered between instructions.
    #[error("Interrupt")]
    Interrupt,

    /// Store to a TLB page whose dirty bit is clear.
    ///
    /// The associated value is the faulting virtual address.
    #[error("TlbModified({0:#x})")]
    TlbModified(u64),

    /// No TLB entry matched a load or fetch.
    #[error("TlbRefillLoad({0:#x})")]
    TlbRefillLoad(u64),

    /// No TLB entry matched a store.
    #[error("TlbRefillStore({0:#x})")]
    TlbRefillStore(u64),

    /// Matching TLB half is invalid on a load or fetch.
    #[error("TlbInvalidLoad({0:#x})")]
    TlbInvalidLoad(u64),

    /// Matching TLB half is invalid on a store.
    #[error("TlbInvalidStore({0:#x})")]
    TlbInvalidStore(u64),

    /// Misaligned load or fetch.
    ///
    /// The associated value is the misaligned address.
    #[error("AddressErrorLoad({0:#x})")]
    AddressErrorLoad(u64),

    /// Misaligned store.
    #[error("AddressErrorStore({0:#x})")]
    AddressErrorStore(u64),

    /// `SYSCALL` instruction.
    #[error("Syscall")]
    Syscall,

    /// `BREAK` instruction.
    #[error("Breakpoint")]
    Breakpoint,

    /// Reserved opcode. The associated value is the instruction word.
    #[error("ReservedInstruction({0:#010x})")]
    ReservedInstruction(u32),

    /// Coprocessor instruction while the matching Status.CU bit is clear.
    ///
    /// The associated value is the coprocessor number, recorded in Cause.CE.
    #[error("CoprocessorUnusable({0})")]
    CoprocessorUnusable(u8),

    /// Signed overflow on `ADD`/`ADDI`/`SUB` and their doubleword forms.
    #[error("Overflow")]
    Overflow,

    /// Trap-on-condition instruction whose condition held.
    #[error("TrapInstruction")]
    TrapInstruction,

    /// Floating-point exception with its enable bit set, or an unimplemented operation.
    #[error("FloatingPoint")]
    FloatingPoint,
}

impl Trap {
    /// Returns the MIPS `ExcCode` stored into Cause bits 6:2.
    pub const fn exception_code(&self) -> u64 {
        match self {
            Self::Interrupt => 0,
            Self::TlbModified(_) => 1,
            Self::TlbRefillLoad(_) | Self::TlbInvalidLoad(_) => 2,
            Self::TlbRefillStore(_) | Self::TlbInvalidStore(_) => 3,
            Self::AddressErrorLoad(_) => 4,
            Self::AddressErrorStore(_) => 5,
            Self::Syscall => 8,
            Self::Breakpoint => 9,
            Self::ReservedInstruction(_) => 10,
            Self::CoprocessorUnusable(_) => 11,
            Self::Overflow => 12,
            Self::TrapInstruction => 13,
            Self::FloatingPoint => 15,
        }
    }

    /// Returns the virtual address to load into BadVAddr, if this trap carries one.
    pub const fn bad_vaddr(&self) -> Option<u64> {
        match *self {
            Self::TlbModified(a)
            | Self::TlbRefillLoad(a)
            | Self::TlbRefillStore(a)
            | Self::TlbInvalidLoad(a)
            | Self::TlbInvalidStore(a)
            | Self::AddressErrorLoad(a)
            | Self::AddressErrorStore(a) => Some(a),
            _ => None,
        }
    }

    /// Returns `true` for the TLB exceptions, which also load Context/XContext/EntryHi.
    pub const fn is_tlb(&self) -> bool {
        matches!(
            self,
            Self::TlbModified(_)
                | Self::TlbRefillLoad(_)
                | Self::TlbRefillStore(_)
                | Self::TlbInvalidLoad(_)
                | Self::TlbInvalidStore(_)
        )
    }

    /// Returns `true` for refill misses, which use the dedicated refill vector.
    pub const fn is_refill(&self) -> bool {
        matches!(self, Self::TlbRefillLoad(_) | Self::TlbRefillStore(_))
    }
}

/// Fatal conditions that stop execution instead of being delivered as traps.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CpuError {
    /// The instruction decodes to an encoding this core does not implement.
    #[error("unimplemented instruction {word:#010x} at pc {pc:#018x}")]
    UnimplementedInstruction {
        /// Address of the instruction.
        pc: u64,
        /// Raw instruction word.
        word: u32,
    },

    /// A dispatch table was built with the wrong number of entries.
    #[error("dispatch table `{table}` has {actual} entries, expected {expected}")]
    DispatchTableSize {
        /// Table name.
        table: &'static str,
        /// Required entry count.
        expected: usize,
        /// Entry count found.
        actual: usize,
    },
}

/// Outcome of a failed instruction execution.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Fault {
    /// Recoverable architectural exception.
    #[error(transparent)]
    Trap(#[from] Trap),

    /// Fatal implementation gap.
    #[error(transparent)]
    Fatal(#[from] CpuError),
}

/// Scheduler misuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EventError {
    /// An event of this type is already queued.
    #[error("event {0} is already scheduled")]
    Duplicate(&'static str),

    /// Countdown must be strictly positive.
    #[error("event countdown must be positive, got {0}")]
    NonPositiveCountdown(i64),
}

/// Errors while loading a [`crate::config::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}
