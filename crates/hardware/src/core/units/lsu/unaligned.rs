//! Partial-word access handling.
//!
//! The left/right load and store instructions access the bytes of an aligned
//! word or doubleword that lie on one side of an unaligned address. Loads merge
//! those bytes into the existing register value; stores produce a value and a
//! byte-lane mask for a read-modify-write of the aligned container. All lanes
//! are numbered big-endian, so byte offset 0 is the most significant byte.

/// Value and byte-lane mask for a masked store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskedStore {
    /// Aligned container address.
    pub addr: u64,
    /// Data, already shifted into its lanes.
    pub value: u64,
    /// Lanes to modify.
    pub mask: u64,
}

/// Merges an aligned word for `LWL`.
///
/// # Arguments
///
/// * `rt` - Current register value.
/// * `mem` - The aligned word containing `addr`.
/// * `addr` - The unaligned effective address.
///
/// # Returns
///
/// The new register value, sign-extended from bit 31.
pub const fn lwl(rt: u64, mem: u32, addr: u64) -> u64 {
    let shift = 8 * (addr & 3) as u32;
    let mask = u32::MAX << shift;
    let merged = (rt as u32 & !mask) | (mem << shift);
    merged as i32 as i64 as u64
}

/// Merges an aligned word for `LWR`.
///
/// When the access reaches byte 3 the whole word is replaced and sign-extended;
/// otherwise the upper 32 bits of the register are preserved.
pub const fn lwr(rt: u64, mem: u32, addr: u64) -> u64 {
    let shift = 8 * (3 - (addr & 3)) as u32;
    if shift == 0 {
        return mem as i32 as i64 as u64;
    }
    let mask = (u32::MAX >> shift) as u64;
    (rt & !mask) | (mem >> shift) as u64
}

/// Merges an aligned doubleword for `LDL`.
pub const fn ldl(rt: u64, mem: u64, addr: u64) -> u64 {
    let shift = 8 * (addr & 7) as u32;
    let mask = u64::MAX << shift;
    (rt & !mask) | (mem << shift)
}

/// Merges an aligned doubleword for `LDR`.
pub const fn ldr(rt: u64, mem: u64, addr: u64) -> u64 {
    let shift = 8 * (7 - (addr & 7)) as u32;
    let mask = u64::MAX >> shift;
    (rt & !mask) | (mem >> shift)
}

/// Builds the masked store for `SWL`.
pub const fn swl(rt: u64, addr: u64) -> MaskedStore {
    let shift = 8 * (addr & 3) as u32;
    MaskedStore {
        addr: addr & !3,
        value: ((rt as u32) >> shift) as u64,
        mask: (u32::MAX >> shift) as u64,
    }
}

/// Builds the masked store for `SWR`.
pub const fn swr(rt: u64, addr: u64) -> MaskedStore {
    let shift = 8 * (3 - (addr & 3)) as u32;
    MaskedStore {
        addr: addr & !3,
        value: ((rt as u32) << shift) as u64,
        mask: (u32::MAX << shift) as u64,
    }
}

/// Builds the masked store for `SDL`.
pub const fn sdl(rt: u64, addr: u64) -> MaskedStore {
    let shift = 8 * (addr & 7) as u32;
    MaskedStore {
        addr: addr & !7,
        value: rt >> shift,
        mask: u64::MAX >> shift,
    }
}

/// Builds the masked store for `SDR`.
pub const fn sdr(rt: u64, addr: u64) -> MaskedStore {
    let shift = 8 * (7 - (addr & 7)) as u32;
    MaskedStore {
        addr: addr & !7,
        value: rt << shift,
        mask: u64::MAX << shift,
    }
}
