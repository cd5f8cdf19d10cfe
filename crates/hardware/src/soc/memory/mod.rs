//! RDRAM.
//!
//! This module implements main memory as seen from the CPU. It provides:
//! 1. **Buffer:** Backing storage (`DramBuffer`) for RAM contents.
//! 2. **Access:** Big-endian sized reads and writes at physical offsets.
//! 3. **Masked Stores:** Read-modify-write of selected byte lanes for partial-word stores.
//!
//! RDRAM is mapped at physical address 0. Callers check bounds and alignment
//! before reaching this layer; out-of-range accesses read as 0 and drop writes.

/// DRAM buffer implementation (mmap or heap) for raw byte storage.
pub mod buffer;

use self::buffer::DramBuffer;

/// Main memory.
#[derive(Debug)]
pub struct Rdram {
    buffer: DramBuffer,
}

impl Rdram {
    /// Creates zeroed RDRAM of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            buffer: DramBuffer::new(size),
        }
    }

    /// Size in bytes.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if no memory is installed.
    pub const fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Copies `data` into memory at `offset`; bytes past the end are dropped.
    ///
    /// # Arguments
    ///
    /// * `offset` - Physical byte offset.
    /// * `data` - Bytes to copy.
    pub fn load(&mut self, offset: usize, data: &[u8]) {
        let mem = self.buffer.as_mut_slice();
        if offset >= mem.len() {
            return;
        }
        let n = data.len().min(mem.len() - offset);
        mem[offset..offset + n].copy_from_slice(&data[..n]);
    }

    /// Returns `len` bytes starting at `offset`, or an empty slice if out of range.
    pub fn slice(&self, offset: usize, len: usize) -> &[u8] {
        self.buffer
            .as_slice()
            .get(offset..offset.saturating_add(len))
            .unwrap_or(&[])
    }

    #[inline(always)]
    fn read<const N: usize>(&self, offset: u64) -> [u8; N] {
        let mut out = [0u8; N];
        let start = offset as usize;
        if let Some(src) = self.buffer.as_slice().get(start..start.wrapping_add(N)) {
            out.copy_from_slice(src);
        }
        out
    }

    #[inline(always)]
    fn write<const N: usize>(&mut self, offset: u64, bytes: [u8; N]) {
        let start = offset as usize;
        if let Some(dst) = self.buffer.as_mut_slice().get_mut(start..start.wrapping_add(N)) {
            dst.copy_from_slice(&bytes);
        }
    }

    /// Reads a byte.
    #[inline(always)]
    pub fn read_u8(&self, offset: u64) -> u8 {
        u8::from_be_bytes(self.read(offset))
    }

    /// Reads a big-endian halfword.
    #[inline(always)]
    pub fn read_u16(&self, offset: u64) -> u16 {
        u16::from_be_bytes(self.read(offset))
    }

    /// Reads a big-endian word.
    #[inline(always)]
    pub fn read_u32(&self, offset: u64) -> u32 {
        u32::from_be_bytes(self.read(offset))
    }

    /// Reads a big-endian doubleword.
    #[inline(always)]
    pub fn read_u64(&self, offset: u64) -> u64 {
        u64::from_be_bytes(self.read(offset))
    }

    /// Writes a byte.
    #[inline(always)]
    pub fn write_u8(&mut self, offset: u64, val: u8) {
        self.write(offset, val.to_be_bytes());
    }

    /// Writes a big-endian halfword.
    #[inline(always)]
    pub fn write_u16(&mut self, offset: u64, val: u16) {
        self.write(offset, val.to_be_bytes());
    }

    /// Writes a big-endian word.
    #[inline(always)]
    pub fn write_u32(&mut self, offset: u64, val: u32) {
        self.write(offset, val.to_be_bytes());
    }

    /// Writes a big-endian doubleword.
    #[inline(always)]
    pub fn write_u64(&mut self, offset: u64, val: u64) {
        self.write(offset, val.to_be_bytes());
    }
}
