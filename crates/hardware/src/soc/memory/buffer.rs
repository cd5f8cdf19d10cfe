//! DRAM Buffer Implementation.
//!
//! This module provides a safe wrapper around raw memory allocation for RDRAM.
//! On Unix systems it uses anonymous `mmap`, so pages are only committed by the
//! OS when first touched; elsewhere (or if the mapping fails) it falls back to a
//! zeroed heap allocation.

use std::fmt;
use std::slice;

enum Backing {
    #[cfg(unix)]
    Mmap(*mut u8),
    Heap(Box<[u8]>),
}

/// Zero-initialized byte buffer backing RDRAM.
pub struct DramBuffer {
    backing: Backing,
    size: usize,
}

impl DramBuffer {
    /// Creates a new zeroed buffer of the specified size.
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the buffer in bytes.
    pub fn new(size: usize) -> Self {
        #[cfg(unix)]
        {
            // SAFETY: anonymous private mapping with no address hint; the result is
            // checked against MAP_FAILED before use.
            let ptr = unsafe {
                libc::mmap(
                    std::ptr::null_mut(),
                    size,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                    -1,
                    0,
                )
            };
            if size > 0 && ptr != libc::MAP_FAILED {
                return Self {
                    backing: Backing::Mmap(ptr.cast::<u8>()),
                    size,
                };
            }
            tracing::warn!(size, "mmap failed, falling back to heap-allocated RDRAM");
        }

        Self {
            backing: Backing::Heap(vec![0u8; size].into_boxed_slice()),
            size,
        }
    }

    /// Returns the size of the buffer in bytes.
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` for a zero-sized buffer.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Views the buffer as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        match &self.backing {
            #[cfg(unix)]
            // SAFETY: the mapping is `size` bytes, readable, and lives as long as `self`.
            Backing::Mmap(ptr) => unsafe { slice::from_raw_parts(*ptr, self.size) },
            Backing::Heap(b) => b,
        }
    }

    /// Views the buffer as a mutable byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.backing {
            #[cfg(unix)]
            // SAFETY: as above; `&mut self` guarantees exclusive access.
            Backing::Mmap(ptr) => unsafe { slice::from_raw_parts_mut(*ptr, self.size) },
            Backing::Heap(b) => b,
        }
    }
}

impl Drop for DramBuffer {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Backing::Mmap(ptr) = self.backing {
            // SAFETY: `ptr`/`size` are exactly the mapping created in `new`.
            let _ = unsafe { libc::munmap(ptr.cast(), self.size) };
        }
    }
}

impl fmt::Debug for DramBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.backing {
            #[cfg(unix)]
            Backing::Mmap(_) => "mmap",
            Backing::Heap(_) => "heap",
        };
        f.debug_struct("DramBuffer")
            .field("size", &self.size)
            .field("backing", &kind)
            .finish()
    }
}
