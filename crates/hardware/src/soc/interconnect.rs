//! Physical bus for memory-mapped devices.
//!
//! This module implements the bus the memory access slow path falls back to for
//! physical addresses outside RDRAM. It provides:
//! 1. **Device registration:** Devices are added by address range and sorted for lookup.
//! 2. **Access routing:** Sized reads and writes by physical address with a last-device hint.
//! 3. **Open bus:** Reads of unclaimed addresses return 0 and writes are dropped.

use std::fmt;

use super::traits::Device;

/// Physical bus; routes accesses by address to registered devices.
#[derive(Default)]
pub struct Bus {
    devices: Vec<Box<dyn Device>>,
    last_device_idx: usize,
}

impl Bus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a device on the bus; devices are sorted by base address for lookup.
    ///
    /// # Arguments
    ///
    /// * `dev` - The device to add.
    pub fn add_device(&mut self, dev: Box<dyn Device>) {
        self.devices.push(dev);
        self.devices.sort_by_key(|d| d.address_range().0);
        self.last_device_idx = 0;
    }

    /// Number of registered devices.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Returns whether the given physical address is claimed by any device.
    pub fn is_valid_address(&self, paddr: u64) -> bool {
        self.devices.iter().any(|dev| {
            let (start, size) = dev.address_range();
            paddr >= start && paddr - start < size
        })
    }

    fn find_device(&mut self, paddr: u64) -> Option<(&mut Box<dyn Device>, u64)> {
        if self.last_device_idx < self.devices.len() {
            let (start, size) = self.devices[self.last_device_idx].address_range();
            if paddr >= start && paddr - start < size {
                return Some((&mut self.devices[self.last_device_idx], paddr - start));
            }
        }

        for (i, dev) in self.devices.iter_mut().enumerate() {
            let (start, size) = dev.address_range();
            if paddr >= start && paddr - start < size {
                self.last_device_idx = i;
                return Some((dev, paddr - start));
            }
        }
        None
    }

    /// Reads one byte at the given physical address; returns 0 if no device claims the address.
    pub fn read_u8(&mut self, paddr: u64) -> u8 {
        self.find_device(paddr).map_or(0, |(dev, offset)| dev.read_u8(offset))
    }
    /// Reads two bytes at the given physical address; returns 0 if unclaimed.
    pub fn read_u16(&mut self, paddr: u64) -> u16 {
        self.find_device(paddr).map_or(0, |(dev, offset)| dev.read_u16(offset))
    }
    /// Reads four bytes at the given physical address; returns 0 if unclaimed.
    pub fn read_u32(&mut self, paddr: u64) -> u32 {
        self.find_device(paddr).map_or(0, |(dev, offset)| dev.read_u32(offset))
    }
    /// Reads eight bytes at the given physical address; returns 0 if unclaimed.
    pub fn read_u64(&mut self, paddr: u64) -> u64 {
        self.find_device(paddr).map_or(0, |(dev, offset)| dev.read_u64(offset))
    }
    /// Writes one byte at the given physical address; no-op if no device claims it.
    pub fn write_u8(&mut self, paddr: u64, val: u8) {
        if let Some((dev, offset)) = self.find_device(paddr) {
            dev.write_u8(offset, val);
        }
    }
    /// Writes two bytes at the given physical address; no-op if unclaimed.
    pub fn write_u16(&mut self, paddr: u64, val: u16) {
        if let Some((dev, offset)) = self.find_device(paddr) {
            dev.write_u16(offset, val);
        }
    }
    /// Writes four bytes at the given physical address; no-op if unclaimed.
    pub fn write_u32(&mut self, paddr: u64, val: u32) {
        if let Some((dev, offset)) = self.find_device(paddr) {
            dev.write_u32(offset, val);
        }
    }
    /// Writes eight bytes at the given physical address; no-op if unclaimed.
    pub fn write_u64(&mut self, paddr: u64, val: u64) {
        if let Some((dev, offset)) = self.find_device(paddr) {
            dev.write_u64(offset, val);
        }
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.devices.iter().map(|d| (d.name().to_owned(), d.address_range())))
            .finish()
    }
}
