use mockall::mock;
use vrsim_core::soc::traits::Device;

mock! {
    pub BusDevice {}
    impl Device for BusDevice {
        fn name(&self) -> &'static str;
        fn address_range(&self) -> (u64, u64);
        fn read_u8(&mut self, offset: u64) -> u8;
        fn read_u16(&mut self, offset: u64) -> u16;
        fn read_u32(&mut self, offset: u64) -> u32;
        fn read_u64(&mut self, offset: u64) -> u64;
        fn write_u8(&mut self, offset: u64, val: u8);
        fn write_u16(&mut self, offset: u64, val: u16);
        fn write_u32(&mut self, offset: u64, val: u32);
        fn write_u64(&mut self, offset: u64, val: u64);
    }
}

/// A mock claiming `[base, base + size)` with no other expectations set.
pub fn device_at(base: u64, size: u64) -> MockBusDevice {
    let mut dev = MockBusDevice::new();
    dev.expect_address_range().return_const((base, size));
    dev.expect_name().return_const("mock");
    dev
}
