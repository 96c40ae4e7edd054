//! A device at a fixed address on a shared bus.

use crate::address::Address;
use crate::bus::{Bus, Payload, Reading};
use crate::error::Result;
use crate::status::StatusCode;
use crate::transport::{LinuxTransport, Transport};

/// Binds a target address to a [`Bus`] so calls don't repeat it.
///
/// A device holds no state of its own; status and failures live on the bus,
/// and the borrow ties the device's lifetime to the bus.
pub struct Device<'b, T: Transport = LinuxTransport> {
    bus: &'b Bus<T>,
    addr: Address,
}

impl<T: Transport> Clone for Device<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Transport> Copy for Device<'_, T> {}

impl<T: Transport> std::fmt::Debug for Device<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("bus", &self.bus.number())
            .field("addr", &self.addr)
            .finish()
    }
}

impl<'b, T: Transport> Device<'b, T> {
    pub fn bind(bus: &'b Bus<T>, addr: u8) -> Result<Self> {
        let addr = Address::new(addr)?;
        Ok(Self { bus, addr })
    }

    pub fn address(&self) -> Address {
        self.addr
    }

    pub fn bus(&self) -> &'b Bus<T> {
        self.bus
    }

    /// Status of the underlying bus.
    pub fn status(&self) -> StatusCode {
        self.bus.status()
    }

    pub fn write<'a>(&self, data: impl Into<Payload<'a>>) -> Result<()> {
        self.bus.write(self.addr.get(), data)
    }

    pub fn read(&self, byte_count: usize) -> Result<Reading> {
        self.bus.read(self.addr.get(), byte_count)
    }

    pub fn read_byte(&self) -> Result<u8> {
        self.bus.read_byte(self.addr.get())
    }

    pub fn write_then_read<'a>(
        &self,
        data: impl Into<Payload<'a>>,
        byte_count: usize,
    ) -> Result<Reading> {
        self.bus.write_then_read(self.addr.get(), data, byte_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transport::{SimTransport, Transfer};

    #[test]
    fn test_forwards_bound_address() {
        let sim = SimTransport::new()
            .with_device(0x38, vec![0x1C, 0x6B, 0x9F, 0x45, 0x7A, 0x10])
            .with_device(0x5C, vec![0x00]);
        let bus = Bus::with_transport(0, sim);
        let aht = bus.device(0x38).unwrap();

        aht.write([0xACu8, 0x33, 0x00]).unwrap();
        let reading = aht.read(6).unwrap();
        let status = aht.write_then_read(0x71u8, 1).unwrap();

        assert_eq!(reading.as_bytes(), &[0x1C, 0x6B, 0x9F, 0x45, 0x7A, 0x10]);
        assert_eq!(status, Reading::Byte(0x1C));
        assert_eq!(aht.status(), StatusCode::Success);
        assert!(bus.transport().log().iter().all(|t| t.addr() == 0x38));
        assert_eq!(
            bus.transport().log()[0],
            Transfer::Write {
                addr: 0x38,
                data: vec![0xAC, 0x33, 0x00]
            }
        );
    }

    #[test]
    fn test_devices_share_bus_status() {
        let sim = SimTransport::new().with_device(0x38, vec![0x18]);
        let bus = Bus::with_transport(0, sim);
        let present = Device::bind(&bus, 0x38).unwrap();
        let missing = Device::bind(&bus, 0x40).unwrap();

        assert_eq!(present.read_byte().unwrap(), 0x18);
        assert_eq!(missing.status(), StatusCode::Success);

        assert!(missing.write(0xBAu8).is_err());
        assert_eq!(present.status(), StatusCode::Fail);
        assert_eq!(bus.status(), StatusCode::Fail);
    }

    #[test]
    fn test_bind_rejects_invalid_address() {
        let bus = Bus::with_transport(0, SimTransport::new());
        assert!(matches!(
            Device::bind(&bus, 0x80),
            Err(Error::InvalidAddress(0x80))
        ));
        // Binding performs no operation
        assert_eq!(bus.status(), StatusCode::Ready);
    }
}
