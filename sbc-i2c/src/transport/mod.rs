//! Platform transport abstraction.
//!
//! A [`Transport`] executes raw I2C transactions against a 7-bit address.
//! [`Bus`](crate::Bus) is generic over it, so the same scan and transaction
//! logic runs on the Linux i2c-dev driver ([`LinuxTransport`]) or on the
//! in-memory [`SimTransport`].

pub mod linux;
pub mod sim;

pub use linux::LinuxTransport;
pub use sim::{SimTransport, Transfer};

use crate::address::Address;
use crate::error::TransportError;

/// Blocking I2C transport.
///
/// Each method is exactly one transaction on the wire. Implementations must
/// not split a [`write_read`](Transport::write_read) into two independent
/// transfers.
pub trait Transport {
    /// Longest single message, in bytes, this transport can carry.
    fn max_message_len(&self) -> usize {
        usize::MAX
    }

    /// Write data to a device.
    fn write(&mut self, addr: Address, data: &[u8]) -> Result<(), TransportError>;

    /// Read `buffer.len()` bytes from a device.
    fn read(&mut self, addr: Address, buffer: &mut [u8]) -> Result<(), TransportError>;

    /// Write data then read from a device (repeated start).
    fn write_read(
        &mut self,
        addr: Address,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn max_message_len(&self) -> usize {
        (**self).max_message_len()
    }

    fn write(&mut self, addr: Address, data: &[u8]) -> Result<(), TransportError> {
        (**self).write(addr, data)
    }

    fn read(&mut self, addr: Address, buffer: &mut [u8]) -> Result<(), TransportError> {
        (**self).read(addr, buffer)
    }

    fn write_read(
        &mut self,
        addr: Address,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), TransportError> {
        (**self).write_read(addr, write, read)
    }
}
