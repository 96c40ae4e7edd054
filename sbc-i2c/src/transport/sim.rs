//! In-memory transport for exercising bus logic without hardware.
//!
//! Devices are registered by address with the bytes they return on reads.
//! Every transaction that reaches the transport is appended to a log, so
//! tests can assert exactly what went out on the "wire".

use std::collections::{BTreeMap, BTreeSet};

use super::Transport;
use crate::address::Address;
use crate::error::TransportError;

/// One transaction as observed by [`SimTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Write { addr: u8, data: Vec<u8> },
    Read { addr: u8, len: usize },
    WriteRead { addr: u8, data: Vec<u8>, len: usize },
}

impl Transfer {
    pub fn addr(&self) -> u8 {
        match self {
            Self::Write { addr, .. } | Self::Read { addr, .. } | Self::WriteRead { addr, .. } => {
                *addr
            }
        }
    }
}

/// Simulated bus with a fixed set of responding devices.
#[derive(Debug, Default)]
pub struct SimTransport {
    /// Bytes each present device returns on reads, repeated as needed
    devices: BTreeMap<u8, Vec<u8>>,
    /// Addresses whose transactions fail with an I/O error
    failing: BTreeSet<u8>,
    /// Per-message limit reported to the bus, unlimited when unset
    max_message_len: Option<usize>,
    log: Vec<Transfer>,
}

impl SimTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device that acknowledges and answers reads with `response`.
    ///
    /// An empty response reads back as zeros.
    pub fn with_device(mut self, addr: u8, response: impl Into<Vec<u8>>) -> Self {
        self.devices.insert(addr, response.into());
        self
    }

    /// Make every transaction to `addr` fail with an I/O error.
    pub fn with_failure(mut self, addr: u8) -> Self {
        self.failing.insert(addr);
        self
    }

    /// Report a per-message length limit, as a real adapter would.
    pub fn with_max_message_len(mut self, max: usize) -> Self {
        self.max_message_len = Some(max);
        self
    }

    /// Transactions executed so far, in order.
    pub fn log(&self) -> &[Transfer] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn respond(&self, addr: Address, buffer: &mut [u8]) -> Result<(), TransportError> {
        let raw = addr.get();
        if self.failing.contains(&raw) {
            return Err(TransportError::Io(std::io::Error::from_raw_os_error(
                libc::EIO,
            )));
        }
        let response = self.devices.get(&raw).ok_or(TransportError::NoAck(addr))?;
        if response.is_empty() {
            buffer.fill(0);
        } else {
            for (dst, src) in buffer.iter_mut().zip(response.iter().cycle()) {
                *dst = *src;
            }
        }
        Ok(())
    }
}

impl Transport for SimTransport {
    fn max_message_len(&self) -> usize {
        self.max_message_len.unwrap_or(usize::MAX)
    }

    fn write(&mut self, addr: Address, data: &[u8]) -> Result<(), TransportError> {
        self.log.push(Transfer::Write {
            addr: addr.get(),
            data: data.to_vec(),
        });
        self.respond(addr, &mut [])
    }

    fn read(&mut self, addr: Address, buffer: &mut [u8]) -> Result<(), TransportError> {
        self.log.push(Transfer::Read {
            addr: addr.get(),
            len: buffer.len(),
        });
        self.respond(addr, buffer)
    }

    fn write_read(
        &mut self,
        addr: Address,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), TransportError> {
        self.log.push(Transfer::WriteRead {
            addr: addr.get(),
            data: write.to_vec(),
            len: read.len(),
        });
        self.respond(addr, read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(raw: u8) -> Address {
        Address::new(raw).unwrap()
    }

    #[test]
    fn test_absent_device_nacks() {
        let mut sim = SimTransport::new();
        let mut buf = [0u8; 1];
        assert!(matches!(
            sim.read(addr(0x20), &mut buf),
            Err(TransportError::NoAck(a)) if a == addr(0x20)
        ));
        assert_eq!(sim.log(), &[Transfer::Read { addr: 0x20, len: 1 }]);
    }

    #[test]
    fn test_response_repeats() {
        let mut sim = SimTransport::new().with_device(0x38, vec![0x1C, 0x80]);
        let mut buf = [0u8; 5];
        sim.read(addr(0x38), &mut buf).unwrap();
        assert_eq!(buf, [0x1C, 0x80, 0x1C, 0x80, 0x1C]);
    }

    #[test]
    fn test_failure_injection() {
        let mut sim = SimTransport::new()
            .with_device(0x38, vec![0x00])
            .with_failure(0x38);
        assert!(matches!(
            sim.write(addr(0x38), &[0x01]),
            Err(TransportError::Io(_))
        ));
        assert_eq!(sim.log()[0].addr(), 0x38);

        sim.clear_log();
        assert!(sim.log().is_empty());
    }
}
