//! A numbered I2C bus and the transactions performed on it.
//!
//! [`Bus`] owns one transport for its whole lifetime. Every operation
//! records its outcome in the bus's [`StatusCode`] and also returns a typed
//! `Result`, so callers can either poll [`Bus::status`] after each call or
//! handle the error directly.
//!
//! Failed transactions never panic. The bus sets [`StatusCode::Fail`], hands
//! the failure to its [`Diagnostics`] sink (by default a `tracing` error
//! event naming the bus, address and error), and returns
//! [`Error::TransactionFailed`].
//!
//! Operations take `&self` so several [`Device`]s can share one bus. The
//! interior `RefCell` makes `Bus` `!Sync`, but it is `Send` whenever its
//! transport is, so a `Mutex<Bus>` can be shared between threads.

use std::borrow::Cow;
use std::cell::{Cell, Ref, RefCell};
use std::fmt;

use crate::address::Address;
use crate::config::BusConfig;
use crate::device::Device;
use crate::diagnostics::{Diagnostics, Failure, TracingDiagnostics};
use crate::error::{Error, Result, TransportError};
use crate::status::StatusCode;
use crate::tracing::prelude::*;
use crate::transport::{LinuxTransport, Transport};

/// Kind of transaction, as named in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Write,
    Read,
    WriteRead,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Write => "write",
            Self::Read => "read",
            Self::WriteRead => "write-read",
        })
    }
}

/// Bytes to send in a write phase.
///
/// A single byte is sent as a one-byte sequence, so `bus.write(addr, 0xE1)`
/// and `bus.write(addr, [0xE1])` put the same transaction on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload<'a>(Cow<'a, [u8]>);

impl Payload<'_> {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<u8> for Payload<'static> {
    fn from(byte: u8) -> Self {
        Self(Cow::Owned(vec![byte]))
    }
}

impl<'a> From<&'a [u8]> for Payload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self(Cow::Borrowed(bytes))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Payload<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self(Cow::Borrowed(bytes))
    }
}

impl<const N: usize> From<[u8; N]> for Payload<'static> {
    fn from(bytes: [u8; N]) -> Self {
        Self(Cow::Owned(bytes.to_vec()))
    }
}

impl From<Vec<u8>> for Payload<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Cow::Owned(bytes))
    }
}

impl<'a> From<&'a Vec<u8>> for Payload<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self(Cow::Borrowed(bytes.as_slice()))
    }
}

/// Data returned by a read phase.
///
/// A one-byte request yields [`Reading::Byte`]; any other count yields the
/// bytes in the order they were received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading {
    Byte(u8),
    Bytes(Vec<u8>),
}

impl Reading {
    fn from_buffer(buffer: Vec<u8>) -> Self {
        if let [byte] = buffer[..] {
            Self::Byte(byte)
        } else {
            Self::Bytes(buffer)
        }
    }

    /// The value of a single-byte reading.
    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Self::Byte(byte) => Some(*byte),
            Self::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Byte(byte) => std::slice::from_ref(byte),
            Self::Bytes(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Byte(byte) => vec![byte],
            Self::Bytes(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One numbered I2C bus.
pub struct Bus<T: Transport = LinuxTransport> {
    number: u8,
    transport: RefCell<T>,
    status: Cell<StatusCode>,
    diagnostics: Box<dyn Diagnostics + Send>,
}

impl Bus<LinuxTransport> {
    /// Open `/dev/i2c-<bus_number>`.
    pub fn open(bus_number: u8) -> Result<Self> {
        Self::open_with(&BusConfig::new(bus_number))
    }

    /// Open the bus described by `config`.
    pub fn open_with(config: &BusConfig) -> Result<Self> {
        let path = config.device_path();
        let transport = LinuxTransport::open(&path).map_err(|source| {
            Error::TransportUnavailable {
                bus: config.bus,
                source,
            }
        })?;
        info!(bus = config.bus, path = %path.display(), "I2C bus opened");
        Ok(Self::with_transport(config.bus, transport))
    }
}

impl<T: Transport> Bus<T> {
    /// Wrap an already-open transport.
    pub fn with_transport(bus_number: u8, transport: T) -> Self {
        Self {
            number: bus_number,
            transport: RefCell::new(transport),
            status: Cell::new(StatusCode::Ready),
            diagnostics: Box::new(TracingDiagnostics),
        }
    }

    /// Replace the sink that receives transaction failures.
    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// Outcome of the most recent operation.
    pub fn status(&self) -> StatusCode {
        self.status.get()
    }

    /// Borrow the transport, e.g. to inspect a simulated bus.
    pub fn transport(&self) -> Ref<'_, T> {
        self.transport.borrow()
    }

    pub fn into_transport(self) -> T {
        self.transport.into_inner()
    }

    /// Bind a device at `addr` to this bus.
    pub fn device(&self, addr: u8) -> Result<Device<'_, T>> {
        Device::bind(self, addr)
    }

    /// Probe every 7-bit address and return those that acknowledge.
    ///
    /// Each address gets a one-byte read; any transport error means "absent".
    /// All 128 addresses are always probed, and the scan itself always
    /// succeeds, even when nothing answers.
    pub fn scan(&self) -> Vec<Address> {
        let mut found = Vec::new();
        let mut buffer = [0u8; 1];

        {
            let mut transport = self.transport.borrow_mut();
            for addr in Address::all() {
                match transport.read(addr, &mut buffer) {
                    Ok(()) => {
                        trace!(bus = self.number, addr = %addr, "Probe acknowledged");
                        found.push(addr);
                    }
                    Err(e) => {
                        trace!(bus = self.number, addr = %addr, error = %e, "No response");
                    }
                }
            }
        }

        for line in scan_grid(&found) {
            info!("{}", line);
        }
        debug!(bus = self.number, count = found.len(), "Scan complete");

        self.status.set(StatusCode::Success);
        found
    }

    /// Write `data` to the device at `addr`.
    pub fn write<'a>(&self, addr: u8, data: impl Into<Payload<'a>>) -> Result<()> {
        let addr = self.target(addr)?;
        let data = data.into();
        let result = self
            .fits(data.as_bytes().len())
            .and_then(|()| self.transport.borrow_mut().write(addr, data.as_bytes()));
        self.finish(addr, Operation::Write, result)
    }

    /// Read `byte_count` bytes from the device at `addr`.
    pub fn read(&self, addr: u8, byte_count: usize) -> Result<Reading> {
        let addr = self.target(addr)?;
        let mut buffer = Vec::new();
        let result = self.fits(byte_count).and_then(|()| {
            buffer = vec![0u8; byte_count];
            self.transport.borrow_mut().read(addr, &mut buffer)
        });
        self.finish(addr, Operation::Read, result)?;
        Ok(Reading::from_buffer(buffer))
    }

    /// Read one byte from the device at `addr`.
    pub fn read_byte(&self, addr: u8) -> Result<u8> {
        let reading = self.read(addr, 1)?;
        Ok(reading.as_bytes()[0])
    }

    /// Write `data` and read back `byte_count` bytes in one transaction.
    ///
    /// Both phases go out as a single transfer with a repeated start, so no
    /// other transaction can land between them.
    pub fn write_then_read<'a>(
        &self,
        addr: u8,
        data: impl Into<Payload<'a>>,
        byte_count: usize,
    ) -> Result<Reading> {
        let addr = self.target(addr)?;
        let data = data.into();
        let mut buffer = Vec::new();
        let result = self
            .fits(data.as_bytes().len())
            .and_then(|()| self.fits(byte_count))
            .and_then(|()| {
                buffer = vec![0u8; byte_count];
                self.transport
                    .borrow_mut()
                    .write_read(addr, data.as_bytes(), &mut buffer)
            });
        self.finish(addr, Operation::WriteRead, result)?;
        Ok(Reading::from_buffer(buffer))
    }

    // An out-of-range address counts as a failed operation.
    fn target(&self, addr: u8) -> Result<Address> {
        Address::new(addr).inspect_err(|_| self.status.set(StatusCode::Fail))
    }

    // Refuse messages the transport would truncate rather than send.
    fn fits(&self, len: usize) -> std::result::Result<(), TransportError> {
        let max = self.transport.borrow().max_message_len();
        if len > max {
            return Err(TransportError::MessageTooLong { len, max });
        }
        Ok(())
    }

    fn finish(
        &self,
        addr: Address,
        op: Operation,
        result: std::result::Result<(), TransportError>,
    ) -> Result<()> {
        match result {
            Ok(()) => {
                self.status.set(StatusCode::Success);
                Ok(())
            }
            Err(source) => {
                self.status.set(StatusCode::Fail);
                self.diagnostics.transaction_failed(&Failure {
                    bus: self.number,
                    addr,
                    op,
                    error: &source,
                });
                Err(Error::TransactionFailed {
                    bus: self.number,
                    addr,
                    op,
                    source,
                })
            }
        }
    }
}

impl<T: Transport> fmt::Debug for Bus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("number", &self.number)
            .field("status", &self.status.get())
            .finish_non_exhaustive()
    }
}

/// Render scan results as an i2cdetect-style table.
///
/// The first line is the column header; each following line covers 16
/// addresses, with `--` marking addresses that did not respond.
pub fn scan_grid(found: &[Address]) -> Vec<String> {
    let mut lines = Vec::with_capacity(9);

    let mut header = String::from("    ");
    for column in 0..=0xF {
        header.push_str(&format!("{:02x} ", column));
    }
    lines.push(header.trim_end().to_string());

    for row in (0..=Address::MAX).step_by(16) {
        let mut line = format!("{:02x}: ", row);
        for addr in row..row + 16 {
            if found.iter().any(|a| a.get() == addr) {
                line.push_str(&format!("{:02x} ", addr));
            } else {
                line.push_str("-- ");
            }
        }
        lines.push(line.trim_end().to_string());
    }

    lines
}
