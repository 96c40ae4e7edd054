//! Linux i2c-dev transport.
//!
//! Talks to `/dev/i2c-N` through the kernel's `I2C_RDWR` ioctl, so every
//! operation, including the combined write-read, is submitted as one
//! transfer and the adapter holds the bus between its messages.

use std::io;
use std::path::{Path, PathBuf};

use i2cdev::core::{I2CMessage, I2CTransfer};
use i2cdev::linux::{LinuxI2CBus, LinuxI2CError, LinuxI2CMessage};

use super::Transport;
use crate::address::Address;
use crate::error::TransportError;
use crate::tracing::prelude::*;

/// Per-message limit of the kernel's `I2C_RDWR` ioctl.
///
/// i2cdev also stores message lengths as `u16`, so anything longer would
/// be truncated before reaching the kernel.
pub const MAX_MESSAGE_LEN: usize = 8192;

/// Handle to an open `/dev/i2c-N` node.
///
/// The file descriptor is closed when the transport is dropped.
pub struct LinuxTransport {
    bus: LinuxI2CBus,
    path: PathBuf,
}

impl LinuxTransport {
    /// Open the i2c-dev node at `path`.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let bus = LinuxI2CBus::new(&path).map_err(io::Error::from)?;
        debug!(path = %path.display(), "Opened i2c-dev node");
        Ok(Self { bus, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn submit<'a>(
        &mut self,
        addr: Address,
        msgs: &'a mut [LinuxI2CMessage<'a>],
    ) -> Result<(), TransportError> {
        self.bus
            .transfer(msgs)
            .map(|_| ())
            .map_err(|e| classify(addr, e))
    }
}

impl Transport for LinuxTransport {
    fn max_message_len(&self) -> usize {
        MAX_MESSAGE_LEN
    }

    fn write(&mut self, addr: Address, data: &[u8]) -> Result<(), TransportError> {
        check_len(data.len())?;
        let mut msgs = [LinuxI2CMessage::write(data).with_address(addr.into())];
        self.submit(addr, &mut msgs)
    }

    fn read(&mut self, addr: Address, buffer: &mut [u8]) -> Result<(), TransportError> {
        check_len(buffer.len())?;
        let mut msgs = [LinuxI2CMessage::read(buffer).with_address(addr.into())];
        self.submit(addr, &mut msgs)
    }

    fn write_read(
        &mut self,
        addr: Address,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), TransportError> {
        check_len(write.len())?;
        check_len(read.len())?;
        let mut msgs = [
            LinuxI2CMessage::write(write).with_address(addr.into()),
            LinuxI2CMessage::read(read).with_address(addr.into()),
        ];
        self.submit(addr, &mut msgs)
    }
}

fn check_len(len: usize) -> Result<(), TransportError> {
    if len > MAX_MESSAGE_LEN {
        return Err(TransportError::MessageTooLong {
            len,
            max: MAX_MESSAGE_LEN,
        });
    }
    Ok(())
}

/// Map a driver error onto the transport error taxonomy.
fn classify(addr: Address, err: LinuxI2CError) -> TransportError {
    classify_io(addr, io::Error::from(err))
}

// i2c-dev reports a missing acknowledgment as ENXIO or EREMOTEIO depending on
// the adapter driver, and a lost arbitration as EAGAIN.
fn classify_io(addr: Address, err: io::Error) -> TransportError {
    match err.raw_os_error() {
        Some(libc::ENXIO) | Some(libc::EREMOTEIO) => TransportError::NoAck(addr),
        Some(libc::ETIMEDOUT) => TransportError::Timeout,
        Some(libc::EAGAIN) => TransportError::ArbitrationLost,
        _ => TransportError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> Address {
        Address::new(0x38).unwrap()
    }

    #[test]
    fn test_classify_errno() {
        let err = |code| io::Error::from_raw_os_error(code);

        assert!(matches!(
            classify_io(addr(), err(libc::ENXIO)),
            TransportError::NoAck(a) if a == addr()
        ));
        assert!(matches!(
            classify_io(addr(), err(libc::EREMOTEIO)),
            TransportError::NoAck(_)
        ));
        assert!(matches!(
            classify_io(addr(), err(libc::ETIMEDOUT)),
            TransportError::Timeout
        ));
        assert!(matches!(
            classify_io(addr(), err(libc::EAGAIN)),
            TransportError::ArbitrationLost
        ));
        assert!(matches!(
            classify_io(addr(), err(libc::EIO)),
            TransportError::Io(_)
        ));
    }

    #[test]
    fn test_message_length_limit() {
        assert!(check_len(0).is_ok());
        assert!(check_len(MAX_MESSAGE_LEN).is_ok());
        assert!(matches!(
            check_len(MAX_MESSAGE_LEN + 1),
            Err(TransportError::MessageTooLong { len: 8193, max: 8192 })
        ));
        // Would wrap to a zero-length message as u16
        assert!(matches!(
            check_len(65_536),
            Err(TransportError::MessageTooLong { len: 65_536, .. })
        ));
    }

    #[test]
    fn test_open_missing_node() {
        let result = LinuxTransport::open("/dev/i2c-does-not-exist");
        assert!(result.is_err());
    }
}
