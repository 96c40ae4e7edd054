//! Error types for bus and transaction operations.
//!
//! Transport failures are classified into a small set of variants so callers
//! can tell a missing device (no acknowledgment) from a transient bus
//! condition worth retrying.

use std::io;

use crate::address::Address;
use crate::bus::Operation;

/// Failure reported by the platform transport for a single transaction.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No acknowledgment from device
    #[error("No acknowledgment from device at address {0}")]
    NoAck(Address),

    /// Transfer did not complete in time
    #[error("Transfer timed out")]
    Timeout,

    /// Bus arbitration lost
    #[error("Bus arbitration lost")]
    ArbitrationLost,

    /// I/O error from the underlying driver
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Message longer than the adapter can carry in one transfer
    #[error("Message of {len} bytes exceeds the {max}-byte transfer limit")]
    MessageTooLong { len: usize, max: usize },

    /// Other transport error
    #[error("I2C error: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether retrying the same transaction may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::ArbitrationLost)
    }
}

/// Common error type for this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The numbered bus could not be opened
    #[error("Cannot open bus {bus}: {source}")]
    TransportUnavailable {
        bus: u8,
        #[source]
        source: io::Error,
    },

    /// A write, read or write-read did not complete
    #[error("Cannot {op} on bus: {bus}, addr: {addr}. {source}")]
    TransactionFailed {
        bus: u8,
        addr: Address,
        op: Operation,
        #[source]
        source: TransportError,
    },

    /// Address outside the 7-bit range
    #[error("Invalid address: {0:#x} (must be 0x00..=0x7f)")]
    InvalidAddress(u16),

    /// Bit index outside a byte
    #[error("Invalid bit index: {0} (must be 0..=7)")]
    InvalidBitIndex(u8),

    /// Malformed configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Transport error behind a failed transaction, if any.
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            Self::TransactionFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
