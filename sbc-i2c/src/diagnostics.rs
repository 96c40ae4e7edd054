//! Where failed transactions are reported.
//!
//! A [`Bus`](crate::Bus) hands every failed transaction to its
//! [`Diagnostics`] sink before returning the error. The default sink logs
//! through `tracing`; applications that want failures elsewhere (a metrics
//! counter, a status LED, a test recorder) install their own.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::address::Address;
use crate::bus::Operation;
use crate::error::TransportError;
use crate::tracing::prelude::*;

/// Context for one failed transaction.
#[derive(Debug)]
pub struct Failure<'a> {
    pub bus: u8,
    pub addr: Address,
    pub op: Operation,
    pub error: &'a TransportError,
}

/// Receiver for transaction failures.
///
/// Sinks are `Send` so a bus can be moved to, or shared behind a `Mutex`
/// with, another thread.
pub trait Diagnostics: Send {
    fn transaction_failed(&self, failure: &Failure<'_>);
}

/// Logs failures as `tracing` error events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn transaction_failed(&self, failure: &Failure<'_>) {
        error!(
            bus = failure.bus,
            addr = %failure.addr,
            error = %failure.error,
            "Cannot {} on bus",
            failure.op
        );
    }
}

/// Owned copy of a [`Failure`], as kept by [`RecordingDiagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFailure {
    pub bus: u8,
    pub addr: Address,
    pub op: Operation,
    pub message: String,
}

/// Keeps every reported failure in memory.
///
/// Clones share the same record, so one handle can be given to a bus and
/// another kept for inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnostics {
    failures: Arc<Mutex<Vec<RecordedFailure>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> Vec<RecordedFailure> {
        self.records().clone()
    }

    // A panic while holding the lock leaves the vector intact
    fn records(&self) -> MutexGuard<'_, Vec<RecordedFailure>> {
        self.failures.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn transaction_failed(&self, failure: &Failure<'_>) {
        self.records().push(RecordedFailure {
            bus: failure.bus,
            addr: failure.addr,
            op: failure.op,
            message: failure.error.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_shares_state_between_clones() {
        let recorder = RecordingDiagnostics::new();
        let handle = recorder.clone();
        let addr = Address::new(0x38).unwrap();

        handle.transaction_failed(&Failure {
            bus: 0,
            addr,
            op: Operation::Read,
            error: &TransportError::Timeout,
        });

        assert_eq!(
            recorder.failures(),
            vec![RecordedFailure {
                bus: 0,
                addr,
                op: Operation::Read,
                message: "Transfer timed out".to_string(),
            }]
        );
    }

    #[test]
    fn test_recording_collects_from_other_threads() {
        let recorder = RecordingDiagnostics::new();
        let handle = recorder.clone();

        std::thread::spawn(move || {
            handle.transaction_failed(&Failure {
                bus: 2,
                addr: Address::new(0x40).unwrap(),
                op: Operation::Write,
                error: &TransportError::ArbitrationLost,
            });
        })
        .join()
        .unwrap();

        assert_eq!(recorder.failures().len(), 1);
        assert_eq!(recorder.failures()[0].bus, 2);
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        TracingDiagnostics.transaction_failed(&Failure {
            bus: 1,
            addr: Address::new(0x5C).unwrap(),
            op: Operation::WriteRead,
            error: &TransportError::Other("bus stuck low".into()),
        });
    }
}
