//! Scan and talk to I2C devices on a single-board computer.
//!
//! A [`Bus`] owns one numbered i2c-dev adapter and performs write, read and
//! combined write-then-read transactions against 7-bit addresses. A
//! [`Device`] binds one of those addresses so callers don't repeat it.
//! Every operation both returns a [`Result`] and records a [`StatusCode`]
//! on the bus.
//!
//! ```no_run
//! use sbc_i2c::{bits, Bus};
//!
//! # fn main() -> sbc_i2c::Result<()> {
//! let bus = Bus::open(1)?;
//! for addr in bus.scan() {
//!     println!("found {}", addr);
//! }
//!
//! let sensor = bus.device(0x38)?;
//! let reading = sensor.write_then_read(0x71u8, 1)?;
//! let busy = bits::get_bit(reading.as_bytes()[0], 7)?;
//! println!("busy: {}, status: {}", busy, bus.status());
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod bits;
pub mod bus;
pub mod config;
pub mod device;
pub mod diagnostics;
pub mod error;
pub mod status;
pub mod tracing;
pub mod transport;

pub use address::Address;
pub use bus::{Bus, Operation, Payload, Reading};
pub use config::BusConfig;
pub use device::Device;
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{Error, Result, TransportError};
pub use status::StatusCode;
pub use transport::{LinuxTransport, SimTransport, Transport};
