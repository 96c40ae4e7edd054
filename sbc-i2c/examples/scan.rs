//! Scan the configured bus and print an i2cdetect-style table.
//!
//! ```text
//! $ SBC_I2C_BUS=1 cargo run --example scan
//! 12:00:01  INFO sbc_i2c::bus:     00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f
//! 12:00:01  INFO sbc_i2c::bus: 00: -- -- -- -- -- -- -- -- -- -- -- -- -- -- -- --
//! ...
//! 12:00:01  INFO sbc_i2c::bus: 30: -- -- -- -- -- -- -- -- 38 -- -- -- -- -- -- --
//! ```

use sbc_i2c::tracing::prelude::*;
use sbc_i2c::{Bus, BusConfig};

fn main() -> anyhow::Result<()> {
    sbc_i2c::tracing::init_journald_or_stdout();

    let config = BusConfig::from_env()?;
    let bus = Bus::open_with(&config)?;
    info!(status = %bus.status(), "Bus ready");

    let found = bus.scan();
    info!(bus = bus.number(), count = found.len(), status = %bus.status(), "Scan finished");

    Ok(())
}
