//! Bus selection.
//!
//! Parses environment variables to choose which i2c-dev node to open.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default i2c-dev node prefix on Linux.
pub const DEFAULT_DEV_PREFIX: &str = "/dev/i2c-";

/// Which bus to open and where its device node lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Bus number, the `N` in `/dev/i2c-N`.
    pub bus: u8,

    /// Device node prefix the bus number is appended to.
    ///
    /// Only needs changing when udev rules expose the adapters under a
    /// different name.
    pub dev_prefix: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

impl BusConfig {
    pub fn new(bus: u8) -> Self {
        Self {
            bus,
            dev_prefix: DEFAULT_DEV_PREFIX.to_string(),
        }
    }

    pub fn with_dev_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dev_prefix = prefix.into();
        self
    }

    /// Path of the device node, e.g. `/dev/i2c-1`.
    pub fn device_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", self.dev_prefix, self.bus))
    }

    /// Parse configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SBC_I2C_BUS`: Bus number (default: 0)
    /// - `SBC_I2C_DEV_PREFIX`: Device node prefix (default: `/dev/i2c-`)
    pub fn from_env() -> Result<Self> {
        let bus = match std::env::var("SBC_I2C_BUS") {
            Ok(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("SBC_I2C_BUS is not a bus number: {:?}", s)))?,
            Err(_) => 0,
        };

        let mut config = Self::new(bus);
        if let Ok(prefix) = std::env::var("SBC_I2C_DEV_PREFIX") {
            config.dev_prefix = prefix;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var("SBC_I2C_BUS");
        std::env::remove_var("SBC_I2C_DEV_PREFIX");

        let config = BusConfig::from_env().unwrap();
        assert_eq!(config, BusConfig::default());
        assert_eq!(config.device_path(), PathBuf::from("/dev/i2c-0"));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        std::env::set_var("SBC_I2C_BUS", " 3 ");
        std::env::set_var("SBC_I2C_DEV_PREFIX", "/dev/i2c/");

        let config = BusConfig::from_env().unwrap();
        assert_eq!(config.bus, 3);
        assert_eq!(config.device_path(), PathBuf::from("/dev/i2c/3"));

        std::env::remove_var("SBC_I2C_BUS");
        std::env::remove_var("SBC_I2C_DEV_PREFIX");
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_garbage() {
        std::env::set_var("SBC_I2C_BUS", "one");
        assert!(matches!(BusConfig::from_env(), Err(Error::Config(_))));

        std::env::set_var("SBC_I2C_BUS", "256");
        assert!(matches!(BusConfig::from_env(), Err(Error::Config(_))));

        std::env::remove_var("SBC_I2C_BUS");
    }
}
