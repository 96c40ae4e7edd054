//! 7-bit I2C target addresses.

use std::fmt;

use crate::error::{Error, Result};

/// A 7-bit I2C target address (`0x00..=0x7F`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u8);

impl Address {
    /// Highest address representable with 7-bit addressing.
    pub const MAX: u8 = 0x7F;

    /// Validate a raw address.
    pub fn new(raw: u8) -> Result<Self> {
        if raw > Self::MAX {
            return Err(Error::InvalidAddress(raw as u16));
        }
        Ok(Self(raw))
    }

    /// Every address on the bus, in ascending order.
    pub fn all() -> impl Iterator<Item = Address> {
        (0..=Self::MAX).map(Address)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Address {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self> {
        Self::new(raw)
    }
}

impl TryFrom<u16> for Address {
    type Error = Error;

    fn try_from(raw: u16) -> Result<Self> {
        u8::try_from(raw)
            .map_err(|_| Error::InvalidAddress(raw))
            .and_then(Self::new)
    }
}

impl From<Address> for u8 {
    fn from(addr: Address) -> u8 {
        addr.0
    }
}

impl From<Address> for u16 {
    fn from(addr: Address) -> u16 {
        addr.0 as u16
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
