//! Outcome of the most recent bus operation.

use std::fmt;

/// Last-operation status held by a [`Bus`](crate::Bus).
///
/// The numeric codes match what earlier tooling for these boards logged, so
/// `Success` is `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum StatusCode {
    /// Last operation completed
    Success = 0,
    /// Bus opened, no operation performed yet
    #[default]
    Ready = 1,
    /// Last operation failed, either in the transport or because its
    /// input was rejected (an address above 0x7F, an oversized message)
    Fail = 9,
}

impl StatusCode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Ready => "ready",
            Self::Fail => "fail",
        };
        f.write_str(name)
    }
}
