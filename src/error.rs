//! Unified error types for the fan-controller firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! boot sequence's error handling uniform. All variants are `Copy` so they
//! can be passed around and logged without allocation.

use core::fmt;

use crate::app::identity::IdentityError;
use crate::app::manager::NetError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Connectivity bring-up failed.
    Net(NetError),
    /// An SSID, password or subnet parameter failed validation.
    Identity(IdentityError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Net(e) => write!(f, "net: {e}"),
            Self::Identity(e) => write!(f, "identity: {e}"),
        }
    }
}

impl From<NetError> for Error {
    fn from(e: NetError) -> Self {
        Self::Net(e)
    }
}

impl From<IdentityError> for Error {
    fn from(e: IdentityError) -> Self {
        Self::Identity(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
