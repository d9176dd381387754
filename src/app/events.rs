//! Outbound connectivity events.
//!
//! The [`ConnectivityManager`](super::manager::ConnectivityManager) emits
//! these through the [`EventSink`](super::ports::EventSink) port. Adapters
//! on the other side decide what to do with them — log to serial today,
//! drive a status LED or feed telemetry once those exist.

use core::net::Ipv4Addr;

use super::manager::LinkState;

/// Structured events emitted by the connectivity core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetEvent {
    /// The access point is up and broadcasting (carries SSID and gateway).
    ApStarted {
        ssid: heapless::String<32>,
        gateway: Ipv4Addr,
    },

    /// Access-point bring-up failed and the radio is back down.
    ApFailed { reason: super::manager::NetError },

    /// A station association attempt has begun.
    StaConnecting { ssid: heapless::String<32> },

    /// The station associated and holds an address.
    StaConnected { ip: Ipv4Addr, elapsed_ms: u64 },

    /// The station attempt ended without a connection.
    StaFailed {
        reason: super::manager::NetError,
        elapsed_ms: u64,
    },

    /// A previously active mode was torn down to make room for a new one.
    ModeTornDown { from: LinkState },
}
