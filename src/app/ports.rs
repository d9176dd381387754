//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ConnectivityManager (domain)
//! ```
//!
//! Driven adapters (radio driver, clock, event sinks) implement these traits.
//! The [`ConnectivityManager`](super::manager::ConnectivityManager) consumes
//! them via generics, so the domain core never touches the radio hardware
//! directly and a test harness can substitute scripted fakes.

use core::net::Ipv4Addr;

use embedded_hal::delay::DelayNs;

use super::identity::{ApConfiguration, NetworkIdentity};

// ───────────────────────────────────────────────────────────────
// Radio port (driven adapter: domain → wireless stack)
// ───────────────────────────────────────────────────────────────

/// The radio-driver capability: mode switch, association start, status
/// query, teardown. One exclusive instance per device; the manager borrows
/// it `&mut` for the duration of a bring-up call.
pub trait RadioPort {
    /// Bind the given gateway/mask, then start broadcasting an open access
    /// point with the configured SSID. Blocks until the AP is up or the
    /// driver refuses.
    fn start_access_point(&mut self, config: &ApConfiguration) -> Result<(), RadioError>;

    /// Begin associating with the named network. Returns once the attempt
    /// has been handed to the driver; association completes asynchronously
    /// and is observed through [`association_status`](Self::association_status).
    fn begin_association(&mut self, identity: &NetworkIdentity) -> Result<(), RadioError>;

    /// Current state of the in-flight association attempt.
    fn association_status(&mut self) -> AssociationStatus;

    /// Tear down whatever the radio is doing. Afterwards the radio is
    /// disassociated and silent. Must be infallible and idempotent.
    fn shut_down(&mut self);
}

/// Result of polling an in-flight station association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationStatus {
    /// Still associating (or waiting for an address).
    Pending,
    /// Associated and holding an address on the target network.
    Connected { ip: Ipv4Addr },
    /// The target network explicitly refused the credentials.
    Rejected,
}

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: domain → monotonic clock)
// ───────────────────────────────────────────────────────────────

/// Monotonic clock capability. The `DelayNs` supertrait supplies the
/// blocking delay the polling loop sleeps on between status checks.
pub trait TimePort: DelayNs {
    /// Milliseconds since boot (monotonic, never goes backwards).
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`NetEvent`](super::events::NetEvent)s
/// through this port. Adapters decide where they go (serial log today;
/// a status LED or telemetry channel later).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::NetEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors surfaced by [`RadioPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// The requested parameters cannot be applied (bad mask, SSID the
    /// driver refuses, address bind failure).
    Configuration(&'static str),
    /// The underlying driver returned an error code.
    Driver(i32),
}

impl core::fmt::Display for RadioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "radio configuration: {}", msg),
            Self::Driver(rc) => write!(f, "radio driver error (rc={})", rc),
        }
    }
}
