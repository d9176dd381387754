//! Connectivity manager — the domain core of wireless bring-up.
//!
//! Owns the link-state machine and nothing else. The radio, the clock and
//! the event sink are injected per call as port traits, so the whole module
//! runs unmodified on the host with scripted fakes.
//!
//! ```text
//!                        ┌──────────────▶ ApActive
//!   Uninitialized ── start_ap_mode
//!        │
//!        └── start_sta_mode ──▶ StaConnecting ──▶ StaConnected
//!                                    │
//!                                    └──────────▶ StaFailed
//! ```
//!
//! Exactly one mode is active at a time: bringing up a new mode first tears
//! down whatever the radio was doing. Both entry points block until the
//! radio reports up, failed, or (for STA) the caller's deadline passes.

use log::{info, warn};

use super::events::NetEvent;
use super::identity::{ApConfiguration, NetworkIdentity};
use super::ports::{AssociationStatus, EventSink, RadioError, RadioPort, TimePort};

/// Fixed cadence of the association poll loop.
///
/// Short enough that a successful join is noticed promptly, long enough
/// that the loop does not hammer the driver while the radio negotiates.
pub const STA_POLL_INTERVAL_MS: u32 = 250;

// ───────────────────────────────────────────────────────────────
// Link state
// ───────────────────────────────────────────────────────────────

/// Where the wireless link currently stands.
///
/// The manager's only persistent runtime state. Transitions happen solely
/// inside [`ConnectivityManager::start_ap_mode`] and
/// [`ConnectivityManager::start_sta_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No mode has been brought up since boot (or the last teardown).
    Uninitialized,
    /// The device is broadcasting its own access point.
    ApActive,
    /// A station association attempt is in flight.
    StaConnecting,
    /// Associated with the target network and holding an address.
    StaConnected,
    /// The last station attempt ended without a connection.
    StaFailed,
}

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

/// Failures surfaced by the connectivity entry points.
///
/// None of these are fatal: the caller picks the fallback (retry, switch
/// to AP mode, give up). The manager never retries internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    /// The radio refused the requested configuration or errored while
    /// bringing a mode up.
    RadioConfiguration(RadioError),
    /// Station association did not complete within the caller's deadline.
    ConnectionTimeout,
    /// The target network explicitly refused the credentials. Distinct
    /// from [`ConnectionTimeout`](Self::ConnectionTimeout) so callers can
    /// skip fruitless retries with the same password.
    AuthenticationRejected,
}

impl core::fmt::Display for NetError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RadioConfiguration(e) => write!(f, "{}", e),
            Self::ConnectionTimeout => write!(f, "association timed out"),
            Self::AuthenticationRejected => write!(f, "credentials rejected by network"),
        }
    }
}

impl From<RadioError> for NetError {
    fn from(e: RadioError) -> Self {
        Self::RadioConfiguration(e)
    }
}

// ───────────────────────────────────────────────────────────────
// Connection attempt bookkeeping
// ───────────────────────────────────────────────────────────────

/// Deadline arithmetic for one station attempt.
struct ConnectionAttempt {
    started_ms: u64,
    timeout_ms: u32,
}

impl ConnectionAttempt {
    fn begin(now_ms: u64, timeout_ms: u32) -> Self {
        Self {
            started_ms: now_ms,
            timeout_ms,
        }
    }

    /// Milliseconds since the attempt began. Saturates at zero so a
    /// misbehaving clock can only shorten the wait, never extend it.
    fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms)
    }

    fn expired(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) >= u64::from(self.timeout_ms)
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityManager
// ───────────────────────────────────────────────────────────────

/// Single owner of the wireless link.
///
/// There is one radio; there is one of these. Construct it at boot, keep
/// it alive for the life of the firmware, and pass the radio/clock/sink
/// ports into each call. `&mut self` on the entry points makes overlapping
/// calls unrepresentable.
pub struct ConnectivityManager {
    link: LinkState,
}

impl ConnectivityManager {
    pub fn new() -> Self {
        Self {
            link: LinkState::Uninitialized,
        }
    }

    /// Current link state. Between calls this is never `StaConnecting` —
    /// both entry points resolve an attempt before returning.
    pub fn link_state(&self) -> LinkState {
        self.link
    }

    // ── AP mode ───────────────────────────────────────────────

    /// Bring up an open access point on the device's own subnet.
    ///
    /// Blocks until the radio reports the AP broadcasting or refuses.
    /// On failure the link state is what it was on entry (after any mode
    /// teardown) and the radio has been shut back down.
    pub fn start_ap_mode(
        &mut self,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
        config: &ApConfiguration,
    ) -> Result<(), NetError> {
        self.tear_down_active_mode(radio, sink);

        info!(
            "AP bring-up: ssid={} gateway={}/{}",
            config.ssid(),
            config.gateway(),
            config.prefix_len()
        );
        match radio.start_access_point(config) {
            Ok(()) => {
                self.link = LinkState::ApActive;
                sink.emit(&NetEvent::ApStarted {
                    ssid: owned_ssid(config.ssid()),
                    gateway: config.gateway(),
                });
                info!("AP up: {} at {}", config.ssid(), config.gateway());
                Ok(())
            }
            Err(e) => {
                // No partial radio state survives a failed bring-up.
                radio.shut_down();
                let reason = NetError::RadioConfiguration(e);
                warn!("AP bring-up failed: {}", reason);
                sink.emit(&NetEvent::ApFailed { reason });
                Err(reason)
            }
        }
    }

    // ── STA mode ──────────────────────────────────────────────

    /// Join an existing network, waiting at most `timeout_ms` for the
    /// association to complete.
    ///
    /// Polls the radio every [`STA_POLL_INTERVAL_MS`] and checks status
    /// before the deadline, so `timeout_ms = 0` still performs exactly one
    /// status check (an already-associated radio succeeds; anything else
    /// times out immediately). Returns within `timeout_ms` plus one poll
    /// interval of slack.
    ///
    /// One association attempt per call. Retry and fallback policy belongs
    /// to the caller.
    pub fn start_sta_mode(
        &mut self,
        radio: &mut impl RadioPort,
        clock: &mut impl TimePort,
        sink: &mut impl EventSink,
        identity: &NetworkIdentity,
        timeout_ms: u32,
    ) -> Result<(), NetError> {
        self.tear_down_active_mode(radio, sink);

        self.link = LinkState::StaConnecting;
        sink.emit(&NetEvent::StaConnecting {
            ssid: owned_ssid(identity.ssid()),
        });
        info!(
            "STA join: ssid={} timeout={}ms{}",
            identity.ssid(),
            timeout_ms,
            if identity.is_open() { " (open)" } else { "" }
        );

        let attempt = ConnectionAttempt::begin(clock.now_ms(), timeout_ms);
        if let Err(e) = radio.begin_association(identity) {
            let elapsed = attempt.elapsed_ms(clock.now_ms());
            return Err(self.fail_station(radio, sink, NetError::RadioConfiguration(e), elapsed));
        }

        loop {
            // Status first: with a zero timeout an already-associated radio
            // must still win over the deadline check.
            match radio.association_status() {
                AssociationStatus::Connected { ip } => {
                    let elapsed = attempt.elapsed_ms(clock.now_ms());
                    self.link = LinkState::StaConnected;
                    sink.emit(&NetEvent::StaConnected {
                        ip,
                        elapsed_ms: elapsed,
                    });
                    info!("STA connected: ip={} after {}ms", ip, elapsed);
                    return Ok(());
                }
                AssociationStatus::Rejected => {
                    let elapsed = attempt.elapsed_ms(clock.now_ms());
                    return Err(self.fail_station(
                        radio,
                        sink,
                        NetError::AuthenticationRejected,
                        elapsed,
                    ));
                }
                AssociationStatus::Pending => {}
            }

            let now = clock.now_ms();
            if attempt.expired(now) {
                return Err(self.fail_station(
                    radio,
                    sink,
                    NetError::ConnectionTimeout,
                    attempt.elapsed_ms(now),
                ));
            }

            clock.delay_ms(STA_POLL_INTERVAL_MS);
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// Mode exclusivity: the radio carries one role at a time, so a live
    /// mode is shut down before the next one comes up.
    fn tear_down_active_mode(&mut self, radio: &mut impl RadioPort, sink: &mut impl EventSink) {
        match self.link {
            LinkState::ApActive | LinkState::StaConnecting | LinkState::StaConnected => {
                info!("Tearing down {:?} before mode switch", self.link);
                radio.shut_down();
                sink.emit(&NetEvent::ModeTornDown { from: self.link });
                self.link = LinkState::Uninitialized;
            }
            LinkState::Uninitialized | LinkState::StaFailed => {}
        }
    }

    /// Shared station failure path: radio down, state recorded, event out.
    fn fail_station(
        &mut self,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
        reason: NetError,
        elapsed_ms: u64,
    ) -> NetError {
        radio.shut_down();
        self.link = LinkState::StaFailed;
        warn!("STA join failed after {}ms: {}", elapsed_ms, reason);
        sink.emit(&NetEvent::StaFailed { reason, elapsed_ms });
        reason
    }
}

impl Default for ConnectivityManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy a length-validated SSID into its owned bounded form.
fn owned_ssid(ssid: &str) -> heapless::String<32> {
    let mut out = heapless::String::new();
    // Cannot overflow: identity validation caps SSIDs at 32 bytes.
    let _ = out.push_str(ssid);
    out
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
