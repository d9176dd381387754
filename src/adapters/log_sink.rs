//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured connectivity events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A status-LED or telemetry adapter would implement the same trait.

use log::info;

use crate::app::events::NetEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`NetEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &NetEvent) {
        match event {
            NetEvent::ApStarted { ssid, gateway } => {
                info!("WIFI  | AP up: ssid='{}' gateway={}", ssid, gateway);
            }
            NetEvent::ApFailed { reason } => {
                info!("WIFI  | AP failed: {}", reason);
            }
            NetEvent::StaConnecting { ssid } => {
                info!("WIFI  | joining '{}'", ssid);
            }
            NetEvent::StaConnected { ip, elapsed_ms } => {
                info!("WIFI  | connected: ip={} ({}ms)", ip, elapsed_ms);
            }
            NetEvent::StaFailed { reason, elapsed_ms } => {
                info!("WIFI  | join failed after {}ms: {}", elapsed_ms, reason);
            }
            NetEvent::ModeTornDown { from } => {
                info!("STATE | {:?} -> torn down", from);
            }
        }
    }
}
