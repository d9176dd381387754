//! FanControl Firmware — Main Entry Point
//!
//! Hexagonal architecture: the connectivity core never touches hardware,
//! and every driver sits behind a port trait injected at the call site.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                │
//! │                                                      │
//! │   WifiAdapter     Esp32TimeAdapter    LogEventSink   │
//! │   (RadioPort)     (TimePort)          (EventSink)    │
//! │                                                      │
//! │  ─────────────── Port Trait Boundary ──────────────  │
//! │                                                      │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │       ConnectivityManager (pure logic)         │  │
//! │  │       link-state machine · poll loop           │  │
//! │  └────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod app;
mod adapters;
pub mod config;
pub mod diagnostics;
mod error;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use embedded_hal::delay::DelayNs;
use log::{info, warn};

use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use adapters::log_sink::LogEventSink;
use adapters::time::Esp32TimeAdapter;
use adapters::wifi::WifiAdapter;
use app::manager::ConnectivityManager;
use config::NetworkConfig;
use diagnostics::{BootReport, RuntimeMetrics};

/// How often the idle loop leaves a heap trace in the log.
const METRICS_INTERVAL_SECS: u64 = 60;

// ── Network bring-up policy ───────────────────────────────────

/// Station mode first when credentials are provisioned, otherwise (or on
/// any station failure) fall back to the open commissioning AP.
fn bring_up_network(
    manager: &mut ConnectivityManager,
    radio: &mut WifiAdapter,
    clock: &mut Esp32TimeAdapter,
    sink: &mut LogEventSink,
    config: &NetworkConfig,
) -> error::Result<()> {
    if config.has_sta_credentials() {
        let identity = config.station_identity()?;
        match manager.start_sta_mode(radio, clock, sink, &identity, config.sta_timeout_ms) {
            Ok(()) => return Ok(()),
            Err(e) => warn!("Station mode failed ({}), falling back to AP", e),
        }
    }

    let ap = config.ap_configuration()?;
    manager.start_ap_mode(radio, sink, &ap)?;
    Ok(())
}

/// Init failures are unrecoverable: log, then hold until the watchdog
/// resets the chip.
fn halt(subsystem: &str, e: impl core::fmt::Display) -> ! {
    log::error!("{} init failed: {} — halting", subsystem, e);
    #[allow(clippy::empty_loop)]
    loop {}
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  FanControl v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    diagnostics::install_panic_handler();
    BootReport::collect().log();

    // ── 2. Peripherals and system services ────────────────────
    let peripherals = match Peripherals::take() {
        Ok(p) => p,
        Err(e) => halt("peripherals", e),
    };
    let sysloop = match EspSystemEventLoop::take() {
        Ok(s) => s,
        Err(e) => halt("event loop", e),
    };
    let nvs = match EspDefaultNvsPartition::take() {
        Ok(n) => n,
        Err(e) => halt("NVS partition", e),
    };

    // ── 3. Construct adapters ─────────────────────────────────
    let mut radio = match WifiAdapter::new(peripherals.modem, sysloop, nvs) {
        Ok(r) => r,
        Err(e) => halt("radio", e),
    };
    let mut clock = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();

    // ── 4. Connectivity bring-up ──────────────────────────────
    // Until a provisioning surface exists, built-in defaults drive this:
    // no station credentials, so the device comes up as its own AP.
    let config = NetworkConfig::default();
    let mut manager = ConnectivityManager::new();

    match bring_up_network(&mut manager, &mut radio, &mut clock, &mut log_sink, &config) {
        Ok(()) => info!("Network ready: {:?}", manager.link_state()),
        Err(e) => warn!("No connectivity: {} (continuing offline)", e),
    }

    info!("System ready. Entering idle loop.");

    // ── 5. Idle loop ──────────────────────────────────────────
    let mut last_metrics_secs: u64 = 0;
    loop {
        clock.delay_ms(1_000);

        let uptime = clock.uptime_secs();
        if uptime >= last_metrics_secs + METRICS_INTERVAL_SECS {
            let m = RuntimeMetrics::collect(uptime);
            info!(
                "UPTIME | {}s, heap {} B (min ever {} B)",
                m.uptime_secs, m.heap_free, m.heap_min_free
            );
            last_metrics_secs = uptime;
        }
    }
}
