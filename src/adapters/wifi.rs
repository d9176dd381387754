//! WiFi radio adapter.
//!
//! Implements [`RadioPort`] — the hexagonal boundary for the wireless
//! driver. The connectivity manager decides *when* to switch modes and
//! how long to wait; this adapter only talks to the radio.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF driver calls via
//!   `esp_idf_svc::wifi::EspWifi`, plus a raw event-loop hook that records
//!   the last STA disconnect reason (the typed API does not surface it).
//! - **all other targets**: deterministic simulation for host-side tests.

use log::info;

use crate::app::identity::{ApConfiguration, NetworkIdentity};
use crate::app::ports::{AssociationStatus, RadioError, RadioPort};

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicU8, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_hal::modem::Modem;
#[cfg(target_os = "espidf")]
use esp_idf_svc::{eventloop::EspSystemEventLoop, nvs::EspDefaultNvsPartition, wifi::EspWifi};

// ───────────────────────────────────────────────────────────────
// Disconnect-reason tracking (espidf)
// ───────────────────────────────────────────────────────────────

/// Last `WIFI_EVENT_STA_DISCONNECTED` reason code, 0 when none seen
/// since the current association attempt began.
#[cfg(target_os = "espidf")]
static DISCONNECT_REASON: AtomicU8 = AtomicU8::new(0);

#[cfg(target_os = "espidf")]
unsafe extern "C" fn on_wifi_event(
    _arg: *mut core::ffi::c_void,
    _event_base: esp_idf_svc::sys::esp_event_base_t,
    event_id: i32,
    event_data: *mut core::ffi::c_void,
) {
    use esp_idf_svc::sys::{wifi_event_sta_disconnected_t, wifi_event_t_WIFI_EVENT_STA_DISCONNECTED};

    if event_id == wifi_event_t_WIFI_EVENT_STA_DISCONNECTED as i32 && !event_data.is_null() {
        // SAFETY: the event loop delivers a `wifi_event_sta_disconnected_t`
        // payload for this event id; it stays valid for the callback.
        let data = unsafe { &*(event_data as *const wifi_event_sta_disconnected_t) };
        DISCONNECT_REASON.store(data.reason, Ordering::Relaxed);
    }
}

/// Reason codes that mean the credentials were refused, as opposed to the
/// network being out of reach (`NO_AP_FOUND` and friends stay `Pending`
/// so the deadline decides).
#[cfg(target_os = "espidf")]
fn is_auth_rejection(reason: u8) -> bool {
    use esp_idf_svc::sys::{
        wifi_err_reason_t_WIFI_REASON_4WAY_HANDSHAKE_TIMEOUT,
        wifi_err_reason_t_WIFI_REASON_AUTH_EXPIRE, wifi_err_reason_t_WIFI_REASON_AUTH_FAIL,
        wifi_err_reason_t_WIFI_REASON_HANDSHAKE_TIMEOUT,
    };

    matches!(
        u32::from(reason),
        wifi_err_reason_t_WIFI_REASON_AUTH_EXPIRE
            | wifi_err_reason_t_WIFI_REASON_4WAY_HANDSHAKE_TIMEOUT
            | wifi_err_reason_t_WIFI_REASON_AUTH_FAIL
            | wifi_err_reason_t_WIFI_REASON_HANDSHAKE_TIMEOUT
    )
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

/// Number of simulated status polls before an association resolves.
#[cfg(not(target_os = "espidf"))]
const SIM_POLLS_BEFORE_RESOLVE: u32 = 2;

pub struct WifiAdapter {
    #[cfg(target_os = "espidf")]
    driver: EspWifi<'static>,

    // Simulation state: one flat record of what the "radio" is doing.
    #[cfg(not(target_os = "espidf"))]
    sim_ap_up: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_associating: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_reject: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_polls: u32,
}

impl WifiAdapter {
    /// Take ownership of the modem and wrap the ESP-IDF WiFi driver.
    ///
    /// The NVS partition carries PHY calibration data; without it the
    /// radio recalibrates on every boot.
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
    ) -> Result<Self, RadioError> {
        let driver = EspWifi::new(modem, sysloop, Some(nvs)).map_err(esp_err)?;
        register_disconnect_tracker()?;
        Ok(Self { driver })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            sim_ap_up: false,
            sim_associating: false,
            sim_reject: false,
            sim_polls: 0,
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start_ap(&mut self, config: &ApConfiguration) -> Result<(), RadioError> {
        use esp_idf_svc::ipv4::{self, Mask, RouterConfiguration, Subnet};
        use esp_idf_svc::netif::{EspNetif, NetifConfiguration};
        use esp_idf_svc::wifi::{AccessPointConfiguration, AuthMethod, Configuration};

        // Rebuild the AP netif so the device hands out addresses on the
        // caller's subnet instead of the IDF default.
        let mut netif_cfg = NetifConfiguration::wifi_default_router();
        netif_cfg.ip_configuration = Some(ipv4::Configuration::Router(RouterConfiguration {
            subnet: Subnet {
                gateway: config.gateway(),
                mask: Mask(config.prefix_len()),
            },
            dhcp_enabled: true,
            ..Default::default()
        }));
        let ap_netif = EspNetif::new_with_conf(&netif_cfg).map_err(esp_err)?;
        // Swap before start(); the driver binds netifs when it comes up.
        self.driver.swap_netif_ap(ap_netif).map_err(esp_err)?;

        let ssid = config
            .ssid()
            .try_into()
            .map_err(|_| RadioError::Configuration("ssid rejected by driver"))?;
        let ap_conf = AccessPointConfiguration {
            ssid,
            // Open network per the commissioning contract: stations join
            // without a password.
            auth_method: AuthMethod::None,
            channel: 1,
            ..Default::default()
        };
        self.driver
            .set_configuration(&Configuration::AccessPoint(ap_conf))
            .map_err(esp_err)?;
        self.driver.start().map_err(esp_err)?;

        if !self.driver.is_started().map_err(esp_err)? {
            return Err(RadioError::Configuration("AP did not report started"));
        }
        info!("WiFi: AP broadcasting '{}' on channel 1", config.ssid());
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start_ap(&mut self, config: &ApConfiguration) -> Result<(), RadioError> {
        self.sim_ap_up = true;
        info!(
            "WiFi(sim): AP up ssid='{}' gateway={}",
            config.ssid(),
            config.gateway()
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_begin_association(&mut self, identity: &NetworkIdentity) -> Result<(), RadioError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        DISCONNECT_REASON.store(0, Ordering::Relaxed);

        let client = ClientConfiguration {
            ssid: identity
                .ssid()
                .try_into()
                .map_err(|_| RadioError::Configuration("ssid rejected by driver"))?,
            password: identity
                .password()
                .try_into()
                .map_err(|_| RadioError::Configuration("password rejected by driver"))?,
            auth_method: if identity.is_open() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        };
        self.driver
            .set_configuration(&Configuration::Client(client))
            .map_err(esp_err)?;
        self.driver.start().map_err(esp_err)?;
        self.driver.connect().map_err(esp_err)?;
        info!("WiFi: connect issued for '{}'", identity.ssid());
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_begin_association(&mut self, identity: &NetworkIdentity) -> Result<(), RadioError> {
        self.sim_associating = true;
        self.sim_polls = 0;
        // Passwords starting with "bad" model a network that refuses us.
        self.sim_reject = identity.password().starts_with("bad");
        info!("WiFi(sim): associating with '{}'", identity.ssid());
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_association_status(&mut self) -> AssociationStatus {
        // A recorded rejection wins over link polling: the driver keeps
        // the interface "connecting" while it retries internally.
        if is_auth_rejection(DISCONNECT_REASON.load(Ordering::Relaxed)) {
            return AssociationStatus::Rejected;
        }

        if let Ok(true) = self.driver.is_connected() {
            // Associated is not enough; wait for DHCP to hand us a lease.
            if let Ok(info) = self.driver.sta_netif().get_ip_info() {
                if !info.ip.is_unspecified() {
                    return AssociationStatus::Connected { ip: info.ip };
                }
            }
        }
        AssociationStatus::Pending
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_association_status(&mut self) -> AssociationStatus {
        if !self.sim_associating {
            return AssociationStatus::Pending;
        }
        if self.sim_polls < SIM_POLLS_BEFORE_RESOLVE {
            self.sim_polls += 1;
            return AssociationStatus::Pending;
        }
        if self.sim_reject {
            AssociationStatus::Rejected
        } else {
            AssociationStatus::Connected {
                ip: core::net::Ipv4Addr::new(192, 168, 1, 42),
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn platform_shut_down(&mut self) {
        // Errors here mean the radio was already down; either way it is
        // silent afterwards, which is all the contract asks.
        let _ = self.driver.disconnect();
        let _ = self.driver.stop();
        DISCONNECT_REASON.store(0, Ordering::Relaxed);
        info!("WiFi: radio down");
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_shut_down(&mut self) {
        self.sim_ap_up = false;
        self.sim_associating = false;
        self.sim_reject = false;
        self.sim_polls = 0;
        info!("WiFi(sim): radio down");
    }
}

// ───────────────────────────────────────────────────────────────
// RadioPort
// ───────────────────────────────────────────────────────────────

impl RadioPort for WifiAdapter {
    fn start_access_point(&mut self, config: &ApConfiguration) -> Result<(), RadioError> {
        self.platform_start_ap(config)
    }

    fn begin_association(&mut self, identity: &NetworkIdentity) -> Result<(), RadioError> {
        self.platform_begin_association(identity)
    }

    fn association_status(&mut self) -> AssociationStatus {
        self.platform_association_status()
    }

    fn shut_down(&mut self) {
        self.platform_shut_down();
    }
}

// ───────────────────────────────────────────────────────────────
// espidf plumbing
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn esp_err(e: esp_idf_svc::sys::EspError) -> RadioError {
    RadioError::Driver(e.code())
}

#[cfg(target_os = "espidf")]
fn register_disconnect_tracker() -> Result<(), RadioError> {
    use esp_idf_svc::sys::{
        esp_event_handler_instance_register, esp_event_handler_instance_t, ESP_OK, WIFI_EVENT,
        wifi_event_t_WIFI_EVENT_STA_DISCONNECTED,
    };

    let mut instance: esp_event_handler_instance_t = core::ptr::null_mut();
    // SAFETY: the handler is a 'static fn that only reads its payload, and
    // the default event loop exists — EspWifi::new created it before us.
    let rc = unsafe {
        esp_event_handler_instance_register(
            WIFI_EVENT,
            wifi_event_t_WIFI_EVENT_STA_DISCONNECTED as i32,
            Some(on_wifi_event),
            core::ptr::null_mut(),
            &mut instance,
        )
    };
    if rc != ESP_OK {
        return Err(RadioError::Driver(rc));
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
